//! Post-edit analysis.
//!
//! After one patch's geometry changes, every touching neighbour is
//! classified (overlap / gap / aligned / duplicate) and the area the edit
//! abandoned is collected into a gap polygon. Neighbours are detected
//! against the OLD geometry: the old ring still aligns with unedited
//! neighbours even when the new ring has moved out of tolerance.

mod gap;

use std::collections::BTreeMap;

use geo::{BoundingRect, Coord, MultiPolygon, Polygon};

use crate::adjacency::{find_adjacent_patches, AdjacencyRecord};
use crate::consts::{
    DUPLICATE_OVERLAP_RATIO, GEOMETRIC_TOLERANCE_DEG_SQ, MAX_WINDING_SAMPLES, MIN_AREA_SQM,
    NARROW_PAD_VERTICES, SHARED_EDGE_TOL_DEG_SQ,
};
use crate::geom::{geodesic_area_sqm, ring_at, rings_of, try_intersection, PatchIndex};
use crate::ring::{dist_sq, extract_segment, nearest_vertex_index, open_len, point_to_ring_dist_sq};
use crate::types::{PatchSet, Relationship};

/// An adjacency with its post-edit classification.
#[derive(Debug, Clone)]
pub struct NeighbourInfo {
    pub adjacency: AdjacencyRecord,
    pub relationship: Relationship,
    pub is_duplicate: bool,
}

/// Area left unassigned by an inward edit.
#[derive(Debug, Clone)]
pub enum GapGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

#[derive(Debug, Clone)]
pub struct PostEditAnalysis {
    pub duplicates: Vec<NeighbourInfo>,
    pub neighbours: Vec<NeighbourInfo>,
    pub gap_geometry: Option<GapGeometry>,
    pub gap_area_sqm: f64,
}

impl AdjacencyRecord {
    /// The edited-ring range in the edited ring's own walk order.
    ///
    /// Detection anchors `edited_start_index` to the neighbour's segment
    /// start; when windings oppose, that anchor is the downstream end of
    /// the arc, so the forward arc runs end-to-start.
    pub fn edited_range_forward(&self) -> (usize, usize) {
        if self.is_reversed {
            (self.edited_end_index, self.edited_start_index)
        } else {
            (self.edited_start_index, self.edited_end_index)
        }
    }
}

/// Classify every neighbour of the edited patch after a geometry change.
///
/// `pre_edit_simplified` is the geometry the user started hand-refining
/// from, when the edit went through the refine stage; it narrows boundary
/// transfer to the sub-range the user actually touched.
pub fn analyse_post_edit(
    edited_patch_id: &str,
    old_geom: &MultiPolygon<f64>,
    new_geom: &MultiPolygon<f64>,
    patches: &PatchSet,
    pre_edit_simplified: Option<&MultiPolygon<f64>>,
) -> PostEditAnalysis {
    let index = PatchIndex::build(patches);

    // 1) Detect neighbours from the old geometry.
    let mut candidates: Vec<AdjacencyRecord> = Vec::new();
    for (pi, ri, ls) in rings_of(old_geom) {
        candidates.extend(find_adjacent_patches(edited_patch_id, &ls.0, patches, pi, ri));
    }

    // 2) Remap edited indices onto the new ring; drop candidates whose
    //    ring disappeared or did not change at all.
    let mut remapped: Vec<AdjacencyRecord> = Vec::new();
    for mut rec in candidates {
        let Some(old_ring) = ring_at(old_geom, rec.edited_polygon_index, rec.edited_ring_index)
        else { continue };
        let Some(new_ring) = ring_at(new_geom, rec.edited_polygon_index, rec.edited_ring_index)
        else { continue };
        if changed_range(&new_ring.0, &old_ring.0).is_none() {
            continue; // nothing moved on this ring
        }
        let old_open = open_len(&old_ring.0);
        if rec.edited_start_index >= old_open || rec.edited_end_index >= old_open {
            continue;
        }
        let (Some(start), Some(end)) = (
            nearest_vertex_index(old_ring.0[rec.edited_start_index], &new_ring.0),
            nearest_vertex_index(old_ring.0[rec.edited_end_index], &new_ring.0),
        ) else { continue };
        rec.edited_start_index = start;
        rec.edited_end_index = end;

        // 3) Narrow to the user-edited sub-range when the refine baseline
        //    is known. Any failure keeps the full range.
        if let Some(simplified) = pre_edit_simplified {
            narrow_to_edit(&mut rec, new_geom, simplified, patches);
        }
        remapped.push(rec);
    }

    // 4) Keep the strongest adjacency per neighbour patch.
    let mut best: BTreeMap<String, AdjacencyRecord> = BTreeMap::new();
    for rec in remapped {
        match best.get(&rec.patch_id) {
            Some(prev) if prev.matched_vertex_count >= rec.matched_vertex_count => {}
            _ => {
                best.insert(rec.patch_id.clone(), rec);
            }
        }
    }

    // 5) Duplicates: smaller area covered by >= 95% overlap with the old
    //    geometry. Zero-area geometries are never duplicates.
    let duplicate_ids = detect_duplicates(edited_patch_id, old_geom, patches, &index);

    // 6) Classify the survivors against the new geometry.
    let mut duplicates = Vec::new();
    let mut neighbours = Vec::new();
    for (patch_id, rec) in best {
        let Some(patch) = patches.get(&patch_id) else { continue };
        let relationship = classify(&rec, &patch.geometry, new_geom);
        let is_duplicate = duplicate_ids.contains(&patch_id);
        let info = NeighbourInfo { adjacency: rec, relationship, is_duplicate };
        if is_duplicate {
            duplicates.push(info);
        } else {
            neighbours.push(info);
        }
    }
    // Duplicates that produced no adjacency (degenerate rings) still get
    // reported, with a placeholder record.
    for id in &duplicate_ids {
        if duplicates.iter().any(|d: &NeighbourInfo| &d.adjacency.patch_id == id) {
            continue;
        }
        let Some(patch) = patches.get(id) else { continue };
        duplicates.push(NeighbourInfo {
            adjacency: AdjacencyRecord {
                patch_id: patch.id.clone(),
                patch_code: patch.code.clone(),
                polygon_index: 0,
                ring_index: 0,
                start_index: 0,
                end_index: 0,
                edited_polygon_index: 0,
                edited_ring_index: 0,
                edited_start_index: 0,
                edited_end_index: 0,
                is_reversed: false,
                matched_vertex_count: 0,
            },
            relationship: Relationship::Overlap,
            is_duplicate: true,
        });
    }

    // 7) Gap polygon: what the edit abandoned, minus everything occupied.
    let (gap_geometry, gap_area_sqm) =
        gap::build_gap(edited_patch_id, old_geom, new_geom, patches, &index);

    PostEditAnalysis { duplicates, neighbours, gap_geometry, gap_area_sqm }
}

/// Contiguous range of `new` vertices that differ from `reference`.
///
/// Index-by-index when open counts match, by nearest-vertex distance
/// otherwise. `None` when nothing moved. The range is linear (first to
/// last changed index); edits spanning the seam fall back to the caller's
/// full range downstream.
fn changed_range(new: &[Coord<f64>], reference: &[Coord<f64>]) -> Option<(usize, usize)> {
    let n_new = open_len(new);
    let n_ref = open_len(reference);
    if n_new < 3 || n_ref < 3 {
        return None;
    }
    let changed: Vec<usize> = if n_new == n_ref {
        (0..n_new)
            .filter(|&i| dist_sq(new[i], reference[i]) > GEOMETRIC_TOLERANCE_DEG_SQ)
            .collect()
    } else {
        (0..n_new)
            .filter(|&i| {
                reference[..n_ref]
                    .iter()
                    .map(|&r| dist_sq(new[i], r))
                    .fold(f64::INFINITY, f64::min)
                    > GEOMETRIC_TOLERANCE_DEG_SQ
            })
            .collect()
    };
    match (changed.first(), changed.last()) {
        (Some(&first), Some(&last)) => Some((first, last)),
        _ => None,
    }
}

/// Narrow `rec`'s edited range to the sub-range the user touched after
/// simplification, padded by anchor vertices; recompute the neighbour
/// indices from the narrowed endpoints. Fault-tolerant: any failure
/// leaves the record untouched.
fn narrow_to_edit(
    rec: &mut AdjacencyRecord,
    new_geom: &MultiPolygon<f64>,
    pre_edit_simplified: &MultiPolygon<f64>,
    patches: &PatchSet,
) {
    let Some(new_ring) = ring_at(new_geom, rec.edited_polygon_index, rec.edited_ring_index)
    else { return };
    let Some(base_ring) =
        ring_at(pre_edit_simplified, rec.edited_polygon_index, rec.edited_ring_index)
    else { return };

    let Some((first, last)) = changed_range(&new_ring.0, &base_ring.0) else { return };
    let n = open_len(&new_ring.0);

    let padded_start = first.saturating_sub(NARROW_PAD_VERTICES);
    let padded_end = (last + NARROW_PAD_VERTICES).min(n - 1);

    let (range_start, range_end) = rec.edited_range_forward();
    if range_end < range_start {
        return; // wrapped shared range: keep the full range
    }
    let narrow_start = range_start.max(padded_start);
    let narrow_end = range_end.min(padded_end);
    if narrow_start > narrow_end {
        return; // edit happened outside this shared boundary
    }
    if (narrow_start, narrow_end) == (range_start, range_end) {
        return; // nothing to narrow
    }

    let Some(patch) = patches.get(&rec.patch_id) else { return };
    let Some(nb_ring) = ring_at(&patch.geometry, rec.polygon_index, rec.ring_index) else { return };
    let (Some(nb_a), Some(nb_b)) = (
        nearest_vertex_index(new_ring.0[narrow_start], &nb_ring.0),
        nearest_vertex_index(new_ring.0[narrow_end], &nb_ring.0),
    ) else { return };

    if rec.is_reversed {
        // neighbour walk start corresponds to the downstream edited end
        rec.edited_start_index = narrow_end;
        rec.edited_end_index = narrow_start;
        rec.start_index = nb_b;
        rec.end_index = nb_a;
    } else {
        rec.edited_start_index = narrow_start;
        rec.edited_end_index = narrow_end;
        rec.start_index = nb_a;
        rec.end_index = nb_b;
    }
}

fn detect_duplicates(
    edited_patch_id: &str,
    old_geom: &MultiPolygon<f64>,
    patches: &PatchSet,
    index: &PatchIndex,
) -> Vec<String> {
    let Some(old_bbox) = old_geom.bounding_rect() else { return Vec::new() };
    let old_area = geodesic_area_sqm(old_geom);
    if old_area == 0.0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for id in index.candidates(&old_bbox, 0.0) {
        if id == edited_patch_id {
            continue;
        }
        let Some(patch) = patches.get(id) else { continue };
        let other_area = geodesic_area_sqm(&patch.geometry);
        if other_area == 0.0 {
            continue;
        }
        let Ok(inter) = try_intersection(old_geom, &patch.geometry) else { continue };
        if geodesic_area_sqm(&inter) >= DUPLICATE_OVERLAP_RATIO * old_area.min(other_area) {
            out.push(id.to_string());
        }
    }
    out
}

/// Relationship of one neighbour to the new geometry.
///
/// Substantial intersection is an overlap. Otherwise the neighbour is
/// aligned while its shared segment still hugs the new edited ring, and a
/// gap once the boundary has retracted away from it.
fn classify(
    rec: &AdjacencyRecord,
    neighbour_geom: &MultiPolygon<f64>,
    new_geom: &MultiPolygon<f64>,
) -> Relationship {
    if let Ok(inter) = try_intersection(neighbour_geom, new_geom) {
        if geodesic_area_sqm(&inter) > MIN_AREA_SQM {
            return Relationship::Overlap;
        }
    }

    let (Some(nb_ring), Some(new_ring)) = (
        ring_at(neighbour_geom, rec.polygon_index, rec.ring_index),
        ring_at(new_geom, rec.edited_polygon_index, rec.edited_ring_index),
    ) else {
        return Relationship::Aligned;
    };

    let segment = extract_segment(&nb_ring.0, rec.start_index, rec.end_index);
    if segment.is_empty() {
        return Relationship::Aligned;
    }
    let stride = (segment.len() + MAX_WINDING_SAMPLES - 1) / MAX_WINDING_SAMPLES;
    let retracted = segment.iter().step_by(stride.max(1)).any(|&v| {
        point_to_ring_dist_sq(v, &new_ring.0)
            .map_or(true, |(d, _)| d >= SHARED_EDGE_TOL_DEG_SQ)
    });
    if retracted {
        Relationship::Gap
    } else {
        Relationship::Aligned
    }
}

pub use gap::build_gap;
