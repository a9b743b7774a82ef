//! Shared-boundary detection between rings.
//!
//! Matching is by geometric proximity, not vertex identity: simplification
//! moves vertices by metres and changes counts, so per-vertex equality
//! fails on the same boundary after an edit. A neighbour vertex belongs to
//! the shared zone when its perpendicular distance to the edited ring is
//! within tolerance.

use geo::Coord;
use smallvec::SmallVec;

use crate::consts::{BBOX_PAD_DEG, MAX_WINDING_SAMPLES, MIN_SHARED_VERTICES, SHARED_EDGE_TOL_DEG_SQ};
use crate::ring::{
    bbox, bboxes_overlap, cyclic_span, mod_index, nearest_vertex_index, open_len,
    point_to_ring_dist_sq,
};
use crate::types::PatchSet;

/// A shared segment between an edited ring and one neighbour ring.
///
/// `start_index..end_index` address the neighbour ring and
/// `edited_start_index..edited_end_index` the edited ring, both in
/// open-form vertex space; either range may wrap (`end < start`).
#[derive(Debug, Clone)]
pub struct AdjacencyRecord {
    pub patch_id: String,
    pub patch_code: String,
    /// Polygon/ring position of the shared segment on the neighbour.
    pub polygon_index: usize,
    pub ring_index: usize,
    pub start_index: usize,
    pub end_index: usize,
    /// Polygon/ring position of the edited ring, as given by the caller.
    pub edited_polygon_index: usize,
    pub edited_ring_index: usize,
    pub edited_start_index: usize,
    pub edited_end_index: usize,
    /// Whether the neighbour's winding along the shared edge opposes the
    /// edited ring's.
    pub is_reversed: bool,
    /// Number of neighbour vertices inside the shared zone.
    pub matched_vertex_count: usize,
}

/// A raw shared segment between two anonymous rings.
#[derive(Debug, Clone, Copy)]
pub struct SharedSegment {
    pub start: usize,
    pub end: usize,
    pub edited_start: usize,
    pub edited_end: usize,
    pub is_reversed: bool,
    pub matched_vertex_count: usize,
}

/// Find every shared boundary segment between `edited` and `neighbour`
/// (open or closed form; both are treated in open-form vertex space).
pub fn shared_segments(edited: &[Coord<f64>], neighbour: &[Coord<f64>]) -> Vec<SharedSegment> {
    let na = open_len(edited);
    let nb = open_len(neighbour);
    if na < 3 || nb < 3 {
        return Vec::new();
    }

    // 1) Mark neighbour vertices within tolerance of the edited boundary,
    //    remembering the edited edge they project onto.
    let marks: Vec<Option<usize>> = neighbour[..nb]
        .iter()
        .map(|&v| {
            point_to_ring_dist_sq(v, edited)
                .filter(|&(d, _)| d < SHARED_EDGE_TOL_DEG_SQ)
                .map(|(_, edge)| edge)
        })
        .collect();

    // 2) Group consecutive marked indices into raw runs.
    let mut runs: SmallVec<[(usize, usize); 2]> = SmallVec::new();
    let mut i = 0;
    while i < nb {
        if marks[i].is_some() {
            let start = i;
            while i + 1 < nb && marks[i + 1].is_some() {
                i += 1;
            }
            runs.push((start, i));
        }
        i += 1;
    }
    // Merge the first and last runs when they touch through the wrap-around.
    if runs.len() > 1 {
        let (first_start, first_end) = runs[0];
        let (last_start, last_end) = runs[runs.len() - 1];
        if first_start == 0 && last_end == nb - 1 {
            runs[0] = (last_start, first_end);
            runs.pop();
        }
    }

    let mut out = Vec::new();
    for (start, end) in runs {
        // 3) Too few shared vertices: noise, not a shared boundary.
        let count = cyclic_span(start, end, nb);
        if count < MIN_SHARED_VERTICES {
            continue;
        }

        // 4) Snap the edited-ring endpoints to its nearest vertices.
        let Some(edited_start) = nearest_vertex_index(neighbour[start], edited) else { continue };
        let Some(edited_end) = nearest_vertex_index(neighbour[end], edited) else { continue };
        if edited_start == edited_end {
            continue; // degenerate after snapping
        }

        // 5) Winding along the walk.
        let is_reversed = windings_oppose(&marks, start, count, na, nb);

        out.push(SharedSegment {
            start,
            end,
            edited_start,
            edited_end,
            is_reversed,
            matched_vertex_count: count,
        });
    }
    out
}

/// Sample projected edge indices along the neighbour walk and decide
/// whether they tend to decrease (windings oppose) modulo the edited
/// ring's open length.
fn windings_oppose(marks: &[Option<usize>], start: usize, count: usize, na: usize, nb: usize) -> bool {
    let stride = (count + MAX_WINDING_SAMPLES - 1) / MAX_WINDING_SAMPLES;
    let mut prev: Option<usize> = None;
    let mut forward = 0;
    let mut reverse = 0;
    for step in (0..count).step_by(stride.max(1)) {
        let idx = mod_index((start + step) as isize, nb);
        let Some(edge) = marks[idx] else { continue };
        if let Some(p) = prev {
            let delta = (edge + na - p) % na;
            if delta != 0 {
                if delta <= na / 2 {
                    forward += 1;
                } else {
                    reverse += 1;
                }
            }
        }
        prev = Some(edge);
    }
    reverse > forward
}

/// Scan every other patch for shared boundary segments with `edited_ring`.
///
/// `edited_polygon_index` / `edited_ring_index` locate the ring within the
/// edited patch's geometry and propagate unchanged into the records.
/// Candidate rings whose padded bounding box misses the edited ring are
/// skipped without vertex work.
pub fn find_adjacent_patches(
    edited_patch_id: &str,
    edited_ring: &[Coord<f64>],
    patches: &PatchSet,
    edited_polygon_index: usize,
    edited_ring_index: usize,
) -> Vec<AdjacencyRecord> {
    let Some(edited_bbox) = bbox(edited_ring) else { return Vec::new() };

    let mut records = Vec::new();
    for patch in patches.iter() {
        if patch.id == edited_patch_id {
            continue;
        }
        for (polygon_index, ring_index, ls) in crate::geom::rings_of(&patch.geometry) {
            let Some(candidate_bbox) = bbox(&ls.0) else { continue };
            if !bboxes_overlap(&edited_bbox, &candidate_bbox, BBOX_PAD_DEG) {
                continue;
            }
            for seg in shared_segments(edited_ring, &ls.0) {
                records.push(AdjacencyRecord {
                    patch_id: patch.id.clone(),
                    patch_code: patch.code.clone(),
                    polygon_index,
                    ring_index,
                    start_index: seg.start,
                    end_index: seg.end,
                    edited_polygon_index,
                    edited_ring_index,
                    edited_start_index: seg.edited_start,
                    edited_end_index: seg.edited_end,
                    is_reversed: seg.is_reversed,
                    matched_vertex_count: seg.matched_vertex_count,
                });
            }
        }
    }
    records
}
