use geo::{Coord, LineString, MultiPolygon};

use crate::adjacency::AdjacencyRecord;
use crate::analysis::PostEditAnalysis;
use crate::consts::GEOMETRIC_TOLERANCE_DEG_SQ;
use crate::geom::{ring_at, with_ring_replaced};
use crate::ring::{dist_sq, ensure_closed, extract_segment, open_len};
use crate::types::{PatchSet, Relationship, SnapQuality};

use super::{
    assess_connection, splice_ring, sync_boundary_by_displacement, sync_boundary_by_projection,
    ConnectionPoints,
};

/// A synchronised neighbour boundary offered to the user.
#[derive(Debug, Clone)]
pub struct BoundaryProposal {
    pub patch_id: String,
    pub patch_code: String,
    pub relationship: Relationship,
    pub adjacency: AdjacencyRecord,
    pub original_geometry: MultiPolygon<f64>,
    pub proposed_geometry: MultiPolygon<f64>,
    /// The shared segment as it currently exists on the neighbour.
    pub original_segment: Vec<Coord<f64>>,
    /// The same segment after synchronisation.
    pub proposed_segment: Vec<Coord<f64>>,
    /// The vertices that actually moved.
    pub changed_segment: Vec<Coord<f64>>,
    pub connection_points: ConnectionPoints,
    pub snap_quality: SnapQuality,
}

/// Build one proposal per non-duplicate neighbour in `analysis`.
///
/// Displacement is used whenever `old_edited_geom` is available; when it
/// moves nothing (or the old geometry was not captured), the shared range
/// is projected onto the edited polyline instead.
pub fn generate_boundary_proposals(
    analysis: &PostEditAnalysis,
    edited_geom: &MultiPolygon<f64>,
    patches: &PatchSet,
    old_edited_geom: Option<&MultiPolygon<f64>>,
) -> Vec<BoundaryProposal> {
    let mut proposals = Vec::new();

    for info in &analysis.neighbours {
        if info.is_duplicate {
            continue;
        }
        let rec = &info.adjacency;
        let Some(patch) = patches.get(&rec.patch_id) else { continue };
        let Some(nb_ring) = ring_at(&patch.geometry, rec.polygon_index, rec.ring_index)
        else { continue };
        let Some(new_ring) = ring_at(edited_geom, rec.edited_polygon_index, rec.edited_ring_index)
        else { continue };
        let nb_open = open_len(&nb_ring.0);
        if nb_open < 3 || rec.start_index >= nb_open || rec.end_index >= nb_open {
            continue;
        }

        let original_segment = extract_segment(&nb_ring.0, rec.start_index, rec.end_index);

        let mut proposed_ring: Option<Vec<Coord<f64>>> = None;
        if let Some(old_geom) = old_edited_geom {
            if let Some(old_ring) = ring_at(old_geom, rec.edited_polygon_index, rec.edited_ring_index)
            {
                let outcome = sync_boundary_by_displacement(&nb_ring.0, &old_ring.0, &new_ring.0);
                if outcome.displaced_count > 0 {
                    proposed_ring = Some(outcome.ring);
                }
            }
        }
        let proposed_ring = proposed_ring.unwrap_or_else(|| {
            let (fwd_start, fwd_end) = rec.edited_range_forward();
            let replacement = extract_segment(&new_ring.0, fwd_start, fwd_end);
            sync_boundary_by_projection(
                &nb_ring.0,
                rec.start_index,
                rec.end_index,
                &replacement,
                rec.is_reversed,
            )
        });

        let proposed_segment = extract_segment(&proposed_ring, rec.start_index, rec.end_index);
        let changed_indices: Vec<usize> = (0..open_len(&proposed_ring).min(nb_open))
            .filter(|&i| dist_sq(proposed_ring[i], nb_ring.0[i]) > GEOMETRIC_TOLERANCE_DEG_SQ)
            .collect();
        let changed_segment: Vec<Coord<f64>> =
            changed_indices.iter().map(|&i| proposed_ring[i]).collect();

        // Joints are judged at the first/last vertex that actually moved;
        // an empty change means the boundaries already coincide.
        let (snap_quality, connection_points) = match (changed_indices.first(), changed_indices.last())
        {
            (Some(&first), Some(&last)) => assess_connection(&proposed_ring, first, last),
            _ => (
                SnapQuality::Good,
                ConnectionPoints {
                    start: proposed_ring[rec.start_index],
                    end: proposed_ring[rec.end_index],
                },
            ),
        };

        let proposed_geometry = with_ring_replaced(
            &patch.geometry,
            rec.polygon_index,
            rec.ring_index,
            LineString(ensure_closed(&proposed_ring)),
        );

        proposals.push(BoundaryProposal {
            patch_id: rec.patch_id.clone(),
            patch_code: rec.patch_code.clone(),
            relationship: info.relationship,
            adjacency: rec.clone(),
            original_geometry: patch.geometry.clone(),
            proposed_geometry,
            original_segment,
            proposed_segment,
            changed_segment,
            connection_points,
            snap_quality,
        });
    }
    proposals
}

/// Legacy exact-copy mode: splice the shared polyline from `source_ring`
/// (typically the pre-edit simplified ring) into the neighbour verbatim.
/// Destroys the neighbour's vertex density; kept for callers that need an
/// exact copy, never used by the default proposal flow.
pub fn sync_boundary_exact_copy(
    neighbour_ring: &[Coord<f64>],
    rec: &AdjacencyRecord,
    source_ring: &[Coord<f64>],
) -> Vec<Coord<f64>> {
    let (fwd_start, fwd_end) = rec.edited_range_forward();
    let replacement = extract_segment(source_ring, fwd_start, fwd_end);
    splice_ring(
        neighbour_ring,
        rec.start_index,
        rec.end_index,
        &replacement,
        rec.is_reversed,
    )
}
