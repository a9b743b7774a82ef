use geo::Coord;

use crate::consts::{
    BBOX_PAD_DEG, MAX_DISPLACEMENT_DEG_SQ, MIN_DISPLACEMENT_DEG_SQ, SHARED_EDGE_TOL_DEG_SQ,
};
use crate::ring::{bbox, bbox_contains, ensure_closed, nearest_point_on_ring, open_len};

/// Result of a displacement sync.
#[derive(Debug, Clone)]
pub struct DisplacementOutcome {
    /// Re-closed neighbour ring.
    pub ring: Vec<Coord<f64>>,
    /// Vertices that actually moved. Zero means the neighbour never lay on
    /// the old edited boundary; callers fall back to projection.
    pub displaced_count: usize,
}

/// Move every neighbour vertex that sat on the old edited boundary by the
/// local displacement between the old and new edited rings.
///
/// For each vertex: find its nearest point on the old ring; skip when
/// farther than the shared-edge tolerance (not on the shared boundary);
/// find the nearest point on the new ring to that old projection; move by
/// the difference. Displacements above ~35 km are clearly wrong and
/// displacements below ~1 mm are no-ops; both are skipped.
pub fn sync_boundary_by_displacement(
    neighbour_ring: &[Coord<f64>],
    old_edited_ring: &[Coord<f64>],
    new_edited_ring: &[Coord<f64>],
) -> DisplacementOutcome {
    let n = open_len(neighbour_ring);
    if n < 3 {
        return DisplacementOutcome { ring: neighbour_ring.to_vec(), displaced_count: 0 };
    }
    let mut out: Vec<Coord<f64>> = neighbour_ring[..n].to_vec();
    let old_bbox = bbox(old_edited_ring);

    let mut displaced = 0;
    for v in out.iter_mut() {
        if let Some(b) = &old_bbox {
            if !bbox_contains(b, *v, BBOX_PAD_DEG) {
                continue;
            }
        }
        let Some(on_old) = nearest_point_on_ring(*v, old_edited_ring) else { continue };
        if on_old.dist_sq > SHARED_EDGE_TOL_DEG_SQ {
            continue;
        }
        let Some(on_new) = nearest_point_on_ring(on_old.point, new_edited_ring) else { continue };
        let dx = on_new.point.x - on_old.point.x;
        let dy = on_new.point.y - on_old.point.y;
        let mag_sq = dx * dx + dy * dy;
        if mag_sq > MAX_DISPLACEMENT_DEG_SQ || mag_sq < MIN_DISPLACEMENT_DEG_SQ {
            continue;
        }
        v.x += dx;
        v.y += dy;
        displaced += 1;
    }

    DisplacementOutcome { ring: ensure_closed(&out), displaced_count: displaced }
}
