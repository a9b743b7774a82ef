//! Gap construction: the area an inward edit abandoned, minus everything
//! already occupied by other patches.

use geo::{BoundingRect, MultiPolygon};

use crate::consts::{BBOX_PAD_DEG, MIN_AREA_SQM};
use crate::geom::{geodesic_area_sqm, polygon_area_sqm, try_difference, try_intersection, PatchIndex};
use crate::types::PatchSet;

use super::GapGeometry;

/// Compute the gap polygon left by replacing `old_geom` with `new_geom`.
///
/// `difference(old, new)` minus every occupied patch, split into
/// components; components below the reporting threshold or still
/// overlapping an occupied patch (imperfect neighbour subtraction) are
/// dropped. Geometry-op failures skip their contribution.
pub fn build_gap(
    edited_patch_id: &str,
    old_geom: &MultiPolygon<f64>,
    new_geom: &MultiPolygon<f64>,
    patches: &PatchSet,
    index: &PatchIndex,
) -> (Option<GapGeometry>, f64) {
    let Ok(mut gap) = try_difference(old_geom, new_geom) else { return (None, 0.0) };
    if gap.0.is_empty() {
        return (None, 0.0);
    }

    // Subtract every occupied patch near the lost region.
    if let Some(gap_bbox) = gap.bounding_rect() {
        for id in index.candidates(&gap_bbox, BBOX_PAD_DEG) {
            if id == edited_patch_id {
                continue;
            }
            let Some(patch) = patches.get(id) else { continue };
            match try_difference(&gap, &patch.geometry) {
                Ok(rest) => gap = rest,
                Err(_) => continue,
            }
            if gap.0.is_empty() {
                return (None, 0.0);
            }
        }
    }

    // Component cleanup.
    let mut kept = Vec::new();
    let mut total_sqm = 0.0;
    'components: for poly in gap.0 {
        let area = polygon_area_sqm(&poly);
        if area < MIN_AREA_SQM {
            continue;
        }
        let component = MultiPolygon(vec![poly.clone()]);
        if let Some(bbox) = component.bounding_rect() {
            for id in index.candidates(&bbox, 0.0) {
                if id == edited_patch_id {
                    continue;
                }
                let Some(patch) = patches.get(id) else { continue };
                let Ok(inter) = try_intersection(&component, &patch.geometry) else { continue };
                if geodesic_area_sqm(&inter) >= MIN_AREA_SQM {
                    continue 'components;
                }
            }
        }
        total_sqm += area;
        kept.push(poly);
    }

    if kept.len() == 1 {
        let mut kept = kept;
        (Some(GapGeometry::Polygon(kept.remove(0))), total_sqm)
    } else if kept.is_empty() {
        (None, 0.0)
    } else {
        (Some(GapGeometry::MultiPolygon(MultiPolygon(kept))), total_sqm)
    }
}
