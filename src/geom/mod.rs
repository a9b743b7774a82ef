//! Geometry support: patch index, geodesic measures, guarded boolean ops,
//! and ring addressing over MultiPolygons.

mod index;
mod measure;
mod ops;

pub use index::PatchIndex;
pub use measure::{distance_m, geodesic_area_sqm, polygon_area_sqm};
pub use ops::{try_difference, try_intersection, try_union};

use geo::{LineString, MultiPolygon};

/// Ring `ring` of polygon `poly`: index 0 is the exterior, interiors follow.
pub fn ring_at(geom: &MultiPolygon<f64>, poly: usize, ring: usize) -> Option<&LineString<f64>> {
    let polygon = geom.0.get(poly)?;
    if ring == 0 {
        Some(polygon.exterior())
    } else {
        polygon.interiors().get(ring - 1)
    }
}

/// Iterate every ring of every polygon as `(polygon_index, ring_index, ring)`.
pub fn rings_of(geom: &MultiPolygon<f64>) -> impl Iterator<Item = (usize, usize, &LineString<f64>)> {
    geom.0.iter().enumerate().flat_map(|(pi, polygon)| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors().iter())
            .enumerate()
            .map(move |(ri, ls)| (pi, ri, ls))
    })
}

/// Copy of `geom` with one ring replaced. Out-of-range indices return the
/// input unchanged.
pub fn with_ring_replaced(
    geom: &MultiPolygon<f64>,
    poly: usize,
    ring: usize,
    new_ring: LineString<f64>,
) -> MultiPolygon<f64> {
    let mut out = geom.clone();
    if let Some(polygon) = out.0.get_mut(poly) {
        if ring == 0 {
            let interiors = polygon.interiors().to_vec();
            *polygon = geo::Polygon::new(new_ring, interiors);
        } else if ring - 1 < polygon.interiors().len() {
            let exterior = polygon.exterior().clone();
            let mut interiors = polygon.interiors().to_vec();
            interiors[ring - 1] = new_ring;
            *polygon = geo::Polygon::new(exterior, interiors);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use geo::{polygon, LineString, MultiPolygon};

    use super::*;

    fn square_with_hole() -> MultiPolygon<f64> {
        let poly = geo::Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)])],
        );
        MultiPolygon(vec![poly])
    }

    #[test]
    fn ring_addressing() {
        let mp = square_with_hole();
        assert_eq!(ring_at(&mp, 0, 0).unwrap().0.len(), 5);
        assert_eq!(ring_at(&mp, 0, 1).unwrap().0[0].x, 1.0);
        assert!(ring_at(&mp, 0, 2).is_none());
        assert!(ring_at(&mp, 1, 0).is_none());
        assert_eq!(rings_of(&mp).count(), 2);
    }

    #[test]
    fn replace_hole_ring() {
        let mp = square_with_hole();
        let new_hole = LineString::from(vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0), (1.0, 1.0)]);
        let out = with_ring_replaced(&mp, 0, 1, new_hole);
        assert_eq!(ring_at(&out, 0, 1).unwrap().0[1].x, 3.0);
        // exterior untouched
        assert_eq!(ring_at(&out, 0, 0).unwrap().0.len(), 5);
    }

    #[test]
    fn replace_out_of_range_is_noop() {
        let mp = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.5, y: 1.0)]]);
        let out = with_ring_replaced(&mp, 3, 0, LineString::from(vec![(9.0, 9.0)]));
        assert_eq!(out.0.len(), 1);
        assert_eq!(ring_at(&out, 0, 0).unwrap().0[0].x, 0.0);
    }
}
