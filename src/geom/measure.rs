use geo::{Coord, Distance, Geodesic, GeodesicArea, MultiPolygon, Point, Polygon};

/// Unsigned geodesic area of a MultiPolygon in m².
#[inline]
pub fn geodesic_area_sqm(geom: &MultiPolygon<f64>) -> f64 {
    geom.geodesic_area_unsigned()
}

/// Unsigned geodesic area of a single Polygon in m².
#[inline]
pub fn polygon_area_sqm(polygon: &Polygon<f64>) -> f64 {
    polygon.geodesic_area_unsigned()
}

/// Geodesic distance between two lon/lat positions in metres.
#[inline]
pub fn distance_m(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Geodesic::distance(Point::from(a), Point::from(b))
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Coord, MultiPolygon};

    use super::{distance_m, geodesic_area_sqm};

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_m(Coord { x: 13.0, y: 47.0 }, Coord { x: 13.0, y: 48.0 });
        assert!((d - 111_000.0).abs() < 1_000.0, "got {d}");
    }

    #[test]
    fn small_square_area_scales_with_latitude() {
        // 0.001° square at the equator ≈ 111 m × 111 m.
        let sq = polygon![
            (x: 0.0, y: 0.0), (x: 0.001, y: 0.0), (x: 0.001, y: 0.001), (x: 0.0, y: 0.001), (x: 0.0, y: 0.0),
        ];
        let area = geodesic_area_sqm(&MultiPolygon(vec![sq]));
        assert!((area - 111.0 * 111.0).abs() < 500.0, "got {area}");
    }
}
