//! WKT bridge for the persistence boundary.

use geo::MultiPolygon;

use crate::ring::ensure_closed;

/// Encode a MultiPolygon as `MULTIPOLYGON(((lon lat, …)…)…)`.
///
/// Rings are emitted in closed form with `.` as the decimal separator and
/// no trailing whitespace. The empty geometry encodes as
/// `MULTIPOLYGON EMPTY`.
pub fn multipolygon_to_wkt(geom: &MultiPolygon<f64>) -> String {
    if geom.0.is_empty() {
        return "MULTIPOLYGON EMPTY".to_string();
    }

    let mut out = String::from("MULTIPOLYGON(");
    for (pi, poly) in geom.0.iter().enumerate() {
        if pi > 0 {
            out.push(',');
        }
        out.push('(');
        let rings = std::iter::once(poly.exterior()).chain(poly.interiors().iter());
        for (ri, ring) in rings.enumerate() {
            if ri > 0 {
                out.push(',');
            }
            out.push('(');
            for (i, c) in ensure_closed(&ring.0).iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&format!("{} {}", c.x, c.y));
            }
            out.push(')');
        }
        out.push(')');
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Polygon};

    use super::multipolygon_to_wkt;

    #[test]
    fn empty_geometry() {
        assert_eq!(multipolygon_to_wkt(&MultiPolygon(vec![])), "MULTIPOLYGON EMPTY");
    }

    #[test]
    fn single_polygon_closed_ring() {
        let mp = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(13.0, 47.5), (13.01, 47.5), (13.01, 47.51)]),
            vec![],
        )]);
        assert_eq!(
            multipolygon_to_wkt(&mp),
            "MULTIPOLYGON(((13 47.5, 13.01 47.5, 13.01 47.51, 13 47.5)))"
        );
    }

    #[test]
    fn polygon_with_hole_and_second_polygon() {
        let with_hole = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)])],
        );
        let second = Polygon::new(
            LineString::from(vec![(10.0, 0.0), (11.0, 0.0), (10.5, 1.0), (10.0, 0.0)]),
            vec![],
        );
        let wkt = multipolygon_to_wkt(&MultiPolygon(vec![with_hole, second]));
        assert_eq!(
            wkt,
            "MULTIPOLYGON(((0 0, 4 0, 4 4, 0 4, 0 0),(1 1, 2 1, 2 2, 1 1)),\
             ((10 0, 11 0, 10.5 1, 10 0)))"
        );
        assert!(!wkt.ends_with(char::is_whitespace));
    }
}
