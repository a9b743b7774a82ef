//! Boundary simplification.
//!
//! Ramer-Douglas-Peucker per ring over a MultiPolygon, with a low-quality
//! mode for interactive previews (radial-distance prefilter before RDP).
//! A ring is never reduced below 3 open vertices; when RDP would do that,
//! the ring is returned unchanged.

use geo::{Coord, LineString, MultiPolygon, Polygon, Simplify};
use serde::Serialize;

use crate::consts::{
    MAX_DEVIATION_SAMPLES, TOLERANCE_SEARCH_MAX_DEG, TOLERANCE_SEARCH_MAX_ITERS,
    TOLERANCE_SEARCH_MIN_DEG, TOLERANCE_TARGET_SLACK,
};
use crate::geom::{distance_m, geodesic_area_sqm};
use crate::ring::{dist_sq, nearest_point_on_ring, open_len};

/// Simplify every ring of `geom` with the given tolerance (degrees).
///
/// `high_quality` runs plain RDP; low quality prefilters consecutive
/// near-coincident vertices first, trading exactness for speed on dense
/// slider previews.
pub fn simplify(geom: &MultiPolygon<f64>, tolerance_deg: f64, high_quality: bool) -> MultiPolygon<f64> {
    MultiPolygon(
        geom.0
            .iter()
            .map(|poly| {
                Polygon::new(
                    simplify_ring(poly.exterior(), tolerance_deg, high_quality),
                    poly.interiors()
                        .iter()
                        .map(|ls| simplify_ring(ls, tolerance_deg, high_quality))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn simplify_ring(ring: &LineString<f64>, tolerance_deg: f64, high_quality: bool) -> LineString<f64> {
    if open_len(&ring.0) < 3 {
        return ring.clone();
    }
    let input = if high_quality {
        ring.clone()
    } else {
        let filtered = radial_prefilter(ring, tolerance_deg);
        if open_len(&filtered.0) < 3 { ring.clone() } else { filtered }
    };
    let out = input.simplify(&tolerance_deg);
    if open_len(&out.0) < 3 {
        ring.clone()
    } else {
        out
    }
}

/// Drop vertices closer than `tolerance_deg` to the previously kept one.
/// Endpoints survive, so a closed ring stays closed.
fn radial_prefilter(ring: &LineString<f64>, tolerance_deg: f64) -> LineString<f64> {
    let pts = &ring.0;
    if pts.len() < 3 {
        return ring.clone();
    }
    let tol_sq = tolerance_deg * tolerance_deg;
    let mut out: Vec<Coord<f64>> = vec![pts[0]];
    for &p in &pts[1..pts.len() - 1] {
        if dist_sq(p, *out.last().unwrap()) > tol_sq {
            out.push(p);
        }
    }
    out.push(pts[pts.len() - 1]);
    LineString(out)
}

/// Before/after statistics for a simplification.
#[derive(Debug, Clone, Serialize)]
pub struct SimplifyStats {
    pub original_vertex_count: usize,
    pub simplified_vertex_count: usize,
    pub reduction_percent: f64,
    /// Maximum distance from a sampled original vertex to the simplified
    /// boundary, metres. Only computed on request.
    pub max_deviation_m: Option<f64>,
    pub area_change_percent: f64,
}

/// Open-form vertex count summed over every ring.
pub fn vertex_count(geom: &MultiPolygon<f64>) -> usize {
    crate::geom::rings_of(geom).map(|(_, _, ls)| open_len(&ls.0)).sum()
}

pub fn compute_stats(
    original: &MultiPolygon<f64>,
    simplified: &MultiPolygon<f64>,
    include_deviation: bool,
) -> SimplifyStats {
    let original_vertex_count = vertex_count(original);
    let simplified_vertex_count = vertex_count(simplified);
    let reduction_percent = if original_vertex_count > 0 {
        (1.0 - simplified_vertex_count as f64 / original_vertex_count as f64) * 100.0
    } else {
        0.0
    };

    let original_area = geodesic_area_sqm(original);
    let simplified_area = geodesic_area_sqm(simplified);
    let area_change_percent = if original_area > 0.0 {
        (simplified_area - original_area) / original_area * 100.0
    } else {
        0.0
    };

    let max_deviation_m = include_deviation.then(|| max_deviation_m(original, simplified));

    SimplifyStats {
        original_vertex_count,
        simplified_vertex_count,
        reduction_percent,
        max_deviation_m,
        area_change_percent,
    }
}

/// Max distance from sampled original vertices to the simplified boundary.
/// At most `MAX_DEVIATION_SAMPLES` vertices are sampled, evenly strided.
fn max_deviation_m(original: &MultiPolygon<f64>, simplified: &MultiPolygon<f64>) -> f64 {
    let samples: Vec<Coord<f64>> = crate::geom::rings_of(original)
        .flat_map(|(_, _, ls)| ls.0[..open_len(&ls.0)].iter().copied())
        .collect();
    if samples.is_empty() {
        return 0.0;
    }
    let stride = (samples.len() + MAX_DEVIATION_SAMPLES - 1) / MAX_DEVIATION_SAMPLES;

    let mut max_m = 0.0_f64;
    for &p in samples.iter().step_by(stride.max(1)) {
        let nearest = crate::geom::rings_of(simplified)
            .filter_map(|(_, _, ls)| nearest_point_on_ring(p, &ls.0))
            .min_by(|a, b| a.dist_sq.total_cmp(&b.dist_sq));
        if let Some(proj) = nearest {
            max_m = max_m.max(distance_m(p, proj.point));
        }
    }
    max_m
}

/// Search for the tolerance that simplifies `geom` down to about
/// `target_vertices` open vertices: geometric-midpoint bisection on a log
/// scale, early exit within ±10% of the target.
pub fn find_tolerance_for_target(
    geom: &MultiPolygon<f64>,
    target_vertices: usize,
    high_quality: bool,
) -> f64 {
    let target = target_vertices.max(1) as f64;
    let mut lo = TOLERANCE_SEARCH_MIN_DEG;
    let mut hi = TOLERANCE_SEARCH_MAX_DEG;

    for _ in 0..TOLERANCE_SEARCH_MAX_ITERS {
        let mid = (lo * hi).sqrt();
        let count = vertex_count(&simplify(geom, mid, high_quality)) as f64;
        if (count - target).abs() <= target * TOLERANCE_TARGET_SLACK {
            return mid;
        }
        if count > target {
            // too many vertices left: simplify harder
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo * hi).sqrt()
}

#[cfg(test)]
mod tests {
    use geo::{Coord, LineString, MultiPolygon, Polygon};

    use super::*;

    /// Square with `per_side` extra collinear vertices along each edge.
    fn dense_square(per_side: usize) -> MultiPolygon<f64> {
        let corners = [(0.0, 0.0), (0.01, 0.0), (0.01, 0.01), (0.0, 0.01)];
        let mut coords: Vec<Coord<f64>> = Vec::new();
        for i in 0..4 {
            let (x0, y0) = corners[i];
            let (x1, y1) = corners[(i + 1) % 4];
            for k in 0..=per_side {
                let t = k as f64 / (per_side + 1) as f64;
                coords.push(Coord { x: x0 + (x1 - x0) * t, y: y0 + (y1 - y0) * t });
            }
        }
        coords.push(coords[0]);
        MultiPolygon(vec![Polygon::new(LineString(coords), vec![])])
    }

    #[test]
    fn collinear_vertices_collapse_to_corners() {
        let dense = dense_square(10);
        let out = simplify(&dense, 1e-5, true);
        assert_eq!(vertex_count(&out), 4);
    }

    #[test]
    fn ring_never_drops_below_three_open_vertices() {
        // A sliver triangle whose middle vertex is within tolerance:
        // RDP would leave 2 points, so the ring must come back unchanged.
        let tri = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (0.01, 1e-9), (0.02, 0.0), (0.0, 0.0)]),
            vec![],
        )]);
        let out = simplify(&tri, 1e-3, true);
        assert_eq!(out, tri);
    }

    #[test]
    fn degenerate_ring_passes_through() {
        let degenerate = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            vec![],
        )]);
        assert_eq!(simplify(&degenerate, 0.5, true), degenerate);
    }

    #[test]
    fn low_quality_still_respects_corner_shape() {
        let dense = dense_square(50);
        let out = simplify(&dense, 1e-5, false);
        let n = vertex_count(&out);
        assert!((3..=8).contains(&n), "got {n} vertices");
    }

    #[test]
    fn stats_report_reduction_and_area() {
        let dense = dense_square(10);
        let out = simplify(&dense, 1e-5, true);
        let stats = compute_stats(&dense, &out, true);
        assert_eq!(stats.original_vertex_count, 44);
        assert_eq!(stats.simplified_vertex_count, 4);
        assert!(stats.reduction_percent > 85.0);
        // collinear removal does not move the boundary
        assert!(stats.max_deviation_m.unwrap() < 0.5);
        assert!(stats.area_change_percent.abs() < 0.1);
    }

    fn circle(n: usize, radius_deg: f64) -> MultiPolygon<f64> {
        let mut coords: Vec<Coord<f64>> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                Coord { x: radius_deg * a.cos(), y: radius_deg * a.sin() }
            })
            .collect();
        coords.push(coords[0]);
        MultiPolygon(vec![Polygon::new(LineString(coords), vec![])])
    }

    #[test]
    fn tolerance_search_hits_target_range() {
        let ring = circle(240, 0.01);
        let tol = find_tolerance_for_target(&ring, 40, true);
        let n = vertex_count(&simplify(&ring, tol, true));
        assert!((30..=50).contains(&n), "got {n} vertices for tolerance {tol}");
    }

    #[test]
    fn tolerance_search_unreachable_target_still_returns_usable_value() {
        // Collinear vertices vanish at any tolerance, so a target between 4
        // and the input count cannot be met; the search must still return a
        // tolerance inside its domain.
        let dense = dense_square(60);
        let tol = find_tolerance_for_target(&dense, 40, true);
        assert!((TOLERANCE_SEARCH_MIN_DEG..=TOLERANCE_SEARCH_MAX_DEG).contains(&tol));
        assert_eq!(vertex_count(&simplify(&dense, tol, true)), 4);
    }
}
