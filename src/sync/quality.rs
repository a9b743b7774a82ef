use geo::Coord;

use crate::consts::{MAX_CONNECTION_DIST_M, MIN_CONNECTION_ANGLE_DEG};
use crate::geom::distance_m;
use crate::ring::{mod_index, open_len};
use crate::types::SnapQuality;

/// The two ring positions where a changed segment meets the unedited
/// remainder.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionPoints {
    pub start: Coord<f64>,
    pub end: Coord<f64>,
}

/// Judge the joints at both ends of the changed range `[start, end]` of
/// `ring`: a sharp interior angle (< 30°) or a long jump to the adjacent
/// unedited vertex (> 5 m) marks the proposal `Poor`.
pub fn assess_connection(
    ring: &[Coord<f64>],
    start: usize,
    end: usize,
) -> (SnapQuality, ConnectionPoints) {
    let n = open_len(ring);
    if n < 3 || start >= n || end >= n {
        let fallback = ring.first().copied().unwrap_or(Coord { x: 0.0, y: 0.0 });
        return (SnapQuality::Poor, ConnectionPoints { start: fallback, end: fallback });
    }
    let points = ConnectionPoints { start: ring[start], end: ring[end] };

    let start_ok = joint_ok(
        ring[mod_index(start as isize - 1, n)],
        ring[start],
        ring[mod_index(start as isize + 1, n)],
    );
    let end_ok = joint_ok(
        ring[mod_index(end as isize + 1, n)],
        ring[end],
        ring[mod_index(end as isize - 1, n)],
    );

    let quality = if start_ok && end_ok { SnapQuality::Good } else { SnapQuality::Poor };
    (quality, points)
}

/// `outside` is the adjacent unedited vertex, `corner` the changed
/// endpoint, `inside` the next vertex along the changed range.
fn joint_ok(outside: Coord<f64>, corner: Coord<f64>, inside: Coord<f64>) -> bool {
    if distance_m(outside, corner) > MAX_CONNECTION_DIST_M {
        return false;
    }
    interior_angle_deg(outside, corner, inside) >= MIN_CONNECTION_ANGLE_DEG
}

/// Interior angle at `corner` between the rays to `a` and `b`, degrees.
/// Degenerate rays count as straight (no kink).
fn interior_angle_deg(a: Coord<f64>, corner: Coord<f64>, b: Coord<f64>) -> f64 {
    let ux = a.x - corner.x;
    let uy = a.y - corner.y;
    let vx = b.x - corner.x;
    let vy = b.y - corner.y;
    let nu = (ux * ux + uy * uy).sqrt();
    let nv = (vx * vx + vy * vy).sqrt();
    if nu == 0.0 || nv == 0.0 {
        return 180.0;
    }
    let cos = ((ux * vx + uy * vy) / (nu * nv)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
