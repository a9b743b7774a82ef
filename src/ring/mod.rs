//! Ring primitives.
//!
//! A ring is an ordered sequence of lon/lat positions. Open form has no
//! repeated first/last vertex; closed form repeats the first vertex at the
//! end. Algorithms work on open form and re-close on output. Rings with
//! fewer than 3 open vertices are ignored, not errors.
//!
//! All coordinate math is planar in degrees. Distance comparisons use
//! squared distances throughout.

use geo::{Coord, Rect};

/// Number of vertices in open form: a trailing closing vertex is not counted.
pub fn open_len(ring: &[Coord<f64>]) -> usize {
    match ring.len() {
        0 | 1 => ring.len(),
        n if ring[0] == ring[n - 1] => n - 1,
        n => n,
    }
}

/// Return the ring in closed form, appending a copy of the first vertex
/// if the last does not already equal it.
pub fn ensure_closed(ring: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut out = ring.to_vec();
    if let Some(&first) = out.first() {
        if out.last() != Some(&first) {
            out.push(first);
        }
    }
    out
}

/// Cyclic index arithmetic: `i` reduced modulo `n`, handling negatives.
#[inline]
pub fn mod_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    (((i % n) + n) % n) as usize
}

/// Number of vertices covered by the cyclic range `[start, end]` on a ring
/// of open length `n`. `end < start` means the range wraps.
#[inline]
pub fn cyclic_span(start: usize, end: usize, n: usize) -> usize {
    if end >= start { end - start + 1 } else { n - start + end + 1 }
}

/// Squared planar distance between two positions, deg².
#[inline]
pub fn dist_sq(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Axis-aligned bounding box in degrees. `None` for an empty ring.
pub fn bbox(ring: &[Coord<f64>]) -> Option<Rect<f64>> {
    let (&first, rest) = ring.split_first()?;
    let mut min = first;
    let mut max = first;
    for c in rest {
        min.x = min.x.min(c.x);
        min.y = min.y.min(c.y);
        max.x = max.x.max(c.x);
        max.y = max.y.max(c.y);
    }
    Some(Rect::new(min, max))
}

/// Minkowski-padded overlap test between two bounding boxes.
pub fn bboxes_overlap(a: &Rect<f64>, b: &Rect<f64>, pad_deg: f64) -> bool {
    a.min().x - pad_deg <= b.max().x
        && b.min().x - pad_deg <= a.max().x
        && a.min().y - pad_deg <= b.max().y
        && b.min().y - pad_deg <= a.max().y
}

/// Whether `p` lies inside `rect` expanded by `pad_deg` on every side.
pub fn bbox_contains(rect: &Rect<f64>, p: Coord<f64>, pad_deg: f64) -> bool {
    p.x >= rect.min().x - pad_deg
        && p.x <= rect.max().x + pad_deg
        && p.y >= rect.min().y - pad_deg
        && p.y <= rect.max().y + pad_deg
}

/// Clamp-to-segment projection of `p` onto the segment `a`-`b`.
pub fn project_to_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Coord { x: a.x + t * dx, y: a.y + t * dy }
}

/// Nearest point on a ring's boundary, with its squared distance and the
/// index of the edge it falls on.
#[derive(Debug, Clone, Copy)]
pub struct RingProjection {
    pub point: Coord<f64>,
    pub dist_sq: f64,
    pub edge_index: usize,
}

/// Foot of the perpendicular from `p` to the nearest edge of `ring`.
/// Edges are iterated in open-vertex space, including the closing edge.
/// `None` when the ring has fewer than 3 open vertices.
pub fn nearest_point_on_ring(p: Coord<f64>, ring: &[Coord<f64>]) -> Option<RingProjection> {
    let n = open_len(ring);
    if n < 3 {
        return None;
    }
    let mut best: Option<RingProjection> = None;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let foot = project_to_segment(p, a, b);
        let d = dist_sq(p, foot);
        if best.map_or(true, |prev| d < prev.dist_sq) {
            best = Some(RingProjection { point: foot, dist_sq: d, edge_index: i });
        }
    }
    best
}

/// Squared distance from `p` to the nearest edge of `ring`, with the edge index.
pub fn point_to_ring_dist_sq(p: Coord<f64>, ring: &[Coord<f64>]) -> Option<(f64, usize)> {
    nearest_point_on_ring(p, ring).map(|proj| (proj.dist_sq, proj.edge_index))
}

/// Index of the open-form vertex nearest to `p`.
pub fn nearest_vertex_index(p: Coord<f64>, ring: &[Coord<f64>]) -> Option<usize> {
    let n = open_len(ring);
    if n == 0 {
        return None;
    }
    let mut best = 0;
    let mut best_d = dist_sq(p, ring[0]);
    for (i, &v) in ring.iter().enumerate().take(n).skip(1) {
        let d = dist_sq(p, v);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    Some(best)
}

/// Extract the cyclic vertex range `[start, end]` from a ring in open-form
/// vertex space. When `end >= start` this is `ring[start..=end]`; otherwise
/// the range wraps: `ring[start..n]` followed by `ring[0..=end]`.
pub fn extract_segment(ring: &[Coord<f64>], start: usize, end: usize) -> Vec<Coord<f64>> {
    let n = open_len(ring);
    if n == 0 || start >= n || end >= n {
        return Vec::new();
    }
    if end >= start {
        ring[start..=end].to_vec()
    } else {
        let mut out = ring[start..n].to_vec();
        out.extend_from_slice(&ring[..=end]);
        out
    }
}
