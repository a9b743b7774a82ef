use geo::Coord;

use crate::ring::{cyclic_span, dist_sq, mod_index, open_len, project_to_segment};

/// Project every neighbour vertex in the cyclic range `[start, end]` onto
/// the nearest edge of `edited_polyline`, reversing the polyline first
/// when windings disagree so the projected points land in the neighbour's
/// winding order. Preserves the neighbour's vertex count exactly; a closed
/// input comes back closed (vertex 0 copied into the last slot).
pub fn sync_boundary_by_projection(
    neighbour_ring: &[Coord<f64>],
    start: usize,
    end: usize,
    edited_polyline: &[Coord<f64>],
    is_reversed: bool,
) -> Vec<Coord<f64>> {
    let n = open_len(neighbour_ring);
    if n < 3 || edited_polyline.len() < 2 || start >= n || end >= n {
        return neighbour_ring.to_vec();
    }

    let mut polyline = edited_polyline.to_vec();
    if is_reversed {
        polyline.reverse();
    }

    let was_closed = neighbour_ring.len() > n;
    let mut out: Vec<Coord<f64>> = neighbour_ring[..n].to_vec();
    let count = cyclic_span(start, end, n);
    for step in 0..count {
        let idx = mod_index((start + step) as isize, n);
        out[idx] = project_to_polyline(out[idx], &polyline);
    }
    if was_closed {
        out.push(out[0]);
    }
    out
}

fn project_to_polyline(p: Coord<f64>, polyline: &[Coord<f64>]) -> Coord<f64> {
    polyline
        .windows(2)
        .map(|w| project_to_segment(p, w[0], w[1]))
        .min_by(|a, b| dist_sq(p, *a).total_cmp(&dist_sq(p, *b)))
        .unwrap_or(p)
}
