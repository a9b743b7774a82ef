use geo::Coord;

use crate::ring::{cyclic_span, ensure_closed, mod_index, open_len};

/// Replace the cyclic vertex range `[start, end]` of `ring` with
/// `replacement` (reversed first when windings disagree), then re-close.
///
/// Legacy exact-insertion path: the replacement is copied in verbatim, so
/// the neighbour's vertex density in the shared zone is lost. If the
/// spliced ring would have fewer than 3 open vertices, the input is
/// returned unchanged.
pub fn splice_ring(
    ring: &[Coord<f64>],
    start: usize,
    end: usize,
    replacement: &[Coord<f64>],
    is_reversed: bool,
) -> Vec<Coord<f64>> {
    let n = open_len(ring);
    if n < 3 || replacement.is_empty() || start >= n || end >= n {
        return ring.to_vec();
    }

    let mut out: Vec<Coord<f64>> = replacement.to_vec();
    if is_reversed {
        out.reverse();
    }
    let kept = n - cyclic_span(start, end, n);
    for k in 1..=kept {
        out.push(ring[mod_index((end + k) as isize, n)]);
    }
    if out.len() < 3 {
        return ring.to_vec();
    }
    ensure_closed(&out)
}
