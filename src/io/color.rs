//! Stable display colours for patches.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Qualitative palette with enough separation for adjacent patches.
const PALETTE: &[Rgb] = &[
    Rgb { r: 141, g: 211, b: 199 },
    Rgb { r: 255, g: 255, b: 179 },
    Rgb { r: 190, g: 186, b: 218 },
    Rgb { r: 251, g: 128, b: 114 },
    Rgb { r: 128, g: 177, b: 211 },
    Rgb { r: 253, g: 180, b: 98 },
    Rgb { r: 179, g: 222, b: 105 },
    Rgb { r: 252, g: 205, b: 229 },
    Rgb { r: 217, g: 217, b: 217 },
    Rgb { r: 188, g: 128, b: 189 },
    Rgb { r: 204, g: 235, b: 197 },
    Rgb { r: 255, g: 237, b: 111 },
];

/// Stable colour for a patch id: FNV-1a hash into the palette. Pure, so
/// repeated renders and reloads colour a patch identically.
pub fn patch_color(id: &str) -> Rgb {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in id.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    PALETTE[(hash % PALETTE.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::{patch_color, Rgb};

    #[test]
    fn same_id_same_color() {
        assert_eq!(patch_color("p-001"), patch_color("p-001"));
    }

    #[test]
    fn css_formatting() {
        let c = Rgb { r: 1, g: 2, b: 3 };
        assert_eq!(c.to_string(), "rgb(1,2,3)");
    }

    #[test]
    fn ids_spread_over_the_palette() {
        let distinct: std::collections::HashSet<String> =
            (0..40).map(|i| patch_color(&format!("patch-{i}")).to_string()).collect();
        assert!(distinct.len() > 4, "hash degenerated to {} colours", distinct.len());
    }
}
