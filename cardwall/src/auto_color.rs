//! Label colors.
//!
//! Labels created without an explicit color get one from a fixed palette,
//! either by position (the default labels of a new board) or by a hash of
//! the title.

/// Palette of label colors (6-char hex without `#`).
const PALETTE: &[&str] = &[
    "22c328", // green
    "fdef01", // yellow
    "ff8a00", // orange
    "e60000", // red
    "5319e7", // purple
    "1d76db", // blue
    "006b75", // teal
    "d876e3", // pink
    "b60205", // dark red
    "0e8a16", // dark green
    "7057ff", // violet
    "c5def5", // periwinkle
];

/// Deterministic color for a label title.
///
/// Uses a 32-bit FNV-1a hash mapped to the palette.
pub fn auto_color(title: &str) -> &'static str {
    PALETTE[(fnv1a(title) as usize) % PALETTE.len()]
}

/// Color for the `index`-th default label; wraps around the palette
pub fn color_for_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Whether `color` is a 6-digit hex code without `#`
pub fn is_valid_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}

fn fnv1a(s: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in s.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_color_deterministic() {
        assert_eq!(auto_color("Urgent"), auto_color("Urgent"));
        assert!(PALETTE.contains(&auto_color("Backend")));
    }

    #[test]
    fn test_index_colors_are_distinct_until_wrap() {
        let first: Vec<_> = (0..PALETTE.len()).map(color_for_index).collect();
        let mut unique = first.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), PALETTE.len());
        assert_eq!(color_for_index(PALETTE.len()), color_for_index(0));
    }

    #[test]
    fn test_palette_is_valid_hex() {
        assert!(PALETTE.iter().all(|c| is_valid_color(c)));
        assert!(!is_valid_color("#22c328"));
        assert!(!is_valid_color("xyzxyz"));
    }
}
