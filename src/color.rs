//! RGB colors for bodies and the plane theme

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 8-bit RGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` (as produced by an `<input type="color">`)
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Pick a body color from the palette
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        BODY_PALETTE[rng.random_range(0..BODY_PALETTE.len())]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Colors new bodies are drawn from (readable on the dark plane background)
pub const BODY_PALETTE: [Color; 8] = [
    Color::rgb(239, 68, 68),
    Color::rgb(249, 115, 22),
    Color::rgb(234, 179, 8),
    Color::rgb(34, 197, 94),
    Color::rgb(6, 182, 212),
    Color::rgb(59, 130, 246),
    Color::rgb(168, 85, 247),
    Color::rgb(236, 72, 153),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_hex_parse() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("#FF8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("ff8000"), None);
        assert_eq!(Color::from_hex("#ff80"), None);
        assert_eq!(Color::from_hex("#gg8000"), None);
        assert_eq!(Color::rgb(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_css() {
        assert_eq!(Color::rgb(10, 20, 30).css(), "rgb(10, 20, 30)");
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..16 {
            let c = Color::random(&mut a);
            assert_eq!(c, Color::random(&mut b));
            assert!(BODY_PALETTE.contains(&c));
        }
    }
}
