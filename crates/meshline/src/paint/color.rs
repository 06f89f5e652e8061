/// Linear RGB color used by line uniforms.
///
/// Opacity is carried separately by the material, matching the uniform layout.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0xRRGGBB`.
    #[inline]
    pub fn from_hex(hex: u32) -> Self {
        Self::from_u8(((hex >> 16) & 0xff) as u8, ((hex >> 8) & 0xff) as u8, (hex & 0xff) as u8)
    }

    /// Parses `#rrggbb`, `rrggbb` or `#rgb`. Returns `None` on malformed input.
    pub fn from_hex_str(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_hex),
            3 => {
                let v = u32::from_str_radix(digits, 16).ok()?;
                let expand = |n: u32| (n << 4 | n) as u8;
                Some(Self::from_u8(expand((v >> 8) & 0xf), expand((v >> 4) & 0xf), expand(v & 0xf)))
            }
            _ => None,
        }
    }

    /// Creates a color from `0`–`255` channel bytes.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Linear interpolation; `t = 0` yields `self`, `t = 1` yields `other`.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Color::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels() {
        assert_eq!(Color::from_hex(0xff0000), Color::RED);
        assert_eq!(Color::from_hex(0x00ff00), Color::GREEN);
    }

    #[test]
    fn hex_str_forms() {
        assert_eq!(Color::from_hex_str("#ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex_str("000000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex_str("#f00"), Some(Color::RED));
        assert_eq!(Color::from_hex_str("#ff00"), None);
        assert_eq!(Color::from_hex_str("#gggggg"), None);
    }

    #[test]
    fn lerp_midpoint() {
        let c = Color::RED.lerp(Color::GREEN, 0.5);
        assert_eq!(c, Color::new(0.5, 0.5, 0.0));
    }
}
