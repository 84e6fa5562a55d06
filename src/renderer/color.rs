//! Colors for board elements

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string for canvas style properties
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Colors for game elements
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const PIN: Color = Color::rgb(0x93, 0x33, 0xea);
    pub const PIN_RIM: Color = Color::rgb(0xc0, 0x84, 0xfc);
    pub const BUCKET_IDLE: Color = Color::rgb(128, 128, 128);
    pub const BUCKET_OUTLINE: Color = Color::rgb(0x66, 0x66, 0x66);
    pub const LABEL: Color = Color::rgb(255, 255, 255);
    pub const HISTOGRAM: Color = Color::rgb(0x4a, 0xde, 0x80);
    pub const HISTOGRAM_FRAME: Color = Color::rgb(0x37, 0x41, 0x51);
    pub const PERCENT_LABEL: Color = Color::rgb(0x9c, 0xa3, 0xaf);
    pub const BALL: Color = Color::rgb(255, 255, 0);
    pub const BALL_GLOW: Color = Color::rgb(255, 165, 0);
}

/// Bucket fill for a flash intensity: idle grey at zero, otherwise a yellow
/// that brightens with intensity up to `cap`
pub fn flash_color(intensity: u32, cap: u32) -> Color {
    if intensity == 0 {
        return palette::BUCKET_IDLE;
    }
    let level = intensity.min(cap);
    let brightness = (80 + level.saturating_mul(3)).min(255) as u8;
    Color::rgb(brightness, brightness, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css() {
        assert_eq!(palette::PIN.to_css(), "rgb(147, 51, 234)");
    }

    #[test]
    fn test_flash_color() {
        assert_eq!(flash_color(0, 50), palette::BUCKET_IDLE);
        assert_eq!(flash_color(1, 50), Color::rgb(83, 83, 0));
        assert_eq!(flash_color(50, 50), Color::rgb(230, 230, 0));
        // Capped
        assert_eq!(flash_color(500, 50), flash_color(50, 50));
        // Brightness never exceeds 255 even with a generous cap
        assert_eq!(flash_color(1000, 1000), Color::rgb(255, 255, 0));
    }
}
