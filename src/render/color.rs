//! Colour helpers
//!
//! Colours are authored as `#rrggbb`. The lit and shaded faces of a
//! pseudo-3D box are derived from one base colour with `adjust_brightness`.

/// 8-bit sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Shift every channel by `round(2.55 * percent)`, clamped to 0..=255.
    ///
    /// Positive percentages lighten, negative darken. Any `percent` is accepted.
    pub fn adjust_brightness(self, percent: i32) -> Self {
        let amount = brightness_step(percent);
        let shift = |c: u8| (c as i64 + amount).clamp(0, 255) as u8;
        Self::new(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Linear RGBA for an sRGB render target
    pub fn to_linear(self, alpha: f32) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            alpha,
        ]
    }
}

/// Channel offset for a brightness percentage (halves round up)
fn brightness_step(percent: i32) -> i64 {
    (2.55 * percent as f64 + 0.5).floor() as i64
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
