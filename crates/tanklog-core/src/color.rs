//! Series colors and the derived-series color variant.

/// RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to hue (degrees in `[0, 360)`), saturation, value.
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == self.r {
            60.0 * (((self.g - self.b) / delta).rem_euclid(6.0))
        } else if max == self.g {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };

        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        (hue, saturation, max)
    }

    /// Convert from hue (degrees), saturation, value.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let c = value * saturation;
        let h = (hue.rem_euclid(360.0)) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = value - c;
        Self::new(r + m, g + m, b + m)
    }

    /// Color for a series derived from one with this color.
    ///
    /// Shifts saturation by half a turn of its range, which keeps hue and
    /// brightness recognizable while staying visually distinct.
    pub fn trend_variant(self) -> Self {
        let (hue, saturation, value) = self.to_hsv();
        let saturation = if saturation > 0.5 {
            saturation - 0.5
        } else {
            saturation + 0.5
        };
        Self::from_hsv(hue, saturation, value)
    }
}
