use palette::{Hsl, IntoColor, Srgb};

/// Colour used for undefined cells.
pub const UNDEFINED_COLOR: [u8; 3] = [128, 128, 128];

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    [
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<[u8; 3]> {
    (0..n)
        .map(|i| hsl_to_rgb((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// False-colour scale: intensity → RGB
// ---------------------------------------------------------------------------

/// Maps intensities in `[lo, hi]` onto a violet → teal → yellow ramp.
/// Values outside the range are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub lo: f64,
    pub hi: f64,
}

impl ColorScale {
    const HUE_LOW: f32 = 270.0;
    const HUE_HIGH: f32 = 60.0;

    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Position of `v` inside the scale, in `[0, 1]`.
    pub fn normalize(&self, v: f64) -> f64 {
        let range = self.hi - self.lo;
        if !range.is_finite() || range.abs() < f64::EPSILON {
            return 0.0;
        }
        ((v - self.lo) / range).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, value: Option<f64>) -> [u8; 3] {
        match value {
            Some(v) if v.is_finite() => {
                let t = self.normalize(v) as f32;
                let hue = Self::HUE_LOW + (Self::HUE_HIGH - Self::HUE_LOW) * t;
                hsl_to_rgb(hue, 0.85, 0.25 + 0.4 * t)
            }
            _ => UNDEFINED_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size_and_distinct() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[2]);
    }

    #[test]
    fn test_scale_clamps_and_marks_undefined() {
        let scale = ColorScale::new(0.0, 10.0);
        assert_eq!(scale.normalize(-5.0), 0.0);
        assert_eq!(scale.normalize(5.0), 0.5);
        assert_eq!(scale.normalize(50.0), 1.0);
        assert_eq!(scale.color_for(Some(-5.0)), scale.color_for(Some(0.0)));
        assert_ne!(scale.color_for(Some(0.0)), scale.color_for(Some(10.0)));
        assert_eq!(scale.color_for(None), UNDEFINED_COLOR);
    }

    #[test]
    fn test_flat_scale() {
        assert_eq!(ColorScale::new(3.0, 3.0).normalize(7.0), 0.0);
    }
}
