use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential colour scale for the choropleth
// ---------------------------------------------------------------------------

/// Fill for counties that have no matching rows.
pub const NO_DATA: Color32 = Color32::from_rgb(225, 228, 232);

/// Accent used for the bar and area charts.
pub const ACCENT: Color32 = Color32::from_rgb(78, 80, 255);

/// Maps a case count in `0..=max` to a colour running from a dark purple
/// through teal to yellow, roughly like Viridis.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    max: u64,
}

impl ColorScale {
    pub fn new(max: u64) -> Self {
        // Avoid a zero-width domain when every county is 0.
        ColorScale { max: max.max(1) }
    }

    /// Position of `value` along the scale, clamped to `0.0..=1.0`.
    pub fn fraction(&self, value: u64) -> f32 {
        (value.min(self.max) as f64 / self.max as f64) as f32
    }

    pub fn color_for(&self, value: u64) -> Color32 {
        ramp(self.fraction(value))
    }

    /// `n` evenly spaced (fraction, colour) stops for drawing a legend bar.
    pub fn legend_stops(&self, n: usize) -> Vec<(f32, Color32)> {
        if n < 2 {
            return vec![(0.0, ramp(0.0))];
        }
        (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                (t, ramp(t))
            })
            .collect()
    }

    pub fn max(&self) -> u64 {
        self.max
    }
}

/// Interpolate hue 280° → 60° while lightness rises, so low counts read
/// dark and high counts bright.
fn ramp(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let hue = 280.0 - 220.0 * t;
    let lightness = 0.25 + 0.4 * t;
    let hsl = Hsl::new(hue, 0.7, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_clamped() {
        let scale = ColorScale::new(200);
        assert_eq!(scale.fraction(0), 0.0);
        assert_eq!(scale.fraction(100), 0.5);
        assert_eq!(scale.fraction(500), 1.0);
    }

    #[test]
    fn zero_max_does_not_divide_by_zero() {
        let scale = ColorScale::new(0);
        assert_eq!(scale.max(), 1);
        assert_eq!(scale.fraction(0), 0.0);
    }

    #[test]
    fn higher_counts_are_brighter() {
        let scale = ColorScale::new(10);
        let luma = |c: Color32| u32::from(c.r()) + u32::from(c.g()) + u32::from(c.b());
        assert!(luma(scale.color_for(10)) > luma(scale.color_for(0)));
        assert_ne!(scale.color_for(0), NO_DATA);
    }

    #[test]
    fn legend_has_requested_stops() {
        let stops = ColorScale::new(5).legend_stops(5);
        assert_eq!(stops.len(), 5);
        assert_eq!(stops[0].0, 0.0);
        assert_eq!(stops[4].0, 1.0);
    }
}
