use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential count scale
// ---------------------------------------------------------------------------

/// Maps a count onto a light-to-dark red ramp, scaled to the largest count
/// in the current result. The original dashboard used the "reds" continuous
/// scale for the same column.
#[derive(Debug, Clone, Copy)]
pub struct CountScale {
    max: u64,
}

impl CountScale {
    /// Build a scale topped at `max_count`. A zero maximum (empty result)
    /// produces a scale that renders everything at the light end.
    pub fn new(max_count: u64) -> Self {
        CountScale { max: max_count }
    }

    /// Scale for a set of counts, topped at their maximum.
    pub fn from_counts(counts: impl IntoIterator<Item = u64>) -> Self {
        CountScale::new(counts.into_iter().max().unwrap_or(0))
    }

    /// Colour for one count value.
    pub fn color_for(&self, count: u64) -> Color32 {
        let t = if self.max == 0 {
            0.0
        } else {
            (count.min(self.max) as f32) / (self.max as f32)
        };
        red_ramp(t)
    }
}

/// Interpolate the red ramp at `t` in [0, 1]: pale red at 0, deep red at 1.
fn red_ramp(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    // Hue stays on red; lightness walks from pale to dark.
    let lightness = 0.85 - 0.50 * t;
    let saturation = 0.55 + 0.35 * t;
    let hsl = Hsl::new(0.0, saturation, lightness);
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
    fn larger_counts_map_to_darker_reds() {
        let scale = CountScale::new(100);
        let low = scale.color_for(5);
        let high = scale.color_for(95);
        // Darker means less green/blue in an sRGB red ramp.
        assert!(u32::from(high.g()) < u32::from(low.g()));
        assert!(u32::from(high.b()) < u32::from(low.b()));
    }

    #[test]
    fn zero_max_scale_is_safe() {
        let scale = CountScale::from_counts(std::iter::empty());
        assert_eq!(scale.color_for(0), scale.color_for(42));
    }

    #[test]
    fn counts_above_the_maximum_clamp() {
        let scale = CountScale::new(10);
        assert_eq!(scale.color_for(10), scale.color_for(10_000));
    }
}
