use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Hues start at blue and walk towards green, staying clear of yellow,
/// which washes out on a white background.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 230.0 - (i as f32 / n as f32) * 160.0;
            let hsl = Hsl::new(hue, 0.65, 0.42);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours: statistic column → RGBColor
// ---------------------------------------------------------------------------

/// Assigns each statistic column of a chart its own colour, in panel order.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    entries: Vec<(String, RGBColor)>,
    default_color: RGBColor,
}

impl SeriesColors {
    pub fn new(columns: &[&str]) -> Self {
        let palette = generate_palette(columns.len());
        SeriesColors {
            entries: columns
                .iter()
                .zip(palette)
                .map(|(c, color)| (c.to_string(), color))
                .collect(),
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a column.
    pub fn color_for(&self, column: &str) -> RGBColor {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|&(_, color)| color)
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_column_gets_default() {
        let colors = SeriesColors::new(&["floor_max", "floor_mean"]);
        assert_eq!(colors.color_for("floor_max"), generate_palette(2)[0]);
        assert_eq!(colors.color_for("floor_min"), RGBColor(128, 128, 128));
    }
}
