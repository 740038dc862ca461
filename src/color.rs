use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: chart label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a chart (pie slices, scatter groups) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from labels in display order.
    ///
    /// Outcome labels `"1"`/`"0"` keep fixed success/failure colours so both
    /// charts agree; other labels share the generated palette.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let others: Vec<&str> = labels
            .iter()
            .copied()
            .filter(|l| outcome_color(l).is_none())
            .collect();
        let palette = generate_palette(others.len());

        let mut mapping: BTreeMap<String, Color32> = others
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();
        for label in labels {
            if let Some(c) = outcome_color(label) {
                mapping.insert(label.to_string(), c);
            }
        }

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

fn outcome_color(label: &str) -> Option<Color32> {
    match label {
        "1" => Some(Color32::from_rgb(46, 160, 67)),
        "0" => Some(Color32::from_rgb(214, 69, 65)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(4).len(), 4);
    }

    #[test]
    fn outcome_labels_keep_fixed_colours() {
        let a = ColorMap::new(["0", "1"]);
        let b = ColorMap::new(["FT", "1", "v1.1", "0"]);
        assert_eq!(a.color_for("1"), b.color_for("1"));
        assert_eq!(a.color_for("0"), b.color_for("0"));
        assert_ne!(b.color_for("FT"), b.color_for("v1.1"));
        assert_eq!(b.color_for("B5"), Color32::GRAY);
    }
}
