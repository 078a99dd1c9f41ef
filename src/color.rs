use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Group;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize, lightness: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.6, lightness);
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
// Group accents: group label → Color32
// ---------------------------------------------------------------------------

/// Accent colour per group header.
///
/// Hues are assigned over the sorted, de-duplicated labels, so the same set
/// of groups always gets the same colours.
#[derive(Debug, Clone, Default)]
pub struct GroupColors {
    mapping: BTreeMap<String, Color32>,
}

impl GroupColors {
    /// `lightness` in `0.0..=1.0`; darker accents read better on light themes.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>, lightness: f32) -> Self {
        let labels: Vec<&str> = labels
            .into_iter()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        let palette = generate_palette(labels.len(), lightness);
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();
        Self { mapping }
    }

    pub fn for_groups(groups: &[Group], lightness: f32) -> Self {
        Self::new(groups.iter().map(|g| g.label.as_str()), lightness)
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        assert!(generate_palette(0, 0.6).is_empty());
        let colors = generate_palette(4, 0.6);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_group_colors_are_order_independent() {
        let a = GroupColors::new(["Other", "2024 - Y1.S1"], 0.6);
        let b = GroupColors::new(["2024 - Y1.S1", "Other", "Other"], 0.6);
        assert_eq!(a.color_for("Other"), b.color_for("Other"));
        assert_eq!(a.color_for("missing"), Color32::GRAY);
    }
}
