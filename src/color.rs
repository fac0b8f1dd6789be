use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues, starting
/// at `hue_offset` degrees.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
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
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps every value of a categorical axis to a distinct colour.
///
/// Built from the complete category list, so a category keeps its colour
/// whether or not it appears in the current data.
#[derive(Debug, Clone)]
pub struct ColorMap<K> {
    mapping: BTreeMap<K, Color32>,
    default_color: Color32,
}

impl<K: Ord + Copy> ColorMap<K> {
    pub fn new(categories: &[K], hue_offset: f32) -> Self {
        let palette = generate_palette(categories.len(), hue_offset);
        ColorMap {
            mapping: categories.iter().copied().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, key: K) -> Color32 {
        self.mapping.get(&key).copied().unwrap_or(self.default_color)
    }
}
