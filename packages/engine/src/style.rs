//! Leaflet-style path options for one rendered cell.

use serde::{Deserialize, Serialize};

use crate::classify::Bucket;
use crate::color::{Color, Palette};

/// Outline drawn around cells that are not significant, so white cells stay
/// visible on a light basemap.
pub const MUTED_OUTLINE: Color = Color::rgb(0xcc, 0xcc, 0xcc);

/// Path options consumed by the map renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    /// Polygon fill.
    pub fill_color: Color,
    /// Outline color.
    pub color: Color,
    /// Outline width in pixels.
    pub weight: f64,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
}

impl FeatureStyle {
    /// Style for a cell in significance mode.
    #[must_use]
    pub const fn significance(bucket: Bucket, palette: &Palette) -> Self {
        let color = match bucket {
            Bucket::NotSignificant => MUTED_OUTLINE,
            _ => Color::WHITE,
        };
        Self {
            fill_color: palette.color_for(bucket),
            color,
            weight: 1.0,
            fill_opacity: 0.7,
        }
    }

    /// Style for a cell in density mode.
    #[must_use]
    pub const fn density(fill_color: Color) -> Self {
        Self {
            fill_color,
            color: Color::WHITE,
            weight: 1.0,
            fill_opacity: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_significant_cells_get_a_muted_outline() {
        let palette = Palette::default();
        let style = FeatureStyle::significance(Bucket::NotSignificant, &palette);
        assert_eq!(style.fill_color, Color::WHITE);
        assert_eq!(style.color, MUTED_OUTLINE);

        let hot = FeatureStyle::significance(Bucket::Hot95, &palette);
        assert_eq!(hot.color, Color::WHITE);
        assert_eq!(hot.fill_color.to_string(), "#fc4e2a");
    }

    #[test]
    fn serializes_with_leaflet_keys() {
        let json = serde_json::to_value(FeatureStyle::density(Color::rgb(0x21, 0x91, 0x8c))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fillColor": "#21918c",
                "color": "#ffffff",
                "weight": 1.0,
                "fillOpacity": 0.8
            })
        );
    }
}
