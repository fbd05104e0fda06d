//! Legend content for each display mode.

use age_map_population_models::DisplayMode;
use serde::{Deserialize, Serialize};

use crate::classify::Bucket;
use crate::color::{Color, ColorRamp, Palette};

/// Normalized positions shown in the density legend.
pub const DENSITY_LEGEND_STOPS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// One swatch in the map legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Swatch color.
    pub color: Color,
    /// Text next to the swatch.
    pub label: String,
    /// Bucket represented, in significance mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    /// Normalized ramp position represented, in density mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

/// Seven swatches, coldest first.
#[must_use]
pub fn significance_legend(palette: &Palette) -> Vec<LegendEntry> {
    Bucket::LEGEND_ORDER
        .iter()
        .map(|bucket| LegendEntry {
            color: palette.color_for(*bucket),
            label: bucket.label().to_string(),
            bucket: Some(*bucket),
            position: None,
        })
        .collect()
}

/// Five swatches sampled from `ramp`, lowest density first.
#[must_use]
pub fn density_legend(ramp: &ColorRamp) -> Vec<LegendEntry> {
    DENSITY_LEGEND_STOPS
        .iter()
        .map(|position| LegendEntry {
            color: ramp.sample(*position),
            label: density_label(*position).to_string(),
            bucket: None,
            position: Some(*position),
        })
        .collect()
}

/// Legend for `mode`.
#[must_use]
pub fn legend_for(mode: DisplayMode, palette: &Palette, ramp: &ColorRamp) -> Vec<LegendEntry> {
    match mode {
        DisplayMode::Significance => significance_legend(palette),
        DisplayMode::Density => density_legend(ramp),
    }
}

fn density_label(position: f64) -> &'static str {
    if position <= 0.0 {
        "Lowest density"
    } else if position <= 0.25 {
        "Low density"
    } else if position <= 0.5 {
        "Moderate density"
    } else if position < 1.0 {
        "High density"
    } else {
        "Highest density"
    }
}
