//! Popup content for a clicked cell.

use age_map_population_models::{AgeGroup, AgeGroupSelection, SpatialUnit};
use serde::Serialize;

/// Information shown when a cell is clicked.
///
/// The z / p line uses the cell's generic `z_score` / `p_value` fields, not
/// the pair that drives classification, and only appears when both exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    /// District the cell belongs to.
    pub district: Option<String>,
    /// Counts for each selected age group, youngest first.
    pub age_counts: Vec<(AgeGroup, Option<f64>)>,
    /// Generic z-score, when present together with [`Self::p_value`].
    pub z_score: Option<f64>,
    /// Generic p-value, when present together with [`Self::z_score`].
    pub p_value: Option<f64>,
}

impl Popup {
    /// Builds the popup for `unit` under `selection`.
    #[must_use]
    pub fn new(unit: &SpatialUnit, selection: &AgeGroupSelection) -> Self {
        let properties = &unit.properties;
        let stat = properties.popup_stat();
        let (z_score, p_value) = match (stat.z_score, stat.p_value) {
            (Some(z), Some(p)) => (Some(z), Some(p)),
            _ => (None, None),
        };

        Self {
            district: properties.district().map(ToString::to_string),
            age_counts: selection
                .selected()
                .map(|group| (group, properties.age_count(group)))
                .collect(),
            z_score,
            p_value,
        }
    }

    /// Renders the popup as display lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.age_counts.len() + 3);
        lines.push(format!(
            "District: {}",
            self.district.as_deref().unwrap_or("Unknown")
        ));
        for (group, count) in &self.age_counts {
            match count {
                Some(count) => lines.push(format!("{}: {count}", group.label())),
                None => lines.push(format!("{}: -", group.label())),
            }
        }
        if let (Some(z), Some(p)) = (self.z_score, self.p_value) {
            lines.push(format!("Z-score: {z:.2}"));
            lines.push(format!("p-value: {p:.4}"));
        }
        lines
    }
}

/// Popup text for `unit`, one entry per line.
#[must_use]
pub fn popup_text(unit: &SpatialUnit, selection: &AgeGroupSelection) -> String {
    Popup::new(unit, selection).lines().join("\n")
}
