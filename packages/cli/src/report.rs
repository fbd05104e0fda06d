//! Plain-text rendering of dashboard views.

use age_map_engine::classify::Bucket;
use age_map_engine::dashboard::{DashboardState, ViewSummary};
use age_map_population_models::DisplayMode;

/// Lines describing `summary`, hottest bucket first.
pub fn summary_lines(summary: &ViewSummary) -> Vec<String> {
    let zone = summary.zone.map_or("All zones", |zone| zone.label());
    let mut lines = vec![
        format!("Mode: {}", summary.display_mode),
        format!("Zone: {zone}"),
        format!(
            "Visible cells: {} across {} districts",
            summary.visible_features, summary.visible_districts
        ),
    ];

    match summary.display_mode {
        DisplayMode::Significance => {
            for bucket in Bucket::all() {
                let count = summary.buckets.get(bucket).copied().unwrap_or_default();
                lines.push(format!("  {:<26} {count}", bucket.label()));
            }
        }
        DisplayMode::Density => {
            lines.push(format!("  Max population:   {:.0}", summary.max_value));
            lines.push(format!("  Total population: {:.0}", summary.total_value));
        }
    }

    lines
}

/// One line per district, marked when currently excluded.
pub fn district_lines(state: &DashboardState, districts: &[String]) -> Vec<String> {
    let zones = &state.config().zones;
    districts
        .iter()
        .map(|district| {
            let zone = zones
                .zone_of(district)
                .map_or_else(|| "-".to_string(), |zone| zone.to_string());
            let excluded = state.selection().excluded_districts.contains(district);
            format!(
                "{district} ({zone}){}",
                if excluded { " [excluded]" } else { "" }
            )
        })
        .collect()
}
