//! Turns dashboard query parameters into a [`DashboardState`].

use std::collections::BTreeSet;
use std::sync::Arc;

use age_map_engine::dashboard::{DashboardConfig, DashboardState};
use age_map_population_models::{AgeGroup, AgeGroupSelection, DisplayMode, Zone};
use age_map_server_models::DashboardQueryParams;

/// Errors in dashboard query parameters.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// `mode` was not a known display mode.
    #[error("Unknown display mode '{value}'")]
    UnknownMode {
        /// The rejected value.
        value: String,
    },
}

/// Builds the dashboard state described by `params`.
///
/// The zone is applied before exclusions, since selecting a zone clears
/// them. Unknown zones and age group keys are ignored.
///
/// # Errors
///
/// Returns [`QueryError::UnknownMode`] if `mode` is not recognized.
pub fn build_dashboard(
    config: Arc<DashboardConfig>,
    params: &DashboardQueryParams,
) -> Result<DashboardState, QueryError> {
    let mode = parse_mode(params.mode.as_deref())?;
    let ages = parse_ages(params.ages.as_deref());

    let mut state = DashboardState::new(config);
    state.set_display_mode(mode);
    state.set_zone(parse_zone(params.zone.as_deref()));

    let excluded: BTreeSet<&str> = split_list(params.exclude.as_deref()).collect();
    for district in excluded {
        state.toggle_district_exclusion(district);
    }

    for group in AgeGroup::all() {
        if state.selection().age_groups.is_selected(*group) != ages.is_selected(*group) {
            state.toggle_age_group(*group);
        }
    }

    Ok(state)
}

/// Parses `mode`, defaulting to significance when absent or blank.
///
/// # Errors
///
/// Returns [`QueryError::UnknownMode`] for an unrecognized value.
pub fn parse_mode(value: Option<&str>) -> Result<DisplayMode, QueryError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DisplayMode::default()),
        Some(v) => v.parse().map_err(|_| QueryError::UnknownMode {
            value: v.to_string(),
        }),
    }
}

/// Parses `zone`. Absent, blank, `all`, or unknown values select no zone.
#[must_use]
pub fn parse_zone(value: Option<&str>) -> Option<Zone> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    if value.eq_ignore_ascii_case("all") {
        return None;
    }
    value
        .parse()
        .inspect_err(|_| log::debug!("Ignoring unknown zone '{value}'"))
        .ok()
}

/// Parses `ages`. Absent means every group; otherwise only the listed
/// groups, so an empty list selects none.
#[must_use]
pub fn parse_ages(value: Option<&str>) -> AgeGroupSelection {
    let Some(value) = value else {
        return AgeGroupSelection::all();
    };

    let mut selection = AgeGroupSelection::none();
    for key in split_list(Some(value)) {
        match key.parse::<AgeGroup>() {
            Ok(group) => selection.set(group, true),
            Err(_) => log::debug!("Ignoring unknown age group '{key}'"),
        }
    }
    selection
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use age_map_engine::dashboard::Selection;

    fn params(mode: &str, zone: &str, exclude: &str, ages: Option<&str>) -> DashboardQueryParams {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        DashboardQueryParams {
            mode: opt(mode),
            zone: opt(zone),
            exclude: opt(exclude),
            ages: ages.map(ToString::to_string),
        }
    }

    #[test]
    fn empty_query_is_the_default_selection() {
        let state = build_dashboard(
            Arc::new(DashboardConfig::default()),
            &DashboardQueryParams::default(),
        )
        .unwrap();
        assert_eq!(*state.selection(), Selection::default());
    }

    #[test]
    fn applies_every_parameter() {
        let state = build_dashboard(
            Arc::new(DashboardConfig::default()),
            &params(
                "density",
                "inner",
                "เขตบางรัก, เขตสาทร,,เขตบางรัก",
                Some("age_0_14,age_60_up"),
            ),
        )
        .unwrap();

        let selection = state.selection();
        assert_eq!(selection.display_mode, DisplayMode::Density);
        assert_eq!(selection.zone, Some(Zone::Inner));
        assert_eq!(
            selection.excluded_districts.iter().collect::<Vec<_>>(),
            ["เขตบางรัก", "เขตสาทร"]
        );
        let mut expected = AgeGroupSelection::none();
        expected.set(AgeGroup::Age0To14, true);
        expected.set(AgeGroup::Age60Up, true);
        assert_eq!(selection.age_groups, expected);
    }

    #[test]
    fn legacy_mode_names_are_accepted() {
        assert_eq!(parse_mode(Some("gi")).unwrap(), DisplayMode::Significance);
        assert_eq!(parse_mode(Some("AGE")).unwrap(), DisplayMode::Density);
        assert_eq!(parse_mode(Some(" ")).unwrap(), DisplayMode::Significance);
        assert!(matches!(
            parse_mode(Some("heat")),
            Err(QueryError::UnknownMode { ref value }) if value == "heat"
        ));
    }

    #[test]
    fn zone_parsing() {
        assert_eq!(parse_zone(Some("Outer")), Some(Zone::Outer));
        assert_eq!(parse_zone(Some("all")), None);
        assert_eq!(parse_zone(Some("suburbs")), None);
        assert_eq!(parse_zone(None), None);
    }

    #[test]
    fn ages_parsing() {
        assert_eq!(parse_ages(None), AgeGroupSelection::all());
        assert_eq!(parse_ages(Some("")), AgeGroupSelection::none());
        assert_eq!(
            parse_ages(Some("age_15_24, seniors")),
            AgeGroupSelection::only(AgeGroup::Age15To24)
        );
    }
}
