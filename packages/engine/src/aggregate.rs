//! Population totals over the selected age groups.

use age_map_population_models::{AgeGroupSelection, SpatialUnit};

/// Sums the counts of every selected age group in `unit`.
///
/// A missing count contributes 0, and with nothing selected the result is 0
/// for every cell, which renders density mode as a single flat color.
#[must_use]
pub fn aggregate(unit: &SpatialUnit, selection: &AgeGroupSelection) -> f64 {
    selection
        .selected()
        .map(|group| unit.properties.age_count(group).unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use age_map_population_models::{AgeGroup, HexProperties};

    fn unit() -> SpatialUnit {
        SpatialUnit::new(HexProperties {
            age_0_14: Some(120.0),
            age_15_24: Some(80.0),
            age_25_59: Some(400.0),
            age_60_up: Some(95.0),
            ..HexProperties::default()
        })
    }

    #[test]
    fn sums_all_groups_by_default() {
        assert!((aggregate(&unit(), &AgeGroupSelection::default()) - 695.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sums_only_selected_groups() {
        let mut selection = AgeGroupSelection::all();
        selection.toggle(AgeGroup::Age25To59);
        selection.toggle(AgeGroup::Age0To14);
        assert!((aggregate(&unit(), &selection) - 175.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nothing_selected_is_zero() {
        assert!(aggregate(&unit(), &AgeGroupSelection::none()).abs() < f64::EPSILON);
        assert!(
            aggregate(&SpatialUnit::default(), &AgeGroupSelection::none()).abs() < f64::EPSILON
        );
    }

    #[test]
    fn missing_counts_contribute_nothing() {
        let sparse = SpatialUnit::new(HexProperties {
            age_60_up: Some(12.0),
            ..HexProperties::default()
        });
        assert!((aggregate(&sparse, &AgeGroupSelection::all()) - 12.0).abs() < f64::EPSILON);
    }
}
