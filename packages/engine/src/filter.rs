//! Zone and district filtering.
//!
//! The same predicate drives both the map layer and the chart series so the
//! two views always agree on which districts are visible.

use std::collections::BTreeSet;

use age_map_population_models::{SpatialUnit, Zone};

use crate::zones::ZoneTable;

/// Returns whether `district` passes the current filters.
///
/// Excluded districts are always hidden. With a zone selected, districts
/// outside it are hidden too.
#[must_use]
pub fn include_district(
    district: &str,
    zone: Option<Zone>,
    excluded: &BTreeSet<String>,
    zones: &ZoneTable,
) -> bool {
    if excluded.contains(district) {
        return false;
    }
    zone.is_none_or(|zone| zones.contains(zone, district))
}

/// Returns whether `unit` passes the current filters.
///
/// A cell without a district name cannot be excluded and never matches a
/// zone, so it is visible exactly while no zone is selected.
#[must_use]
pub fn include(
    unit: &SpatialUnit,
    zone: Option<Zone>,
    excluded: &BTreeSet<String>,
    zones: &ZoneTable,
) -> bool {
    match unit.properties.district() {
        Some(district) => include_district(district, zone, excluded, zones),
        None => zone.is_none(),
    }
}
