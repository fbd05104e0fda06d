//! Local JSON dataset files.

use std::path::Path;

use age_map_population_models::{DistrictChartEntry, HexFeatureCollection};

use crate::{SourceError, parse_district_chart, parse_hex_population};

/// Reads a hex population `GeoJSON` file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_hex_population(path: &Path) -> Result<HexFeatureCollection, SourceError> {
    log::debug!("Reading hex population from {}", path.display());
    parse_hex_population(&std::fs::read_to_string(path)?)
}

/// Reads a district chart JSON file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_district_chart(path: &Path) -> Result<Vec<DistrictChartEntry>, SourceError> {
    log::debug!("Reading district chart from {}", path.display());
    parse_district_chart(&std::fs::read_to_string(path)?)
}
