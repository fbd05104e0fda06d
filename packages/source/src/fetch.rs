//! Upstream API fetchers.
//!
//! The upstream serves `GET {base}/hex-population` and
//! `GET {base}/district-population-chart`. Query failures come back as a
//! 200 with an `{"error": ...}` body, which is reported as
//! [`SourceError::Upstream`].

use age_map_population_models::{DistrictChartEntry, HexFeatureCollection};

use crate::{SourceError, parse_district_chart, parse_hex_population, retry};

/// Path of the hex population endpoint.
pub const HEX_POPULATION_PATH: &str = "/hex-population";

/// Path of the district chart endpoint.
pub const DISTRICT_CHART_PATH: &str = "/district-population-chart";

/// Joins `base` and `path` with exactly one slash between them.
#[must_use]
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Fetches the hex population payload.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails or the body is not a
/// feature collection.
pub async fn fetch_hex_population(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<HexFeatureCollection, SourceError> {
    let url = endpoint_url(base_url, HEX_POPULATION_PATH);
    log::info!("Fetching hex population from {url}");
    let body = retry::send_text(|| client.get(&url)).await?;
    parse_hex_population(&body)
}

/// Fetches the district chart payload.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails or the body is not a list
/// of chart entries.
pub async fn fetch_district_chart(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<DistrictChartEntry>, SourceError> {
    let url = endpoint_url(base_url, DISTRICT_CHART_PATH);
    log::info!("Fetching district chart from {url}");
    let body = retry::send_text(|| client.get(&url)).await?;
    parse_district_chart(&body)
}
