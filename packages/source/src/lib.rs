#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loading for the age map dashboard.
//!
//! The dashboard consumes two independent payloads: the hex population
//! `FeatureCollection` and the per-district chart series. Each can come from
//! a local JSON file or from the upstream API, and each is loaded on its
//! own so that one failing never hides the other.

pub mod fetch;
pub mod file;
pub mod retry;

use std::path::PathBuf;

use age_map_population_models::{DashboardData, DistrictChartEntry, HexFeatureCollection};
use serde::de::DeserializeOwned;

/// Default path of the hex population dataset.
pub const DEFAULT_HEX_POPULATION_PATH: &str = "data/hex_population.geojson";

/// Default path of the district chart dataset.
pub const DEFAULT_DISTRICT_CHART_PATH: &str = "data/district_population_chart.json";

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a local dataset.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upstream API answered with an `{"error": ...}` body.
    #[error("Upstream error: {message}")]
    Upstream {
        /// Message reported by the upstream API.
        message: String,
    },

    /// The upstream API answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },
}

/// Where one dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    /// A local JSON file.
    File(PathBuf),
    /// The upstream API at this base URL.
    Upstream(String),
}

impl std::fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Upstream(base) => write!(f, "upstream {base}"),
        }
    }
}

/// Locations of both datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceConfig {
    /// Source of the `/hex-population` payload.
    pub hex_population: DatasetLocation,
    /// Source of the `/district-population-chart` payload.
    pub district_chart: DatasetLocation,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            hex_population: DatasetLocation::File(DEFAULT_HEX_POPULATION_PATH.into()),
            district_chart: DatasetLocation::File(DEFAULT_DISTRICT_CHART_PATH.into()),
        }
    }
}

impl DataSourceConfig {
    /// Reads `HEX_POPULATION_PATH`, `DISTRICT_CHART_PATH`, and `UPSTREAM_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves each dataset from `lookup`.
    ///
    /// An explicit path wins. Otherwise `UPSTREAM_URL` is used if set, and
    /// the default file path if not.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let upstream = lookup("UPSTREAM_URL").filter(|url| !url.trim().is_empty());
        let resolve = |path_var: &str, default_path: &str| {
            lookup(path_var)
                .filter(|path| !path.trim().is_empty())
                .map(|path| DatasetLocation::File(path.into()))
                .or_else(|| upstream.clone().map(DatasetLocation::Upstream))
                .unwrap_or_else(|| DatasetLocation::File(default_path.into()))
        };

        Self {
            hex_population: resolve("HEX_POPULATION_PATH", DEFAULT_HEX_POPULATION_PATH),
            district_chart: resolve("DISTRICT_CHART_PATH", DEFAULT_DISTRICT_CHART_PATH),
        }
    }

    /// Points both datasets at the upstream API.
    #[must_use]
    pub fn upstream(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            hex_population: DatasetLocation::Upstream(base_url.clone()),
            district_chart: DatasetLocation::Upstream(base_url),
        }
    }
}

/// Parses a `/hex-population` body.
///
/// # Errors
///
/// Returns [`SourceError::Upstream`] for an `{"error": ...}` body and
/// [`SourceError::Json`] for anything else that is not a feature collection.
pub fn parse_hex_population(body: &str) -> Result<HexFeatureCollection, SourceError> {
    parse_payload(body)
}

/// Parses a `/district-population-chart` body.
///
/// # Errors
///
/// Returns [`SourceError::Upstream`] for an `{"error": ...}` body and
/// [`SourceError::Json`] for anything else that is not a list of entries.
pub fn parse_district_chart(body: &str) -> Result<Vec<DistrictChartEntry>, SourceError> {
    parse_payload(body)
}

fn parse_payload<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if let Some(error) = value.get("error") {
        let message = error
            .as_str()
            .map_or_else(|| error.to_string(), ToString::to_string);
        return Err(SourceError::Upstream { message });
    }
    Ok(serde_json::from_value(value)?)
}

/// Loads the hex population dataset from `location`.
///
/// # Errors
///
/// Returns [`SourceError`] if the dataset cannot be read or parsed.
pub async fn load_hex_population(
    client: &reqwest::Client,
    location: &DatasetLocation,
) -> Result<HexFeatureCollection, SourceError> {
    match location {
        DatasetLocation::File(path) => file::load_hex_population(path),
        DatasetLocation::Upstream(base) => fetch::fetch_hex_population(client, base).await,
    }
}

/// Loads the district chart dataset from `location`.
///
/// # Errors
///
/// Returns [`SourceError`] if the dataset cannot be read or parsed.
pub async fn load_district_chart(
    client: &reqwest::Client,
    location: &DatasetLocation,
) -> Result<Vec<DistrictChartEntry>, SourceError> {
    match location {
        DatasetLocation::File(path) => file::load_district_chart(path),
        DatasetLocation::Upstream(base) => fetch::fetch_district_chart(client, base).await,
    }
}

/// Loads both datasets concurrently.
///
/// A dataset that fails to load is logged and left absent; the other one
/// is still returned.
pub async fn load_dashboard_data(
    client: &reqwest::Client,
    config: &DataSourceConfig,
) -> DashboardData {
    let (hexes, chart) = tokio::join!(
        load_hex_population(client, &config.hex_population),
        load_district_chart(client, &config.district_chart),
    );

    let hexes = match hexes {
        Ok(collection) => {
            log::info!(
                "Loaded {} hex cells from {}",
                collection.features.len(),
                config.hex_population
            );
            Some(collection)
        }
        Err(e) => {
            log::warn!(
                "Hex population unavailable from {}: {e}",
                config.hex_population
            );
            None
        }
    };

    let chart = match chart {
        Ok(entries) => {
            log::info!(
                "Loaded {} district chart entries from {}",
                entries.len(),
                config.district_chart
            );
            Some(entries)
        }
        Err(e) => {
            log::warn!(
                "District chart unavailable from {}: {e}",
                config.district_chart
            );
            None
        }
    };

    DashboardData { hexes, chart }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_files() {
        assert_eq!(DataSourceConfig::from_lookup(lookup(&[])), DataSourceConfig::default());
    }

    #[test]
    fn explicit_paths_win_over_upstream() {
        let config = DataSourceConfig::from_lookup(lookup(&[
            ("UPSTREAM_URL", "http://localhost:8000"),
            ("DISTRICT_CHART_PATH", "/tmp/chart.json"),
        ]));
        assert_eq!(
            config.hex_population,
            DatasetLocation::Upstream("http://localhost:8000".to_string())
        );
        assert_eq!(
            config.district_chart,
            DatasetLocation::File("/tmp/chart.json".into())
        );
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config =
            DataSourceConfig::from_lookup(lookup(&[("UPSTREAM_URL", " "), ("HEX_POPULATION_PATH", "")]));
        assert_eq!(config, DataSourceConfig::default());
    }

    #[test]
    fn parses_hex_population() {
        let body = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[100.5, 13.7], [100.51, 13.7], [100.51, 13.71], [100.5, 13.7]]]
                },
                "properties": {
                    "hex_id": 7,
                    "district_name": "เขตบางรัก",
                    "age_0_14": 120,
                    "z_score_total_population": "n/a",
                    "p_value_total_population": null
                }
            }]
        })
        .to_string();

        let collection = parse_hex_population(&body).unwrap();
        assert_eq!(collection.features.len(), 1);
        let properties = &collection.features[0].properties;
        assert_eq!(properties.hex_id, Some(7));
        assert_eq!(properties.age_0_14, Some(120.0));
        assert_eq!(properties.z_score_total_population, None);
        assert!(collection.features[0].geometry.is_some());
    }

    #[test]
    fn malformed_features_keep_the_dataset() {
        let body = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {"district_name": "เขตสาทร"}},
            {"type": "Feature", "geometry": {"type": "Polygon"}, "properties": null}
        ]}"#;
        let collection = parse_hex_population(body).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.features[0].properties.district(), Some("เขตสาทร"));
        assert_eq!(collection.features[1].properties.district(), None);
    }

    #[test]
    fn parses_district_chart() {
        let body = r#"[{"district": "เขตบางรัก", "population": 45000}, {"district": "เขตสาทร"}]"#;
        let entries = parse_district_chart(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert!((entries[0].population - 45_000.0).abs() < f64::EPSILON);
        assert!(entries[1].population.abs() < f64::EPSILON);
    }

    #[test]
    fn recognizes_upstream_error_bodies() {
        let err = parse_hex_population(r#"{"error": "relation \"hex_gi\" does not exist"}"#)
            .unwrap_err();
        assert!(
            matches!(err, SourceError::Upstream { ref message } if message.contains("hex_gi"))
        );

        let err = parse_district_chart(r#"{"error": 42}"#).unwrap_err();
        assert!(matches!(err, SourceError::Upstream { ref message } if message == "42"));
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(matches!(
            parse_district_chart(r#"{"type": "FeatureCollection"}"#),
            Err(SourceError::Json(_))
        ));
        assert!(matches!(parse_hex_population("not json"), Err(SourceError::Json(_))));
    }

    #[tokio::test]
    async fn missing_datasets_load_as_absent() {
        let dir = std::env::temp_dir().join("age_map_source_missing_datasets");
        let config = DataSourceConfig {
            hex_population: DatasetLocation::File(dir.join("nope.geojson")),
            district_chart: DatasetLocation::File(dir.join("nope.json")),
        };
        let data = load_dashboard_data(&reqwest::Client::new(), &config).await;
        assert_eq!(data, DashboardData::default());
        assert!(data.hexes().is_empty());
        assert!(data.chart().is_empty());
    }

    #[tokio::test]
    async fn one_failing_dataset_keeps_the_other() {
        let dir = std::env::temp_dir().join("age_map_source_partial_datasets");
        std::fs::create_dir_all(&dir).unwrap();
        let chart_path = dir.join("chart.json");
        std::fs::write(&chart_path, r#"[{"district": "เขตสาทร", "population": 80000}]"#).unwrap();

        let config = DataSourceConfig {
            hex_population: DatasetLocation::File(dir.join("missing.geojson")),
            district_chart: DatasetLocation::File(chart_path),
        };
        let data = load_dashboard_data(&reqwest::Client::new(), &config).await;
        assert!(data.hexes.is_none());
        assert_eq!(data.chart().len(), 1);
    }
}
