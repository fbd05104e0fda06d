#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the age map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the engine types so the API contract can evolve independently.

use age_map_engine::classify::Bucket;
use age_map_engine::dashboard::{Selection, StyledUnit};
use age_map_engine::legend::LegendEntry;
use age_map_engine::style::FeatureStyle;
use age_map_population_models::{
    DisplayMode, FeatureCollectionType, FeatureType, HexProperties, Zone,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Whether the hex population dataset is loaded.
    pub hexes_loaded: bool,
    /// Whether the district chart dataset is loaded.
    pub chart_loaded: bool,
}

/// Filter query parameters shared by the dashboard endpoints.
///
/// `exclude` and `ages` are comma-separated lists. With `ages` absent every
/// age group is selected; `ages=` selects none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// `significance` or `density` (`gi` / `age` also accepted).
    pub mode: Option<String>,
    /// `inner`, `middle`, `outer`, or `all`.
    pub zone: Option<String>,
    /// District names to hide.
    pub exclude: Option<String>,
    /// Age group keys such as `age_0_14`.
    pub ages: Option<String>,
}

/// Properties of one styled hex feature: the upstream properties plus the
/// render decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFeatureProperties {
    /// Upstream properties, unchanged.
    #[serde(flatten)]
    pub source: HexProperties,
    /// Leaflet path options.
    pub style: FeatureStyle,
    /// Significance bucket, in significance mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    /// Aggregated population, in density mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Popup lines.
    pub popup: Vec<String>,
}

/// One styled hex feature.
#[derive(Debug, Clone, Serialize)]
pub struct ApiFeature {
    /// Always `"Feature"`.
    #[serde(rename = "type")]
    pub kind: FeatureType,
    /// Cell polygon, passed through.
    pub geometry: Option<geojson::Geometry>,
    /// Properties and render decision.
    pub properties: ApiFeatureProperties,
}

impl From<&StyledUnit<'_>> for ApiFeature {
    fn from(styled: &StyledUnit<'_>) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry: styled.unit.geometry.clone(),
            properties: ApiFeatureProperties {
                source: styled.unit.properties.clone(),
                style: styled.style,
                bucket: styled.bucket,
                value: styled.value,
                popup: styled.popup.lines(),
            },
        }
    }
}

/// `GET /api/map` response: a `GeoJSON` `FeatureCollection` of the visible
/// cells, with the applied selection as a foreign member.
#[derive(Debug, Clone, Serialize)]
pub struct ApiMap {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    /// Visible cells in upstream order.
    pub features: Vec<ApiFeature>,
    /// The selection the features were styled for.
    pub selection: Selection,
}

/// `GET /api/districts` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistricts {
    /// Selected zone, if any.
    pub zone: Option<Zone>,
    /// Every district present in the loaded cells.
    pub all: Vec<String>,
    /// Districts offered by the exclusion control under `zone`.
    pub selectable: Vec<String>,
}

/// `GET /api/legend` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLegend {
    /// Mode the legend describes.
    pub mode: DisplayMode,
    /// Swatches in display order.
    pub entries: Vec<LegendEntry>,
}

/// One zone in the `GET /api/zones` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiZone {
    /// Zone key.
    pub zone: Zone,
    /// Human-readable name.
    pub label: String,
    /// Member districts, sorted.
    pub districts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use age_map_engine::dashboard::DashboardState;
    use age_map_population_models::SpatialUnit;

    #[test]
    fn styled_feature_flattens_upstream_properties() {
        let units = vec![SpatialUnit::new(HexProperties {
            hex_id: Some(3),
            district_name: Some("เขตบางรัก".to_string()),
            age_0_14: Some(10.0),
            ..HexProperties::default()
        })];
        let state = DashboardState::default();
        let styled = state.styled_features(&units);
        let feature = ApiFeature::from(&styled[0]);

        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["type"], "Feature");
        assert_eq!(json["properties"]["hex_id"], 3);
        assert_eq!(json["properties"]["district_name"], "เขตบางรัก");
        assert_eq!(json["properties"]["bucket"], "NOT_SIGNIFICANT");
        assert_eq!(json["properties"]["style"]["fillColor"], "#ffffff");
        assert_eq!(json["properties"]["style"]["color"], "#cccccc");
        assert!(json["properties"].get("value").is_none());
    }
}
