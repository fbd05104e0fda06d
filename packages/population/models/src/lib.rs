#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hex population, age group, and district chart types.
//!
//! These types mirror the two upstream payloads consumed by the dashboard:
//! the `/hex-population` `GeoJSON` `FeatureCollection` (one feature per
//! hexagonal cell, carrying age-group counts and precomputed Gi* z-score /
//! p-value pairs) and the `/district-population-chart` series. Numeric
//! properties are parsed leniently so that a malformed cell never fails the
//! whole collection.

mod lenient;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The four age groups reported per hex cell.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeGroup {
    /// Children under 15.
    #[serde(rename = "age_0_14")]
    #[strum(serialize = "age_0_14")]
    Age0To14,
    /// Youth, 15 to 24.
    #[serde(rename = "age_15_24")]
    #[strum(serialize = "age_15_24")]
    Age15To24,
    /// Working age, 25 to 59.
    #[serde(rename = "age_25_59")]
    #[strum(serialize = "age_25_59")]
    Age25To59,
    /// Elderly, 60 and over.
    #[serde(rename = "age_60_up")]
    #[strum(serialize = "age_60_up")]
    Age60Up,
}

impl AgeGroup {
    /// Returns all variants of this enum, youngest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Age0To14, Self::Age15To24, Self::Age25To59, Self::Age60Up]
    }

    /// Short human-readable range used in popups and legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Age0To14 => "0-14",
            Self::Age15To24 => "15-24",
            Self::Age25To59 => "25-59",
            Self::Age60Up => "60+",
        }
    }
}

/// Which precomputed Gi* z-score / p-value pair to read from a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    /// The statistic computed over a single age group.
    Age(AgeGroup),
    /// The statistic computed over the whole population of the cell.
    TotalPopulation,
}

impl StatField {
    /// Picks the statistic that matches an age-group selection.
    ///
    /// Gi* is only precomputed per age group and for the total population,
    /// never for arbitrary subsets, so exactly one selected group maps to
    /// that group's pair and anything else (none, or two or more) maps to
    /// the total-population pair.
    #[must_use]
    pub fn for_selection(selection: &AgeGroupSelection) -> Self {
        let mut selected = selection.selected();
        match (selected.next(), selected.next()) {
            (Some(group), None) => Self::Age(group),
            _ => Self::TotalPopulation,
        }
    }
}

/// Which age groups are currently toggled on.
///
/// A fixed record rather than a map so that every consumer handles all four
/// groups. All groups are on by default; turning every group off is a valid
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AgeGroupSelection {
    /// Whether ages 0-14 are included.
    pub age_0_14: bool,
    /// Whether ages 15-24 are included.
    pub age_15_24: bool,
    /// Whether ages 25-59 are included.
    pub age_25_59: bool,
    /// Whether ages 60+ are included.
    pub age_60_up: bool,
}

impl Default for AgeGroupSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl AgeGroupSelection {
    /// Every age group selected.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            age_0_14: true,
            age_15_24: true,
            age_25_59: true,
            age_60_up: true,
        }
    }

    /// No age group selected.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            age_0_14: false,
            age_15_24: false,
            age_25_59: false,
            age_60_up: false,
        }
    }

    /// Only `group` selected.
    #[must_use]
    pub fn only(group: AgeGroup) -> Self {
        let mut selection = Self::none();
        selection.set(group, true);
        selection
    }

    /// Returns whether `group` is selected.
    #[must_use]
    pub const fn is_selected(&self, group: AgeGroup) -> bool {
        match group {
            AgeGroup::Age0To14 => self.age_0_14,
            AgeGroup::Age15To24 => self.age_15_24,
            AgeGroup::Age25To59 => self.age_25_59,
            AgeGroup::Age60Up => self.age_60_up,
        }
    }

    /// Sets the flag for `group`.
    pub const fn set(&mut self, group: AgeGroup, selected: bool) {
        *self.flag_mut(group) = selected;
    }

    /// Flips the flag for `group`.
    pub const fn toggle(&mut self, group: AgeGroup) {
        let flag = self.flag_mut(group);
        *flag = !*flag;
    }

    /// Iterates the selected groups, youngest first.
    pub fn selected(&self) -> impl Iterator<Item = AgeGroup> + '_ {
        AgeGroup::all()
            .iter()
            .copied()
            .filter(|group| self.is_selected(*group))
    }

    /// Number of selected groups.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    const fn flag_mut(&mut self, group: AgeGroup) -> &mut bool {
        match group {
            AgeGroup::Age0To14 => &mut self.age_0_14,
            AgeGroup::Age15To24 => &mut self.age_15_24,
            AgeGroup::Age25To59 => &mut self.age_25_59,
            AgeGroup::Age60Up => &mut self.age_60_up,
        }
    }
}

/// Administrative ring of Bangkok districts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Zone {
    /// The historic core.
    Inner,
    /// The ring around the core.
    Middle,
    /// Suburban districts.
    Outer,
}

impl Zone {
    /// Returns all variants of this enum, innermost first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Inner, Self::Middle, Self::Outer]
    }

    /// Human-readable zone name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inner => "Inner Bangkok",
            Self::Middle => "Middle Bangkok",
            Self::Outer => "Outer Bangkok",
        }
    }
}

/// How the map colors each hex cell.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum DisplayMode {
    /// Gi* hotspot / coldspot classification.
    #[default]
    #[serde(alias = "gi")]
    #[strum(to_string = "significance", serialize = "gi")]
    Significance,
    /// Continuous density of the selected age groups.
    #[serde(alias = "age")]
    #[strum(to_string = "density", serialize = "age")]
    Density,
}

/// A z-score / p-value pair. Either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignificanceStat {
    /// Gi* z-score.
    pub z_score: Option<f64>,
    /// Pseudo p-value from the permutation test, in `[0, 1]`.
    pub p_value: Option<f64>,
}

impl SignificanceStat {
    /// Creates a fully populated pair.
    #[must_use]
    pub const fn new(z_score: f64, p_value: f64) -> Self {
        Self {
            z_score: Some(z_score),
            p_value: Some(p_value),
        }
    }
}

/// The `properties` object of one hex feature.
///
/// Field names match the upstream payload exactly. Every numeric field is
/// optional: missing, `null`, or non-numeric values deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HexProperties {
    /// Hex cell identifier.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub hex_id: Option<i64>,
    /// Name of the district the cell belongs to.
    #[serde(default, deserialize_with = "lenient::string")]
    pub district_name: Option<String>,
    /// Population aged 0-14.
    #[serde(default, deserialize_with = "lenient::number")]
    pub age_0_14: Option<f64>,
    /// Population aged 15-24.
    #[serde(default, deserialize_with = "lenient::number")]
    pub age_15_24: Option<f64>,
    /// Population aged 25-59.
    #[serde(default, deserialize_with = "lenient::number")]
    pub age_25_59: Option<f64>,
    /// Population aged 60+.
    #[serde(default, deserialize_with = "lenient::number")]
    pub age_60_up: Option<f64>,
    /// Sum of the four age groups.
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_population: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub z_score_age_0_14: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p_value_age_0_14: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub z_score_age_15_24: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p_value_age_15_24: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub z_score_age_25_59: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p_value_age_25_59: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub z_score_age_60_up: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p_value_age_60_up: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub z_score_total_population: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub p_value_total_population: Option<f64>,
    /// Generic z-score shown in the popup. Absent on most cells and never
    /// used for classification.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub z_score: Option<f64>,
    /// Generic p-value shown in the popup. See [`Self::z_score`].
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub p_value: Option<f64>,
}

impl HexProperties {
    /// Returns the district name, treating an empty string as missing.
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        self.district_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns the population count for one age group.
    #[must_use]
    pub const fn age_count(&self, group: AgeGroup) -> Option<f64> {
        match group {
            AgeGroup::Age0To14 => self.age_0_14,
            AgeGroup::Age15To24 => self.age_15_24,
            AgeGroup::Age25To59 => self.age_25_59,
            AgeGroup::Age60Up => self.age_60_up,
        }
    }

    /// Returns the precomputed Gi* pair for `field`.
    #[must_use]
    pub const fn stat(&self, field: StatField) -> SignificanceStat {
        let (z_score, p_value) = match field {
            StatField::Age(AgeGroup::Age0To14) => (self.z_score_age_0_14, self.p_value_age_0_14),
            StatField::Age(AgeGroup::Age15To24) => {
                (self.z_score_age_15_24, self.p_value_age_15_24)
            }
            StatField::Age(AgeGroup::Age25To59) => {
                (self.z_score_age_25_59, self.p_value_age_25_59)
            }
            StatField::Age(AgeGroup::Age60Up) => (self.z_score_age_60_up, self.p_value_age_60_up),
            StatField::TotalPopulation => {
                (self.z_score_total_population, self.p_value_total_population)
            }
        };
        SignificanceStat { z_score, p_value }
    }

    /// Stores the Gi* pair for `field`.
    pub const fn set_stat(&mut self, field: StatField, stat: SignificanceStat) {
        let (z_score, p_value) = match field {
            StatField::Age(AgeGroup::Age0To14) => {
                (&mut self.z_score_age_0_14, &mut self.p_value_age_0_14)
            }
            StatField::Age(AgeGroup::Age15To24) => {
                (&mut self.z_score_age_15_24, &mut self.p_value_age_15_24)
            }
            StatField::Age(AgeGroup::Age25To59) => {
                (&mut self.z_score_age_25_59, &mut self.p_value_age_25_59)
            }
            StatField::Age(AgeGroup::Age60Up) => {
                (&mut self.z_score_age_60_up, &mut self.p_value_age_60_up)
            }
            StatField::TotalPopulation => (
                &mut self.z_score_total_population,
                &mut self.p_value_total_population,
            ),
        };
        *z_score = stat.z_score;
        *p_value = stat.p_value;
    }

    /// The generic popup pair, decoupled from classification.
    #[must_use]
    pub const fn popup_stat(&self) -> SignificanceStat {
        SignificanceStat {
            z_score: self.z_score,
            p_value: self.p_value,
        }
    }
}

/// `GeoJSON` object type tag for a single feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// `GeoJSON` object type tag for a feature collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

/// One hexagonal cell: an opaque polygon plus its population properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialUnit {
    /// Always `"Feature"`.
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    /// Cell polygon. Passed through untouched; a geometry that does not
    /// parse is dropped.
    #[serde(default, deserialize_with = "lenient::geometry")]
    pub geometry: Option<geojson::Geometry>,
    /// Population and Gi* attributes. `null` or non-object properties read
    /// as all fields missing.
    #[serde(default, deserialize_with = "lenient::properties")]
    pub properties: HexProperties,
}

impl SpatialUnit {
    /// Creates a feature without geometry.
    #[must_use]
    pub fn new(properties: HexProperties) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry: None,
            properties,
        }
    }
}

/// The `/hex-population` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HexFeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type", default)]
    pub kind: FeatureCollectionType,
    /// Hex cells in upstream order.
    #[serde(default)]
    pub features: Vec<SpatialUnit>,
}

impl From<Vec<SpatialUnit>> for HexFeatureCollection {
    fn from(features: Vec<SpatialUnit>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }
}

/// One bar of the district population chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictChartEntry {
    /// District name, matched against [`HexProperties::district_name`].
    #[serde(default)]
    pub district: String,
    /// Total population of the district.
    #[serde(default, deserialize_with = "lenient::count")]
    pub population: f64,
}

/// The datasets currently loaded by the dashboard.
///
/// The two payloads are fetched independently, so either may be missing.
/// A missing dataset reads as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    /// Hex cells, if loaded.
    pub hexes: Option<HexFeatureCollection>,
    /// District chart series, if loaded.
    pub chart: Option<Vec<DistrictChartEntry>>,
}

impl DashboardData {
    /// Hex cells, or an empty slice when not loaded.
    #[must_use]
    pub fn hexes(&self) -> &[SpatialUnit] {
        self.hexes
            .as_ref()
            .map(|collection| collection.features.as_slice())
            .unwrap_or_default()
    }

    /// Chart entries, or an empty slice when not loaded.
    #[must_use]
    pub fn chart(&self) -> &[DistrictChartEntry] {
        self.chart.as_deref().unwrap_or_default()
    }
}
