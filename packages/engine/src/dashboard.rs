//! Dashboard filter state and the views derived from it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use age_map_population_models::{
    AgeGroup, AgeGroupSelection, DisplayMode, DistrictChartEntry, SpatialUnit, Zone,
};
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::classify::{Bucket, classify};
use crate::color::{
    Color, ColorRamp, Palette, VIRIDIS, color_for_density, max_value, normalize_to_max,
};
use crate::filter::{include, include_district};
use crate::legend::{LegendEntry, legend_for};
use crate::popup::Popup;
use crate::style::FeatureStyle;
use crate::zones::ZoneTable;

/// Immutable lookup data injected into every [`DashboardState`].
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Zone membership.
    pub zones: ZoneTable,
    /// Significance mode colors.
    pub palette: Palette,
    /// Density mode ramp.
    pub density_ramp: &'static ColorRamp,
}

impl Default for DashboardConfig {
    /// Bangkok zones, the red / blue palette, and viridis.
    fn default() -> Self {
        Self {
            zones: ZoneTable::bangkok(),
            palette: Palette::default(),
            density_ramp: &VIRIDIS,
        }
    }
}

/// The user's current filter choices. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selection {
    pub display_mode: DisplayMode,
    pub zone: Option<Zone>,
    pub excluded_districts: BTreeSet<String>,
    pub age_groups: AgeGroupSelection,
}

/// One visible cell together with everything needed to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledUnit<'a> {
    #[serde(skip)]
    pub unit: &'a SpatialUnit,
    pub style: FeatureStyle,
    /// Significance bucket, in significance mode.
    pub bucket: Option<Bucket>,
    /// Aggregated population of the selected age groups, in density mode.
    pub value: Option<f64>,
    pub popup: Popup,
}

/// Counts over the visible cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSummary {
    pub display_mode: DisplayMode,
    pub zone: Option<Zone>,
    pub visible_features: usize,
    pub visible_districts: usize,
    /// Cells per bucket, every bucket present.
    pub buckets: BTreeMap<Bucket, usize>,
    /// Largest aggregated value among visible cells.
    pub max_value: f64,
    /// Sum of aggregated values over visible cells.
    pub total_value: f64,
}

/// Current selection plus the injected configuration.
///
/// All mutation goes through the methods below; the derived views are pure
/// functions of the selection and the data passed in.
#[derive(Debug, Clone)]
pub struct DashboardState {
    config: Arc<DashboardConfig>,
    selection: Selection,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(Arc::new(DashboardConfig::default()))
    }
}

impl DashboardState {
    /// Default selection: significance mode, no zone, no exclusions, every
    /// age group on.
    #[must_use]
    pub fn new(config: Arc<DashboardConfig>) -> Self {
        Self::with_selection(config, Selection::default())
    }

    #[must_use]
    pub const fn with_selection(config: Arc<DashboardConfig>, selection: Selection) -> Self {
        Self { config, selection }
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub const fn set_display_mode(&mut self, mode: DisplayMode) {
        self.selection.display_mode = mode;
    }

    /// Selects a zone, or clears it with `None`. Always clears exclusions.
    pub fn set_zone(&mut self, zone: Option<Zone>) {
        self.selection.zone = zone;
        self.selection.excluded_districts.clear();
    }

    /// Adds `district` to the exclusion set, or removes it if present.
    /// An empty name is ignored.
    pub fn toggle_district_exclusion(&mut self, district: &str) {
        if district.is_empty() {
            return;
        }
        let excluded = &mut self.selection.excluded_districts;
        if !excluded.remove(district) {
            excluded.insert(district.to_string());
        }
    }

    /// Flips one age group. Turning every group off is allowed.
    pub const fn toggle_age_group(&mut self, group: AgeGroup) {
        self.selection.age_groups.toggle(group);
    }

    /// Cells that pass the current filters, in input order.
    #[must_use]
    pub fn visible_features<'a>(&self, features: &'a [SpatialUnit]) -> Vec<&'a SpatialUnit> {
        features
            .iter()
            .filter(|unit| self.includes(unit))
            .collect()
    }

    /// Fill color for `unit`.
    ///
    /// In density mode the scale is relative to the aggregated values of
    /// `visible`, which should be the output of [`Self::visible_features`].
    #[must_use]
    pub fn style_for(&self, unit: &SpatialUnit, visible: &[&SpatialUnit]) -> Color {
        let groups = &self.selection.age_groups;
        match self.selection.display_mode {
            DisplayMode::Significance => self.config.palette.color_for(classify(unit, groups)),
            DisplayMode::Density => {
                let values: Vec<f64> = visible.iter().map(|u| aggregate(u, groups)).collect();
                color_for_density(aggregate(unit, groups), &values, self.config.density_ramp)
            }
        }
    }

    /// Visible cells with their full style, bucket or value, and popup.
    ///
    /// Same colors as calling [`Self::style_for`] per cell, with the
    /// density maximum computed once.
    #[must_use]
    pub fn styled_features<'a>(&self, features: &'a [SpatialUnit]) -> Vec<StyledUnit<'a>> {
        let groups = &self.selection.age_groups;
        let visible = self.visible_features(features);

        match self.selection.display_mode {
            DisplayMode::Significance => visible
                .into_iter()
                .map(|unit| {
                    let bucket = classify(unit, groups);
                    StyledUnit {
                        unit,
                        style: FeatureStyle::significance(bucket, &self.config.palette),
                        bucket: Some(bucket),
                        value: None,
                        popup: Popup::new(unit, groups),
                    }
                })
                .collect(),
            DisplayMode::Density => {
                let values: Vec<f64> = visible.iter().map(|u| aggregate(u, groups)).collect();
                let max = max_value(&values);
                log::trace!("Density scale max {max} over {} cells", values.len());

                visible
                    .into_iter()
                    .zip(values)
                    .map(|(unit, value)| {
                        let fill = self.config.density_ramp.sample(normalize_to_max(value, max));
                        StyledUnit {
                            unit,
                            style: FeatureStyle::density(fill),
                            bucket: None,
                            value: Some(value),
                            popup: Popup::new(unit, groups),
                        }
                    })
                    .collect()
            }
        }
    }

    /// Chart bars that pass the same filters as the map.
    #[must_use]
    pub fn visible_chart_series<'a>(
        &self,
        entries: &'a [DistrictChartEntry],
    ) -> Vec<&'a DistrictChartEntry> {
        entries
            .iter()
            .filter(|entry| {
                include_district(
                    &entry.district,
                    self.selection.zone,
                    &self.selection.excluded_districts,
                    &self.config.zones,
                )
            })
            .collect()
    }

    /// Sorted, deduplicated district names present in `features`.
    ///
    /// Cells without a district name are skipped.
    #[must_use]
    pub fn distinct_districts(features: &[SpatialUnit]) -> Vec<String> {
        features
            .iter()
            .filter_map(|unit| unit.properties.district())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Districts offered by the exclusion control: [`Self::distinct_districts`]
    /// narrowed to the selected zone.
    #[must_use]
    pub fn selectable_districts(&self, features: &[SpatialUnit]) -> Vec<String> {
        let mut districts = Self::distinct_districts(features);
        if let Some(zone) = self.selection.zone {
            districts.retain(|district| self.config.zones.contains(zone, district));
        }
        districts
    }

    /// Legend for the current display mode.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        legend_for(
            self.selection.display_mode,
            &self.config.palette,
            self.config.density_ramp,
        )
    }

    /// Counts over the cells visible under the current selection.
    #[must_use]
    pub fn summary(&self, features: &[SpatialUnit]) -> ViewSummary {
        let groups = &self.selection.age_groups;
        let visible = self.visible_features(features);

        let mut buckets: BTreeMap<Bucket, usize> =
            Bucket::all().iter().map(|bucket| (*bucket, 0)).collect();
        let mut districts = BTreeSet::new();
        let mut max = 0.0_f64;
        let mut total = 0.0;

        for unit in &visible {
            *buckets.entry(classify(unit, groups)).or_default() += 1;
            if let Some(district) = unit.properties.district() {
                districts.insert(district);
            }
            let value = aggregate(unit, groups);
            max = max.max(value);
            total += value;
        }

        ViewSummary {
            display_mode: self.selection.display_mode,
            zone: self.selection.zone,
            visible_features: visible.len(),
            visible_districts: districts.len(),
            buckets,
            max_value: max,
            total_value: total,
        }
    }

    fn includes(&self, unit: &SpatialUnit) -> bool {
        include(
            unit,
            self.selection.zone,
            &self.selection.excluded_districts,
            &self.config.zones,
        )
    }
}
