//! Gi* significance classification.
//!
//! Maps a precomputed z-score / p-value pair to one of seven buckets using
//! the standard 90 / 95 / 99% confidence cut-offs. Missing or non-finite
//! inputs are never an error; they classify as [`Bucket::NotSignificant`].

use age_map_population_models::{AgeGroupSelection, SignificanceStat, SpatialUnit, StatField};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

const Z_99: f64 = 2.58;
const Z_95: f64 = 1.96;
const Z_90: f64 = 1.65;

const P_99: f64 = 0.01;
const P_95: f64 = 0.05;
const P_90: f64 = 0.10;

/// Hotspot / coldspot classification outcome.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Bucket {
    /// Hotspot at 99% confidence.
    #[serde(rename = "HOT_99")]
    #[strum(serialize = "HOT_99")]
    Hot99,
    /// Hotspot at 95% confidence.
    #[serde(rename = "HOT_95")]
    #[strum(serialize = "HOT_95")]
    Hot95,
    /// Hotspot at 90% confidence.
    #[serde(rename = "HOT_90")]
    #[strum(serialize = "HOT_90")]
    Hot90,
    /// No significant clustering.
    NotSignificant,
    /// Coldspot at 90% confidence.
    #[serde(rename = "COLD_90")]
    #[strum(serialize = "COLD_90")]
    Cold90,
    /// Coldspot at 95% confidence.
    #[serde(rename = "COLD_95")]
    #[strum(serialize = "COLD_95")]
    Cold95,
    /// Coldspot at 99% confidence.
    #[serde(rename = "COLD_99")]
    #[strum(serialize = "COLD_99")]
    Cold99,
}

impl Bucket {
    /// Order in which the map legend lists the buckets, coldest first.
    pub const LEGEND_ORDER: [Self; 7] = [
        Self::Cold99,
        Self::Cold95,
        Self::Cold90,
        Self::NotSignificant,
        Self::Hot90,
        Self::Hot95,
        Self::Hot99,
    ];

    /// Returns all variants of this enum, hottest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Hot99,
            Self::Hot95,
            Self::Hot90,
            Self::NotSignificant,
            Self::Cold90,
            Self::Cold95,
            Self::Cold99,
        ]
    }

    /// Legend label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hot99 => "Hotspot 99% Confidence",
            Self::Hot95 => "Hotspot 95% Confidence",
            Self::Hot90 => "Hotspot 90% Confidence",
            Self::NotSignificant => "Not Significant",
            Self::Cold90 => "Coldspot 90% Confidence",
            Self::Cold95 => "Coldspot 95% Confidence",
            Self::Cold99 => "Coldspot 99% Confidence",
        }
    }

    /// Whether this is any of the significant buckets.
    #[must_use]
    pub const fn is_significant(self) -> bool {
        !matches!(self, Self::NotSignificant)
    }
}

/// Classifies a single z / p pair. First matching rule wins.
#[must_use]
pub fn classify_stat(stat: SignificanceStat) -> Bucket {
    let (Some(z), Some(p)) = (stat.z_score, stat.p_value) else {
        return Bucket::NotSignificant;
    };

    // NaN fails every comparison below and falls through.
    if z >= Z_99 && p <= P_99 {
        Bucket::Hot99
    } else if (Z_95..Z_99).contains(&z) && p <= P_95 {
        Bucket::Hot95
    } else if (Z_90..Z_95).contains(&z) && p <= P_90 {
        Bucket::Hot90
    } else if z <= -Z_99 && p <= P_99 {
        Bucket::Cold99
    } else if z > -Z_99 && z <= -Z_95 && p <= P_95 {
        Bucket::Cold95
    } else if z > -Z_95 && z <= -Z_90 && p <= P_90 {
        Bucket::Cold90
    } else {
        Bucket::NotSignificant
    }
}

/// Classifies `unit` using the statistic that matches `selection`.
///
/// With exactly one age group selected that group's pair is used;
/// otherwise the total-population pair is.
#[must_use]
pub fn classify(unit: &SpatialUnit, selection: &AgeGroupSelection) -> Bucket {
    let field = StatField::for_selection(selection);
    classify_stat(unit.properties.stat(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use age_map_population_models::{AgeGroup, HexProperties};

    fn unit_with_total(z: Option<f64>, p: Option<f64>) -> SpatialUnit {
        SpatialUnit::new(HexProperties {
            z_score_total_population: z,
            p_value_total_population: p,
            ..HexProperties::default()
        })
    }

    fn bucket(z: f64, p: f64) -> Bucket {
        classify_stat(SignificanceStat::new(z, p))
    }

    /// Each rule written independently of the if/else chain.
    fn rules(z: f64, p: f64) -> [(Bucket, bool); 6] {
        [
            (Bucket::Hot99, z >= 2.58 && p <= 0.01),
            (Bucket::Hot95, (1.96..2.58).contains(&z) && p <= 0.05),
            (Bucket::Hot90, (1.65..1.96).contains(&z) && p <= 0.10),
            (Bucket::Cold99, z <= -2.58 && p <= 0.01),
            (Bucket::Cold95, -2.58 < z && z <= -1.96 && p <= 0.05),
            (Bucket::Cold90, -1.96 < z && z <= -1.65 && p <= 0.10),
        ]
    }

    #[test]
    fn reference_cases() {
        let all = AgeGroupSelection::all();
        assert_eq!(classify(&unit_with_total(Some(2.6), Some(0.01)), &all), Bucket::Hot99);
        assert_eq!(classify(&unit_with_total(Some(1.97), Some(0.02)), &all), Bucket::Hot95);
        assert_eq!(classify(&unit_with_total(Some(0.0), Some(1.0)), &all), Bucket::NotSignificant);
        assert_eq!(classify(&unit_with_total(None, Some(0.01)), &all), Bucket::NotSignificant);
        assert_eq!(classify(&unit_with_total(Some(3.0), None), &all), Bucket::NotSignificant);
    }

    #[test]
    fn boundaries_are_inclusive_where_documented() {
        assert_eq!(bucket(2.58, 0.01), Bucket::Hot99);
        assert_eq!(bucket(2.58, 0.02), Bucket::NotSignificant);
        assert_eq!(bucket(1.96, 0.05), Bucket::Hot95);
        assert_eq!(bucket(1.65, 0.10), Bucket::Hot90);
        assert_eq!(bucket(1.64, 0.01), Bucket::NotSignificant);
        assert_eq!(bucket(-2.58, 0.01), Bucket::Cold99);
        assert_eq!(bucket(-1.96, 0.05), Bucket::Cold95);
        assert_eq!(bucket(-1.65, 0.10), Bucket::Cold90);
        assert_eq!(bucket(-1.649, 0.001), Bucket::NotSignificant);
    }

    #[test]
    fn strong_z_with_weak_p_does_not_fall_into_a_lower_tier() {
        // z qualifies for 99% but p only for 95%: the 95% rule requires
        // z < 2.58, so the cell is not significant.
        assert_eq!(bucket(3.2, 0.03), Bucket::NotSignificant);
        assert_eq!(bucket(-3.2, 0.03), Bucket::NotSignificant);
    }

    #[test]
    fn non_finite_inputs_are_not_significant() {
        assert_eq!(bucket(f64::NAN, 0.001), Bucket::NotSignificant);
        assert_eq!(bucket(3.0, f64::NAN), Bucket::NotSignificant);
        assert_eq!(bucket(f64::NEG_INFINITY, f64::NAN), Bucket::NotSignificant);
    }

    #[test]
    fn rules_are_mutually_exclusive() {
        let p_values = [0.0, 0.001, 0.01, 0.011, 0.03, 0.05, 0.07, 0.1, 0.2, 0.5, 1.0];
        for step in -450..=450 {
            let z = f64::from(step) / 100.0;
            for p in p_values {
                let matched: Vec<Bucket> = rules(z, p)
                    .into_iter()
                    .filter_map(|(b, hit)| hit.then_some(b))
                    .collect();
                assert!(matched.len() <= 1, "z={z} p={p} matched {matched:?}");
                let expected = matched.first().copied().unwrap_or(Bucket::NotSignificant);
                assert_eq!(bucket(z, p), expected, "z={z} p={p}");
            }
        }
    }

    #[test]
    fn single_group_uses_its_own_pair() {
        let unit = SpatialUnit::new(HexProperties {
            z_score_age_15_24: Some(3.0),
            p_value_age_15_24: Some(0.001),
            z_score_total_population: Some(0.0),
            p_value_total_population: Some(0.9),
            ..HexProperties::default()
        });

        let only_youth = AgeGroupSelection::only(AgeGroup::Age15To24);
        assert_eq!(classify(&unit, &only_youth), Bucket::Hot99);
        assert_eq!(classify(&unit, &AgeGroupSelection::all()), Bucket::NotSignificant);
    }

    #[test]
    fn no_groups_selected_falls_back_to_total() {
        let unit = unit_with_total(Some(-2.7), Some(0.005));
        assert_eq!(classify(&unit, &AgeGroupSelection::none()), Bucket::Cold99);
    }

    #[test]
    fn legend_order_covers_every_bucket_once() {
        let mut sorted = Bucket::LEGEND_ORDER.to_vec();
        sorted.sort();
        assert_eq!(sorted, Bucket::all());
    }

    #[test]
    fn bucket_names() {
        assert_eq!(Bucket::NotSignificant.to_string(), "NOT_SIGNIFICANT");
        assert_eq!("HOT_99".parse::<Bucket>().unwrap(), Bucket::Hot99);
    }
}
