//! Colors for the two display modes.
//!
//! Significance mode uses a fixed seven-entry diverging [`Palette`] keyed by
//! [`Bucket`]. Density mode samples a continuous [`ColorRamp`] at the cell
//! value normalized by the maximum over the currently visible cells.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ConfigError;
use crate::classify::Bucket;

/// An sRGB color, written as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation in sRGB space, `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |a: u8, b: u8| -> u8 {
            let (a, b) = (f64::from(a), f64::from(b));
            (b - a).mul_add(t, a).round().clamp(0.0, 255.0) as u8
        };
        Self::rgb(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor {
            value: s.to_string(),
        };
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One color per Gi* [`Bucket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub hot_99: Color,
    pub hot_95: Color,
    pub hot_90: Color,
    pub not_significant: Color,
    pub cold_90: Color,
    pub cold_95: Color,
    pub cold_99: Color,
}

impl Default for Palette {
    /// Red hotspots, white for not significant, blue coldspots.
    fn default() -> Self {
        Self {
            hot_99: Color::rgb(0x80, 0x00, 0x26),
            hot_95: Color::rgb(0xfc, 0x4e, 0x2a),
            hot_90: Color::rgb(0xfe, 0xb2, 0x4c),
            not_significant: Color::WHITE,
            cold_90: Color::rgb(0x6b, 0xae, 0xd6),
            cold_95: Color::rgb(0x21, 0x71, 0xb5),
            cold_99: Color::rgb(0x08, 0x30, 0x6b),
        }
    }
}

impl Palette {
    /// The fill color for `bucket`.
    #[must_use]
    pub const fn color_for(&self, bucket: Bucket) -> Color {
        match bucket {
            Bucket::Hot99 => self.hot_99,
            Bucket::Hot95 => self.hot_95,
            Bucket::Hot90 => self.hot_90,
            Bucket::NotSignificant => self.not_significant,
            Bucket::Cold90 => self.cold_90,
            Bucket::Cold95 => self.cold_95,
            Bucket::Cold99 => self.cold_99,
        }
    }
}

/// A continuous color ramp defined by evenly spaced control points over
/// `[0, 1]`, interpolated linearly in sRGB.
#[derive(Debug, PartialEq, Eq)]
pub struct ColorRamp {
    name: &'static str,
    stops: &'static [Color],
}

impl ColorRamp {
    /// Creates a ramp. `stops` must not be empty.
    #[must_use]
    pub const fn new(name: &'static str, stops: &'static [Color]) -> Self {
        Self { name, stops }
    }

    /// Ramp name, e.g. `"viridis"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Samples the ramp at `t`, clamped to `[0, 1]`. NaN samples as 0.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.stops {
            [] => Color::WHITE,
            [only] => *only,
            stops => {
                let n = stops.len();
                let scaled = t * (n - 1) as f64;
                let lo = (scaled as usize).min(n - 2);
                stops[lo].lerp(stops[lo + 1], scaled - lo as f64)
            }
        }
    }
}

/// Viridis, sampled from the matplotlib original at eleven evenly spaced
/// points. Perceptually uniform and colorblind-safe.
pub static VIRIDIS: ColorRamp = ColorRamp::new(
    "viridis",
    &[
        Color::rgb(0x44, 0x01, 0x54), // 0.0 dark purple
        Color::rgb(0x48, 0x24, 0x75),
        Color::rgb(0x41, 0x44, 0x87),
        Color::rgb(0x35, 0x5f, 0x8d),
        Color::rgb(0x2a, 0x78, 0x8e),
        Color::rgb(0x21, 0x91, 0x8c), // 0.5 teal
        Color::rgb(0x22, 0xa8, 0x84),
        Color::rgb(0x44, 0xbf, 0x70),
        Color::rgb(0x7a, 0xd1, 0x51),
        Color::rgb(0xbd, 0xdf, 0x26),
        Color::rgb(0xfd, 0xe7, 0x25), // 1.0 yellow
    ],
);

/// Normalizes `value` by the largest of `all_values`.
///
/// Returns 0 when the maximum is 0 (or there are no finite values), and
/// clamps the result to `[0, 1]`.
#[must_use]
pub fn normalize(value: f64, all_values: &[f64]) -> f64 {
    normalize_to_max(value, max_value(all_values))
}

/// Same as [`normalize`] with the maximum already computed.
#[must_use]
pub fn normalize_to_max(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() || !value.is_finite() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

/// Largest finite value in `values`, or 0 when there is none.
#[must_use]
pub fn max_value(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// The density-mode fill for `value` among the currently visible values.
///
/// The scale is relative to the visible set, so the same cell changes color
/// as filters change.
#[must_use]
pub fn color_for_density(value: f64, all_values: &[f64], ramp: &ColorRamp) -> Color {
    ramp.sample(normalize(value, all_values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_literals() {
        let palette = Palette::default();
        let hex: Vec<String> = Bucket::all()
            .iter()
            .map(|b| palette.color_for(*b).to_string())
            .collect();
        assert_eq!(
            hex,
            [
                "#800026", "#fc4e2a", "#feb24c", "#ffffff", "#6baed6", "#2171b5", "#08306b"
            ]
        );
    }

    #[test]
    fn parses_hex_literals() {
        assert_eq!("#fc4e2a".parse::<Color>().unwrap(), Color::rgb(0xfc, 0x4e, 0x2a));
        assert_eq!("#FC4E2A".parse::<Color>().unwrap(), Color::rgb(0xfc, 0x4e, 0x2a));
        assert!("fc4e2a".parse::<Color>().is_err());
        assert!("#fc4e2".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
        assert!("#ไทย".parse::<Color>().is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_value(Color::rgb(8, 48, 107)).unwrap();
        assert_eq!(json, serde_json::json!("#08306b"));
        let back: Color = serde_json::from_value(json).unwrap();
        assert_eq!(back, Color::rgb(8, 48, 107));
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(VIRIDIS.sample(0.0).to_string(), "#440154");
        assert_eq!(VIRIDIS.sample(0.5).to_string(), "#21918c");
        assert_eq!(VIRIDIS.sample(1.0).to_string(), "#fde725");
        assert_eq!(VIRIDIS.sample(-3.0), VIRIDIS.sample(0.0));
        assert_eq!(VIRIDIS.sample(7.0), VIRIDIS.sample(1.0));
        assert_eq!(VIRIDIS.sample(f64::NAN), VIRIDIS.sample(0.0));
    }

    #[test]
    fn sampling_between_stops_interpolates() {
        let mid = VIRIDIS.sample(0.05);
        assert_eq!(mid, Color::rgb(0x46, 0x13, 0x65));
    }

    #[test]
    fn lone_value_is_its_own_max() {
        for v in [1.0, 37.5, 12_000.0] {
            assert_eq!(color_for_density(v, &[v], &VIRIDIS), VIRIDIS.sample(1.0));
        }
    }

    #[test]
    fn zero_max_normalizes_to_zero() {
        assert!(normalize(0.0, &[0.0, 0.0, 0.0]).abs() < f64::EPSILON);
        assert_eq!(
            color_for_density(0.0, &[0.0, 0.0, 0.0], &VIRIDIS),
            VIRIDIS.sample(0.0)
        );
        assert!(normalize(5.0, &[]).abs() < f64::EPSILON);
    }

    #[test]
    fn normalization_is_relative_to_the_visible_max() {
        assert!((normalize(50.0, &[50.0, 100.0]) - 0.5).abs() < f64::EPSILON);
        assert!((normalize(50.0, &[50.0, 200.0]) - 0.25).abs() < f64::EPSILON);
        assert!((normalize(50.0, &[50.0, f64::NAN, 100.0]) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn density_color_is_monotonic() {
        let values: Vec<f64> = (0..=40).map(f64::from).collect();
        let positions: Vec<f64> = values.iter().map(|v| normalize(*v, &values)).collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            color_for_density(40.0, &values, &VIRIDIS),
            VIRIDIS.sample(1.0)
        );
    }
}
