#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Classification, aggregation, and filtering engine for the age map
//! dashboard.
//!
//! Turns raw per-hex statistical fields into render decisions: a Gi*
//! significance bucket or a density color per cell, the set of cells and
//! chart bars that survive the current zone / district filters, and the
//! legend and popup content that accompany them. Everything here is
//! synchronous and pure; [`dashboard::DashboardState`] is the only stateful
//! piece and is mutated exclusively through its own methods.

pub mod aggregate;
pub mod classify;
pub mod color;
pub mod dashboard;
pub mod filter;
pub mod legend;
pub mod popup;
pub mod style;
pub mod zones;

use thiserror::Error;

/// Errors raised while building dashboard configuration.
///
/// Nothing in the per-cell pipeline can fail; only loading the injected
/// configuration can.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The zone table TOML could not be parsed.
    #[error("Zone table parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A district was assigned to more than one zone.
    #[error("District '{district}' is listed in both the {first} and {second} zones")]
    OverlappingZones {
        /// The duplicated district name.
        district: String,
        /// Zone where the district was first seen.
        first: age_map_population_models::Zone,
        /// Zone where it was seen again.
        second: age_map_population_models::Zone,
    },

    /// A color literal was not of the form `#rrggbb`.
    #[error("Invalid color '{value}': expected #rrggbb")]
    InvalidColor {
        /// The rejected literal.
        value: String,
    },
}
