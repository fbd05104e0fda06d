//! Zone to district membership table.
//!
//! The production table is embedded from `zones/bangkok.toml` at compile
//! time, following the same pattern as other compile-time registries. Tests
//! and alternative deployments can build their own table with
//! [`ZoneTable::from_toml`] or [`ZoneTable::new`].

use std::collections::{BTreeMap, BTreeSet};

use age_map_population_models::Zone;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BANGKOK_TOML: &str = include_str!("../zones/bangkok.toml");

/// Fixed district membership for each [`Zone`].
///
/// Invariant: the three sets are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTable {
    inner: BTreeSet<String>,
    middle: BTreeSet<String>,
    outer: BTreeSet<String>,
}

impl ZoneTable {
    /// Builds a table from explicit district lists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OverlappingZones`] if any district appears in
    /// more than one zone.
    pub fn new<I, S>(inner: I, middle: I, outer: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = Self {
            inner: inner.into_iter().map(Into::into).collect(),
            middle: middle.into_iter().map(Into::into).collect(),
            outer: outer.into_iter().map(Into::into).collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Parses a table from TOML with `inner`, `middle`, and `outer` arrays.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or the zones overlap.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let table: Self = toml::de::from_str(toml_str)?;
        table.validate()?;
        Ok(table)
    }

    /// The embedded Bangkok inner / middle / outer table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse or validate. Since it is a
    /// compile-time constant, a failure is a development error caught by the
    /// tests below.
    #[must_use]
    pub fn bangkok() -> Self {
        Self::from_toml(BANGKOK_TOML)
            .unwrap_or_else(|e| panic!("Failed to load embedded zone table bangkok.toml: {e}"))
    }

    /// Districts belonging to `zone`.
    #[must_use]
    pub const fn districts(&self, zone: Zone) -> &BTreeSet<String> {
        match zone {
            Zone::Inner => &self.inner,
            Zone::Middle => &self.middle,
            Zone::Outer => &self.outer,
        }
    }

    /// Returns whether `district` belongs to `zone`.
    #[must_use]
    pub fn contains(&self, zone: Zone, district: &str) -> bool {
        self.districts(zone).contains(district)
    }

    /// Returns the zone `district` belongs to, if any.
    #[must_use]
    pub fn zone_of(&self, district: &str) -> Option<Zone> {
        Zone::all()
            .iter()
            .copied()
            .find(|zone| self.contains(*zone, district))
    }

    /// Iterates `(zone, districts)` pairs, innermost first.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, &BTreeSet<String>)> {
        Zone::all().iter().map(|zone| (*zone, self.districts(*zone)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: BTreeMap<&str, Zone> = BTreeMap::new();
        for (zone, districts) in self.iter() {
            for district in districts {
                if let Some(first) = seen.insert(district, zone) {
                    return Err(ConfigError::OverlappingZones {
                        district: district.clone(),
                        first,
                        second: zone,
                    });
                }
            }
        }
        log::trace!("Zone table validated with {} districts", seen.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_bangkok_table() {
        let table = ZoneTable::bangkok();
        assert_eq!(table.districts(Zone::Inner).len(), 12);
        assert_eq!(table.districts(Zone::Middle).len(), 12);
        assert_eq!(table.districts(Zone::Outer).len(), 21);
    }

    #[test]
    fn bangkok_zones_are_disjoint() {
        let table = ZoneTable::bangkok();
        let mut all = BTreeSet::new();
        for (_, districts) in table.iter() {
            for district in districts {
                assert!(all.insert(district), "{district} listed twice");
            }
        }
        assert_eq!(all.len(), 45);
    }

    #[test]
    fn zone_lookup() {
        let table = ZoneTable::bangkok();
        assert_eq!(table.zone_of("เขตบางรัก"), Some(Zone::Inner));
        assert_eq!(table.zone_of("เขตจตุจักร"), Some(Zone::Middle));
        assert_eq!(table.zone_of("เขตภาษีเจริญ"), Some(Zone::Outer));
        assert_eq!(table.zone_of("เขตราชเทวี"), None);
    }

    #[test]
    fn rejects_overlapping_zones() {
        let err = ZoneTable::new(vec!["A", "B"], vec!["C"], vec!["B"]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OverlappingZones {
                ref district,
                first: Zone::Inner,
                second: Zone::Outer,
            } if district == "B"
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            ZoneTable::from_toml("inner = 3"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_zone_lists_are_rejected() {
        assert!(ZoneTable::from_toml("inner = [\"A\"]").is_err());
    }
}
