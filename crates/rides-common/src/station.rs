//! Station registry.
//!
//! Maps the opaque station identifiers used in request paths to the
//! bounding box that defines each station. The table is loaded once at
//! startup and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::bbox::BoundingBox;
use crate::error::{RidesError, RidesResult};

/// Station file contents: station id -> bounding box.
///
/// ```yaml
/// "3005":
///   latitude_range: { min: 34.0484, max: 34.0486 }
///   longitude_range: { min: -118.2588, max: -118.2586 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationTable {
    stations: BTreeMap<String, BoundingBox>,
}

impl StationTable {
    /// Build a table from (id, box) pairs, validating every box.
    pub fn from_entries<I, S>(entries: I) -> RidesResult<Self>
    where
        I: IntoIterator<Item = (S, BoundingBox)>,
        S: Into<String>,
    {
        let table = Self {
            stations: entries
                .into_iter()
                .map(|(id, bbox)| (id.into(), bbox))
                .collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Parse a station table from YAML (JSON is accepted too).
    pub fn from_yaml_str(content: &str) -> RidesResult<Self> {
        let table: StationTable = serde_yaml::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a station table from a file.
    pub fn load(path: impl AsRef<Path>) -> RidesResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RidesError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> RidesResult<()> {
        for (id, bbox) in &self.stations {
            bbox.validate()
                .map_err(|e| RidesError::Config(format!("Station {}: {}", id, e)))?;
        }
        Ok(())
    }

    /// Resolve a station id to its bounding box.
    pub fn resolve(&self, station_id: &str) -> RidesResult<BoundingBox> {
        self.stations
            .get(station_id)
            .copied()
            .ok_or_else(|| RidesError::StationNotFound(station_id.to_string()))
    }

    /// Resolve a start and an end station; both must exist.
    pub fn resolve_pair(&self, start: &str, end: &str) -> RidesResult<(BoundingBox, BoundingBox)> {
        let start_box = self.resolve(start);
        let end_box = self.resolve(end);
        Ok((start_box?, end_box?))
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.stations.contains_key(station_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
