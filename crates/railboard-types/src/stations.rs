use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// One entry in the rail station directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub code: String,
}

/// Static lookup table for `station_id` foreign keys. Loaded from the JSON
/// snapshot exported from the transit authority's station listing; no live
/// API calls happen here.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    by_code: BTreeMap<String, Station>,
}

impl StationDirectory {
    /// Parse a directory from the export format: `[{"name": .., "code": ..}]`.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let stations: Vec<Station> = serde_json::from_str(data)?;
        Ok(Self {
            by_code: stations
                .into_iter()
                .map(|s| (s.code.clone(), s))
                .collect(),
        })
    }

    /// The directory bundled with the crate.
    pub fn bundled() -> &'static StationDirectory {
        static BUNDLED: OnceLock<StationDirectory> = OnceLock::new();
        BUNDLED.get_or_init(|| {
            StationDirectory::from_json(include_str!("../data/stations.json"))
                .expect("bundled station data is valid JSON")
        })
    }

    pub fn get(&self, code: &str) -> Option<&Station> {
        self.by_code.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// All stations, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.by_code.values()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
