//! Station configuration: default detection parameters per instrument position.
//!
//! Each instrument position has a default intensity threshold and pupil
//! search region. The table is an explicit value passed to resolution calls,
//! not hidden global state; [`ConfigTable::builtin`] offers the shipped
//! defaults for convenience.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::PupilError;
use crate::region::Region;

/// Detection parameters for one instrument position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationParams {
    /// Intensity cutoff separating pupil from background
    pub threshold: f64,
    /// Bounding region the pupil is expected to fall inside
    pub region: Region,
}

/// Lookup table mapping instrument-position keys to default parameters.
///
/// A missing key is an error surfaced to the caller; the table never falls
/// back to another entry on its own. Position 0 is the conventional entry
/// for frames whose position could not be resolved, and callers that want
/// that behavior store it explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigTable {
    entries: BTreeMap<i64, StationParams>,
}

static BUILTIN: Lazy<ConfigTable> = Lazy::new(|| {
    let mut table = ConfigTable::new();
    table.insert(
        0,
        StationParams {
            threshold: 1550.0,
            region: Region::from_corners((380.0, 404.0), (682.0, 670.0)),
        },
    );
    table.insert(
        1,
        StationParams {
            threshold: 1550.0,
            region: Region::from_corners((367.0, 404.0), (682.0, 670.0)),
        },
    );
    table.insert(
        2,
        StationParams {
            threshold: 1550.0,
            region: Region::from_corners((367.0, 350.0), (682.0, 700.0)),
        },
    );
    table.insert(
        3,
        StationParams {
            threshold: 2050.0,
            region: Region::from_corners((380.0, 345.0), (720.0, 632.0)),
        },
    );
    table.insert(
        4,
        StationParams {
            threshold: 2100.0,
            region: Region::from_corners((413.0, 250.0), (682.0, 511.0)),
        },
    );
    table
});

impl ConfigTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped per-position defaults, including the position-0 fallback
    /// entry used for unresolvable frames.
    pub fn builtin() -> &'static ConfigTable {
        &BUILTIN
    }

    /// Insert or replace the parameters for an instrument position.
    pub fn insert(&mut self, position: i64, params: StationParams) {
        self.entries.insert(position, params);
    }

    /// Look up the parameters for an instrument position.
    pub fn lookup(&self, position: i64) -> Result<&StationParams, PupilError> {
        self.entries
            .get(&position)
            .ok_or(PupilError::UnresolvedConfig { position })
    }

    /// Number of configured positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no positions are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a table from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PupilError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the table to a JSON file.
    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PupilError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
