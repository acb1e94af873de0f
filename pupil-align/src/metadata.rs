//! Frame metadata carried by each pupil record.
//!
//! Angles default to the [`UNSET_ANGLE`] sentinel and the instrument position
//! to 0 when a source does not supply them. Metadata merges layer in
//! precedence order: built-in sentinels, then caller-supplied defaults, then
//! file-derived values (file wins on collision).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::PupilError;

/// Sentinel for an angle no source has supplied.
pub const UNSET_ANGLE: f64 = -999.99;

/// Metadata attached to a single pupil frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PupilMetadata {
    /// Telescope position angle in degrees, [`UNSET_ANGLE`] when unknown
    pub position_angle: f64,
    /// Derotator angle in degrees, [`UNSET_ANGLE`] when unknown
    pub rotator_angle: f64,
    /// Instrument-position key selecting default detection parameters
    pub instrument_position: i64,
}

impl Default for PupilMetadata {
    fn default() -> Self {
        Self {
            position_angle: UNSET_ANGLE,
            rotator_angle: UNSET_ANGLE,
            instrument_position: 0,
        }
    }
}

/// Partial metadata used when merging values from several sources.
///
/// `None` fields leave the target untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataPatch {
    pub position_angle: Option<f64>,
    pub rotator_angle: Option<f64>,
    pub instrument_position: Option<i64>,
}

/// Metadata fields usable as grouping and sorting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    PositionAngle,
    RotatorAngle,
    InstrumentPosition,
}

impl MetaKey {
    fn name(self) -> &'static str {
        match self {
            MetaKey::PositionAngle => "position_angle",
            MetaKey::RotatorAngle => "rotator_angle",
            MetaKey::InstrumentPosition => "instrument_position",
        }
    }
}

/// A metadata value with a total order, usable as a map key.
///
/// Float comparison uses `f64::total_cmp`, so equality is exact at the bit
/// level. That matches the grouping and lookup contract: callers are expected
/// to compare values they actually recorded, not nearby ones.
#[derive(Debug, Clone, Copy)]
pub enum MetaValue {
    Float(f64),
    Int(i64),
}

impl PartialEq for MetaValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MetaValue {}

impl PartialOrd for MetaValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetaValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MetaValue::Float(a), MetaValue::Float(b)) => a.total_cmp(b),
            (MetaValue::Int(a), MetaValue::Int(b)) => a.cmp(b),
            // Mixed variants never occur for a single key; order ints first
            // so the comparison is still total.
            (MetaValue::Int(_), MetaValue::Float(_)) => Ordering::Less,
            (MetaValue::Float(_), MetaValue::Int(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Int(v) => write!(f, "{v}"),
        }
    }
}

impl PupilMetadata {
    /// Read the value of a metadata field.
    pub fn get(&self, key: MetaKey) -> MetaValue {
        match key {
            MetaKey::PositionAngle => MetaValue::Float(self.position_angle),
            MetaKey::RotatorAngle => MetaValue::Float(self.rotator_angle),
            MetaKey::InstrumentPosition => MetaValue::Int(self.instrument_position),
        }
    }

    /// Read a field, failing if an angle is still at its unset sentinel.
    ///
    /// The instrument position always resolves; its 0 default is a real key
    /// into the station table, not a sentinel.
    pub fn require(&self, key: MetaKey) -> Result<MetaValue, PupilError> {
        let value = self.get(key);
        if let MetaValue::Float(v) = value {
            if v == UNSET_ANGLE {
                return Err(PupilError::MissingMetadata { key: key.name() });
            }
        }
        Ok(value)
    }

    /// Overlay the fields a patch supplies onto this metadata.
    pub fn apply(&mut self, patch: &MetadataPatch) {
        if let Some(v) = patch.position_angle {
            self.position_angle = v;
        }
        if let Some(v) = patch.rotator_angle {
            self.rotator_angle = v;
        }
        if let Some(v) = patch.instrument_position {
            self.instrument_position = v;
        }
    }

    /// Build metadata from layered patches, later patches taking precedence.
    pub fn from_patches(patches: &[&MetadataPatch]) -> Self {
        let mut metadata = Self::default();
        for patch in patches {
            metadata.apply(patch);
        }
        metadata
    }
}
