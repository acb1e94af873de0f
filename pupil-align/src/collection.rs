//! Ordered collections of pupil records.

use glob::glob;
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::ops::{Index, Range};

use crate::config::ConfigTable;
use crate::error::PupilError;
use crate::metadata::{MetaKey, MetaValue, MetadataPatch};
use crate::record::PupilRecord;

/// An ordered sequence of pupil records, insertion order preserved.
#[derive(Debug, Clone, Default)]
pub struct PupilSet {
    records: Vec<PupilRecord>,
}

impl PupilSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from existing records, keeping their order.
    pub fn from_records(records: Vec<PupilRecord>) -> Self {
        Self { records }
    }

    /// Load one record per FITS file matching a glob pattern.
    ///
    /// `defaults` is overlaid under each file's own metadata (file-derived
    /// values win on collision). Enumeration order is whatever the globber
    /// yields; callers needing determinism sort the result explicitly.
    pub fn from_pattern(pattern: &str, defaults: &MetadataPatch) -> Result<Self, PupilError> {
        let mut records = Vec::new();
        for entry in glob(pattern)? {
            let path = entry.map_err(|e| PupilError::Io(e.into_error()))?;
            records.push(PupilRecord::from_file(&path, defaults)?);
        }
        debug!("loaded {} pupil frames matching '{pattern}'", records.len());
        Ok(Self { records })
    }

    /// Append a record.
    pub fn push(&mut self, record: PupilRecord) {
        self.records.push(record);
    }

    /// Append every record from an iterator.
    pub fn extend<I: IntoIterator<Item = PupilRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PupilRecord> {
        self.records.iter()
    }

    /// A new set holding the records in `range`, order preserved.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            records: self.records[range].to_vec(),
        }
    }

    /// Partition into sub-sets keyed by exact equality of a metadata field.
    ///
    /// Relative order is preserved within each group. Groups with fewer than
    /// `min_group_size` members are dropped entirely.
    pub fn group_by(&self, key: MetaKey, min_group_size: usize) -> BTreeMap<MetaValue, PupilSet> {
        let mut groups: BTreeMap<MetaValue, PupilSet> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry(record.metadata().get(key))
                .or_default()
                .push(record.clone());
        }
        groups.retain(|_, group| group.len() >= min_group_size);
        groups
    }

    /// Partition by instrument position.
    pub fn by_position(&self) -> BTreeMap<MetaValue, PupilSet> {
        self.group_by(MetaKey::InstrumentPosition, 1)
    }

    /// Partition by position angle, keeping only repeated angles.
    pub fn by_position_angle(&self) -> BTreeMap<MetaValue, PupilSet> {
        self.group_by(MetaKey::PositionAngle, 2)
    }

    /// Partition by rotator angle, keeping only repeated angles.
    pub fn by_rotator_angle(&self) -> BTreeMap<MetaValue, PupilSet> {
        self.group_by(MetaKey::RotatorAngle, 2)
    }

    /// A new set stably sorted ascending by a metadata field.
    pub fn sorted_by(&self, key: MetaKey) -> Self {
        let mut records = self.records.clone();
        records.sort_by(|a, b| a.metadata().get(key).cmp(&b.metadata().get(key)));
        Self { records }
    }

    /// First record whose `(position_angle, rotator_angle)` exactly equals
    /// the given pair. Comparison is exact; callers pass the values they
    /// actually recorded.
    pub fn find(&self, position_angle: f64, rotator_angle: f64) -> Option<&PupilRecord> {
        self.records.iter().find(|record| {
            record.metadata().position_angle == position_angle
                && record.metadata().rotator_angle == rotator_angle
        })
    }

    /// Pupil centroid of every record, computed in parallel.
    ///
    /// Each record resolves and reads only its own image and parameters, so
    /// results come back per record: one record's failure (an empty mask, an
    /// unconfigured position) does not disturb its siblings.
    pub fn centers(&self, table: &ConfigTable) -> Vec<Result<(f64, f64), PupilError>> {
        self.records
            .par_iter()
            .map(|record| record.centroid(table))
            .collect()
    }
}

impl Index<usize> for PupilSet {
    type Output = PupilRecord;

    fn index(&self, index: usize) -> &PupilRecord {
        &self.records[index]
    }
}

impl FromIterator<PupilRecord> for PupilSet {
    fn from_iter<I: IntoIterator<Item = PupilRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PupilSet {
    type Item = PupilRecord;
    type IntoIter = std::vec::IntoIter<PupilRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a PupilSet {
    type Item = &'a PupilRecord;
    type IntoIter = std::slice::Iter<'a, PupilRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
