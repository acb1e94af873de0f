//! Pupil frame records with lazily resolved detection parameters.

use log::debug;
use ndarray::{Array2, ArrayView2};
use std::path::{Path, PathBuf};

use crate::centroid::centroid_from_mask;
use crate::config::ConfigTable;
use crate::error::PupilError;
use crate::io;
use crate::mask::compute_mask;
use crate::metadata::{MetadataPatch, PupilMetadata};
use crate::region::Region;
use crate::shift::shift_bilinear;

/// Fraction of the detection threshold used as the synthesized background.
/// Keeps the background safely below the threshold so a synthesized frame
/// never re-triggers detection outside the pupil.
const BACKGROUND_THRESHOLD_FRACTION: f64 = 0.95;

/// A single pupil frame with its metadata and optional parameter overrides.
///
/// The effective threshold and region are resolved lazily on every read:
/// an explicit override wins, otherwise the station table supplies the
/// default for the record's instrument position. Nothing is memoized, so
/// setting an override after a previous mask or centroid computation simply
/// changes what the next computation sees.
#[derive(Debug, Clone)]
pub struct PupilRecord {
    image: Array2<f64>,
    metadata: PupilMetadata,
    threshold_override: Option<f64>,
    region_override: Option<Region>,
    source: Option<PathBuf>,
}

impl PupilRecord {
    /// Create a record from raw image data and metadata.
    pub fn new(image: Array2<f64>, metadata: PupilMetadata) -> Self {
        Self {
            image,
            metadata,
            threshold_override: None,
            region_override: None,
            source: None,
        }
    }

    /// Load a record from a FITS file, overlaying `defaults` under the
    /// metadata found in the file (file-derived values win on collision).
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        defaults: &MetadataPatch,
    ) -> Result<Self, PupilError> {
        let (image, header) = io::read_pupil_frame(&path)?;
        let metadata = PupilMetadata::from_patches(&[defaults, &header]);
        Ok(Self {
            image,
            metadata,
            threshold_override: None,
            region_override: None,
            source: Some(path.as_ref().to_path_buf()),
        })
    }

    /// The pixel data, rows = Y and columns = X.
    pub fn image(&self) -> ArrayView2<f64> {
        self.image.view()
    }

    /// The frame metadata.
    pub fn metadata(&self) -> &PupilMetadata {
        &self.metadata
    }

    /// Path this record was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Override the detection threshold for this record.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold_override = Some(threshold);
    }

    /// Override the pupil search region for this record.
    pub fn set_region(&mut self, region: Region) {
        self.region_override = Some(region);
    }

    /// Drop both overrides, returning to station-table resolution.
    pub fn clear_overrides(&mut self) {
        self.threshold_override = None;
        self.region_override = None;
    }

    /// Effective detection threshold: override first, else the station table
    /// entry for this record's instrument position.
    pub fn threshold(&self, table: &ConfigTable) -> Result<f64, PupilError> {
        match self.threshold_override {
            Some(threshold) => Ok(threshold),
            None => Ok(table.lookup(self.metadata.instrument_position)?.threshold),
        }
    }

    /// Effective pupil search region, resolved like [`Self::threshold`].
    pub fn region(&self, table: &ConfigTable) -> Result<Region, PupilError> {
        match self.region_override {
            Some(region) => Ok(region),
            None => Ok(table.lookup(self.metadata.instrument_position)?.region),
        }
    }

    /// Detection mask for the current image, threshold and region.
    ///
    /// Recomputed on every call; never cached.
    pub fn mask(&self, table: &ConfigTable) -> Result<Array2<bool>, PupilError> {
        let threshold = self.threshold(table)?;
        let region = self.region(table)?;
        Ok(compute_mask(self.image.view(), threshold, &region))
    }

    /// Intensity-weighted pupil centroid `(x, y)`.
    pub fn centroid(&self, table: &ConfigTable) -> Result<(f64, f64), PupilError> {
        let mask = self.mask(table)?;
        centroid_from_mask(self.image.view(), mask.view())
    }

    /// Synthesize a comparison frame with the pupil moved to `target`.
    ///
    /// The source pupil is flattened to a uniform two-level image (masked
    /// pixels at `flux`, everything else at `background`) and translated by
    /// the sub-pixel displacement from the current centroid to `target`.
    /// Samples shifted in from outside the frame read `background`.
    ///
    /// `background` defaults to 0.95x the effective threshold; `flux`
    /// defaults to the mean intensity of the masked pixels of the source
    /// image, computed before any shifting.
    ///
    /// The result is a new record with this record's metadata and no
    /// overrides; it re-resolves parameters through the station table unless
    /// the caller sets overrides afterward. The source record is untouched.
    pub fn synthesize(
        &self,
        table: &ConfigTable,
        target: (f64, f64),
        background: Option<f64>,
        flux: Option<f64>,
    ) -> Result<PupilRecord, PupilError> {
        let threshold = self.threshold(table)?;
        let region = self.region(table)?;
        let mask = compute_mask(self.image.view(), threshold, &region);
        let current = centroid_from_mask(self.image.view(), mask.view())?;

        let dx = target.0 - current.0;
        let dy = target.1 - current.1;

        let background = background.unwrap_or(threshold * BACKGROUND_THRESHOLD_FRACTION);
        let flux = match flux {
            Some(flux) => flux,
            None => {
                // Mean over the masked pixels; the mask is non-empty or the
                // centroid above would already have failed.
                let mut sum = 0.0;
                let mut count = 0usize;
                for ((row, col), &inside) in mask.indexed_iter() {
                    if inside {
                        sum += self.image[[row, col]];
                        count += 1;
                    }
                }
                sum / count as f64
            }
        };

        debug!(
            "synthesizing pupil in {region}: current ({:.3}, {:.3}) -> target \
             ({:.3}, {:.3}), displacement ({:.3}, {:.3}), flux {:.1}, background {:.1}",
            current.0, current.1, target.0, target.1, dx, dy, flux, background
        );

        let mut flat = Array2::from_elem(self.image.raw_dim(), background);
        for ((row, col), &inside) in mask.indexed_iter() {
            if inside {
                flat[[row, col]] = flux;
            }
        }

        let shifted = shift_bilinear(flat.view(), dx, dy, background);
        Ok(PupilRecord::new(shifted, self.metadata))
    }
}
