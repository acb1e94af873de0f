//! Pupil alignment imaging for telescope calibration.
//!
//! This crate locates the bright pupil silhouette in a guide-camera frame by
//! intensity thresholding within a configured bounding region, reduces it to a
//! sub-pixel centroid, and synthesizes idealized comparison frames with the
//! pupil re-centered at a target location.
//!
//! The pipeline runs in three stages:
//!
//! 1. [`compute_mask`] classifies pixels as pupil/background from a threshold
//!    and a [`Region`] of interest.
//! 2. [`centroid_from_mask`] reduces the mask to an intensity-weighted
//!    `(x, y)` position.
//! 3. [`PupilRecord::synthesize`] builds a flattened two-level copy of the
//!    pupil and translates it to a target centroid with sub-pixel accuracy.
//!
//! Detection parameters default per instrument position via a [`ConfigTable`]
//! and can be overridden per record. Collections of frames are handled by
//! [`PupilSet`], which supports metadata grouping, sorting and glob loading.

pub mod centroid;
pub mod collection;
pub mod config;
pub mod error;
pub mod io;
pub mod mask;
pub mod metadata;
pub mod record;
pub mod region;
pub mod shift;

pub use centroid::centroid_from_mask;
pub use collection::PupilSet;
pub use config::{ConfigTable, StationParams};
pub use error::PupilError;
pub use mask::compute_mask;
pub use metadata::{MetaKey, MetaValue, MetadataPatch, PupilMetadata, UNSET_ANGLE};
pub use record::PupilRecord;
pub use region::Region;
pub use shift::shift_bilinear;
