//! FITS reading and writing of pupil frames.
//!
//! Frames are single 2-D image HDUs. The metadata keys consumed by the
//! pipeline travel as header cards: `POSANG` (position angle), `ROTANG`
//! (rotator angle) and `INSPOS` (instrument position). Absent cards simply
//! leave the corresponding metadata field at its sentinel default.

use fitsio::compat::fitsfile::FitsFile;
use fitsio::compat::images::{ImageDescription, ImageType, ReadImage, WriteImage};
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

use crate::metadata::{MetaKey, MetadataPatch};
use crate::record::PupilRecord;

/// Header card holding the position angle in degrees.
pub const KEY_POSITION_ANGLE: &str = "POSANG";
/// Header card holding the rotator angle in degrees.
pub const KEY_ROTATOR_ANGLE: &str = "ROTANG";
/// Header card holding the instrument-position key.
pub const KEY_INSTRUMENT_POSITION: &str = "INSPOS";

/// Errors from the FITS layer. Never retried here; any retry policy belongs
/// to the caller.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("FITS I/O error: {0}")]
    Fits(#[from] fitsio::compat::errors::Error),
    #[error("no two-dimensional image HDU in '{0}'")]
    NoImage(String),
    #[error("cannot reshape image data from '{0}'")]
    BadShape(String),
}

/// Read the first 2-D image HDU of a FITS file as `f64` pixel data, along
/// with the metadata header cards it carries.
pub fn read_pupil_frame<P: AsRef<Path>>(
    path: P,
) -> Result<(Array2<f64>, MetadataPatch), FrameError> {
    let display = path.as_ref().display().to_string();
    let fptr = FitsFile::open(&path)?;

    let mut hdu_idx = 0;
    while let Ok(hdu) = fptr.hdu(hdu_idx) {
        let naxis = hdu.read_key::<i64>(&fptr, "NAXIS").unwrap_or(0);
        if naxis == 2 {
            let naxis1 = hdu.read_key::<i64>(&fptr, "NAXIS1").unwrap_or(0) as usize;
            let naxis2 = hdu.read_key::<i64>(&fptr, "NAXIS2").unwrap_or(0) as usize;

            let data = f64::read_image(&fptr, &hdu)?;
            let image = Array2::from_shape_vec((naxis2, naxis1), data)
                .map_err(|_| FrameError::BadShape(display.clone()))?;

            let header = MetadataPatch {
                position_angle: hdu.read_key::<f64>(&fptr, KEY_POSITION_ANGLE).ok(),
                rotator_angle: hdu.read_key::<f64>(&fptr, KEY_ROTATOR_ANGLE).ok(),
                instrument_position: hdu.read_key::<i64>(&fptr, KEY_INSTRUMENT_POSITION).ok(),
            };
            return Ok((image, header));
        }
        hdu_idx += 1;
    }

    Err(FrameError::NoImage(display))
}

/// Write a record's image and metadata cards to a FITS file, overwriting any
/// existing file at the path.
///
/// Angles still at their unset sentinel are not written; the absent card
/// restores the sentinel on read, so a round trip never turns "unknown" into
/// a measured angle.
pub fn write_pupil_frame<P: AsRef<Path>>(path: P, record: &PupilRecord) -> Result<(), FrameError> {
    let mut fptr = FitsFile::create(&path).overwrite().open()?;

    let (height, width) = record.image().dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: vec![width, height],
    };

    let hdu = fptr.create_image("PUPIL", &description)?;
    let flat: Vec<f64> = record.image().iter().copied().collect();
    f64::write_image(&mut fptr, &hdu, &flat)?;

    let metadata = record.metadata();
    if metadata.require(MetaKey::PositionAngle).is_ok() {
        hdu.write_key(&mut fptr, KEY_POSITION_ANGLE, &metadata.position_angle)?;
    }
    if metadata.require(MetaKey::RotatorAngle).is_ok() {
        hdu.write_key(&mut fptr, KEY_ROTATOR_ANGLE, &metadata.rotator_angle)?;
    }
    hdu.write_key(
        &mut fptr,
        KEY_INSTRUMENT_POSITION,
        &metadata.instrument_position,
    )?;

    Ok(())
}
