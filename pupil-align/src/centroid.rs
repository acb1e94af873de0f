//! Intensity-weighted centroid estimation from a pupil mask.

use ndarray::ArrayView2;

use crate::error::PupilError;

/// Compute the intensity-weighted centroid of the masked pixels.
///
/// The centroid is the first moment of the masked pixel coordinates, each
/// weighted by that pixel's intensity. Weighting by intensity (rather than a
/// plain geometric mean of coordinates) keeps sub-pixel accuracy when the
/// pupil edge is only partially illuminated; detection and synthesis both go
/// through this function, so the two passes stay consistent.
///
/// Returns `(x, y)` as floating-point values, never rounded to pixel indices.
///
/// # Errors
///
/// [`PupilError::EmptyMask`] if the mask selects no pixels or the selected
/// pixels carry no total intensity, and [`PupilError::ShapeMismatch`] if the
/// image and mask dimensions disagree.
pub fn centroid_from_mask(
    image: ArrayView2<f64>,
    mask: ArrayView2<bool>,
) -> Result<(f64, f64), PupilError> {
    if image.dim() != mask.dim() {
        return Err(PupilError::ShapeMismatch {
            image: image.dim(),
            mask: mask.dim(),
        });
    }

    let mut m00 = 0.0;
    let mut m10 = 0.0;
    let mut m01 = 0.0;

    for ((row, col), &inside) in mask.indexed_iter() {
        if inside {
            let weight = image[[row, col]];
            m00 += weight;
            m10 += col as f64 * weight;
            m01 += row as f64 * weight;
        }
    }

    if m00.abs() < f64::EPSILON {
        return Err(PupilError::EmptyMask);
    }

    Ok((m10 / m00, m01 / m00))
}
