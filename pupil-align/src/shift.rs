//! Sub-pixel image translation by bilinear resampling.

use ndarray::{Array2, ArrayView2};

/// Translate an image by `(dx, dy)` pixels with bilinear interpolation.
///
/// Each output pixel `(x, y)` samples the input at `(x - dx, y - dy)`,
/// blending the four surrounding input pixels with standard bilinear
/// weights. Samples falling outside the input frame read `fill` (constant
/// boundary condition; no wraparound or reflection). Integer displacements
/// degenerate to an exact pixel copy.
pub fn shift_bilinear(image: ArrayView2<f64>, dx: f64, dy: f64, fill: f64) -> Array2<f64> {
    let (height, width) = image.dim();

    let at = |row: i64, col: i64| -> f64 {
        if row < 0 || col < 0 || row >= height as i64 || col >= width as i64 {
            fill
        } else {
            image[[row as usize, col as usize]]
        }
    };

    Array2::from_shape_fn((height, width), |(row, col)| {
        let sx = col as f64 - dx;
        let sy = row as f64 - dy;

        let x0 = sx.floor();
        let y0 = sy.floor();
        let tx = sx - x0;
        let ty = sy - y0;
        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let q11 = at(y0, x0);
        let q21 = at(y0, x0 + 1);
        let q12 = at(y0 + 1, x0);
        let q22 = at(y0 + 1, x0 + 1);

        q11 * (1.0 - tx) * (1.0 - ty)
            + q21 * tx * (1.0 - ty)
            + q12 * (1.0 - tx) * ty
            + q22 * tx * ty
    })
}
