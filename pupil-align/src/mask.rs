//! Pupil mask detection by intensity thresholding within a bounding region.

use ndarray::{Array2, ArrayView2};

use crate::region::Region;

/// Compute the boolean pupil mask for an image.
///
/// A pixel at `(row = y, col = x)` is included iff its intensity is strictly
/// above `threshold` and `(x, y)` lies strictly inside `region` (pixels
/// exactly on a region edge are excluded). Pure function of its inputs;
/// region ordering is caller-guaranteed and not validated.
pub fn compute_mask(image: ArrayView2<f64>, threshold: f64, region: &Region) -> Array2<bool> {
    Array2::from_shape_fn(image.raw_dim(), |(row, col)| {
        image[[row, col]] > threshold && region.contains_interior(col as f64, row as f64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// 10x10 zero image with a 4x4 block of `value` at rows 3-6, cols 3-6.
    fn block_image(value: f64) -> Array2<f64> {
        let mut image = Array2::zeros((10, 10));
        for row in 3..=6 {
            for col in 3..=6 {
                image[[row, col]] = value;
            }
        }
        image
    }

    #[test]
    fn test_block_scenario() {
        let image = block_image(5000.0);
        let region = Region::from_corners((0.0, 0.0), (9.0, 9.0));

        let mask = compute_mask(image.view(), 1000.0, &region);

        assert_eq!(mask.iter().filter(|&&m| m).count(), 16);
        for row in 3..=6 {
            for col in 3..=6 {
                assert!(mask[[row, col]]);
            }
        }
        assert!(!mask[[2, 3]]);
        assert!(!mask[[3, 7]]);
    }

    #[test]
    fn test_region_edges_excluded_regardless_of_intensity() {
        let image = Array2::from_elem((10, 10), 5000.0);
        let region = Region::from_corners((3.0, 3.0), (6.0, 6.0));

        let mask = compute_mask(image.view(), 1000.0, &region);

        // Only the strict interior (4..=5 in both axes) survives.
        assert_eq!(mask.iter().filter(|&&m| m).count(), 4);
        for col in 3..=6 {
            assert!(!mask[[3, col]]);
            assert!(!mask[[6, col]]);
        }
        for row in 3..=6 {
            assert!(!mask[[row, 3]]);
            assert!(!mask[[row, 6]]);
        }
        assert!(mask[[4, 4]] && mask[[4, 5]] && mask[[5, 4]] && mask[[5, 5]]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let image = block_image(1000.0);
        let region = Region::from_corners((0.0, 0.0), (9.0, 9.0));

        // Pixels exactly at the threshold are excluded.
        let mask = compute_mask(image.view(), 1000.0, &region);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 0);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let mut image = block_image(5000.0);
        image[[4, 4]] = 1200.0;
        image[[5, 5]] = 3000.0;
        let region = Region::from_corners((0.0, 0.0), (9.0, 9.0));

        let mut previous = usize::MAX;
        for threshold in [500.0, 1000.0, 1500.0, 2500.0, 4000.0, 6000.0] {
            let count = compute_mask(image.view(), threshold, &region)
                .iter()
                .filter(|&&m| m)
                .count();
            assert!(count <= previous, "raising threshold grew the mask");
            previous = count;
        }
    }

    #[test]
    fn test_determinism() {
        let image = block_image(5000.0);
        let region = Region::from_corners((1.0, 2.0), (8.0, 7.0));

        let first = compute_mask(image.view(), 1000.0, &region);
        let second = compute_mask(image.view(), 1000.0, &region);
        assert_eq!(first, second);
    }
}
