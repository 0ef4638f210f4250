//! Diffraction image storage in display orientation.

use ndarray::{Array2, Axis};

/// A single diffraction image in display orientation.
///
/// Axis 0 runs along the horizontal screen axis and axis 1 along the
/// vertical one, matching the poni coordinate convention. Decoded raster
/// data arrives in natural (row, column) order and is brought into this
/// orientation by a 270 degree counter-clockwise rotation at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Array2<f64>,
}

impl Frame {
    /// Wrap a freshly decoded (row, column) array, rotating it into
    /// display orientation.
    #[must_use]
    pub fn from_decoded(decoded: Array2<f64>) -> Self {
        Self {
            data: rot270(decoded),
        }
    }

    /// Wrap an array that is already in display orientation.
    #[must_use]
    pub fn from_oriented(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Horizontal extent in pixels.
    #[must_use]
    #[inline]
    pub fn x_size(&self) -> usize {
        self.data.nrows()
    }

    /// Vertical extent in pixels.
    #[must_use]
    #[inline]
    pub fn y_size(&self) -> usize {
        self.data.ncols()
    }

    /// Intensity at pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate lies outside the image.
    #[must_use]
    #[inline]
    pub fn intensity(&self, x: usize, y: usize) -> f64 {
        self.data[[x, y]]
    }

    /// Maximum intensity, floored at 1 so digit counting stays defined for
    /// empty or all-negative images.
    #[must_use]
    pub fn max_intensity(&self) -> f64 {
        self.data.iter().fold(1.0_f64, |acc, &v| acc.max(v))
    }

    /// True intensity extrema for display scaling, `(0.0, 0.0)` when the
    /// image has no pixels.
    #[must_use]
    pub fn intensity_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }

    /// Decimal digit count of the truncated maximum intensity, used as the
    /// intensity field width in the status line.
    #[must_use]
    pub fn intensity_digits(&self) -> usize {
        digit_count(self.max_intensity())
    }
}

/// Rotate 270 degrees counter-clockwise: `out[(i, j)] = in[(r - 1 - j, i)]`
/// for an input with `r` rows.
fn rot270(a: Array2<f64>) -> Array2<f64> {
    let mut rotated = a.reversed_axes();
    rotated.invert_axis(Axis(1));
    rotated.as_standard_layout().into_owned()
}

/// Number of decimal digits in `v.trunc()`, for `v >= 1`. Non-finite
/// values count as a single digit.
pub(crate) fn digit_count(v: f64) -> usize {
    if !v.is_finite() {
        return 1;
    }
    let mut digits = 1;
    let mut rest = v.trunc() / 10.0;
    while rest >= 1.0 {
        digits += 1;
        rest /= 10.0;
    }
    digits
}
