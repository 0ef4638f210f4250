//! Error types for poniview-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for poniview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading images or calibration files.
#[derive(Error, Debug)]
pub enum Error {
    /// File extension not present in the image format registry.
    #[error("unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// File could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Raster codec rejected the file contents.
    #[error("image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Malformed npy payload or unsupported dtype.
    #[error("npy decode error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),

    /// Array file that does not hold a single 2-D image.
    #[error("{}: expected a 2-D array, got {ndim} dimensions", .path.display())]
    NotAnImage { path: PathBuf, ndim: usize },

    /// Malformed or incomplete poni calibration file.
    #[error("cannot parse poni file {}: {reason}", .path.display())]
    CalibrationParse { path: PathBuf, reason: String },
}
