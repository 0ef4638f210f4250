//! Image format registry and decoders.
//!
//! The registry maps file extensions to decoder families and is the single
//! authority used both for drop classification and for dispatch inside
//! image loading. Decoders return arrays in natural (row, column) order;
//! orientation is applied by [`crate::frame::Frame`].

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use ndarray::{Array2, ArrayD, Ix2};
use ndarray_npy::ReadNpyExt;

use crate::error::{Error, Result};

/// Decoder family for a supported image extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// NumPy `.npy` raw array.
    Npy,
    /// Raster formats handled by the `image` crate.
    Raster,
}

/// Supported image extensions, lowercase.
pub const IMAGE_EXTENSIONS: [&str; 9] = [
    "npy", "tif", "tiff", "bmp", "eps", "gif", "jpeg", "jpg", "png",
];

/// Extension of poni calibration files.
pub const PONI_EXTENSION: &str = "poni";

impl ImageKind {
    /// Look up the decoder for a path by extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match lowercase_extension(path)?.as_str() {
            "npy" => Some(Self::Npy),
            "tif" | "tiff" | "bmp" | "eps" | "gif" | "jpeg" | "jpg" | "png" => Some(Self::Raster),
            _ => None,
        }
    }
}

/// Whether the path carries a supported image extension.
#[must_use]
pub fn is_image(path: &Path) -> bool {
    ImageKind::from_path(path).is_some()
}

/// Whether the path carries the poni calibration extension.
#[must_use]
pub fn is_poni(path: &Path) -> bool {
    lowercase_extension(path).as_deref() == Some(PONI_EXTENSION)
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Decode an image file into a 2-D intensity array in (row, column) order.
///
/// Multi-channel rasters collapse to one value per pixel by summing across
/// all channels, alpha included.
pub fn decode(path: &Path) -> Result<Array2<f64>> {
    match ImageKind::from_path(path) {
        Some(ImageKind::Npy) => decode_npy(path),
        Some(ImageKind::Raster) => decode_raster(path),
        None => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

fn decode_npy(path: &Path) -> Result<Array2<f64>> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let array = read_npy_any(&bytes)?;
    let ndim = array.ndim();
    array.into_dimensionality::<Ix2>().map_err(|_| Error::NotAnImage {
        path: path.to_path_buf(),
        ndim,
    })
}

/// Read an npy payload of any commonly used dtype as `f64`.
///
/// Each attempt only parses the header before bailing out on a descriptor
/// mismatch, so the cascade is cheap.
#[allow(clippy::cast_precision_loss)]
fn read_npy_any(bytes: &[u8]) -> Result<ArrayD<f64>> {
    if let Ok(a) = ArrayD::<f64>::read_npy(Cursor::new(bytes)) {
        return Ok(a);
    }
    if let Ok(a) = ArrayD::<f32>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = ArrayD::<u8>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = ArrayD::<i8>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = ArrayD::<u16>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = ArrayD::<i16>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = ArrayD::<u32>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = ArrayD::<i32>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(f64::from));
    }
    if let Ok(a) = ArrayD::<u64>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(|v| v as f64));
    }
    if let Ok(a) = ArrayD::<i64>::read_npy(Cursor::new(bytes)) {
        return Ok(a.mapv(|v| v as f64));
    }
    // Report the descriptor mismatch from the widest float attempt
    ArrayD::<f64>::read_npy(Cursor::new(bytes))
        .map_err(Error::from)
}

fn decode_raster(path: &Path) -> Result<Array2<f64>> {
    let reader = image::ImageReader::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sum_channels(&reader.decode()?))
}

/// Collapse a decoded raster to one `f64` per pixel by summing channels.
///
/// 16-bit and float variants keep their dynamic range; only unknown
/// variants fall back through an RGBA8 conversion.
fn sum_channels(img: &DynamicImage) -> Array2<f64> {
    match img {
        DynamicImage::ImageLuma8(b) => collapse(b.width(), b.height(), 1, b.as_raw(), f64::from),
        DynamicImage::ImageLumaA8(b) => collapse(b.width(), b.height(), 2, b.as_raw(), f64::from),
        DynamicImage::ImageRgb8(b) => collapse(b.width(), b.height(), 3, b.as_raw(), f64::from),
        DynamicImage::ImageRgba8(b) => collapse(b.width(), b.height(), 4, b.as_raw(), f64::from),
        DynamicImage::ImageLuma16(b) => collapse(b.width(), b.height(), 1, b.as_raw(), f64::from),
        DynamicImage::ImageLumaA16(b) => collapse(b.width(), b.height(), 2, b.as_raw(), f64::from),
        DynamicImage::ImageRgb16(b) => collapse(b.width(), b.height(), 3, b.as_raw(), f64::from),
        DynamicImage::ImageRgba16(b) => collapse(b.width(), b.height(), 4, b.as_raw(), f64::from),
        DynamicImage::ImageRgb32F(b) => collapse(b.width(), b.height(), 3, b.as_raw(), f64::from),
        DynamicImage::ImageRgba32F(b) => collapse(b.width(), b.height(), 4, b.as_raw(), f64::from),
        other => {
            let b = other.to_rgba8();
            collapse(b.width(), b.height(), 4, b.as_raw(), f64::from)
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn collapse<T: Copy>(
    width: u32,
    height: u32,
    channels: usize,
    samples: &[T],
    to_f64: impl Fn(T) -> f64,
) -> Array2<f64> {
    let (w, h) = (width as usize, height as usize);
    let mut data = Array2::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let base = (row * w + col) * channels;
            let mut sum = 0.0;
            for offset in 0..channels {
                sum += to_f64(samples[base + offset]);
            }
            data[[row, col]] = sum;
        }
    }
    data
}
