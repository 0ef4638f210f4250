//! Poni calibration files: parsing and scattering geometry.
//!
//! A poni file is the plain-text calibration format used around pyFAI:
//! `key: value` lines with `#` comments. Version 1 carries the pixel sizes
//! directly; version 2 moves them into a JSON `Detector_config` blob. Both
//! are accepted here. Distances are meters, angles radians.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// A parsed poni calibration.
///
/// `poni1`/`poni2` locate the point of normal incidence on the detector
/// surface; axis 1 runs along rows (slow axis), axis 2 along columns (fast
/// axis). `rot1`..`rot3` tilt the detector out of the orthogonal position.
#[derive(Debug, Clone, PartialEq)]
pub struct Poni {
    /// Sample-detector distance in meters.
    pub distance: f64,
    /// Point of normal incidence along the row axis, meters.
    pub poni1: f64,
    /// Point of normal incidence along the column axis, meters.
    pub poni2: f64,
    /// Detector rotation 1, radians.
    pub rot1: f64,
    /// Detector rotation 2, radians.
    pub rot2: f64,
    /// Detector rotation 3, radians.
    pub rot3: f64,
    /// Pixel pitch along the row axis, meters.
    pub pixel1: f64,
    /// Pixel pitch along the column axis, meters.
    pub pixel2: f64,
    /// Beam wavelength in meters.
    pub wavelength: f64,
}

/// Pixel sizes embedded in a version 2 `Detector_config` JSON object.
/// Unknown detector fields are ignored.
#[derive(Debug, Default, Deserialize)]
struct DetectorConfig {
    pixel1: Option<f64>,
    pixel2: Option<f64>,
}

impl Poni {
    /// Read and parse a poni file.
    ///
    /// Parsing is all-or-nothing: any problem surfaces as
    /// [`Error::CalibrationParse`] and nothing is produced.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|reason| Error::CalibrationParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse poni text, returning the failure reason so callers can attach
    /// the path.
    fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut distance = None;
        let mut poni1 = 0.0;
        let mut poni2 = 0.0;
        let mut rot1 = 0.0;
        let mut rot2 = 0.0;
        let mut rot3 = 0.0;
        let mut pixel1 = None;
        let mut pixel2 = None;
        let mut wavelength = None;
        let mut detector = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                return Err(format!("line {}: expected `key: value`", index + 1));
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();
            match key.as_str() {
                "detector" => detector = Some(value.to_string()),
                "detector_config" => {
                    let config: DetectorConfig = serde_json::from_str(value)
                        .map_err(|e| format!("line {}: bad detector config: {e}", index + 1))?;
                    pixel1 = config.pixel1.or(pixel1);
                    pixel2 = config.pixel2.or(pixel2);
                }
                "distance" | "dist" => distance = Some(parse_float(&key, value, index)?),
                "poni1" => poni1 = parse_float(&key, value, index)?,
                "poni2" => poni2 = parse_float(&key, value, index)?,
                "rot1" => rot1 = parse_float(&key, value, index)?,
                "rot2" => rot2 = parse_float(&key, value, index)?,
                "rot3" => rot3 = parse_float(&key, value, index)?,
                "pixelsize1" => pixel1 = Some(parse_float(&key, value, index)?),
                "pixelsize2" => pixel2 = Some(parse_float(&key, value, index)?),
                "wavelength" => wavelength = Some(parse_float(&key, value, index)?),
                // poni_version and any other keys pass through unvalidated,
                // like pyFAI itself treats unknown entries
                _ => {}
            }
        }

        let distance = distance.ok_or_else(|| "missing key: Distance".to_string())?;
        let wavelength = wavelength.ok_or_else(|| "missing key: Wavelength".to_string())?;
        let (pixel1, pixel2) = match (pixel1, pixel2) {
            (Some(p1), Some(p2)) => (p1, p2),
            _ => {
                let name = detector.as_deref().unwrap_or("unknown detector");
                return Err(format!(
                    "no pixel sizes for {name}; need PixelSize1/PixelSize2 or a Detector_config with pixel1/pixel2"
                ));
            }
        };

        Ok(Self {
            distance,
            poni1,
            poni2,
            rot1,
            rot2,
            rot3,
            pixel1,
            pixel2,
            wavelength,
        })
    }

    /// Scattering angle 2θ in radians for detector pixels given as parallel
    /// row and column slices.
    ///
    /// Pixel centers sit half a pixel past their index, per the poni
    /// convention.
    #[must_use]
    pub fn two_theta(&self, rows: &[f64], cols: &[f64]) -> Vec<f64> {
        debug_assert_eq!(rows.len(), cols.len());
        let (sin1, cos1) = self.rot1.sin_cos();
        let (sin2, cos2) = self.rot2.sin_cos();
        let (sin3, cos3) = self.rot3.sin_cos();
        rows.iter()
            .zip(cols)
            .map(|(&row, &col)| {
                let p1 = (row + 0.5) * self.pixel1 - self.poni1;
                let p2 = (col + 0.5) * self.pixel2 - self.poni2;
                let t1 = p1 * cos2 * cos3
                    + p2 * (cos3 * sin1 * sin2 - cos1 * sin3)
                    - self.distance * (cos1 * cos3 * sin2 + sin1 * sin3);
                let t2 = p1 * cos2 * sin3
                    + p2 * (cos1 * cos3 + sin1 * sin2 * sin3)
                    - self.distance * (-(cos3 * sin1) + cos1 * sin2 * sin3);
                let t3 = p1 * sin2 - p2 * cos2 * sin1 + self.distance * cos1 * cos2;
                t1.hypot(t2).atan2(t3)
            })
            .collect()
    }

    /// 2θ in radians for a single pixel.
    #[must_use]
    pub fn two_theta_pixel(&self, row: f64, col: f64) -> f64 {
        self.two_theta(&[row], &[col])[0]
    }
}

fn parse_float(key: &str, value: &str, index: usize) -> std::result::Result<f64, String> {
    value
        .parse()
        .map_err(|_| format!("line {}: bad number for {key}: {value}", index + 1))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use approx::assert_relative_eq;

    use super::*;

    const PONI_V1: &str = "\
# Calibration done Thu Mar 18 2021
poni_version: 1
Distance: 0.2
Poni1: 0.05
Poni2: 0.06
Rot1: 0.01
Rot2: -0.02
Rot3: 0.0
PixelSize1: 7.5e-05
PixelSize2: 7.5e-05
Wavelength: 1.03e-10
";

    const PONI_V2: &str = "\
# Nota: C-Order, 1 refers to the Y axis, 2 to the X axis
poni_version: 2
Detector: Detector
Detector_config: {\"pixel1\": 5e-05, \"pixel2\": 5.5e-05, \"max_shape\": [1024, 1024]}
Distance: 0.15
Poni1: 0.04
Poni2: 0.04
Rot1: 0.0
Rot2: 0.0
Rot3: 0.0
Wavelength: 7.2e-11
";

    fn zero_rotation_poni() -> Poni {
        Poni {
            distance: 1.0,
            poni1: 0.0,
            poni2: 0.0,
            rot1: 0.0,
            rot2: 0.0,
            rot3: 0.0,
            pixel1: 0.1,
            pixel2: 0.1,
            wavelength: 1e-10,
        }
    }

    #[test]
    fn test_parse_v1() {
        let poni = Poni::parse(PONI_V1).unwrap();
        assert_relative_eq!(poni.distance, 0.2);
        assert_relative_eq!(poni.poni1, 0.05);
        assert_relative_eq!(poni.poni2, 0.06);
        assert_relative_eq!(poni.rot1, 0.01);
        assert_relative_eq!(poni.rot2, -0.02);
        assert_relative_eq!(poni.rot3, 0.0);
        assert_relative_eq!(poni.pixel1, 7.5e-5);
        assert_relative_eq!(poni.pixel2, 7.5e-5);
        assert_relative_eq!(poni.wavelength, 1.03e-10);
    }

    #[test]
    fn test_parse_v2_detector_config() {
        let poni = Poni::parse(PONI_V2).unwrap();
        assert_relative_eq!(poni.pixel1, 5e-5);
        assert_relative_eq!(poni.pixel2, 5.5e-5);
        assert_relative_eq!(poni.distance, 0.15);
    }

    #[test]
    fn test_parse_defaults_rotations_to_zero() {
        let text = "Distance: 0.1\nPixelSize1: 1e-4\nPixelSize2: 1e-4\nWavelength: 1e-10\n";
        let poni = Poni::parse(text).unwrap();
        assert_relative_eq!(poni.poni1, 0.0);
        assert_relative_eq!(poni.rot1, 0.0);
        assert_relative_eq!(poni.rot2, 0.0);
        assert_relative_eq!(poni.rot3, 0.0);
    }

    #[test]
    fn test_parse_keys_case_insensitive() {
        let text = "DISTANCE: 0.1\npixelsize1: 1e-4\nPiXeLsIzE2: 1e-4\nwavelength: 1e-10\n";
        let poni = Poni::parse(text).unwrap();
        assert_relative_eq!(poni.distance, 0.1);
    }

    #[test]
    fn test_parse_missing_distance() {
        let text = "PixelSize1: 1e-4\nPixelSize2: 1e-4\nWavelength: 1e-10\n";
        let reason = Poni::parse(text).unwrap_err();
        assert!(reason.contains("Distance"));
    }

    #[test]
    fn test_parse_missing_wavelength() {
        let text = "Distance: 0.1\nPixelSize1: 1e-4\nPixelSize2: 1e-4\n";
        let reason = Poni::parse(text).unwrap_err();
        assert!(reason.contains("Wavelength"));
    }

    #[test]
    fn test_parse_named_detector_without_pixel_sizes() {
        let text = "Detector: Pilatus1M\nDistance: 0.1\nWavelength: 1e-10\n";
        let reason = Poni::parse(text).unwrap_err();
        assert!(reason.contains("Pilatus1M"));
    }

    #[test]
    fn test_parse_bad_number() {
        let text = "Distance: abc\nPixelSize1: 1e-4\nPixelSize2: 1e-4\nWavelength: 1e-10\n";
        let reason = Poni::parse(text).unwrap_err();
        assert!(reason.contains("line 1"));
        assert!(reason.contains("abc"));
    }

    #[test]
    fn test_parse_bad_detector_config() {
        let text = "Detector_config: {not json}\nDistance: 0.1\nWavelength: 1e-10\n";
        let reason = Poni::parse(text).unwrap_err();
        assert!(reason.contains("detector config"));
    }

    #[test]
    fn test_parse_line_without_separator() {
        let reason = Poni::parse("Distance 0.1\n").unwrap_err();
        assert!(reason.contains("key: value"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.poni");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(PONI_V1.as_bytes()).unwrap();

        let poni = Poni::load(&path).unwrap();
        assert_relative_eq!(poni.distance, 0.2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Poni::load(Path::new("/nonexistent/cal.poni")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_malformed_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.poni");
        std::fs::write(&path, "Distance: oops\n").unwrap();

        let err = Poni::load(&path).unwrap_err();
        assert!(matches!(err, Error::CalibrationParse { .. }));
    }

    #[test]
    fn test_two_theta_on_axis_is_zero() {
        // Beam centre: pixel centre coincides with the point of normal
        // incidence when poni = (index + 0.5) * pixel
        let poni = Poni {
            poni1: 0.05,
            poni2: 0.05,
            ..zero_rotation_poni()
        };
        let tth = poni.two_theta_pixel(0.0, 0.0);
        assert_relative_eq!(tth, 0.0);
    }

    #[test]
    fn test_two_theta_zero_rotation_reduces_to_arctan() {
        let poni = zero_rotation_poni();
        let tth = poni.two_theta_pixel(2.0, 3.0);
        let p1: f64 = 2.5 * 0.1;
        let p2 = 3.5 * 0.1;
        assert_relative_eq!(tth, p1.hypot(p2).atan2(1.0), max_relative = 1e-12);
    }

    #[test]
    fn test_two_theta_invariant_under_rot3() {
        // Rotating the detector around the beam axis must not change 2θ
        let flat = zero_rotation_poni();
        let spun = Poni {
            rot3: 0.7,
            ..zero_rotation_poni()
        };
        assert_relative_eq!(
            flat.two_theta_pixel(4.0, 1.0),
            spun.two_theta_pixel(4.0, 1.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_two_theta_batch_matches_scalar() {
        let poni = Poni::parse(PONI_V1).unwrap();
        let rows = [0.0, 10.0, 200.0];
        let cols = [5.0, 50.0, 100.0];
        let batch = poni.two_theta(&rows, &cols);
        for ((&r, &c), &tth) in rows.iter().zip(&cols).zip(&batch) {
            assert_relative_eq!(tth, poni.two_theta_pixel(r, c));
        }
    }
}
