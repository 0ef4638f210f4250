//! Viewer session: the loaded image, the loaded calibration, and the
//! display state derived from them.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::formats;
use crate::frame::Frame;
use crate::poni::Poni;

/// Marker shown in the window title for an unfilled slot.
const EMPTY_SLOT: &str = "None";

/// The viewer's single mutable value: at most one image and at most one
/// calibration, plus their source paths and the intensity field width.
///
/// Loads commit atomically; a failed load leaves every field untouched.
#[derive(Debug)]
pub struct Session {
    image: Option<Frame>,
    image_path: Option<PathBuf>,
    calibration: Option<Poni>,
    poni_path: Option<PathBuf>,
    intensity_digits: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            image: None,
            image_path: None,
            calibration: None,
            poni_path: None,
            intensity_digits: 1,
        }
    }
}

impl Session {
    /// Fresh session with both slots empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently loaded image, if any.
    #[must_use]
    #[inline]
    pub fn image(&self) -> Option<&Frame> {
        self.image.as_ref()
    }

    /// Path of the currently loaded image, if any.
    #[must_use]
    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// Currently loaded calibration, if any.
    #[must_use]
    #[inline]
    pub fn calibration(&self) -> Option<&Poni> {
        self.calibration.as_ref()
    }

    /// Path of the currently loaded calibration, if any.
    #[must_use]
    pub fn poni_path(&self) -> Option<&Path> {
        self.poni_path.as_deref()
    }

    /// Field width used for intensity display, `1` before any image loads.
    #[must_use]
    #[inline]
    pub fn intensity_digits(&self) -> usize {
        self.intensity_digits
    }

    /// Load a diffraction image, replacing the current one on success.
    pub fn load_image(&mut self, path: &Path) -> Result<()> {
        let decoded = formats::decode(path)?;
        let frame = Frame::from_decoded(decoded);
        self.intensity_digits = frame.intensity_digits();
        self.image = Some(frame);
        self.image_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Load a poni calibration, replacing the current one on success.
    pub fn load_poni(&mut self, path: &Path) -> Result<()> {
        let poni = Poni::load(path)?;
        self.calibration = Some(poni);
        self.poni_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Window title: poni basename and image basename separated by three
    /// spaces, with `None` standing in for empty slots.
    #[must_use]
    pub fn window_title(&self) -> String {
        format!(
            "{}   {}",
            basename_or_none(self.poni_path.as_deref()),
            basename_or_none(self.image_path.as_deref())
        )
    }

    /// Apply a file drop: classify the paths, then load each filled slot.
    ///
    /// Load failures end up in the report and leave the affected slot's
    /// previous state intact; the other slot still loads.
    pub fn handle_dropped_files(&mut self, paths: &[PathBuf]) -> DropReport {
        let selection = classify_paths(paths);
        let mut report = DropReport::default();
        if let Some(path) = selection.poni {
            match self.load_poni(&path) {
                Ok(()) => report.poni_loaded = true,
                Err(err) => report.errors.push(err),
            }
        }
        if let Some(path) = selection.image {
            match self.load_image(&path) {
                Ok(()) => report.image_loaded = true,
                Err(err) => report.errors.push(err),
            }
        }
        report
    }
}

/// Paths selected from one drop, at most one per slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DropSelection {
    /// First dropped path with the poni extension.
    pub poni: Option<PathBuf>,
    /// First dropped path with a supported image extension.
    pub image: Option<PathBuf>,
}

/// What a drop actually loaded, and what failed.
#[derive(Debug, Default)]
pub struct DropReport {
    /// A calibration was loaded.
    pub poni_loaded: bool,
    /// An image was loaded.
    pub image_loaded: bool,
    /// Errors from slots that failed to load.
    pub errors: Vec<Error>,
}

impl DropReport {
    /// Number of slots that loaded, which is also the number of window
    /// title refreshes the drop caused.
    #[must_use]
    pub fn loads(&self) -> usize {
        usize::from(self.poni_loaded) + usize::from(self.image_loaded)
    }
}

/// Pick the first poni and the first image from dropped paths, stopping
/// early once both slots are filled. Extension matching ignores case.
#[must_use]
pub fn classify_paths(paths: &[PathBuf]) -> DropSelection {
    let mut selection = DropSelection::default();
    for path in paths {
        if selection.poni.is_none() && formats::is_poni(path) {
            selection.poni = Some(path.clone());
        } else if selection.image.is_none() && formats::is_image(path) {
            selection.image = Some(path.clone());
        }
        if selection.poni.is_some() && selection.image.is_some() {
            break;
        }
    }
    selection
}

fn basename_or_none(path: Option<&Path>) -> String {
    match path {
        None => EMPTY_SLOT.to_string(),
        Some(p) => p
            .file_name()
            .map_or_else(|| p.display().to_string(), |n| n.to_string_lossy().into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use ndarray::array;
    use ndarray_npy::WriteNpyExt;

    use super::*;

    const PONI_TEXT: &str = "\
Distance: 0.2
Poni1: 0.05
Poni2: 0.05
PixelSize1: 7.5e-05
PixelSize2: 7.5e-05
Wavelength: 1.03e-10
";

    fn write_npy(dir: &Path, name: &str, data: &ndarray::Array2<f64>) -> PathBuf {
        let path = dir.join(name);
        data.write_npy(File::create(&path).unwrap()).unwrap();
        path
    }

    fn write_poni(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, PONI_TEXT).unwrap();
        path
    }

    #[test]
    fn test_fresh_session_title() {
        let session = Session::new();
        assert_eq!(session.window_title(), "None   None");
    }

    #[test]
    fn test_load_image_sets_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_npy(dir.path(), "img.npy", &array![[10.0, 9375.0], [30.0, 40.0]]);

        let mut session = Session::new();
        session.load_image(&path).unwrap();

        assert!(session.image().is_some());
        assert_eq!(session.image_path(), Some(path.as_path()));
        assert_eq!(session.intensity_digits(), 4);
        assert_eq!(session.window_title(), "None   img.npy");
    }

    #[test]
    fn test_load_image_with_inf_pixel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_npy(dir.path(), "flat.npy", &array![[1.0, f64::INFINITY], [30.0, 40.0]]);

        let mut session = Session::new();
        session.load_image(&path).unwrap();

        assert!(session.image().is_some());
        assert_eq!(session.intensity_digits(), 1);
    }

    #[test]
    fn test_load_poni_sets_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_poni(dir.path(), "cal.poni");

        let mut session = Session::new();
        session.load_poni(&path).unwrap();

        assert!(session.calibration().is_some());
        assert_eq!(session.window_title(), "cal.poni   None");
    }

    #[test]
    fn test_title_with_both_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let img = write_npy(dir.path(), "img.npy", &array![[1.0, 2.0], [3.0, 4.0]]);
        let cal = write_poni(dir.path(), "cal.poni");

        let mut session = Session::new();
        session.load_image(&img).unwrap();
        session.load_poni(&cal).unwrap();

        assert_eq!(session.window_title(), "cal.poni   img.npy");
    }

    #[test]
    fn test_failed_image_load_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_npy(dir.path(), "img.npy", &array![[10.0, 9375.0], [30.0, 40.0]]);
        let bad = dir.path().join("notes.txt");
        std::fs::write(&bad, "not an image").unwrap();

        let mut session = Session::new();
        session.load_image(&good).unwrap();
        let err = session.load_image(&bad).unwrap_err();

        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert_eq!(session.image_path(), Some(good.as_path()));
        assert_eq!(session.intensity_digits(), 4);
        assert_eq!(session.window_title(), "None   img.npy");
    }

    #[test]
    fn test_failed_poni_load_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_poni(dir.path(), "cal.poni");
        let bad = dir.path().join("broken.poni");
        std::fs::write(&bad, "Distance: oops\n").unwrap();

        let mut session = Session::new();
        session.load_poni(&good).unwrap();
        let err = session.load_poni(&bad).unwrap_err();

        assert!(matches!(err, Error::CalibrationParse { .. }));
        assert_eq!(session.poni_path(), Some(good.as_path()));
        assert_eq!(session.window_title(), "cal.poni   None");
    }

    #[test]
    fn test_classify_first_match_wins() {
        let paths = [
            PathBuf::from("first.poni"),
            PathBuf::from("second.poni"),
            PathBuf::from("one.png"),
            PathBuf::from("two.png"),
        ];
        let selection = classify_paths(&paths);
        assert_eq!(selection.poni, Some(PathBuf::from("first.poni")));
        assert_eq!(selection.image, Some(PathBuf::from("one.png")));
    }

    #[test]
    fn test_classify_ignores_unrelated_paths() {
        let paths = [
            PathBuf::from("readme.md"),
            PathBuf::from("data.npy"),
            PathBuf::from("script.py"),
            PathBuf::from("cal.poni"),
        ];
        let selection = classify_paths(&paths);
        assert_eq!(selection.poni, Some(PathBuf::from("cal.poni")));
        assert_eq!(selection.image, Some(PathBuf::from("data.npy")));
    }

    #[test]
    fn test_classify_case_insensitive() {
        let paths = [PathBuf::from("CAL.PONI"), PathBuf::from("IMG.PNG")];
        let selection = classify_paths(&paths);
        assert!(selection.poni.is_some());
        assert!(selection.image.is_some());
    }

    #[test]
    fn test_classify_empty_drop() {
        assert_eq!(classify_paths(&[]), DropSelection::default());
    }

    #[test]
    fn test_drop_loads_first_poni_and_first_image() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_poni(dir.path(), "first.poni");
        let second = write_poni(dir.path(), "second.poni");
        let img = write_npy(dir.path(), "img.npy", &array![[1.0, 2.0], [3.0, 4.0]]);

        let mut session = Session::new();
        let report = session.handle_dropped_files(&[first.clone(), second, img]);

        assert!(report.poni_loaded);
        assert!(report.image_loaded);
        assert_eq!(report.loads(), 2);
        assert!(report.errors.is_empty());
        assert_eq!(session.poni_path(), Some(first.as_path()));
        assert_eq!(session.window_title(), "first.poni   img.npy");
    }

    #[test]
    fn test_drop_with_failing_poni_still_loads_image() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.poni");
        std::fs::write(&bad, "no separator line\n").unwrap();
        let img = write_npy(dir.path(), "img.npy", &array![[1.0, 2.0], [3.0, 4.0]]);

        let mut session = Session::new();
        let report = session.handle_dropped_files(&[bad, img]);

        assert!(!report.poni_loaded);
        assert!(report.image_loaded);
        assert_eq!(report.loads(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(session.calibration().is_none());
        assert!(session.image().is_some());
    }

    #[test]
    fn test_drop_with_nothing_relevant() {
        let mut session = Session::new();
        let report = session.handle_dropped_files(&[PathBuf::from("notes.txt")]);
        assert_eq!(report.loads(), 0);
        assert!(report.errors.is_empty());
        assert_eq!(session.window_title(), "None   None");
    }
}
