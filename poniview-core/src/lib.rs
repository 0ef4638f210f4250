//! poniview-core: session state and math for the PoniView diffraction viewer.
//!
//! This crate holds everything the GUI needs that is not widget plumbing:
//! the session value with the loaded image and calibration, the image
//! format registry and decoders, poni calibration parsing with the
//! sample-detector geometry, and the cursor probe that renders the status
//! line.

pub mod error;
pub mod formats;
pub mod frame;
pub mod poni;
pub mod probe;
pub mod session;

pub use error::{Error, Result};
pub use formats::ImageKind;
pub use frame::Frame;
pub use poni::Poni;
pub use probe::CursorPos;
pub use session::{classify_paths, DropReport, DropSelection, Session};
