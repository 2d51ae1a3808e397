//! TrueType font registration for text drawn by `plotters`.
//!
//! Plotters is built with its pure-Rust `ab_glyph` text backend, which only
//! knows fonts that were registered at runtime. A font is registered once per
//! process under the `sans-serif` family that all labelscope text uses.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info};
use plotters::style::FontStyle;

use crate::error::LabelscopeError;

/// Family name every caption, axis label and box label is drawn with.
pub const FONT_FAMILY: &str = "sans-serif";

/// Well-known font files tried when no font is configured.
const SYSTEM_FONT_CANDIDATES: [&str; 8] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Make sure a font is registered, returning the file it came from.
///
/// `explicit` is tried first, then the system candidates. Once a font is
/// registered later calls return it without touching the filesystem.
pub fn ensure_font(explicit: Option<&Path>) -> Result<PathBuf, LabelscopeError> {
    let mut registered = REGISTERED
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = registered.as_ref() {
        return Ok(path.clone());
    }

    if let Some(path) = explicit {
        register_font_file(path)?;
        *registered = Some(path.to_path_buf());
        return Ok(path.to_path_buf());
    }

    let mut searched = Vec::new();
    for candidate in SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from) {
        if candidate.is_file() {
            match register_font_file(&candidate) {
                Ok(()) => {
                    *registered = Some(candidate.clone());
                    return Ok(candidate);
                }
                Err(err) => debug!("skipping font candidate: {err}"),
            }
        }
        searched.push(candidate);
    }

    Err(LabelscopeError::FontUnavailable { searched })
}

fn register_font_file(path: &Path) -> Result<(), LabelscopeError> {
    let bytes = fs::read(path).map_err(|err| LabelscopeError::FontLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    // Plotters keeps registered font data for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
        LabelscopeError::FontLoad {
            path: path.to_path_buf(),
            message: "not a valid TrueType/OpenType font".to_string(),
        }
    })?;

    info!("registered font {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_non_font_file_is_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("fake.ttf");
        fs::write(&path, b"definitely not a font").expect("write fake font");

        let err = register_font_file(&path).unwrap_err();
        assert!(matches!(err, LabelscopeError::FontLoad { .. }));
    }

    #[test]
    fn missing_font_file_is_rejected() {
        let err = register_font_file(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, LabelscopeError::FontLoad { .. }));
    }
}
