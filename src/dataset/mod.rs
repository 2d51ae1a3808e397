//! YOLO dataset layout discovery.
//!
//! A dataset root holds one directory per split, each with `images/` and
//! `labels/` subdirectories, plus a `data.yaml` class config at the root:
//!
//! ```text
//! root/
//! ├── data.yaml
//! └── train/
//!     ├── images/
//!     └── labels/
//! ```

mod classes;

pub use classes::{read_data_yaml, ClassNames};

use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::LabelscopeError;

/// Image extensions picked up by directory scans.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];
/// Extension of label files, matched exactly.
pub const LABEL_EXTENSION: &str = "txt";
/// Split used when the caller does not name one.
pub const DEFAULT_SPLIT: &str = "train";
/// Class config file name at the dataset root.
pub const DATA_YAML: &str = "data.yaml";

/// Resolved paths of a dataset split.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetLayout {
    pub root: PathBuf,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    pub data_yaml: PathBuf,
}

impl DatasetLayout {
    /// Resolve and check the layout of `split` under `root`.
    ///
    /// Fails if the images directory, the labels directory or `data.yaml`
    /// is missing.
    pub fn discover(root: &Path, split: &str) -> Result<Self, LabelscopeError> {
        if !root.is_dir() {
            return Err(LabelscopeError::LayoutInvalid {
                path: root.to_path_buf(),
                message: "dataset root must be a directory".to_string(),
            });
        }

        let split_dir = root.join(split);
        let layout = Self {
            root: root.to_path_buf(),
            images_dir: split_dir.join("images"),
            labels_dir: split_dir.join("labels"),
            data_yaml: root.join(DATA_YAML),
        };

        if !layout.images_dir.is_dir() {
            return Err(LabelscopeError::LayoutInvalid {
                path: layout.images_dir,
                message: format!("missing {split}/images/ directory"),
            });
        }

        if !layout.labels_dir.is_dir() {
            return Err(LabelscopeError::LayoutInvalid {
                path: layout.labels_dir,
                message: format!("missing {split}/labels/ directory"),
            });
        }

        if !layout.data_yaml.is_file() {
            return Err(LabelscopeError::LayoutInvalid {
                path: layout.data_yaml,
                message: format!("missing {DATA_YAML} class config"),
            });
        }

        debug!(
            "discovered layout: images={} labels={}",
            layout.images_dir.display(),
            layout.labels_dir.display()
        );

        Ok(layout)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExtensionMatch {
    IgnoreCase,
    Exact,
}

/// List the images directly inside `dir`, sorted by file name.
///
/// Extensions match in any case, so `a.JPG` is counted.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, LabelscopeError> {
    collect_files_with_extensions(dir, &IMAGE_EXTENSIONS, ExtensionMatch::IgnoreCase)
}

/// List the images directly inside `dir` whose extension is exactly `jpg`
/// or `png`, sorted by file name.
pub fn list_images_exact_case(dir: &Path) -> Result<Vec<PathBuf>, LabelscopeError> {
    collect_files_with_extensions(dir, &IMAGE_EXTENSIONS, ExtensionMatch::Exact)
}

/// List the `.txt` files directly inside `dir`, sorted by file name.
pub fn list_label_files(dir: &Path) -> Result<Vec<PathBuf>, LabelscopeError> {
    collect_files_with_extensions(dir, &[LABEL_EXTENSION], ExtensionMatch::Exact)
}

/// Collect regular files (not recursing) whose extension is in `extensions`.
///
/// Results are ordered by the raw bytes of the file name, so `B.jpg` sorts
/// before `a.jpg`.
fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
    matching: ExtensionMatch,
) -> Result<Vec<PathBuf>, LabelscopeError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| LabelscopeError::DirectoryWalk {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions, matching) {
            files.push(entry.into_path());
        }
    }

    debug!("found {} file(s) in {}", files.len(), root.display());
    Ok(files)
}

fn has_extension(path: &Path, allowed: &[&str], matching: ExtensionMatch) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed.iter().any(|allowed_ext| match matching {
        ExtensionMatch::IgnoreCase => ext.eq_ignore_ascii_case(allowed_ext),
        ExtensionMatch::Exact => ext == *allowed_ext,
    })
}

/// File name of `path` as a displayable string.
pub(crate) fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
