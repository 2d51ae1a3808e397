use std::path::PathBuf;
use thiserror::Error;

/// The main error type for labelscope operations.
#[derive(Debug, Error)]
pub enum LabelscopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset layout at {path}: {message}")]
    LayoutInvalid { path: PathBuf, message: String },

    #[error("Failed while traversing {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to parse data.yaml at {path}: {source}")]
    DataYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse label file {path} at line {line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Image index {index} is out of range: {dir} contains {count} image(s)")]
    ImageIndexOutOfRange {
        index: usize,
        count: usize,
        dir: PathBuf,
    },

    #[error("No label file for image {image_path} (expected {label_path})")]
    LabelFileMissing {
        image_path: PathBuf,
        label_path: PathBuf,
    },

    #[error("No usable font found (searched: {})", display_paths(.searched))]
    FontUnavailable { searched: Vec<PathBuf> },

    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("Failed to draw {path}: {message}")]
    Draw { path: PathBuf, message: String },

    #[error("Failed to serialize report as JSON: {source}")]
    ReportJsonWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "none".to_string();
    }
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
