//! Dataset summary statistics.
//!
//! Scans one split of a dataset and reports file counts, image dimension
//! statistics and per-class object counts.

mod describe;
mod report;

pub use describe::Describe;
pub use report::{ClassCount, DatasetSummary, ImageSizeStats};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::dataset::{self, read_data_yaml, DatasetLayout};
use crate::error::LabelscopeError;
use crate::label::{parse_class_token, ClassId};

/// Summarize the `train` split of the dataset at `root`.
pub fn summarize_dataset(root: &Path) -> Result<DatasetSummary, LabelscopeError> {
    summarize_split(root, dataset::DEFAULT_SPLIT)
}

/// Summarize one split of the dataset at `root`.
///
/// Every image header is read for its dimensions and every label line for
/// its class id; the first failure aborts the whole summary.
pub fn summarize_split(root: &Path, split: &str) -> Result<DatasetSummary, LabelscopeError> {
    let layout = DatasetLayout::discover(root, split)?;

    let image_files = dataset::list_images(&layout.images_dir)?;
    let label_files = dataset::list_label_files(&layout.labels_dir)?;

    let mut widths = Vec::with_capacity(image_files.len());
    let mut heights = Vec::with_capacity(image_files.len());
    for image_path in &image_files {
        let (width, height) = read_image_dimensions(image_path)?;
        widths.push(f64::from(width));
        heights.push(f64::from(height));
    }

    let mut class_counts: BTreeMap<ClassId, usize> = BTreeMap::new();
    for label_path in &label_files {
        let content = fs::read_to_string(label_path)?;
        for (line_idx, line) in content.lines().enumerate() {
            let class_id = parse_class_token(line, label_path, line_idx + 1)?;
            *class_counts.entry(class_id).or_insert(0) += 1;
        }
    }

    let class_names = read_data_yaml(&layout.data_yaml)?;
    debug!(
        "summarized {} image(s), {} label file(s), {} class(es)",
        image_files.len(),
        label_files.len(),
        class_counts.len()
    );

    let classes = class_counts
        .into_iter()
        .map(|(class_id, count)| ClassCount {
            class_id,
            name: class_names.get(class_id).map(str::to_string),
            count,
        })
        .collect();

    Ok(DatasetSummary {
        images: image_files.len(),
        label_files: label_files.len(),
        image_sizes: ImageSizeStats {
            width: Describe::from_samples(&widths),
            height: Describe::from_samples(&heights),
        },
        classes,
        class_names,
        layout,
    })
}

/// Read `(width, height)` from an image header without decoding pixels.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), LabelscopeError> {
    let size = imagesize::size(path).map_err(|source| LabelscopeError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| LabelscopeError::LayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| LabelscopeError::LayoutInvalid {
            path: path.to_path_buf(),
            message: format!("image height {} does not fit in u32", size.height),
        })?;

    Ok((width, height))
}
