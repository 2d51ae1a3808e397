//! Per-class bounding-box size distributions.
//!
//! Every label file in a directory is scanned and the normalized width,
//! height and area of each box is collected per class. Unlike the renderer,
//! this scan is forgiving: lines that are not well-formed detection rows are
//! dropped instead of failing the whole run.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::dataset::{self, file_name_string};
use crate::error::LabelscopeError;
use crate::figure::HistogramFigure;
use crate::label::{parse_label_line_lenient, ClassId};

/// Size samples of every box of one class, as parallel sequences.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClassBoxSamples {
    pub widths: Vec<f64>,
    pub heights: Vec<f64>,
    pub areas: Vec<f64>,
    /// Label file each sample came from.
    pub files: Vec<String>,
}

impl ClassBoxSamples {
    fn push(&mut self, width: f64, height: f64, file: &str) {
        self.widths.push(width);
        self.heights.push(height);
        self.areas.push(width * height);
        self.files.push(file.to_string());
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// Box samples grouped by class id.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BoxDistribution {
    classes: BTreeMap<ClassId, ClassBoxSamples>,
}

impl BoxDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one box of `class_id` read from `file`.
    pub fn push(&mut self, class_id: ClassId, width: f64, height: f64, file: &str) {
        self.classes
            .entry(class_id)
            .or_default()
            .push(width, height, file);
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Number of distinct classes seen.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of boxes across all classes.
    pub fn total_boxes(&self) -> usize {
        self.classes.values().map(ClassBoxSamples::len).sum()
    }

    pub fn get(&self, class_id: ClassId) -> Option<&ClassBoxSamples> {
        self.classes.get(&class_id)
    }

    /// Iterates classes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassBoxSamples)> {
        self.classes.iter().map(|(id, samples)| (*id, samples))
    }

    /// Mean box size per class.
    pub fn class_summaries(&self) -> Vec<ClassBoxSummary> {
        self.iter()
            .map(|(class_id, samples)| ClassBoxSummary {
                class_id,
                boxes: samples.len(),
                mean_width: mean(&samples.widths),
                mean_height: mean(&samples.heights),
                mean_area: mean(&samples.areas),
            })
            .collect()
    }
}

/// Mean normalized size of one class's boxes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassBoxSummary {
    pub class_id: ClassId,
    pub boxes: usize,
    pub mean_width: f64,
    pub mean_height: f64,
    pub mean_area: f64,
}

/// Outcome of [`plot_box_distributions`].
#[derive(Clone, Debug)]
pub enum PlotOutcome {
    /// No usable label line was found; nothing to plot.
    NoData,
    /// The histogram figure built from the collected samples.
    Figure {
        distribution: BoxDistribution,
        figure: HistogramFigure,
    },
}

/// Collect box sizes from every `.txt` file directly inside `labels_dir`.
///
/// Lines without exactly five fields, or whose class id, width or height do
/// not parse, are skipped. Directory and file read errors are returned.
pub fn collect_box_distribution(labels_dir: &Path) -> Result<BoxDistribution, LabelscopeError> {
    let mut distribution = BoxDistribution::new();

    for label_path in dataset::list_label_files(labels_dir)? {
        let file_name = file_name_string(&label_path);
        let content = fs::read_to_string(&label_path)?;

        let mut skipped = 0usize;
        for line in content.lines() {
            match parse_label_line_lenient(line) {
                Some((class_id, width, height)) => {
                    distribution.push(class_id, width, height, &file_name)
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("skipped {skipped} unusable line(s) in {}", label_path.display());
        }
    }

    debug!(
        "collected {} box(es) across {} class(es)",
        distribution.total_boxes(),
        distribution.class_count()
    );
    Ok(distribution)
}

/// Collect box sizes and build the width/height/area histogram figure.
///
/// Returns [`PlotOutcome::NoData`] rather than an empty figure when no
/// usable box was found.
pub fn plot_box_distributions(
    labels_dir: &Path,
    bins: usize,
) -> Result<PlotOutcome, LabelscopeError> {
    let distribution = collect_box_distribution(labels_dir)?;
    if distribution.is_empty() {
        return Ok(PlotOutcome::NoData);
    }

    let figure = HistogramFigure::from_distribution(&distribution, bins);
    Ok(PlotOutcome::Figure {
        distribution,
        figure,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
