//! Histogram figures of box sizes.
//!
//! A [`HistogramFigure`] is a plain value: three panels (width, height, area)
//! each holding one binned series per class. [`render_histogram_figure`]
//! draws it with plotters into an image file.

use std::ops::Range;
use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, Color, IntoDrawingArea, Palette, Palette99, Rectangle,
    SeriesLabelPosition, BLACK, WHITE,
};
use serde::Serialize;

use crate::distribution::BoxDistribution;
use crate::error::LabelscopeError;
use crate::fonts::{self, FONT_FAMILY};
use crate::label::ClassId;

/// Bins per histogram unless the caller asks otherwise.
pub const DEFAULT_BINS: usize = 50;

/// The quantity a panel plots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Width,
    Height,
    Area,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::Width, Measure::Height, Measure::Area];

    pub fn title(self) -> &'static str {
        match self {
            Measure::Width => "Width distribution",
            Measure::Height => "Height distribution",
            Measure::Area => "Area distribution",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Measure::Width => "Width",
            Measure::Height => "Height",
            Measure::Area => "Area",
        }
    }
}

/// One histogram bar: `[start, end)` and how many samples fell in it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// The binned samples of one class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub class_id: ClassId,
    pub label: String,
    pub bins: Vec<HistogramBin>,
}

/// One subplot of the figure.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramPanel {
    pub measure: Measure,
    pub title: String,
    pub x_label: String,
    pub y_label: Option<String>,
    pub series: Vec<HistogramSeries>,
}

impl HistogramPanel {
    /// Smallest bin start and largest bin end over all series.
    pub fn x_range(&self) -> Range<f64> {
        let bins = self.series.iter().flat_map(|s| s.bins.iter());
        let (start, end) = bins.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), bin| {
            (lo.min(bin.start), hi.max(bin.end))
        });
        if start.is_finite() && end.is_finite() {
            start..end
        } else {
            0.0..1.0
        }
    }

    /// Tallest bar over all series.
    pub fn max_count(&self) -> usize {
        self.series
            .iter()
            .flat_map(|s| s.bins.iter())
            .map(|bin| bin.count)
            .max()
            .unwrap_or(0)
    }
}

/// Width, height and area histograms side by side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramFigure {
    pub panels: Vec<HistogramPanel>,
}

impl HistogramFigure {
    /// Bin every class's widths, heights and areas into `bins` bins each.
    ///
    /// Each series is binned over its own value range.
    pub fn from_distribution(distribution: &BoxDistribution, bins: usize) -> Self {
        let panels = Measure::ALL
            .iter()
            .enumerate()
            .map(|(i, &measure)| {
                let series = distribution
                    .iter()
                    .map(|(class_id, samples)| {
                        let values = match measure {
                            Measure::Width => &samples.widths,
                            Measure::Height => &samples.heights,
                            Measure::Area => &samples.areas,
                        };
                        HistogramSeries {
                            class_id,
                            label: format!("Class {class_id}"),
                            bins: histogram(values, bins),
                        }
                    })
                    .collect();

                HistogramPanel {
                    measure,
                    title: measure.title().to_string(),
                    x_label: measure.axis_label().to_string(),
                    y_label: (i == 0).then(|| "Count".to_string()),
                    series,
                }
            })
            .collect();

        Self { panels }
    }
}

/// Split `values` into `bins` equal-width bins spanning their range.
///
/// The last bin is closed, so the maximum value is counted. When all values
/// are equal the range is widened to half a unit either side. Non-finite
/// values are not counted.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let finite = values.iter().copied().filter(|v| v.is_finite());

    let (mut lo, mut hi) = finite
        .clone()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return Vec::new();
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let step = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / step).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + step * i as f64,
            end: if i + 1 == bins {
                hi
            } else {
                lo + step * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// How a figure is drawn.
#[derive(Clone, Debug)]
pub struct FigureStyle {
    /// Output size in pixels.
    pub width: u32,
    pub height: u32,
    /// Opacity of the bars, so overlapping classes stay visible.
    pub alpha: f64,
    pub caption_size: u32,
    /// Font file for all text; system fonts are tried when unset.
    pub font: Option<PathBuf>,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 500,
            alpha: 0.5,
            caption_size: 22,
            font: None,
        }
    }
}

/// Draw `figure` into the image file at `output`.
///
/// Needs a font for captions, ticks and legends; fails with
/// [`LabelscopeError::FontUnavailable`] when none can be found.
pub fn render_histogram_figure(
    figure: &HistogramFigure,
    output: &Path,
    style: &FigureStyle,
) -> Result<(), LabelscopeError> {
    fonts::ensure_font(style.font.as_deref())?;

    let draw_err = |err: &dyn std::fmt::Display| LabelscopeError::Draw {
        path: output.to_path_buf(),
        message: err.to_string(),
    };

    let root = BitMapBackend::new(output, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(&e))?;

    let areas = root.split_evenly((1, figure.panels.len().max(1)));
    for (area, panel) in areas.iter().zip(&figure.panels) {
        let x_range = panel.x_range();
        let y_max = (panel.max_count().max(1) as f64) * 1.05;

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT_FAMILY, style.caption_size as f64))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0.0..y_max)
            .map_err(|e| draw_err(&e))?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(panel.x_label.as_str());
        if let Some(y_label) = &panel.y_label {
            mesh.y_desc(y_label.as_str());
        }
        mesh.draw().map_err(|e| draw_err(&e))?;

        for (i, series) in panel.series.iter().enumerate() {
            let color = Palette99::pick(i).mix(style.alpha);
            chart
                .draw_series(series.bins.iter().filter(|bin| bin.count > 0).map(|bin| {
                    Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], color.filled())
                }))
                .map_err(|e| draw_err(&e))?
                .label(series.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| draw_err(&e))?;
    }

    root.present().map_err(|e| draw_err(&e))?;
    info!("wrote {}", output.display());
    Ok(())
}
