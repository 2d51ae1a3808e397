//! Summary report types and terminal formatting.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::Describe;
use crate::dataset::{ClassNames, DatasetLayout};
use crate::label::ClassId;

/// Inner width of the boxed sections, between the `│` borders.
const BOX_WIDTH: usize = 59;
/// Width of per-class histogram bars (in characters).
const BAR_WIDTH: usize = 20;

/// The result of summarizing a dataset split.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetSummary {
    /// Number of jpg/png files in the images directory.
    pub images: usize,
    /// Number of txt files in the labels directory.
    pub label_files: usize,
    /// Pixel dimension statistics over all images.
    pub image_sizes: ImageSizeStats,
    /// Object counts per class id, ascending by id.
    pub classes: Vec<ClassCount>,
    /// Names loaded from `data.yaml`.
    pub class_names: ClassNames,
    /// Where the data was read from.
    pub layout: DatasetLayout,
}

impl DatasetSummary {
    /// Hand back the image directory, label directory and class names.
    ///
    /// These are exactly what the annotation renderer needs.
    pub fn into_parts(self) -> (PathBuf, PathBuf, ClassNames) {
        (
            self.layout.images_dir,
            self.layout.labels_dir,
            self.class_names,
        )
    }

    /// Total objects across all label files.
    pub fn total_objects(&self) -> usize {
        self.classes.iter().map(|c| c.count).sum()
    }
}

/// Width and height statistics; `None` when the split has no images.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ImageSizeStats {
    pub width: Option<Describe>,
    pub height: Option<Describe>,
}

/// Number of objects of one class.
#[derive(Clone, Debug, Serialize)]
pub struct ClassCount {
    pub class_id: ClassId,
    /// Configured name, if `data.yaml` maps this id.
    pub name: Option<String>,
    pub count: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "╭─────────────────────────────────────────────────────────────╮"
        )?;
        writeln!(
            f,
            "│                🔎  Dataset Summary                         │"
        )?;
        writeln!(
            f,
            "╰─────────────────────────────────────────────────────────────╯"
        )?;
        writeln!(f)?;

        self.fmt_files(f)?;
        writeln!(f)?;
        self.fmt_image_sizes(f)?;
        writeln!(f)?;
        self.fmt_classes(f)?;
        writeln!(f)?;
        self.fmt_class_names(f)?;

        Ok(())
    }
}

impl DatasetSummary {
    fn fmt_files(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Files")?;
        boxed_line(f, "")?;
        boxed_line(
            f,
            &format!("   Images:        {:>8}", format_number(self.images)),
        )?;
        boxed_line(
            f,
            &format!("   Label files:   {:>8}", format_number(self.label_files)),
        )?;
        boxed_line(f, "")?;
        section_footer(f)
    }

    fn fmt_image_sizes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Image Sizes (px)")?;
        boxed_line(f, "")?;

        match (&self.image_sizes.width, &self.image_sizes.height) {
            (Some(w), Some(h)) => {
                boxed_line(f, &format!("   {:<8} {:>12} {:>12}", "", "width", "height"))?;
                boxed_line(f, &stat_row("count", w.count as f64, h.count as f64))?;
                boxed_line(f, &stat_row("mean", w.mean, h.mean))?;
                match (w.std, h.std) {
                    (Some(ws), Some(hs)) => boxed_line(f, &stat_row("std", ws, hs))?,
                    _ => boxed_line(f, &format!("   {:<8} {:>12} {:>12}", "std", "n/a", "n/a"))?,
                }
                boxed_line(f, &stat_row("min", w.min, h.min))?;
                boxed_line(f, &stat_row("25%", w.q25, h.q25))?;
                boxed_line(f, &stat_row("50%", w.median, h.median))?;
                boxed_line(f, &stat_row("75%", w.q75, h.q75))?;
                boxed_line(f, &stat_row("max", w.max, h.max))?;
            }
            _ => boxed_line(f, "   No images found.")?,
        }

        boxed_line(f, "")?;
        section_footer(f)
    }

    fn fmt_classes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, &format!("Objects per Class ({})", self.classes.len()))?;
        boxed_line(f, "")?;

        if self.classes.is_empty() {
            boxed_line(f, "   No annotations found.")?;
        } else {
            let max_count = self.classes.iter().map(|c| c.count).max().unwrap_or(1);
            for class in &self.classes {
                let label = match &class.name {
                    Some(name) => format!("{} {}", class.class_id, name),
                    None => class.class_id.to_string(),
                };
                boxed_line(
                    f,
                    &format!(
                        "   {:<16} {:>9}  {}",
                        truncate_label(&label, 16),
                        format_number(class.count),
                        render_bar(class.count, max_count, BAR_WIDTH)
                    ),
                )?;
            }
            boxed_line(f, "")?;
            boxed_line(
                f,
                &format!("   Total objects: {}", format_number(self.total_objects())),
            )?;
        }

        boxed_line(f, "")?;
        section_footer(f)
    }

    fn fmt_class_names(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Class Names")?;
        boxed_line(f, "")?;
        if self.class_names.is_empty() {
            boxed_line(f, "   No names in data.yaml.")?;
        } else {
            for (id, name) in self.class_names.iter() {
                boxed_line(f, &format!("   {:>4}: {}", id, truncate_label(name, 48)))?;
            }
        }
        boxed_line(f, "")?;
        section_footer(f)
    }
}

fn section_header(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let used = title.chars().count() + 2;
    writeln!(
        f,
        "┌─ {} {}┐",
        title,
        "─".repeat(BOX_WIDTH.saturating_sub(used + 1))
    )
}

fn section_footer(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "└{}┘", "─".repeat(BOX_WIDTH))
}

/// Write `content` padded to the box width between borders.
fn boxed_line(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    let padding = BOX_WIDTH.saturating_sub(content.chars().count());
    writeln!(f, "│{}{}│", content, " ".repeat(padding))
}

fn stat_row(name: &str, width: f64, height: f64) -> String {
    format!("   {:<8} {:>12.2} {:>12.2}", name, width, height)
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Truncate a label to fit in the display column.
fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
