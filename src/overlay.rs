//! Drawing a single image with its YOLO annotations overlaid.
//!
//! [`annotate_image`] resolves everything that will be drawn (which image,
//! which rectangles, which labels) into an [`AnnotatedImage`] value, and
//! [`render_annotated_image`] draws that value onto the decoded image, below
//! a title band naming the image, and writes it out. Keeping the two apart means the geometry can be inspected
//! and tested without any pixels involved.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, DrawingArea, DrawingBackend, IntoDrawingArea, IntoFont, RGBColor, Rectangle,
    Text, BLACK, RED,
};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;

use crate::dataset::{self, ClassNames, LABEL_EXTENSION};
use crate::error::LabelscopeError;
use crate::fonts::{self, FONT_FAMILY};
use crate::geometry::PixelRect;
use crate::label::{read_label_file, ClassId};
use crate::summary::read_image_dimensions;

/// How overlays are drawn.
#[derive(Clone, Debug)]
pub struct OverlayStyle {
    /// Outline and label color.
    pub color: RGBColor,
    /// Outline thickness in pixels, drawn inward from the box edge.
    pub stroke_width: u32,
    /// Distance in pixels from the label's top to the box's top edge.
    pub label_offset: i32,
    /// Label font size in pixels.
    pub font_size: u32,
    /// Height of the white band above the image that holds the title.
    pub title_height: u32,
    /// Title font size in pixels.
    pub title_size: u32,
    /// Font file for labels; system fonts are tried when unset.
    pub font: Option<PathBuf>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: RED,
            stroke_width: 2,
            label_offset: 10,
            font_size: 16,
            title_height: 32,
            title_size: 20,
            font: None,
        }
    }
}

/// One box to draw, already in pixel space.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxOverlay {
    pub class_id: ClassId,
    pub label: String,
    pub rect: PixelRect,
}

/// An image together with the overlays to draw on it.
#[derive(Clone, Debug, Serialize)]
pub struct AnnotatedImage {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    pub stem: String,
    pub width: u32,
    pub height: u32,
    pub overlays: Vec<BoxOverlay>,
}

impl AnnotatedImage {
    /// Title naming the image, e.g. `Annotations for: img_001`.
    pub fn title(&self) -> String {
        format!("Annotations for: {}", self.stem)
    }
}

/// Pick the `index`-th `.jpg`/`.png` in `images_dir`, ordered by file name.
///
/// Extensions match case-sensitively, so `b.JPG` is not a candidate.
pub fn select_image(images_dir: &Path, index: usize) -> Result<PathBuf, LabelscopeError> {
    let mut images = dataset::list_images_exact_case(images_dir)?;
    let count = images.len();
    if index >= count {
        return Err(LabelscopeError::ImageIndexOutOfRange {
            index,
            count,
            dir: images_dir.to_path_buf(),
        });
    }
    Ok(images.swap_remove(index))
}

/// The label file for `image_path`: same stem, `.txt`, in `labels_dir`.
pub fn label_path_for(image_path: &Path, labels_dir: &Path) -> PathBuf {
    let mut file_name = image_path.file_stem().unwrap_or_default().to_os_string();
    file_name.push(".");
    file_name.push(LABEL_EXTENSION);
    labels_dir.join(file_name)
}

/// Resolve the overlays for the `index`-th image of a split.
///
/// Fails on an out-of-range index, a missing label file, or any malformed
/// label line.
pub fn annotate_image(
    images_dir: &Path,
    labels_dir: &Path,
    class_names: &ClassNames,
    index: usize,
) -> Result<AnnotatedImage, LabelscopeError> {
    let image_path = select_image(images_dir, index)?;
    let label_path = label_path_for(&image_path, labels_dir);
    if !label_path.is_file() {
        return Err(LabelscopeError::LabelFileMissing {
            image_path,
            label_path,
        });
    }

    let (width, height) = read_image_dimensions(&image_path)?;
    let records = read_label_file(&label_path)?;

    let overlays = records
        .into_iter()
        .map(|record| BoxOverlay {
            class_id: record.class_id,
            label: class_names.display_name(record.class_id),
            rect: record.bbox.to_pixel(f64::from(width), f64::from(height)),
        })
        .collect::<Vec<_>>();

    let stem = image_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(
        "{} box(es) for {} ({}x{})",
        overlays.len(),
        image_path.display(),
        width,
        height
    );

    Ok(AnnotatedImage {
        image_path,
        label_path,
        stem,
        width,
        height,
        overlays,
    })
}

/// Draw the title and overlays onto the image and write the result to
/// `output`.
///
/// The output is the image with a `title_height` band on top, so it is that
/// much taller than the source. The format follows the file extension.
/// Without a usable font the boxes are still drawn and all text is left out.
pub fn render_annotated_image(
    annotated: &AnnotatedImage,
    output: &Path,
    style: &OverlayStyle,
) -> Result<(), LabelscopeError> {
    let mut frame = image::open(&annotated.image_path)
        .map_err(|source| LabelscopeError::ImageDecode {
            path: annotated.image_path.clone(),
            source,
        })?
        .to_rgb8();
    let (width, height) = frame.dimensions();

    let draw_text = match fonts::ensure_font(style.font.as_deref()) {
        Ok(_) => true,
        Err(err) => {
            warn!("drawing boxes without text: {err}");
            false
        }
    };

    // Overlays are drawn on the image alone so they are clipped to it.
    {
        let area = BitMapBackend::with_buffer(&mut frame, (width, height)).into_drawing_area();
        for overlay in &annotated.overlays {
            draw_overlay(&area, overlay, (width, height), style, draw_text, output)?;
        }
        area.present().map_err(draw_error(output))?;
    }

    let band = style.title_height;
    let mut canvas =
        image::RgbImage::from_pixel(width, height + band, image::Rgb([255, 255, 255]));
    image::imageops::replace(&mut canvas, &frame, 0, i64::from(band));

    if draw_text && band > 0 {
        let root =
            BitMapBackend::with_buffer(&mut canvas, (width, height + band)).into_drawing_area();
        let font = (FONT_FAMILY, style.title_size as f64)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw_text(
            &annotated.title(),
            &font,
            ((width / 2) as i32, (band / 2) as i32),
        )
        .map_err(draw_error(output))?;
        root.present().map_err(draw_error(output))?;
    }

    canvas.save(output).map_err(|source| LabelscopeError::ImageWrite {
        path: output.to_path_buf(),
        source,
    })?;

    info!("wrote {}", output.display());
    Ok(())
}

fn draw_overlay<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    overlay: &BoxOverlay,
    (width, height): (u32, u32),
    style: &OverlayStyle,
    draw_label: bool,
    output: &Path,
) -> Result<(), LabelscopeError> {
    if !overlay.rect.is_finite() {
        warn!("skipping non-finite box for class {}", overlay.class_id);
        return Ok(());
    }

    let ((x0, y0), (x1, y1)) = overlay
        .rect
        .clamped_to_window(f64::from(width), f64::from(height))
        .rounded_corners();
    for inset in 0..style.stroke_width.min(i32::MAX as u32) as i32 {
        area.draw(&Rectangle::new(
            [
                (x0.saturating_add(inset), y0.saturating_add(inset)),
                (x1.saturating_sub(inset), y1.saturating_sub(inset)),
            ],
            style.color,
        ))
        .map_err(draw_error(output))?;
    }

    if draw_label {
        let font = (FONT_FAMILY, style.font_size as f64)
            .into_font()
            .color(&style.color);
        area.draw(&Text::new(
            overlay.label.clone(),
            (x0, y0.saturating_sub(style.label_offset)),
            font,
        ))
        .map_err(draw_error(output))?;
    }

    Ok(())
}

fn draw_error<E: std::fmt::Display>(output: &Path) -> impl Fn(E) -> LabelscopeError + '_ {
    move |err| LabelscopeError::Draw {
        path: output.to_path_buf(),
        message: err.to_string(),
    }
}
