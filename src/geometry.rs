//! Box geometry for YOLO annotations.
//!
//! YOLO labels describe boxes as a normalized center point plus a normalized
//! width and height. Drawing needs absolute pixel corners instead, so the two
//! representations are kept as distinct types.

use serde::Serialize;

/// A box in YOLO center format, normalized to the image size.
///
/// All four values are nominally in `[0, 1]`, but nothing is enforced here:
/// out-of-range boxes exist in real datasets and should still convert.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NormalizedBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// Creates a normalized box from center, width and height.
    #[inline]
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Returns `width * height`, the fraction of the image the box covers.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Converts to absolute pixel corners for an image of the given size.
    ///
    /// # Arguments
    /// * `image_width` - The width of the image in pixels
    /// * `image_height` - The height of the image in pixels
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> PixelRect {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        PixelRect {
            x0: (self.x_center - half_w) * image_width,
            y0: (self.y_center - half_h) * image_height,
            x1: (self.x_center + half_w) * image_width,
            y1: (self.y_center + half_h) * image_height,
        }
    }
}

/// An axis-aligned rectangle in pixel coordinates, `(x0, y0)` top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    /// Returns the width of the rectangle.
    ///
    /// May be negative if the source box had a negative width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Returns the height of the rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Returns true if all corners are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Corners clamped to `[-width, 2 * width]` and `[-height, 2 * height]`.
    ///
    /// The visible part of the box is unchanged, and the corners stay small
    /// enough for integer pixel arithmetic.
    pub fn clamped_to_window(&self, width: f64, height: f64) -> PixelRect {
        let clamp_x = |v: f64| v.clamp(-width, 2.0 * width);
        let clamp_y = |v: f64| v.clamp(-height, 2.0 * height);
        PixelRect {
            x0: clamp_x(self.x0),
            y0: clamp_y(self.y0),
            x1: clamp_x(self.x1),
            y1: clamp_y(self.y1),
        }
    }

    /// Corners rounded to the nearest pixel, as drawing backends expect.
    pub fn rounded_corners(&self) -> ((i32, i32), (i32, i32)) {
        (
            (self.x0.round() as i32, self.y0.round() as i32),
            (self.x1.round() as i32, self.y1.round() as i32),
        )
    }
}
