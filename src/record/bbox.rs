//! Pixel-space bounding boxes derived from normalized records.

use serde::Serialize;

/// An axis-aligned box in absolute pixel coordinates (xmin, ymin, xmax, ymax).
///
/// Corners are signed: a box hanging off the top-left edge of the image keeps
/// its negative coordinates, and drawing code clips it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PixelBox {
    pub x_min: i64,
    pub y_min: i64,
    pub x_max: i64,
    pub y_max: i64,
}

impl PixelBox {
    /// Convert normalized center/width/height into pixel corners.
    ///
    /// Each corner is truncated toward zero after scaling by the image size.
    pub fn from_normalized_cxcywh(
        x_center: f64,
        y_center: f64,
        width: f64,
        height: f64,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let w = image_width as f64;
        let h = image_height as f64;

        Self {
            x_min: ((x_center - width / 2.0) * w) as i64,
            y_min: ((y_center - height / 2.0) * h) as i64,
            x_max: ((x_center + width / 2.0) * w) as i64,
            y_max: ((y_center + height / 2.0) * h) as i64,
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.y_max - self.y_min
    }
}
