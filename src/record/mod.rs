//! Annotation records as returned by the record store.
//!
//! An [`AnnotationRecord`] ties one YOLO-style bounding box (normalized
//! center/size coordinates) to the source image it belongs to. Records are
//! produced by a [`RecordStore`](crate::store::RecordStore) query, held in
//! memory for the duration of one operation and then dropped.
//!
//! # Example
//!
//! ```
//! use yoloprep::record::AnnotationRecord;
//!
//! let record = AnnotationRecord::new("/data/img/frame_001.jpg", 0.5, 0.5, 0.2, 0.4, "0");
//! assert_eq!(record.output_file_name(), "frame_001.jpg");
//! assert_eq!(record.label_file_name(), "frame_001.txt");
//! assert_eq!(record.to_label_line(), "0 0.5 0.5 0.2 0.4");
//! ```

mod bbox;

pub use bbox::PixelBox;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Extension used for YOLO label files.
pub const LABEL_EXTENSION: &str = "txt";

/// One bounding box tied to one source image.
///
/// Coordinates are kept exactly as fetched; nothing here re-normalizes or
/// validates them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Path of the source image as stored in the database.
    pub file_path: String,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
    /// Class label written verbatim as the first field of the label line.
    pub class_name: String,
}

impl AnnotationRecord {
    pub fn new(
        file_path: impl Into<String>,
        x_center: f64,
        y_center: f64,
        width: f64,
        height: f64,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            x_center,
            y_center,
            width,
            height,
            class_name: class_name.into(),
        }
    }

    /// File name the image gets inside a split's `images/` directory.
    ///
    /// Falls back to the whole stored path when it has no final component.
    pub fn output_file_name(&self) -> String {
        Path::new(&self.file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.clone())
    }

    /// Name of the label file: image basename with a `.txt` extension.
    pub fn label_file_name(&self) -> String {
        let output = self.output_file_name();
        Path::new(&output)
            .with_extension(LABEL_EXTENSION)
            .to_string_lossy()
            .into_owned()
    }

    /// Format the record as a YOLO label line:
    /// `"<class_name> <x_center> <y_center> <width> <height>"`.
    ///
    /// Values use the shortest representation that round-trips, with a
    /// trailing `.0` on whole numbers (`1.0`, not `1`).
    pub fn to_label_line(&self) -> String {
        format!(
            "{} {:?} {:?} {:?} {:?}",
            self.class_name, self.x_center, self.y_center, self.width, self.height
        )
    }

    /// Convert the normalized box into pixel corners for an image of the
    /// given size.
    pub fn to_pixel_box(&self, image_width: u32, image_height: u32) -> PixelBox {
        PixelBox::from_normalized_cxcywh(
            self.x_center,
            self.y_center,
            self.width,
            self.height,
            image_width,
            image_height,
        )
    }
}
