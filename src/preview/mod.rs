//! Random image preview with bounding boxes overlaid.

mod display;
mod draw;

pub use display::{ImageSink, SaveToFile, SystemViewer};
pub use draw::{draw_rect, draw_text, text_width};

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use serde::Serialize;

use crate::error::YoloPrepError;
use crate::record::{AnnotationRecord, PixelBox};
use crate::store::RecordStore;

/// Printed when the store has nothing to preview.
pub const NO_DATA_MESSAGE: &str = "No data available.";

pub const BOX_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BOX_THICKNESS: u32 = 2;

/// Vertical offset of a label above its box's top edge.
const LABEL_OFFSET: i64 = 10;

/// A drawn box and its class label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabeledBox {
    pub class_name: String,
    pub bbox: PixelBox,
}

/// What a preview drew and where the result went.
#[derive(Clone, Debug, Serialize)]
pub struct PreviewOutcome {
    /// Source image path from the store.
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub boxes: Vec<LabeledBox>,
    /// Where the annotated image was written (temp file or `--save` target).
    pub shown_at: PathBuf,
}

/// Pick a random image, draw all of its boxes and hand it to `sink`.
///
/// Returns `Ok(None)` without loading anything when the store has no data.
pub fn preview_random_image<S, V>(
    store: &mut S,
    sink: &mut V,
) -> Result<Option<PreviewOutcome>, YoloPrepError>
where
    S: RecordStore + ?Sized,
    V: ImageSink + ?Sized,
{
    let records = store.fetch_random_with_annotations()?;
    let Some(first) = records.first() else {
        return Ok(None);
    };

    let source = PathBuf::from(&first.file_path);
    let mut image = load_image(&source)?.into_rgba8();

    let boxes = annotate_image(&mut image, &records);
    let shown_at = sink.show(&image)?;

    tracing::info!(
        source = %source.display(),
        boxes = boxes.len(),
        "preview rendered"
    );

    Ok(Some(PreviewOutcome {
        source,
        width: image.width(),
        height: image.height(),
        boxes,
        shown_at,
    }))
}

/// Decode an image, detecting the format from its content so stored paths
/// without a known extension still load.
fn load_image(path: &Path) -> Result<DynamicImage, YoloPrepError> {
    let decode_error = |source: image::ImageError| YoloPrepError::ImageDecode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)
}

/// Draw every record's box and class label onto `image`.
///
/// Labels sit just above the box; when that would leave the image they are
/// drawn inside the top edge instead.
pub fn annotate_image(image: &mut RgbaImage, records: &[AnnotationRecord]) -> Vec<LabeledBox> {
    let (width, height) = image.dimensions();
    let mut boxes = Vec::with_capacity(records.len());

    for record in records {
        let bbox = record.to_pixel_box(width, height);
        draw_rect(image, bbox, BOX_COLOR, BOX_THICKNESS);

        let label = record.class_name.as_str();
        let mut label_y = bbox.y_min - LABEL_OFFSET;
        if label_y < 0 {
            label_y = bbox.y_min + BOX_THICKNESS as i64 + 1;
        }
        let max_x = (width as i64 - text_width(label)).max(0);
        let label_x = bbox.x_min.clamp(0, max_x);
        draw_text(image, label_x, label_y, label, BOX_COLOR);

        boxes.push(LabeledBox {
            class_name: record.class_name.clone(),
            bbox,
        });
    }

    boxes
}
