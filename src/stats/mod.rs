//! Dataset statistics.
//!
//! Runs the two aggregate queries (image count, boxes per class) and turns
//! them into a [`StatsReport`] that renders as text or JSON.

mod report;

pub use report::StatsReport;

use crate::error::YoloPrepError;
use crate::store::RecordStore;

/// Options for dataset statistics.
#[derive(Clone, Debug)]
pub struct StatsOptions {
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self { bar_width: 20 }
    }
}

/// Compute image and per-class bounding-box counts.
pub fn summarize<S>(store: &mut S, opts: &StatsOptions) -> Result<StatsReport, YoloPrepError>
where
    S: RecordStore + ?Sized,
{
    let total_images = store.count_images()?;
    let mut classes = store.count_by_class()?;

    classes.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.class_name.cmp(&b.class_name))
    });

    let total_boxes: usize = classes.iter().map(|c| c.count).sum();
    tracing::info!(
        images = total_images,
        boxes = total_boxes,
        classes = classes.len(),
        "statistics computed"
    );

    Ok(StatsReport {
        total_images,
        total_boxes,
        classes,
        bar_width: opts.bar_width,
    })
}
