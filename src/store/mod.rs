//! Record store abstraction.
//!
//! Every operation talks to the database through the narrow [`RecordStore`]
//! trait, so the export, stats and preview logic can run against
//! [`MemoryStore`] in tests and against [`PostgresStore`] in production.

mod memory;
mod postgresql;

pub use memory::MemoryStore;
pub use postgresql::PostgresStore;

use serde::Serialize;

use crate::error::YoloPrepError;
use crate::record::AnnotationRecord;

/// Number of bounding boxes carrying one class label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub class_name: String,
    pub count: usize,
}

impl ClassCount {
    pub fn new(class_name: impl Into<String>, count: usize) -> Self {
        Self {
            class_name: class_name.into(),
            count,
        }
    }
}

/// Query interface over the images/annotations store.
pub trait RecordStore {
    /// Fetch up to `limit` annotation records whose class is in `class_filter`.
    ///
    /// No ordering is requested; callers shuffle the result themselves.
    fn fetch(
        &mut self,
        class_filter: &[String],
        limit: usize,
    ) -> Result<Vec<AnnotationRecord>, YoloPrepError>;

    /// Total number of images in the store, annotated or not.
    fn count_images(&mut self) -> Result<usize, YoloPrepError>;

    /// Bounding-box count per distinct class label.
    fn count_by_class(&mut self) -> Result<Vec<ClassCount>, YoloPrepError>;

    /// All annotations of one image picked uniformly at random.
    ///
    /// Every returned record shares the same `file_path`. An empty vector
    /// means the store has no images (or the picked image has no boxes).
    fn fetch_random_with_annotations(&mut self) -> Result<Vec<AnnotationRecord>, YoloPrepError>;
}
