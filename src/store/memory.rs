//! In-memory record store.

use std::collections::{BTreeMap, BTreeSet};

use rand::{rngs::StdRng, RngExt, SeedableRng};

use super::{ClassCount, RecordStore};
use crate::error::YoloPrepError;
use crate::record::AnnotationRecord;

/// A [`RecordStore`] backed by plain vectors.
///
/// Images are identified by their file path. Images may be registered
/// without annotations so that `count_images` and random selection see them,
/// mirroring an `images` table row with no joined `annotations`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    images: BTreeSet<String>,
    records: Vec<AnnotationRecord>,
    seed: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records; each distinct file path becomes an image.
    pub fn from_records(records: Vec<AnnotationRecord>) -> Self {
        let images = records.iter().map(|r| r.file_path.clone()).collect();
        Self {
            images,
            records,
            seed: None,
        }
    }

    /// Make random image selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Register an image that has no annotations.
    pub fn add_image(&mut self, file_path: impl Into<String>) {
        self.images.insert(file_path.into());
    }

    pub fn add_record(&mut self, record: AnnotationRecord) {
        self.images.insert(record.file_path.clone());
        self.records.push(record);
    }
}

impl RecordStore for MemoryStore {
    fn fetch(
        &mut self,
        class_filter: &[String],
        limit: usize,
    ) -> Result<Vec<AnnotationRecord>, YoloPrepError> {
        Ok(self
            .records
            .iter()
            .filter(|r| class_filter.iter().any(|c| c == &r.class_name))
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_images(&mut self) -> Result<usize, YoloPrepError> {
        Ok(self.images.len())
    }

    fn count_by_class(&mut self) -> Result<Vec<ClassCount>, YoloPrepError> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.class_name.as_str()).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(class_name, count)| ClassCount::new(class_name, count))
            .collect())
    }

    fn fetch_random_with_annotations(&mut self) -> Result<Vec<AnnotationRecord>, YoloPrepError> {
        if self.images.is_empty() {
            return Ok(Vec::new());
        }

        let index = if let Some(seed) = self.seed {
            let mut rng = StdRng::seed_from_u64(seed);
            rng.random_range(0..self.images.len())
        } else {
            let mut rng = rand::rng();
            rng.random_range(0..self.images.len())
        };

        let Some(picked) = self.images.iter().nth(index) else {
            return Ok(Vec::new());
        };

        Ok(self
            .records
            .iter()
            .filter(|r| &r.file_path == picked)
            .cloned()
            .collect())
    }
}
