//! Export summary types and terminal formatting.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::split::{SplitName, SplitSizes};

/// What an export wrote, split by split.
#[derive(Clone, Debug, Serialize)]
pub struct ExportSummary {
    /// Output root.
    pub output: PathBuf,
    /// Requested row limit (`-n`).
    pub requested: usize,
    /// Annotation rows actually returned by the store.
    pub fetched: usize,
    /// Class filter the query ran with.
    pub classes: Vec<String>,
    pub split_data: bool,
    /// Computed split sizes; `None` for a flat export.
    pub sizes: Option<SplitSizes>,
    pub splits: Vec<SplitSummary>,
    /// Path of the written `data.yaml`, if any.
    pub data_yaml: Option<PathBuf>,
}

impl ExportSummary {
    /// Distinct images copied across all splits.
    pub fn total_images(&self) -> usize {
        self.splits.iter().map(|s| s.images).sum()
    }

    pub fn total_records(&self) -> usize {
        self.splits.iter().map(|s| s.records).sum()
    }

    pub fn split(&self, name: SplitName) -> Option<&SplitSummary> {
        self.splits.iter().find(|s| s.name == name)
    }
}

/// Counts for one split.
#[derive(Clone, Debug, Serialize)]
pub struct SplitSummary {
    pub name: SplitName,
    /// Annotation records (label lines) written.
    pub records: usize,
    /// Distinct images copied.
    pub images: usize,
    /// Label files written.
    pub label_files: usize,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

impl SplitSummary {
    pub fn new(name: SplitName, images_dir: &Path, labels_dir: &Path) -> Self {
        Self {
            name,
            records: 0,
            images: 0,
            label_files: 0,
            images_dir: images_dir.to_path_buf(),
            labels_dir: labels_dir.to_path_buf(),
        }
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Data ({} images) exported successfully to {}.",
            self.requested,
            self.output.display()
        )?;
        writeln!(
            f,
            "  {} annotation(s) fetched for class(es): {}",
            self.fetched,
            self.classes.join(", ")
        )?;

        for split in &self.splits {
            writeln!(
                f,
                "  {:<6} {:>7} annotation(s) {:>7} image(s) -> {}",
                split.name,
                split.records,
                split.images,
                split.images_dir.display()
            )?;
        }

        if let Some(path) = &self.data_yaml {
            writeln!(f, "  dataset descriptor: {}", path.display())?;
        }

        Ok(())
    }
}
