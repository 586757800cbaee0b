//! Dataset export into the YOLO training layout.
//!
//! Records are fetched from a [`RecordStore`], shuffled once, partitioned
//! into train/val/test (or a single flat bucket) and materialized as:
//!
//! ```text
//! <output>/train/images/…   <output>/train/labels/…
//! <output>/val/images/…     <output>/val/labels/…
//! <output>/test/images/…    <output>/test/labels/…
//! <output>/data.yaml
//! ```
//!
//! or `<output>/images/` + `<output>/labels/` when splitting is disabled.

mod data_yaml;
mod report;

pub use data_yaml::{write_data_yaml, DATA_YAML_FILE_NAME};
pub use report::{ExportSummary, SplitSummary};

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::YoloPrepError;
use crate::record::AnnotationRecord;
use crate::split::{compute_split_sizes, partition, shuffle_records, SplitName, SplitRatios};
use crate::store::RecordStore;

/// Class filter used when none is requested.
pub const DEFAULT_CLASSES: &[&str] = &["0"];

const RATIO_SUM_TOLERANCE: f64 = 1e-6;

/// Export options.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Maximum number of annotation rows to fetch.
    pub num_records: usize,
    /// Write train/val/test subfolders instead of one flat pair.
    pub split_data: bool,
    pub ratios: SplitRatios,
    /// Allowed class labels; empty means [`DEFAULT_CLASSES`].
    pub classes: Vec<String>,
    /// Seed for the shuffle. `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Also write `data.yaml` at the output root.
    pub write_data_yaml: bool,
}

impl ExportOptions {
    pub fn new(num_records: usize) -> Self {
        Self {
            num_records,
            split_data: true,
            ratios: SplitRatios::default(),
            classes: Vec::new(),
            seed: None,
            write_data_yaml: true,
        }
    }

    /// Class filter without empty or repeated labels, falling back to the
    /// default class. Labels are otherwise matched exactly as given.
    pub fn effective_classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = Vec::new();
        for class in &self.classes {
            if !class.is_empty() && !classes.contains(class) {
                classes.push(class.clone());
            }
        }

        if classes.is_empty() {
            DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect()
        } else {
            classes
        }
    }
}

/// Validate export options before touching the store.
///
/// Ratio sums other than 1.0 are accepted; the remainder always goes to test.
/// A zero record limit is valid and yields an empty layout.
pub fn validate_export_options(opts: &ExportOptions) -> Result<(), YoloPrepError> {
    opts.ratios
        .check()
        .map_err(|message| YoloPrepError::InvalidExportParams { message })?;

    if opts.split_data && (opts.ratios.sum() - 1.0).abs() > RATIO_SUM_TOLERANCE {
        tracing::warn!(
            train = opts.ratios.train,
            val = opts.ratios.val,
            test = opts.ratios.test,
            "split ratios do not sum to 1.0; the test split receives the remainder"
        );
    }

    Ok(())
}

/// Image and label directories for one split.
pub fn split_dirs(output: &Path, split: SplitName) -> (PathBuf, PathBuf) {
    let base = match split {
        SplitName::All => output.to_path_buf(),
        named => output.join(named.as_str()),
    };
    (base.join("images"), base.join("labels"))
}

/// The splits an export writes to, in write order.
fn layout_splits(split_data: bool) -> &'static [SplitName] {
    if split_data {
        &[SplitName::Train, SplitName::Val, SplitName::Test]
    } else {
        &[SplitName::All]
    }
}

/// Fetch, shuffle, split and write a dataset to `output`.
pub fn export_dataset<S>(
    store: &mut S,
    output: &Path,
    opts: &ExportOptions,
) -> Result<ExportSummary, YoloPrepError>
where
    S: RecordStore + ?Sized,
{
    validate_export_options(opts)?;

    let classes = opts.effective_classes();
    tracing::info!(
        output = %output.display(),
        limit = opts.num_records,
        classes = ?classes,
        split = opts.split_data,
        "starting export"
    );

    let mut records = store.fetch(&classes, opts.num_records)?;
    shuffle_records(&mut records, opts.seed);
    let fetched = records.len();

    for split in layout_splits(opts.split_data) {
        let (images_dir, labels_dir) = split_dirs(output, *split);
        fs::create_dir_all(&images_dir)?;
        fs::create_dir_all(&labels_dir)?;
    }

    let sizes = opts
        .split_data
        .then(|| compute_split_sizes(fetched, &opts.ratios));

    let mut exported_classes: Vec<String> = Vec::new();
    let mut splits = Vec::new();
    for (split, split_records) in partition(records, opts.split_data, &opts.ratios) {
        for record in &split_records {
            if !exported_classes.contains(&record.class_name) {
                exported_classes.push(record.class_name.clone());
            }
        }

        let (images_dir, labels_dir) = split_dirs(output, split);
        let summary = write_split(split, &split_records, &images_dir, &labels_dir)?;
        tracing::debug!(
            split = %split,
            records = summary.records,
            images = summary.images,
            "split written"
        );
        splits.push(summary);
    }

    let data_yaml = if opts.write_data_yaml {
        Some(write_data_yaml(output, opts.split_data, &exported_classes)?)
    } else {
        None
    };

    let summary = ExportSummary {
        output: output.to_path_buf(),
        requested: opts.num_records,
        fetched,
        classes,
        split_data: opts.split_data,
        sizes,
        splits,
        data_yaml,
    };

    tracing::info!(
        fetched = summary.fetched,
        images = summary.total_images(),
        "export completed"
    );

    Ok(summary)
}

/// Copy images and write label files for one split.
///
/// Each distinct image is copied once, the first time its file name is seen.
/// The label file of an image is rewritten from scratch after every appended
/// line, so it always holds exactly this run's lines for this split.
pub fn write_split(
    split: SplitName,
    records: &[AnnotationRecord],
    images_dir: &Path,
    labels_dir: &Path,
) -> Result<SplitSummary, YoloPrepError> {
    let mut label_data: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut summary = SplitSummary::new(split, images_dir, labels_dir);

    for record in records {
        let file_name = record.output_file_name();

        let lines = match label_data.entry(file_name) {
            Entry::Vacant(entry) => {
                copy_image(record, &images_dir.join(entry.key()))?;
                summary.images += 1;
                entry.insert(Vec::new())
            }
            Entry::Occupied(entry) => entry.into_mut(),
        };

        lines.push(record.to_label_line());

        let label_path = labels_dir.join(record.label_file_name());
        fs::write(&label_path, lines.join("\n")).map_err(|source| {
            YoloPrepError::LabelWrite {
                path: label_path.clone(),
                source,
            }
        })?;

        summary.records += 1;
    }

    summary.label_files = label_data.len();
    Ok(summary)
}

fn copy_image(record: &AnnotationRecord, dest: &Path) -> Result<(), YoloPrepError> {
    fs::copy(&record.file_path, dest).map_err(|source| YoloPrepError::ImageCopy {
        from: PathBuf::from(&record.file_path),
        to: dest.to_path_buf(),
        source,
    })?;
    Ok(())
}
