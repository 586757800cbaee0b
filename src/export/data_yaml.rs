//! `data.yaml` dataset descriptor for YOLO trainers.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::YoloPrepError;

pub const DATA_YAML_FILE_NAME: &str = "data.yaml";

#[derive(Debug, Serialize)]
struct DataYaml {
    path: String,
    train: String,
    val: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<String>,
    nc: usize,
    names: BTreeMap<usize, String>,
}

/// Build the `names` map for the exported class labels.
///
/// Labels are written verbatim into label files, so when they are all class
/// indices they map to themselves. Otherwise they are numbered in sorted
/// order.
pub(crate) fn class_names(classes: &[String]) -> BTreeMap<usize, String> {
    let distinct: BTreeSet<&str> = classes.iter().map(String::as_str).collect();

    let numeric: Option<BTreeMap<usize, String>> = distinct
        .iter()
        .map(|name| name.parse::<usize>().ok().map(|id| (id, name.to_string())))
        .collect();

    match numeric {
        Some(map) => map,
        None => {
            tracing::warn!(
                "class labels are not all numeric; data.yaml numbers them in sorted order"
            );
            distinct
                .into_iter()
                .enumerate()
                .map(|(idx, name)| (idx, name.to_string()))
                .collect()
        }
    }
}

/// Write `<output>/data.yaml` and return its path.
pub fn write_data_yaml(
    output: &Path,
    split_data: bool,
    classes: &[String],
) -> Result<PathBuf, YoloPrepError> {
    let path = output.join(DATA_YAML_FILE_NAME);

    let names = class_names(classes);
    let nc = names.keys().next_back().map_or(0, |max| max + 1);

    let descriptor = if split_data {
        DataYaml {
            path: output.display().to_string(),
            train: "train/images".to_string(),
            val: "val/images".to_string(),
            test: Some("test/images".to_string()),
            nc,
            names,
        }
    } else {
        DataYaml {
            path: output.display().to_string(),
            train: "images".to_string(),
            val: "images".to_string(),
            test: None,
            nc,
            names,
        }
    };

    let yaml = serde_yaml::to_string(&descriptor).map_err(|e| YoloPrepError::DataYamlWrite {
        path: path.clone(),
        message: e.to_string(),
    })?;

    fs::write(&path, yaml).map_err(|e| YoloPrepError::DataYamlWrite {
        path: path.clone(),
        message: e.to_string(),
    })?;

    Ok(path)
}
