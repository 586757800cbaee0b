use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yoloprep operations.
#[derive(Debug, Error)]
pub enum YoloPrepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),

    #[error("Invalid {column} value from the database: '{value}'")]
    InvalidValue { column: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to copy image {from} to {to}: {source}")]
    ImageCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write label file {path}: {source}")]
    LabelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write data.yaml to {path}: {message}")]
    DataYamlWrite { path: PathBuf, message: String },

    #[error("Failed to load image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to display {path}: {message}")]
    Display { path: PathBuf, message: String },

    #[error("Invalid export parameters: {message}")]
    InvalidExportParams { message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
