//! Destinations for an annotated preview image.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{ImageFormat, RgbaImage};

use crate::error::YoloPrepError;

/// Something that can present an annotated image.
pub trait ImageSink {
    /// Show or store `image`; returns where it ended up on disk.
    fn show(&mut self, image: &RgbaImage) -> Result<PathBuf, YoloPrepError>;
}

/// Writes the image to a temporary PNG and opens it with an image viewer.
///
/// The temporary file is kept so the viewer can still read it after this
/// process exits.
#[derive(Clone, Debug, Default)]
pub struct SystemViewer {
    /// Viewer program; `None` uses the platform opener.
    pub program: Option<String>,
}

impl SystemViewer {
    pub fn new(program: Option<String>) -> Self {
        Self { program }
    }

    fn command(&self, path: &Path) -> Command {
        if let Some(program) = &self.program {
            let mut cmd = Command::new(program);
            cmd.arg(path);
            return cmd;
        }

        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl ImageSink for SystemViewer {
    fn show(&mut self, image: &RgbaImage) -> Result<PathBuf, YoloPrepError> {
        let temp = tempfile::Builder::new()
            .prefix("yoloprep-preview-")
            .suffix(".png")
            .tempfile()?;
        let (_file, path) = temp.keep().map_err(|e| YoloPrepError::Io(e.error))?;

        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| YoloPrepError::ImageSave {
                path: path.clone(),
                source,
            })?;

        let mut cmd = self.command(&path);
        tracing::debug!(command = ?cmd, "launching image viewer");
        let status = cmd.status().map_err(|e| YoloPrepError::Display {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if !status.success() {
            return Err(YoloPrepError::Display {
                path,
                message: format!("viewer exited with {}", status),
            });
        }

        Ok(path)
    }
}

/// Saves the image to a fixed path; the format follows the file extension.
#[derive(Clone, Debug)]
pub struct SaveToFile {
    pub path: PathBuf,
}

impl SaveToFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSink for SaveToFile {
    fn show(&mut self, image: &RgbaImage) -> Result<PathBuf, YoloPrepError> {
        image
            .save(&self.path)
            .map_err(|source| YoloPrepError::ImageSave {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.path.clone())
    }
}
