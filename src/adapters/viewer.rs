use crate::domain::ports::Viewer;
use crate::utils::error::{GanttError, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Opens the chart with the platform's default image viewer.
#[derive(Debug, Clone, Default)]
pub struct SystemViewer {
    scratch_dir: Option<PathBuf>,
}

impl SystemViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory for the temporary image; defaults to the system temp dir.
    pub fn with_scratch_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: Some(dir.into()),
        }
    }

    fn opener(path: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", path]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }

    /// Writes the image to a uniquely named `gantt-*.<extension>` file in the scratch dir.
    ///
    /// The file is kept: `open`, `start` and `xdg-open` return before the viewer
    /// has read it, so it is left for the OS temp cleaner.
    pub fn write_scratch_image(&self, image: &[u8], extension: &str) -> Result<PathBuf> {
        let dir = self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir)?;

        let mut file = tempfile::Builder::new()
            .prefix("gantt-")
            .suffix(&format!(".{}", extension))
            .tempfile_in(&dir)?;
        file.write_all(image)?;
        file.flush()?;

        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }
}

impl Viewer for SystemViewer {
    fn show(&self, image: &[u8], extension: &str) -> Result<()> {
        let path = self.write_scratch_image(image, extension)?;

        let display_path = path.to_string_lossy().to_string();
        tracing::info!("🖼️ Opening {}", display_path);

        let status = Self::opener(&display_path)
            .status()
            .map_err(|e| GanttError::DisplayError {
                message: format!("cannot launch image viewer: {}", e),
            })?;

        if !status.success() {
            return Err(GanttError::DisplayError {
                message: format!("image viewer exited with {}", status),
            });
        }
        Ok(())
    }
}
