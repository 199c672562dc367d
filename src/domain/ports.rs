use crate::domain::figure::Figure;
use crate::utils::error::Result;
use crate::utils::validation;
use std::path::Path;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Whether the renderer crops the image to its drawn content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trim {
    None,
    Tight,
}

/// Image encodings a chart can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub const EXTENSIONS: [&'static str; 2] = ["png", "svg"];

    /// Picks the format from the file extension, case-insensitively.
    pub fn from_path(field_name: &str, path: &str) -> Result<Self> {
        validation::validate_file_extension(field_name, path, &Self::EXTENSIONS)?;

        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        Ok(match extension.as_deref() {
            Some("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

pub trait Renderer {
    fn render(&self, figure: &Figure, format: ImageFormat, trim: Trim) -> Result<Vec<u8>>;
}

pub trait Viewer {
    fn show(&self, image: &[u8], extension: &str) -> Result<()>;
}
