pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{plot::PlotRenderer, storage::LocalStorage, viewer::SystemViewer};
pub use config::StyleConfig;
pub use core::builder::{ChartBuilder, Output};
pub use core::render::RenderOptions;
pub use domain::model::WorkPackage;
pub use domain::ports::ImageFormat;
pub use utils::error::{GanttError, Result};
