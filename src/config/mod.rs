#[cfg(feature = "cli")]
pub mod cli;
pub mod style;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use style::{StyleConfig, TextModeSetting, DEFAULT_OUTPUT_PATH};
