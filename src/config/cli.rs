use crate::config::style::{StyleConfig, TextModeSetting};
use crate::core::builder::Output;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "gantt-chart")]
#[command(about = "Render a Gantt chart from a JSON description of work packages")]
pub struct CliConfig {
    /// JSON file with the chart data
    #[arg(default_value = "sample.json")]
    pub data: String,

    /// Save the chart instead of showing it, optionally as --save=PATH (.png or .svg)
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub save: Option<Option<PathBuf>>,

    /// TOML file with style settings
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Override text rendering: auto, plain or typeset
    #[arg(long, value_enum)]
    pub text_mode: Option<TextModeSetting>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Style file if given, defaults otherwise, with command line overrides applied.
    pub fn style_config(&self) -> Result<StyleConfig> {
        let mut style = match &self.style {
            Some(path) => StyleConfig::from_file(path)?,
            None => StyleConfig::default(),
        };

        if let Some(mode) = self.text_mode {
            style.text.mode = mode;
        }
        if let Some(Some(path)) = &self.save {
            style.output.path = path.to_string_lossy().to_string();
        }

        Ok(style)
    }

    pub fn output(&self, style: &StyleConfig) -> Output {
        match self.save {
            Some(_) => Output::Save(Some(PathBuf::from(&style.output.path))),
            None => Output::Show,
        }
    }
}
