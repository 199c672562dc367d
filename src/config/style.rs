use crate::core::render::RenderOptions;
use crate::domain::figure::{FontSize, TextMode};
use crate::domain::ports::ImageFormat;
use crate::utils::error::{GanttError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "img/GANTT.png";

/// `auto` defers to platform detection at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TextModeSetting {
    #[default]
    Auto,
    Plain,
    Typeset,
}

impl TextModeSetting {
    pub fn resolve(self, detect: impl FnOnce() -> TextMode) -> TextMode {
        match self {
            TextModeSetting::Auto => detect(),
            TextModeSetting::Plain => TextMode::Plain,
            TextModeSetting::Typeset => TextMode::Typeset,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub figure: FigureConfig,
    pub bars: BarConfig,
    pub milestones: MilestoneConfig,
    pub legend: LegendConfig,
    pub text: TextConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub height: f64,
    pub alpha: f64,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            height: 0.5,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneConfig {
    pub size: f64,
    pub fill: String,
    pub edge: String,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            size: 120.0,
            fill: "yellow".to_string(),
            edge: "black".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub columns: u32,
    pub font_size: FontSize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            font_size: FontSize::Medium,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub mode: TextModeSetting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

impl StyleConfig {
    /// Loads a style from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| GanttError::ConfigError {
            message: format!("cannot read '{}': {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GanttError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static VAR: OnceLock<Regex> = OnceLock::new();
        let re = VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// Render settings with the text mode already resolved.
    pub fn render_options(&self, text_mode: TextMode) -> RenderOptions {
        RenderOptions {
            width: self.figure.width,
            height: self.figure.height,
            bar_height: self.bars.height,
            bar_alpha: self.bars.alpha,
            milestone_size: self.milestones.size,
            milestone_fill: self.milestones.fill.clone(),
            milestone_edge: self.milestones.edge.clone(),
            legend_columns: self.legend.columns,
            legend_font_size: self.legend.font_size,
            text_mode,
        }
    }
}

impl Validate for StyleConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("figure.width", self.figure.width, 1)?;
        validation::validate_positive_number("figure.height", self.figure.height, 1)?;

        if self.bars.height <= 0.0 || self.bars.height > 1.0 {
            return Err(GanttError::InvalidConfigValueError {
                field: "bars.height".to_string(),
                value: self.bars.height.to_string(),
                reason: "Bar height must be greater than 0 and at most 1".to_string(),
            });
        }
        validation::validate_range("bars.alpha", self.bars.alpha, 0.0, 1.0)?;

        if self.milestones.size.is_nan() || self.milestones.size <= 0.0 {
            return Err(GanttError::InvalidConfigValueError {
                field: "milestones.size".to_string(),
                value: self.milestones.size.to_string(),
                reason: "Marker size must be positive".to_string(),
            });
        }
        validation::validate_non_empty_string("milestones.fill", &self.milestones.fill)?;
        validation::validate_non_empty_string("milestones.edge", &self.milestones.edge)?;

        validation::validate_positive_number("legend.columns", self.legend.columns, 1)?;

        validation::validate_path("output.path", &self.output.path)?;
        ImageFormat::from_path("output.path", &self.output.path)?;

        Ok(())
    }
}
