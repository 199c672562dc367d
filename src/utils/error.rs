use thiserror::Error;

#[derive(Error, Debug)]
pub enum GanttError {
    #[error("Date format for {value} should be MM-YYYY")]
    FormatError { value: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data error: {message}")]
    DataError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Display error: {message}")]
    DisplayError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Problems with the chart document itself.
    Input,
    /// Style file or command line problems.
    Config,
    /// File system, font or display failures.
    System,
}

impl GanttError {
    pub fn data(message: impl Into<String>) -> Self {
        GanttError::DataError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        GanttError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GanttError::FormatError { .. }
            | GanttError::ValidationError { .. }
            | GanttError::DataError { .. } => ErrorCategory::Input,
            GanttError::ConfigError { .. } | GanttError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            GanttError::IoError(_) | GanttError::DisplayError { .. } | GanttError::RenderError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GanttError::FormatError { value } => {
                format!("Invalid date '{}': dates must be written as MM-YYYY", value)
            }
            GanttError::ValidationError { message } => format!("Invalid work package: {}", message),
            GanttError::DataError { message } => format!("Cannot load chart data: {}", message),
            GanttError::IoError(e) => format!("Cannot write chart image: {}", e),
            GanttError::ConfigError { message } => format!("Invalid style file: {}", message),
            GanttError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            GanttError::DisplayError { message } => format!("Cannot display chart: {}", message),
            GanttError::RenderError { message } => format!("Cannot draw chart: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GanttError::FormatError { .. } => "Write every date as two-digit month and four-digit year, e.g. 03-2021",
            GanttError::ValidationError { .. } => "Make sure every package ends on or after its start month",
            GanttError::DataError { .. } => {
                "Check that the file exists, is valid JSON and has 'title' and 'packages' keys with unique labels"
            }
            GanttError::IoError(_) => "Check that the output directory is writable",
            GanttError::ConfigError { .. } | GanttError::InvalidConfigValueError { .. } => {
                "Fix the style file or command line flag and run again"
            }
            GanttError::DisplayError { .. } => "Use --save to write the chart to a file instead",
            GanttError::RenderError { .. } => "Make sure a system font is installed (fontconfig on Linux)",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input => 1,
            ErrorCategory::Config => 2,
            ErrorCategory::System => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, GanttError>;
