use crate::domain::figure::TextMode;
use std::path::Path;

const LINUX_LATEX: &str = "/usr/bin/latex";

/// Decides once, at startup, whether text should be typeset TeX style.
///
/// On macOS a TeX distribution is assumed when `PATH` mentions `tex`; on Linux
/// when `/usr/bin/latex` exists. Other platforms always get plain text.
pub fn detect_text_mode() -> TextMode {
    let path_var = std::env::var("PATH").ok();
    let mode = detect_from(std::env::consts::OS, path_var.as_deref(), |p| p.is_file());
    tracing::debug!("Detected text mode {:?} on {}", mode, std::env::consts::OS);
    mode
}

pub fn detect_from<F>(os: &str, path_var: Option<&str>, file_exists: F) -> TextMode
where
    F: Fn(&Path) -> bool,
{
    let found = match os {
        "macos" => path_var.is_some_and(|p| p.contains("tex")),
        "linux" => file_exists(Path::new(LINUX_LATEX)),
        _ => false,
    };

    if found {
        TextMode::Typeset
    } else {
        TextMode::Plain
    }
}
