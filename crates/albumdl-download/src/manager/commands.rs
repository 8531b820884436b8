//! External tool invocations.

use std::path::Path;
use std::time::Duration;

use albumdl_core::{CommandSpec, DEFAULT_COMMAND_TIMEOUT};

/// Programs the worker shells out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Album downloader, invoked as `<downloader> <url> --output <dir> --format <fmt>`.
    pub downloader: String,
    /// Cover-art fixer program.
    pub cover_art_program: String,
    /// Leading arguments for the cover-art fixer; `--path <dir>` is appended.
    pub cover_art_args: Vec<String>,
    /// Wall-clock limit applied to every command.
    pub timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            downloader: "spotdl".to_string(),
            cover_art_program: "python".to_string(),
            cover_art_args: vec!["-m".to_string(), "get_cover_art".to_string()],
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl ToolConfig {
    /// Download command, run inside the target directory.
    pub fn download_command(&self, url: &str, target: &Path, format: &str) -> CommandSpec {
        CommandSpec::new(&self.downloader)
            .arg(url)
            .arg("--output")
            .arg(target.to_string_lossy())
            .arg("--format")
            .arg(format)
            .current_dir(target)
            .timeout(self.timeout)
    }

    /// Cover-art fix command for a finished directory.
    pub fn cover_art_command(&self, target: &Path) -> CommandSpec {
        CommandSpec::new(&self.cover_art_program)
            .args(&self.cover_art_args)
            .arg("--path")
            .arg(target.to_string_lossy())
            .current_dir(target)
            .timeout(self.timeout)
    }
}
