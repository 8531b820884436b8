//! Command-line configuration for the `albumdl` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use albumdl_core::{DEFAULT_AUDIO_FORMAT, Settings, default_download_dir};
use albumdl_download::DEFAULT_MAX_CONCURRENT_JOBS;

use crate::bootstrap::{CorsConfig, ServerConfig};

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,albumdl=debug";

/// Album download service.
#[derive(Debug, Parser)]
#[command(name = "albumdl", version, about)]
pub struct Cli {
    /// Interface to bind
    #[arg(long, env = "ALBUMDL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// HTTP port
    #[arg(short, long, env = "ALBUMDL_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Base directory for downloads [default: ~/Downloads/SpotifyDownloads]
    #[arg(long, env = "ALBUMDL_DOWNLOAD_PATH")]
    pub download_path: Option<PathBuf>,

    /// Initial audio format
    #[arg(long, env = "ALBUMDL_AUDIO_FORMAT", default_value = DEFAULT_AUDIO_FORMAT)]
    pub audio_format: String,

    /// Album downloader executable
    #[arg(long, env = "ALBUMDL_DOWNLOADER", default_value = "spotdl")]
    pub downloader: String,

    /// Cover-art fixer executable
    #[arg(long, env = "ALBUMDL_COVER_ART_PROGRAM", default_value = "python")]
    pub cover_art_program: String,

    /// Cover-art fixer arguments, space separated; `--path <dir>` is appended
    #[arg(
        long,
        env = "ALBUMDL_COVER_ART_ARGS",
        value_delimiter = ' ',
        allow_hyphen_values = true,
        default_value = "-m get_cover_art"
    )]
    pub cover_art_args: Vec<String>,

    /// Per-command timeout in seconds
    #[arg(long, env = "ALBUMDL_COMMAND_TIMEOUT_SECS", default_value_t = 600)]
    pub command_timeout_secs: u64,

    /// Jobs allowed to download at once
    #[arg(long, env = "ALBUMDL_MAX_CONCURRENT_JOBS", default_value_t = DEFAULT_MAX_CONCURRENT_JOBS)]
    pub max_concurrent_jobs: usize,

    /// Allowed CORS origin (repeatable); any origin when omitted
    #[arg(long = "allowed-origin", env = "ALBUMDL_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        let cors = if self.allowed_origins.is_empty() {
            CorsConfig::AllowAll
        } else {
            CorsConfig::AllowOrigins(self.allowed_origins)
        };

        ServerConfig {
            host: self.host,
            port: self.port,
            downloader_program: self.downloader,
            cover_art_program: self.cover_art_program,
            cover_art_args: self.cover_art_args,
            command_timeout: Duration::from_secs(self.command_timeout_secs),
            max_concurrent_jobs: self.max_concurrent_jobs,
            initial_settings: Settings {
                download_path: self.download_path.unwrap_or_else(default_download_dir),
                audio_format: self.audio_format.trim().to_ascii_lowercase(),
            },
            cors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_default_config() {
        let config = Cli::try_parse_from(["albumdl"]).unwrap().into_config();
        let defaults = ServerConfig::with_defaults();

        assert_eq!(config.bind_address(), defaults.bind_address());
        assert_eq!(config.cover_art_args, defaults.cover_art_args);
        assert_eq!(config.command_timeout, defaults.command_timeout);
        assert_eq!(config.initial_settings, defaults.initial_settings);
        assert_eq!(config.cors, CorsConfig::AllowAll);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Cli::try_parse_from([
            "albumdl",
            "--port",
            "9000",
            "--download-path",
            "/srv/music",
            "--audio-format",
            "FLAC",
            "--max-concurrent-jobs",
            "1",
            "--allowed-origin",
            "chrome-extension://abc,http://localhost:3000",
        ])
        .unwrap()
        .into_config();

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.initial_settings.download_path,
            PathBuf::from("/srv/music")
        );
        assert_eq!(config.initial_settings.audio_format, "flac");
        assert_eq!(config.max_concurrent_jobs, 1);
        assert_eq!(
            config.cors,
            CorsConfig::AllowOrigins(vec![
                "chrome-extension://abc".to_string(),
                "http://localhost:3000".to_string()
            ])
        );
    }
}
