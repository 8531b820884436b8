//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete implementations are instantiated here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use albumdl_core::{
    CommandRunner, DEFAULT_COMMAND_TIMEOUT, Settings, SettingsService, validate_settings,
};
use albumdl_download::{
    DEFAULT_MAX_CONCURRENT_JOBS, JobManager, JobManagerConfig, TokioCommandRunner, ToolConfig,
};

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (the browser extension runs on its own origin).
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server, echoed by `/health`.
    pub port: u16,
    /// Album downloader executable.
    pub downloader_program: String,
    /// Cover-art fixer executable.
    pub cover_art_program: String,
    /// Arguments placed before `--path <dir>` for the cover-art fixer.
    pub cover_art_args: Vec<String>,
    /// Wall-clock limit per external command.
    pub command_timeout: Duration,
    /// Jobs allowed to download at once.
    pub max_concurrent_jobs: usize,
    /// Settings in effect until the first `POST /settings`.
    pub initial_settings: Settings,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default programs and paths.
    pub fn with_defaults() -> Self {
        let tools = ToolConfig::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            downloader_program: tools.downloader,
            cover_art_program: tools.cover_art_program,
            cover_art_args: tools.cover_art_args,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            initial_settings: Settings::with_defaults(),
            cors: CorsConfig::default(),
        }
    }

    /// Job manager configuration derived from this server config.
    pub fn job_manager_config(&self) -> JobManagerConfig {
        JobManagerConfig {
            tools: ToolConfig {
                downloader: self.downloader_program.clone(),
                cover_art_program: self.cover_art_program.clone(),
                cover_art_args: self.cover_art_args.clone(),
                timeout: self.command_timeout,
            },
            max_concurrent_jobs: self.max_concurrent_jobs,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Job scheduling and the job store.
    pub manager: Arc<JobManager>,
    /// Live download settings.
    pub settings: Arc<SettingsService>,
    /// Port reported by `/health`.
    pub port: u16,
}

/// Wire settings, the process runner and the job manager together.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    validate_settings(&config.initial_settings).context("Invalid initial settings")?;

    info!(
        target: "albumdl.settings",
        download_path = %config.initial_settings.download_path.display(),
        audio_format = %config.initial_settings.audio_format,
        "Initial settings"
    );

    let settings = Arc::new(SettingsService::new(config.initial_settings.clone()));
    let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner::new());
    let manager = Arc::new(JobManager::new(
        Arc::clone(&settings),
        runner,
        config.job_manager_config(),
    ));

    Ok(AxumContext {
        manager,
        settings,
        port: config.port,
    })
}

/// Start the web server and serve until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config)?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(target: "albumdl.http", "albumdl listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target: "albumdl.http", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "albumdl.http", error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
