//! Job engine for albumdl.
//!
//! Runs one background task per download request: the task invokes the
//! external downloader, feeds its stdout through the progress parser into
//! the job store, runs the best-effort cover-art fixer and finalizes the job.
//!
//! - `runner` - `TokioCommandRunner`, the process-backed `CommandRunner`
//! - `progress` - pure downloader-output parser
//! - `store` - concurrent in-memory job store
//! - `manager` - job scheduling (`JobManager`) and the per-job worker

#![deny(unused_crate_dependencies)]

pub mod manager;
pub mod progress;
pub mod runner;
pub mod store;

pub use manager::{
    DEFAULT_MAX_CONCURRENT_JOBS, JobError, JobManager, JobManagerConfig, ToolConfig,
};
pub use progress::{LineSignals, apply_line, classify_line};
pub use runner::TokioCommandRunner;
pub use store::JobStore;

// Silence unused dev-dependency warnings in the lib test target
#[cfg(test)]
use tempfile as _;
