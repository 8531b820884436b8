//! HTTP request handlers.
//!
//! Handlers are thin wrappers that delegate to `JobManager` and
//! `SettingsService`.

pub mod downloads;
pub mod health;
pub mod settings;
