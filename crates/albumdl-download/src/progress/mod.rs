//! Downloader output parsing.
//!
//! The parser is pure: the same line applied to the same state always gives
//! the same result, so it is tested line by line without any process.

mod parser;

pub use parser::{LineSignals, apply_line, classify_line};
