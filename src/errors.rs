//! Structured error types for each boundary of the harness.
//!
//! Nothing here is ever allowed to unwind past a tournament task; see
//! `tournament::run_match_catching`.

use thiserror::Error;

/// Failures while reading or validating a map file.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("could not read map file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("map '{name}' has fewer than 5 header lines")]
    TruncatedHeader { name: String },
    #[error("map '{name}' header line {line}: expected 'key = value', got '{text}'")]
    MalformedHeaderLine { name: String, line: usize, text: String },
    #[error("map '{name}' header key '{key}' is not a non-negative integer: '{value}'")]
    InvalidHeaderValue { name: String, key: String, value: String },
    #[error("map '{name}' declares non-positive Rows or Cols")]
    NonPositiveDimension { name: String },
    #[error("map '{name}' contains no tanks")]
    NoTanks { name: String },
}

/// Failures while loading or registering a plugin library.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("could not open library '{path}': {reason}")]
    LoadFailed { path: String, reason: String },
    #[error("library '{path}' does not export 'tank_arena_register'")]
    MissingEntryPoint { path: String },
    #[error("registration from '{path}' is incomplete: {reason}")]
    IncompleteRegistration { path: String, reason: String },
    #[error("no factory named '{name}' is registered")]
    UnknownFactory { name: String },
}

/// Failures in CLI argument parsing or mode selection.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("not enough algorithms to run: need at least 2, found {found}")]
    InsufficientAlgorithms { found: usize },
    #[error("not enough game managers to run: need at least 2, found {found}")]
    InsufficientEngines { found: usize },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
}
