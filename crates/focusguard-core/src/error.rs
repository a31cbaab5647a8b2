//! Core error types for focusguard-core.
//!
//! Camera acquisition failures are the only errors that reach the consumer as a
//! terminal attention state. Detector, frame and penalty failures are recovered
//! inside the engine and only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Error type of the file-backed operations: loading config and replaying
/// trace files.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Trace parse errors
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// A trace file could not be read
    #[error("Cannot read {path}: {source}")]
    ReadTrace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Camera acquisition errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or platform refused camera access.
    #[error("Camera access denied")]
    PermissionDenied,

    /// Any capture failure not attributable to permissions.
    #[error("Camera device error: {0}")]
    Device(String),
}

/// Landmark detector errors. Never surfaced to the session controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectorError {
    /// A landmark backend could not be initialized.
    #[error("Failed to load landmark backend '{backend}': {message}")]
    ModelLoad { backend: String, message: String },

    /// Detection threw while processing a single frame.
    #[error("Frame processing failed: {0}")]
    FrameProcessing(String),
}

/// Idle-penalty helper failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Idle penalty service unavailable: {0}")]
pub struct PenaltyError(pub String);

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not determine the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its permitted range
    #[error("Value {value} for '{field}' is out of range {min}..={max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Trace replay errors.
#[derive(Error, Debug)]
pub enum TraceError {
    /// A trace line could not be parsed
    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Entries must be ordered by timestamp
    #[error("Entry at line {line} goes back in time ({at_ms} < {previous_ms})")]
    OutOfOrder {
        line: usize,
        at_ms: u64,
        previous_ms: u64,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
