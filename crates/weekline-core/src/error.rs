//! Core error types for weekline-core.
//!
//! Layout itself never fails because of bad task data: malformed tasks are
//! dropped and logged. The errors below exist at the boundaries only
//! (configuration, timestamp parsing, gesture contracts, persistence).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::task::TimestampField;
use crate::gesture::Edge;

/// Core error type for weekline-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Interval validation errors
    #[error("Time range error: {0}")]
    TimeRange(#[from] TimeRangeError),

    /// Timestamp parsing errors
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// Gesture contract errors
    #[error("Gesture error: {0}")]
    Gesture(#[from] GestureError),

    /// Task lookup failed
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by the time range validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeRangeError {
    /// End does not come after start
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Positive but shorter than the configured minimum
    #[error("Time range too short: {duration_ms}ms is below the minimum of {minimum_ms}ms")]
    TooShort { duration_ms: i64, minimum_ms: i64 },

    /// Drop target names an hour or quarter outside the day grid
    #[error("Drop target {hour}h quarter {quarter_index} is outside the day grid")]
    OutsideGrid { hour: u32, quarter_index: u32 },

    /// Adjustment could not produce a positive-duration interval
    #[error("Time range could not be adjusted to a positive duration")]
    Unrecoverable,
}

/// A task timestamp that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse {field} timestamp '{value}'")]
pub struct TimestampError {
    pub field: TimestampField,
    pub value: String,
}

/// Gesture events that are not legal in the current gesture state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// The event does not apply to the current state
    #[error("Cannot {event} while {state}")]
    IllegalTransition {
        event: &'static str,
        state: &'static str,
    },

    /// A resize gesture finished on an edge other than the one it started on
    #[error("Resize started on the {started:?} edge but finished on {finished:?}")]
    EdgeMismatch { started: Edge, finished: Edge },

    /// The task being dragged has no displayable interval
    #[error("Task '{0}' has no displayable interval")]
    NoInterval(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
