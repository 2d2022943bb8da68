//! Error types for the population pipeline.
//!
//! One enum per concern:
//!
//! - [`LoadError`] - reading and parsing an input file
//! - [`CleanError`] - stage 1 coercion failures
//! - [`TransformError`] - stage 2 reshape/aggregate failures
//! - [`WriteError`] - writing an output file
//! - [`StageError`] - top-level, returned by [`crate::Stage::process`]
//! - [`ConfigError`] - invalid environment overrides
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading a delimited input file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input file does not exist.
    #[error("The file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// File holds no header, or a header and no data rows.
    #[error("The file is empty")]
    EmptyInput,

    /// Malformed delimited content.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// Any other read failure.
    #[error("Failed to read {}: {source}", .path.display())]
    Unknown {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Clean Errors
// =============================================================================

/// Errors during stage 1 cleaning.
#[derive(Debug, Error)]
pub enum CleanError {
    /// A numeric cell is not an integer once separators are stripped.
    #[error("Line {line}, column '{column}' (value '{value}'): not an integer")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Errors during stage 2 reshaping.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Configured label column is not in the table header.
    #[error("Missing label column: {0}")]
    MissingColumn(String),

    /// A population cell is not an integer.
    #[error("Line {line}, column '{column}' (value '{value}'): not an integer")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },

    /// The label filter selected nothing, so there is no mean to compute.
    #[error("No rows match label '{0}'")]
    NoMatchingRows(String),
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while writing an output file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Stage Errors (top-level)
// =============================================================================

/// Top-level stage error, wrapping whichever step stopped the run.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Clean error: {0}")]
    Clean(#[from] CleanError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type LoadResult<T> = Result<T, LoadError>;

pub type CleanResult<T> = Result<T, CleanError>;

pub type TransformResult<T> = Result<T, TransformError>;

pub type WriteResult<T> = Result<T, WriteError>;

pub type StageResult<T> = Result<T, StageError>;
