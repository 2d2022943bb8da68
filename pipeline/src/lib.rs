//! # Popstats - population-by-state batch pipeline
//!
//! Two stages, run one after the other, connected only by a file on disk.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   raw CSV   │────▶│   Cleaner   │────▶│ cleaned CSV │────▶│ Transformer │────▶│ summary CSV │
//! │ (wide, "1,2"│     │ (coerce,    │     │ (wide, ints)│     │ (melt, mean,│     │ (one row per│
//! │  formatted) │     │  dedupe)    │     │             │     │  rank)      │     │  state)     │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use popstats::{Cleaner, Logger, PipelineConfig, Stage, Transformer};
//!
//! let config = PipelineConfig::from_env()?;
//! let logger = Logger::stderr(config.log_format);
//! if Cleaner::from_config(&config, logger.clone()).process().is_ok() {
//!     Transformer::from_config(&config, logger).process()?;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`logs`] - Instance logger
//! - [`config`] - Paths and filter settings
//! - [`models`] - Table, cells and output records
//! - [`parser`] - Delimited-text loading with auto-detection
//! - [`writer`] - Delimited-text output
//! - [`transform`] - The two stages
//! - [`validation`] - Table and summary checks

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// I/O
pub mod parser;
pub mod writer;

// Stages
pub mod transform;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    CleanError, ConfigError, LoadError, StageError, TransformError, WriteError,
};

// =============================================================================
// Re-exports - Config & logging
// =============================================================================

pub use config::PipelineConfig;
pub use logs::{LogEntry, LogFormat, LogLevel, Logger};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, LongRecord, StatePopulationRecord, Table};

// =============================================================================
// Re-exports - I/O
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, load_summary, load_table,
    parse_bytes_auto, parse_str, ParseResult,
};
pub use writer::{write_records, write_table};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use transform::{Cleaner, Stage, Transformer};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{integer_column_violations, validate_summary};
