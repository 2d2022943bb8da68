//! Pipeline stages.
//!
//! - Pipeline: the shared load → run → save [`Stage`] trait
//! - Clean: stage 1, raw table to typed table
//! - Reshape: stage 2, typed wide table to ranked per-state summary

pub mod clean;
pub mod pipeline;
pub mod reshape;

pub use clean::{
    coerce_numeric_columns, drop_duplicates, fill_missing, normalize_column_name,
    normalize_columns, Cleaner,
};
pub use pipeline::Stage;
pub use reshape::{filter_label, melt, summarize, unique_labels, Transformer};
