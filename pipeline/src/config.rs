//! Pipeline configuration.
//!
//! Defaults follow the `raw/` and `processed/` directory convention. Each
//! value can be overridden from the environment (a `.env` file is loaded
//! first, if present) and then from CLI flags.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logs::LogFormat;

/// Raw input read by stage 1.
pub const DEFAULT_RAW_PATH: &str = "raw/population_by_state.csv";

/// Stage 1 output, stage 2 input.
pub const DEFAULT_CLEANED_PATH: &str = "processed/population_by_state_cleaned.csv";

/// Stage 2 output.
pub const DEFAULT_OUTPUT_PATH: &str = "processed/population_by_state_transformed.csv";

/// Label kept by the stage 2 filter (case-insensitive).
pub const DEFAULT_LABEL_FILTER: &str = "total";

pub const DEFAULT_THOUSANDS_SEPARATOR: char = ',';

pub const ENV_RAW_PATH: &str = "POPSTATS_RAW_PATH";
pub const ENV_CLEANED_PATH: &str = "POPSTATS_CLEANED_PATH";
pub const ENV_OUTPUT_PATH: &str = "POPSTATS_OUTPUT_PATH";
pub const ENV_LABEL_COLUMN: &str = "POPSTATS_LABEL_COLUMN";
pub const ENV_LABEL_FILTER: &str = "POPSTATS_LABEL_FILTER";
pub const ENV_THOUSANDS_SEPARATOR: &str = "POPSTATS_THOUSANDS_SEPARATOR";
pub const ENV_LOG_FORMAT: &str = "POPSTATS_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub raw_path: PathBuf,
    pub cleaned_path: PathBuf,
    pub output_path: PathBuf,
    /// Label column for stage 2; `None` means the first column.
    pub label_column: Option<String>,
    pub label_filter: String,
    pub thousands_separator: char,
    pub log_format: LogFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from(DEFAULT_RAW_PATH),
            cleaned_path: PathBuf::from(DEFAULT_CLEANED_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            label_column: None,
            label_filter: DEFAULT_LABEL_FILTER.to_string(),
            thousands_separator: DEFAULT_THOUSANDS_SEPARATOR,
            log_format: LogFormat::Text,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `.env` and process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `POPSTATS_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_RAW_PATH) {
            config.raw_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_CLEANED_PATH) {
            config.cleaned_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_OUTPUT_PATH) {
            config.output_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_LABEL_COLUMN) {
            config.label_column = Some(v);
        }
        if let Some(v) = get(ENV_LABEL_FILTER) {
            config.label_filter = v;
        }
        if let Some(v) = lookup(ENV_THOUSANDS_SEPARATOR) {
            config.thousands_separator = parse_separator(&v)?;
        }
        if let Some(v) = get(ENV_LOG_FORMAT) {
            config.log_format = v.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_LOG_FORMAT.to_string(),
                value: v.clone(),
                reason,
            })?;
        }

        Ok(config)
    }
}

fn parse_separator(value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_THOUSANDS_SEPARATOR.to_string(),
            value: value.to_string(),
            reason: "expected exactly one character".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = PipelineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.raw_path, PathBuf::from("raw/population_by_state.csv"));
        assert_eq!(config.label_filter, "total");
        assert_eq!(config.thousands_separator, ',');
    }

    #[test]
    fn test_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (ENV_RAW_PATH, "in.csv"),
            (ENV_OUTPUT_PATH, "out/final.csv"),
            (ENV_LABEL_COLUMN, "label_(grouping)"),
            (ENV_LABEL_FILTER, "Male"),
            (ENV_THOUSANDS_SEPARATOR, "."),
            (ENV_LOG_FORMAT, "json"),
        ]))
        .unwrap();

        assert_eq!(config.raw_path, PathBuf::from("in.csv"));
        assert_eq!(config.cleaned_path, PathBuf::from(DEFAULT_CLEANED_PATH));
        assert_eq!(config.output_path, PathBuf::from("out/final.csv"));
        assert_eq!(config.label_column.as_deref(), Some("label_(grouping)"));
        assert_eq!(config.label_filter, "Male");
        assert_eq!(config.thousands_separator, '.');
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_ignored() {
        let config =
            PipelineConfig::from_lookup(lookup_from(&[(ENV_LABEL_FILTER, "  ")])).unwrap();
        assert_eq!(config.label_filter, DEFAULT_LABEL_FILTER);
    }

    #[test]
    fn test_invalid_separator() {
        let err = PipelineConfig::from_lookup(lookup_from(&[(ENV_THOUSANDS_SEPARATOR, ",.")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_THOUSANDS_SEPARATOR));
    }

    #[test]
    fn test_invalid_log_format() {
        let err =
            PipelineConfig::from_lookup(lookup_from(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert!(err.to_string().contains("xml"));
    }
}
