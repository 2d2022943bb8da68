//! Stage 1: turn a raw, human-formatted table into a typed one.
//!
//! ```text
//! Label (Grouping) | New York     →   label_(grouping) | new_york
//! Total            | "19,677,151" →   Total            | 19677151
//! Male             | ""           →   Male             | 0
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::error::{CleanError, CleanResult, StageResult, WriteResult};
use crate::logs::Logger;
use crate::models::{Cell, Table};
use crate::transform::pipeline::Stage;
use crate::validation::integer_column_violations;
use crate::writer::write_table;

/// Normalize a column name: trim, lowercase, spaces to underscores.
///
/// Idempotent: normalizing a normalized name returns it unchanged.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Parse every column after the first as an integer, stripping `separator` first.
///
/// Blank cells (and cells that were only separators) stay missing.
pub fn coerce_numeric_columns(table: Table, separator: char) -> CleanResult<Table> {
    let (columns, rows) = table.into_parts();

    let mut coerced = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.into_iter().enumerate() {
        let mut out = Vec::with_capacity(row.len());
        for (col_idx, cell) in row.into_iter().enumerate() {
            if col_idx == 0 {
                out.push(cell);
                continue;
            }
            let cell = match cell {
                Cell::Text(raw) => {
                    let stripped: String = raw.chars().filter(|&c| c != separator).collect();
                    let stripped = stripped.trim();
                    if stripped.is_empty() {
                        Cell::Missing
                    } else {
                        let n = stripped.parse::<i64>().map_err(|_| CleanError::Parse {
                            // +1 for 0-index, +1 for header
                            line: row_idx + 2,
                            column: columns[col_idx].clone(),
                            value: raw.clone(),
                        })?;
                        Cell::Int(n)
                    }
                }
                other => other,
            };
            out.push(cell);
        }
        coerced.push(out);
    }

    Ok(Table::new(columns, coerced))
}

/// Replace every missing cell, label column included, with `0`.
pub fn fill_missing(table: Table) -> Table {
    let (columns, rows) = table.into_parts();
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| if cell.is_missing() { Cell::Int(0) } else { cell })
                .collect()
        })
        .collect();
    Table::new(columns, rows)
}

/// Drop rows equal to an earlier row; survivors keep their order.
pub fn drop_duplicates(table: Table) -> Table {
    let (columns, mut rows) = table.into_parts();
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.clone()));
    Table::new(columns, rows)
}

/// Apply [`normalize_column_name`] to every header.
pub fn normalize_columns(table: Table) -> Table {
    let (columns, rows) = table.into_parts();
    let columns = columns.iter().map(|c| normalize_column_name(c)).collect();
    Table::new(columns, rows)
}

/// Stage 1 of the pipeline.
#[derive(Debug, Clone)]
pub struct Cleaner {
    input: PathBuf,
    output: PathBuf,
    thousands_separator: char,
    logger: Logger,
}

impl Cleaner {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        thousands_separator: char,
        logger: Logger,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            thousands_separator,
            logger,
        }
    }

    /// Reads `raw_path`, writes `cleaned_path`.
    pub fn from_config(config: &PipelineConfig, logger: Logger) -> Self {
        Self::new(
            &config.raw_path,
            &config.cleaned_path,
            config.thousands_separator,
            logger,
        )
    }

    /// Coerce, fill, check, deduplicate and rename.
    ///
    /// A cell that is not an integer aborts the run; a non-integer column
    /// surviving coercion is only a warning.
    pub fn clean(&self, table: Table) -> CleanResult<Table> {
        let table = match coerce_numeric_columns(table, self.thousands_separator) {
            Ok(t) => t,
            Err(e) => {
                self.logger.error(format!("Error: {}", e));
                return Err(e);
            }
        };

        let table = fill_missing(table);

        for column in integer_column_violations(&table) {
            self.logger
                .warning(format!("Warning: Column {} contains non-integer values.", column));
        }

        let before = table.shape().0;
        let table = drop_duplicates(table);
        let removed = before - table.shape().0;
        if removed > 0 {
            self.logger.info(format!("Removed {} duplicate rows", removed));
        }

        let table = normalize_columns(table);

        self.logger.info("Data cleaned successfully");
        Ok(table)
    }
}

impl Stage for Cleaner {
    type Output = Table;

    fn logger(&self) -> &Logger {
        &self.logger
    }

    fn input_path(&self) -> &Path {
        &self.input
    }

    fn output_path(&self) -> &Path {
        &self.output
    }

    fn run(&self, table: Table) -> StageResult<Table> {
        Ok(self.clean(table)?)
    }

    fn write(&self, output: &Table, path: &Path) -> WriteResult<()> {
        write_table(output, path)
    }
}
