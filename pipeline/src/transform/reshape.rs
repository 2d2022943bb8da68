//! Stage 2: melt the cleaned wide table and rank states.
//!
//! ```text
//! label | ca | wy            state | state_population | us_avg_population | PercentDiffFromUSAvg | Population_Rank
//! Total | 39 | 1      →      ca    | 39               | 20                | 95.0                 | 1
//! Male  | 20 | 1             wy    | 1                | 20                | -95.0                | 2
//! ```
//!
//! Ties in population are ranked first-seen-wins: the state whose column
//! comes first in the input gets the better rank, so ranks are always
//! `1..=N` with no gaps or shared values.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::error::{StageResult, TransformError, TransformResult, WriteResult};
use crate::logs::Logger;
use crate::models::{Cell, LongRecord, StatePopulationRecord, Table};
use crate::transform::pipeline::Stage;
use crate::writer::write_records;

/// Round half to even at `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

fn parse_population(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Int(n) => Some(*n),
        Cell::Text(s) => s.trim().parse().ok(),
        Cell::Missing => None,
    }
}

/// Wide to long: one record per (row, non-label column), column by column.
pub fn melt(table: &Table, label_column: usize) -> TransformResult<Vec<LongRecord>> {
    let mut records = Vec::with_capacity(table.rows().len() * table.columns().len());

    for (col_idx, state) in table.columns().iter().enumerate() {
        if col_idx == label_column {
            continue;
        }
        for (row_idx, row) in table.rows().iter().enumerate() {
            let cell = &row[col_idx];
            let state_population = parse_population(cell).ok_or_else(|| TransformError::Parse {
                line: row_idx + 2,
                column: state.clone(),
                value: cell.to_string(),
            })?;
            records.push(LongRecord {
                label: row[label_column].to_string(),
                state: state.clone(),
                state_population,
            });
        }
    }

    Ok(records)
}

/// Distinct labels in first-seen order.
pub fn unique_labels(records: &[LongRecord]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for r in records {
        if !labels.contains(&r.label.as_str()) {
            labels.push(&r.label);
        }
    }
    labels
}

/// Keep records whose label equals `label`, ignoring case.
pub fn filter_label(records: Vec<LongRecord>, label: &str) -> Vec<LongRecord> {
    let wanted = label.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.label.to_lowercase() == wanted)
        .collect()
}

/// Average, percentage difference and rank over already-filtered records.
///
/// The result is sorted by `Population_Rank`. With a zero average the
/// percentage difference is `None`.
pub fn summarize(
    records: Vec<LongRecord>,
    label: &str,
) -> TransformResult<Vec<StatePopulationRecord>> {
    if records.is_empty() {
        return Err(TransformError::NoMatchingRows(label.to_string()));
    }

    let total: i128 = records.iter().map(|r| r.state_population as i128).sum();
    let mean = total as f64 / records.len() as f64;
    let us_avg_population = mean.round_ties_even() as i64;

    // stable sort keeps input order among equal populations
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| Reverse(records[i].state_population));

    let summary = order
        .into_iter()
        .enumerate()
        .map(|(rank_idx, i)| {
            let r = &records[i];
            let percent_diff_from_us_avg = (us_avg_population != 0).then(|| {
                let diff = (r.state_population as i128 - us_avg_population as i128) as f64;
                round_to(diff / us_avg_population as f64 * 100.0, 2)
            });
            StatePopulationRecord {
                state: r.state.clone(),
                state_population: r.state_population,
                us_avg_population,
                percent_diff_from_us_avg,
                population_rank: rank_idx + 1,
            }
        })
        .collect();

    Ok(summary)
}

/// Stage 2 of the pipeline.
#[derive(Debug, Clone)]
pub struct Transformer {
    input: PathBuf,
    output: PathBuf,
    label_column: Option<String>,
    label_filter: String,
    logger: Logger,
}

impl Transformer {
    /// `label_column: None` uses the first column.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        label_column: Option<String>,
        label_filter: impl Into<String>,
        logger: Logger,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            label_column,
            label_filter: label_filter.into(),
            logger,
        }
    }

    /// Reads `cleaned_path`, writes `output_path`.
    pub fn from_config(config: &PipelineConfig, logger: Logger) -> Self {
        Self::new(
            &config.cleaned_path,
            &config.output_path,
            config.label_column.clone(),
            config.label_filter.clone(),
            logger,
        )
    }

    fn label_index(&self, table: &Table) -> TransformResult<usize> {
        match &self.label_column {
            None => Ok(0),
            Some(name) => table
                .column_index(name)
                .ok_or_else(|| TransformError::MissingColumn(name.clone())),
        }
    }

    /// Melt, filter, aggregate, rank, sort.
    pub fn transform(&self, table: Table) -> TransformResult<Vec<StatePopulationRecord>> {
        let result = self.transform_inner(&table);
        match &result {
            Ok(_) => self.logger.info("Data transformed successfully"),
            Err(e) => self.logger.error(format!("Error: {}", e)),
        }
        result
    }

    fn transform_inner(&self, table: &Table) -> TransformResult<Vec<StatePopulationRecord>> {
        self.logger
            .info(format!("Initial data shape: {:?}", table.shape()));

        let label_column = self.label_index(table)?;
        let melted = melt(table, label_column)?;
        self.logger
            .info(format!("Data shape after melting: {:?}", (melted.len(), 3)));

        let label_name = &table.columns()[label_column];
        self.logger.info(format!(
            "Unique values in '{}': {:?}",
            label_name,
            unique_labels(&melted)
        ));

        let filtered = filter_label(melted, &self.label_filter);
        self.logger
            .info(format!("Data shape after filtering: {:?}", (filtered.len(), 3)));

        summarize(filtered, &self.label_filter)
    }
}

impl Stage for Transformer {
    type Output = Vec<StatePopulationRecord>;

    fn logger(&self) -> &Logger {
        &self.logger
    }

    fn input_path(&self) -> &Path {
        &self.input
    }

    fn output_path(&self) -> &Path {
        &self.output
    }

    fn run(&self, table: Table) -> StageResult<Self::Output> {
        Ok(self.transform(table)?)
    }

    fn write(&self, output: &Self::Output, path: &Path) -> WriteResult<()> {
        write_records(output, path)
    }
}
