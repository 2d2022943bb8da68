//! Sanity checks for cleaned tables and final summaries.
//!
//! Both functions report problems instead of failing; callers decide
//! whether a finding is a warning or an error.

use std::collections::HashSet;

use crate::models::{Cell, StatePopulationRecord, Table};

/// Names of non-label columns holding anything other than integers.
pub fn integer_column_violations(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(i, _)| {
            table
                .rows()
                .iter()
                .any(|row| !matches!(row[*i], Cell::Int(_)))
        })
        .map(|(_, name)| name.clone())
        .collect()
}

/// Check the invariants every summary must hold.
///
/// - `us_avg_population` is one value, equal to the rounded mean
/// - `state` is unique
/// - ranks are a permutation of `1..=N` in file order
/// - population never increases as rank increases
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate_summary(records: &[StatePopulationRecord]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if records.is_empty() {
        return Err(vec!["summary has no rows".to_string()]);
    }

    let avg = records[0].us_avg_population;
    if let Some(r) = records.iter().find(|r| r.us_avg_population != avg) {
        errors.push(format!(
            "us_avg_population differs on '{}': {} vs {}",
            r.state, r.us_avg_population, avg
        ));
    }

    let total: i128 = records.iter().map(|r| r.state_population as i128).sum();
    let expected = (total as f64 / records.len() as f64).round_ties_even() as i64;
    if avg != expected {
        errors.push(format!(
            "us_avg_population is {} but the rounded mean is {}",
            avg, expected
        ));
    }

    let mut seen = HashSet::new();
    for r in records {
        if !seen.insert(r.state.as_str()) {
            errors.push(format!("state '{}' appears more than once", r.state));
        }
    }

    for (i, r) in records.iter().enumerate() {
        if r.population_rank != i + 1 {
            errors.push(format!(
                "row {} ('{}') has rank {}, expected {}",
                i + 1,
                r.state,
                r.population_rank,
                i + 1
            ));
        }
    }

    for pair in records.windows(2) {
        if pair[1].state_population > pair[0].state_population {
            errors.push(format!(
                "'{}' ({}) ranks below '{}' ({})",
                pair[1].state, pair[1].state_population, pair[0].state, pair[0].state_population
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: &str, pop: i64, avg: i64, rank: usize) -> StatePopulationRecord {
        StatePopulationRecord {
            state: state.into(),
            state_population: pop,
            us_avg_population: avg,
            percent_diff_from_us_avg: None,
            population_rank: rank,
        }
    }

    #[test]
    fn test_integer_columns_ok() {
        let table = Table::new(
            vec!["label".into(), "a".into()],
            vec![vec![Cell::Text("Total".into()), Cell::Int(3)]],
        );
        assert!(integer_column_violations(&table).is_empty());
    }

    #[test]
    fn test_integer_columns_flagged() {
        let table = Table::new(
            vec!["label".into(), "a".into(), "b".into()],
            vec![
                vec![Cell::Text("Total".into()), Cell::Int(3), Cell::Missing],
                vec![Cell::Text("Male".into()), Cell::Int(1), Cell::Int(2)],
            ],
        );
        assert_eq!(integer_column_violations(&table), vec!["b".to_string()]);
    }

    #[test]
    fn test_valid_summary() {
        let records = vec![record("ca", 30, 20, 1), record("ny", 20, 20, 2), record("wy", 10, 20, 3)];
        assert!(validate_summary(&records).is_ok());
    }

    #[test]
    fn test_invalid_summary() {
        let records = vec![record("ca", 10, 20, 2), record("ca", 30, 21, 1)];
        let errors = validate_summary(&records).unwrap_err();

        assert!(errors.iter().any(|e| e.contains("differs")));
        assert!(errors.iter().any(|e| e.contains("more than once")));
        assert!(errors.iter().any(|e| e.contains("expected 1")));
        assert!(errors.iter().any(|e| e.contains("ranks below")));
    }

    #[test]
    fn test_empty_summary() {
        assert!(validate_summary(&[]).is_err());
    }
}
