//! Column diagnostics.
//!
//! [`analyze`] profiles every column of a table and scores it for common
//! data-quality problems:
//!
//! - **missing**: share of empty cells
//! - **constant**: share of the most frequent value
//! - **high cardinality**: distinct values per row
//! - **outlier**: share of numeric values beyond 3 standard deviations
//!
//! Each score over its threshold adds a plain-language recommendation.
//! Numeric columns also get summary statistics and a 20-bin histogram;
//! other columns get their most frequent value and top value counts.

pub mod health;
pub mod profiling;
pub mod types;

pub use types::{
    CategoricalProfile, ColumnDiagnostic, DataIssues, DiagnosticsReport, Histogram,
    NumericProfile, Profile, ValueCount,
};

use crate::error::Result;
use crate::frame;
use crate::ops::stats;
use polars::prelude::*;
use std::collections::HashSet;

/// Diagnose every column of `df`, in column order.
///
/// Non-finite floats count as missing. Boolean columns get the
/// categorical profile and no outlier score.
pub fn analyze(df: &DataFrame) -> Result<DiagnosticsReport> {
    let df = frame::sanitize_for_output(df)?;
    let n_rows = df.height();
    let columns = df
        .get_columns()
        .iter()
        .map(|column| analyze_column(column.as_materialized_series(), n_rows))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(
        "Diagnosed {} columns over {} rows",
        columns.len(),
        n_rows
    );
    Ok(DiagnosticsReport::new(columns))
}

fn analyze_column(series: &Series, n_rows: usize) -> Result<ColumnDiagnostic> {
    let labels = frame::string_values(series)?;
    let missing = labels.iter().filter(|label| label.is_none()).count();
    let count = labels.len() - missing;
    let unique = labels.iter().flatten().collect::<HashSet<_>>().len();

    let (profile, outlier) = if frame::is_numeric(series) {
        let values = stats::present(&frame::float_values(series)?);
        (
            Profile::Numeric(profiling::numeric_profile(&values)),
            Some(profiling::outlier_fraction(&values)),
        )
    } else {
        (
            Profile::Categorical(profiling::categorical_profile(&labels)),
            None,
        )
    };

    let data_issues = DataIssues {
        missing: health::fraction(missing, n_rows),
        constant: health::constant_fraction(&labels),
        high_cardinality: health::fraction(unique, n_rows),
        outlier,
    };
    let recommendations = health::recommendations(&data_issues);

    Ok(ColumnDiagnostic {
        name: series.name().to_string(),
        count,
        missing_pct: data_issues.missing * 100.0,
        unique,
        profile,
        data_issues,
        recommendations,
    })
}

#[cfg(test)]
mod tests;
