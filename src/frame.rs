//! In-memory tables and their text form.
//!
//! A table is a polars [`DataFrame`]: named, equally long columns whose
//! buffers are reference counted, so cloning a frame is cheap and never
//! copies cell data. That makes a `DataFrame` usable as an immutable
//! snapshot: transformations take `&DataFrame` and return a new frame.
//!
//! - [`codec`]: CSV bytes to table and back, plus output sanitization
//! - [`preview`]: bounded, JSON-ready row slices

pub mod codec;
pub mod preview;

pub use codec::{decode, encode, sanitize_for_output};
pub use preview::{Preview, preview};

use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::cmp::Ordering;

/// Look up a column, mapping absence to `UnknownColumn`.
pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .ok()
        .map(Column::as_materialized_series)
        .ok_or_else(|| PrepError::UnknownColumn(name.to_owned()))
}

/// Fail with `UnknownColumn` for the first name not present in `df`.
pub fn ensure_columns(df: &DataFrame, names: &[String]) -> Result<()> {
    match names.iter().find(|name| df.column(name.as_str()).is_err()) {
        Some(missing) => Err(PrepError::UnknownColumn(missing.clone())),
        None => Ok(()),
    }
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

/// Whether a column holds numbers (integers or floats).
pub fn is_numeric(series: &Series) -> bool {
    series.dtype().is_numeric()
}

/// Values of a numeric column as `f64`, missing cells as `None`.
///
/// # Errors
///
/// `InvalidParameter` if the column is not numeric.
pub fn float_values(series: &Series) -> Result<Vec<Option<f64>>> {
    if !is_numeric(series) {
        return Err(PrepError::InvalidParameter(format!(
            "column '{}' is not numeric ({})",
            series.name(),
            series.dtype()
        )));
    }
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// The string form of every cell, missing cells as `None`.
pub fn string_values(series: &Series) -> Result<Vec<Option<String>>> {
    let cast = series.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Most frequent value; ties go to the smallest value under `cmp`.
pub fn sorted_mode<T, F>(mut values: Vec<T>, cmp: F) -> Option<(T, usize)>
where
    F: Fn(&T, &T) -> Ordering,
{
    values.sort_by(&cmp);
    let mut best: Option<(T, usize)> = None;
    let mut iter = values.into_iter().peekable();
    while let Some(value) = iter.next() {
        let mut run = 1;
        while iter
            .peek()
            .is_some_and(|next| cmp(next, &value) == Ordering::Equal)
        {
            iter.next();
            run += 1;
        }
        if best.as_ref().is_none_or(|(_, count)| run > *count) {
            best = Some((value, run));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_mode_prefers_smallest_on_tie() {
        let values = vec![3, 1, 3, 1, 2];
        assert_eq!(sorted_mode(values, Ord::cmp), Some((1, 2)));
    }

    #[test]
    fn test_sorted_mode_empty() {
        assert_eq!(sorted_mode(Vec::<i64>::new(), Ord::cmp), None);
    }

    #[test]
    fn test_float_values_rejects_text() -> Result<()> {
        let s = Series::new("name".into(), vec!["a", "b"]);
        assert!(matches!(float_values(&s), Err(PrepError::InvalidParameter(_))));

        let n = Series::new("n".into(), vec![Some(1_i64), None]);
        assert_eq!(float_values(&n)?, vec![Some(1.0), None]);
        Ok(())
    }

    #[test]
    fn test_ensure_columns_names_missing() -> Result<()> {
        let df = DataFrame::new(vec![Column::from(Series::new("a".into(), vec![1_i64]))])?;
        let result = ensure_columns(&df, &["a".to_owned(), "zz".to_owned()]);
        assert!(matches!(result, Err(PrepError::UnknownColumn(name)) if name == "zz"));
        Ok(())
    }
}
