use super::types::FilterSpec;
use crate::error::{PrepError, Result};
use crate::frame;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;

fn narrow(mask: &mut [bool], keep: impl Iterator<Item = bool>) {
    for (m, k) in mask.iter_mut().zip(keep) {
        *m &= k;
    }
}

fn parse_bound(text: &str, field: &str) -> Result<f64> {
    text.trim()
        .parse()
        .map_err(|e| PrepError::InvalidParameter(format!("{field} '{text}': {e}")))
}

/// Keep the rows that satisfy every predicate in `spec`.
///
/// Predicates apply in order: equality, minimum, maximum, regex. Numeric
/// columns compare numerically; other columns compare their text form. The
/// regex searches the text form, and a missing cell never matches anything.
pub fn filter_rows(df: &DataFrame, spec: &FilterSpec) -> Result<DataFrame> {
    let series = frame::column(df, &spec.column)?;
    let mut mask = vec![true; df.height()];

    if frame::is_numeric(series) {
        let values = frame::float_values(series)?;
        if let Some(value) = &spec.value {
            // A non-numeric value cannot equal any number.
            let target = value.trim().parse::<f64>().ok();
            narrow(
                &mut mask,
                values.iter().map(|v| v.is_some() && *v == target),
            );
        }
        if let Some(min) = &spec.min_value {
            let min = parse_bound(min, "min_value")?;
            narrow(&mut mask, values.iter().map(|v| v.is_some_and(|x| x >= min)));
        }
        if let Some(max) = &spec.max_value {
            let max = parse_bound(max, "max_value")?;
            narrow(&mut mask, values.iter().map(|v| v.is_some_and(|x| x <= max)));
        }
    } else {
        let values = frame::string_values(series)?;
        if let Some(value) = &spec.value {
            narrow(
                &mut mask,
                values.iter().map(|v| v.as_deref() == Some(value.as_str())),
            );
        }
        if let Some(min) = &spec.min_value {
            narrow(
                &mut mask,
                values.iter().map(|v| v.as_deref().is_some_and(|s| s >= min.as_str())),
            );
        }
        if let Some(max) = &spec.max_value {
            narrow(
                &mut mask,
                values.iter().map(|v| v.as_deref().is_some_and(|s| s <= max.as_str())),
            );
        }
    }

    if let Some(pattern) = &spec.regex {
        let re = Regex::new(pattern)?;
        let text = frame::string_values(series)?;
        narrow(
            &mut mask,
            text.iter().map(|v| v.as_deref().is_some_and(|s| re.is_match(s))),
        );
    }

    let mask = Series::new("mask".into(), mask);
    Ok(df.filter(mask.bool()?)?)
}

/// Drop rows that repeat an earlier row, keeping the first occurrence.
///
/// Rows are compared on `subset` when given and non-empty, otherwise on
/// every column. Two missing cells compare equal.
pub fn drop_duplicates(df: &DataFrame, subset: Option<&[String]>) -> Result<DataFrame> {
    let names = match subset {
        Some(names) if !names.is_empty() => {
            frame::ensure_columns(df, names)?;
            names.to_vec()
        }
        _ => frame::column_names(df),
    };

    let keys = names
        .iter()
        .map(|name| frame::string_values(frame::column(df, name)?))
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::with_capacity(df.height());
    let mask: Vec<bool> = (0..df.height())
        .map(|row| {
            let key: Vec<Option<&str>> = keys
                .iter()
                .map(|column| column.get(row).and_then(|v| v.as_deref()))
                .collect();
            seen.insert(key)
        })
        .collect();

    let mask = Series::new("mask".into(), mask);
    Ok(df.filter(mask.bool()?)?)
}
