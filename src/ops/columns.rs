use super::types::TargetDtype;
use crate::error::{PrepError, Result};
use crate::frame;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y",
    "%d %b %Y",
];

/// Remove the named columns.
pub fn drop_columns(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    frame::ensure_columns(df, columns)?;
    let mut out = df.clone();
    for name in columns {
        if out.column(name).is_ok() {
            out = out.drop(name)?;
        }
    }
    Ok(out)
}

/// Rename columns by `mapping`; columns not in the mapping keep their name.
///
/// # Errors
///
/// `InvalidParameter` when two columns would end up with the same name.
pub fn rename_columns(df: &DataFrame, mapping: &HashMap<String, String>) -> Result<DataFrame> {
    let names: Vec<String> = frame::column_names(df)
        .into_iter()
        .map(|name| mapping.get(&name).cloned().unwrap_or(name))
        .collect();

    let mut seen = HashSet::with_capacity(names.len());
    if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(PrepError::InvalidParameter(format!(
            "rename produces duplicate column name '{duplicate}'"
        )));
    }

    let columns = df
        .get_columns()
        .iter()
        .zip(&names)
        .map(|(column, name)| {
            Column::from(
                column
                    .as_materialized_series()
                    .clone()
                    .with_name(name.as_str().into()),
            )
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Coerce each listed column to its target type, best effort.
///
/// `datetime` parses text with a set of common layouts and turns anything
/// unparseable into a missing cell. For the other targets a column whose
/// values do not all convert keeps its original values.
pub fn change_dtypes(df: &DataFrame, dtypes: &[(String, TargetDtype)]) -> Result<DataFrame> {
    let names: Vec<String> = dtypes.iter().map(|(name, _)| name.clone()).collect();
    frame::ensure_columns(df, &names)?;

    let mut out = df.clone();
    for (name, target) in dtypes {
        let converted = coerce(frame::column(&out, name)?, *target)?;
        out.with_column(converted)?;
    }
    Ok(out)
}

pub fn coerce(series: &Series, target: TargetDtype) -> Result<Series> {
    let dtype = match target {
        TargetDtype::Datetime => return parse_datetimes(series),
        TargetDtype::Bool if series.dtype().is_string() => return parse_bools(series),
        TargetDtype::Int => DataType::Int64,
        TargetDtype::Float => DataType::Float64,
        TargetDtype::String => DataType::String,
        TargetDtype::Bool => DataType::Boolean,
    };

    match series.strict_cast(&dtype) {
        Ok(cast) => Ok(cast),
        Err(e) => {
            tracing::warn!(
                "Keeping column '{}' as {}: cannot convert to {target}: {e}",
                series.name(),
                series.dtype()
            );
            Ok(series.clone())
        }
    }
}

fn parse_bools(series: &Series) -> Result<Series> {
    let values = frame::string_values(series)?;
    let parsed: Vec<Option<bool>> = values
        .iter()
        .map(|v| {
            v.as_deref()
                .and_then(|s| match s.trim().to_lowercase().as_str() {
                    "true" | "1" | "yes" => Some(true),
                    "false" | "0" | "no" => Some(false),
                    _ => None,
                })
        })
        .collect();
    let converted = values
        .iter()
        .zip(&parsed)
        .all(|(raw, parsed)| raw.is_none() == parsed.is_none());
    if !converted {
        tracing::warn!("Keeping column '{}' as text: not all values are boolean", series.name());
        return Ok(series.clone());
    }
    Ok(Series::new(series.name().clone(), parsed))
}

fn parse_datetimes(series: &Series) -> Result<Series> {
    let target = DataType::Datetime(TimeUnit::Microseconds, None);
    match series.dtype() {
        DataType::Datetime(_, _) => return Ok(series.clone()),
        DataType::Date => return Ok(series.cast(&target)?),
        _ => {}
    }

    let micros: Vec<Option<i64>> = frame::string_values(series)?
        .iter()
        .map(|v| v.as_deref().and_then(parse_datetime_micros))
        .collect();
    Ok(Series::new(series.name().clone(), micros).cast(&target)?)
}

/// Microseconds since the epoch for a date or datetime in a common layout.
pub fn parse_datetime_micros(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).timestamp_micros());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.and_utc().timestamp_micros());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_micros())
}
