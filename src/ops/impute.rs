use super::stats;
use super::types::ImputeMethod;
use crate::error::{PrepError, Result};
use crate::frame::{self, sorted_mode};
use polars::prelude::*;

/// Fill missing cells of each named column.
///
/// `mean` and `median` need numeric columns and yield floats. `mode` fills
/// with the most frequent present value, the smallest one on ties.
/// `constant` uses `value`, keeping the column type when `value` parses as
/// that type and falling back to text otherwise.
pub fn impute(
    df: &DataFrame,
    columns: &[String],
    method: ImputeMethod,
    value: Option<&str>,
) -> Result<DataFrame> {
    frame::ensure_columns(df, columns)?;
    let mut out = df.clone();
    for name in columns {
        let filled = impute_series(frame::column(&out, name)?, method, value)?;
        out.with_column(filled)?;
    }
    Ok(out)
}

pub fn impute_series(series: &Series, method: ImputeMethod, value: Option<&str>) -> Result<Series> {
    match method {
        ImputeMethod::Mean | ImputeMethod::Median => fill_with_statistic(series, method),
        ImputeMethod::Mode => fill_with_mode(series),
        ImputeMethod::Constant => {
            let value = value.ok_or_else(|| {
                PrepError::InvalidParameter("constant imputation requires a value".to_owned())
            })?;
            fill_with_constant(series, value)
        }
    }
}

fn fill<T: Clone>(values: Vec<Option<T>>, with: &T) -> Vec<T> {
    values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| with.clone()))
        .collect()
}

fn fill_with_statistic(series: &Series, method: ImputeMethod) -> Result<Series> {
    let values: Vec<Option<f64>> = frame::float_values(series)?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    if values.iter().all(Option::is_some) {
        return Ok(series.clone());
    }

    let present = stats::present(&values);
    let statistic = match method {
        ImputeMethod::Median => stats::median(&present),
        _ => stats::mean(&present),
    };
    let Some(statistic) = statistic else {
        // Nothing to average over: leave the column as it is.
        return Ok(series.clone());
    };
    Ok(Series::new(series.name().clone(), fill(values, &statistic)))
}

fn fill_with_mode(series: &Series) -> Result<Series> {
    if series.null_count() == 0 {
        return Ok(series.clone());
    }
    let name = series.name().clone();
    let dtype = series.dtype();

    if dtype.is_bool() {
        let values: Vec<Option<bool>> = series.bool()?.into_iter().collect();
        let Some((mode, _)) = sorted_mode(values.iter().flatten().copied().collect(), Ord::cmp)
        else {
            return Ok(series.clone());
        };
        return Ok(Series::new(name, fill(values, &mode)));
    }

    if dtype.is_integer() {
        let values: Vec<Option<i64>> = series.cast(&DataType::Int64)?.i64()?.into_iter().collect();
        let Some((mode, _)) = sorted_mode(values.iter().flatten().copied().collect(), Ord::cmp)
        else {
            return Ok(series.clone());
        };
        return Ok(Series::new(name, fill(values, &mode)));
    }

    if dtype.is_float() {
        let values = frame::float_values(series)?;
        let Some((mode, _)) = sorted_mode(stats::present(&values), stats::cmp_f64) else {
            return Ok(series.clone());
        };
        return Ok(Series::new(name, fill(values, &mode)));
    }

    let values = frame::string_values(series)?;
    let Some((mode, _)) = sorted_mode(values.iter().flatten().cloned().collect(), Ord::cmp) else {
        return Ok(series.clone());
    };
    let filled = Series::new(name, fill(values, &mode));
    if dtype.is_string() {
        return Ok(filled);
    }
    // Temporal columns go back to their own type when the text round-trips.
    Ok(filled.strict_cast(dtype).unwrap_or(filled))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn fill_with_constant(series: &Series, value: &str) -> Result<Series> {
    if series.null_count() == 0 {
        return Ok(series.clone());
    }
    let name = series.name().clone();
    let dtype = series.dtype();

    if dtype.is_integer()
        && let Ok(constant) = value.trim().parse::<i64>()
    {
        let values: Vec<Option<i64>> = series.cast(&DataType::Int64)?.i64()?.into_iter().collect();
        return Ok(Series::new(name, fill(values, &constant)));
    }
    if dtype.is_numeric()
        && let Ok(constant) = value.trim().parse::<f64>()
    {
        let values = frame::float_values(series)?;
        return Ok(Series::new(name, fill(values, &constant)));
    }
    if dtype.is_bool()
        && let Some(constant) = parse_bool(value)
    {
        let values: Vec<Option<bool>> = series.bool()?.into_iter().collect();
        return Ok(Series::new(name, fill(values, &constant)));
    }

    let values = frame::string_values(series)?;
    Ok(Series::new(name, fill(values, &value.to_owned())))
}
