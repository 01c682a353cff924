use super::codec::sanitize_for_output;
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// First rows of a table, row-major, ready for a JSON response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl Preview {
    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}

/// Sanitize `df` and return at most `rows` of its rows.
///
/// The slice only bounds what is returned; callers transform the full table
/// first and preview the result.
pub fn preview(df: &DataFrame, rows: usize) -> Result<Preview> {
    let head = sanitize_for_output(&df.head(Some(rows)))?;

    let mut data: Vec<Vec<Value>> = (0..head.height())
        .map(|_| Vec::with_capacity(head.width()))
        .collect();
    let mut columns = Vec::with_capacity(head.width());

    for column in head.get_columns() {
        let series = column.as_materialized_series();
        columns.push(series.name().to_string());
        for (row, value) in data.iter_mut().zip(json_values(series)?) {
            row.push(value);
        }
    }

    Ok(Preview { columns, data })
}

fn json_values(series: &Series) -> Result<Vec<Value>> {
    let dtype = series.dtype();
    let values = if dtype.is_bool() {
        series
            .bool()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect()
    } else if dtype.is_integer() {
        series
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect()
    } else if dtype.is_float() {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| {
                v.and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            })
            .collect()
    } else {
        series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map_or(Value::Null, |s| Value::String(s.to_owned())))
            .collect()
    };
    Ok(values)
}
