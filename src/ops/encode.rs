use super::types::EncodeMethod;
use crate::error::Result;
use crate::frame;
use polars::prelude::*;
use std::collections::HashMap;

pub fn encode(df: &DataFrame, columns: &[String], method: EncodeMethod) -> Result<DataFrame> {
    match method {
        EncodeMethod::OneHot => one_hot(df, columns),
        EncodeMethod::Ordinal => ordinal(df, columns),
    }
}

/// Distinct present values in sorted order, as text.
fn categories(series: &Series) -> Result<Vec<String>> {
    let distinct = series.drop_nulls().unique()?.sort(SortOptions::default())?;
    Ok(frame::string_values(&distinct)?.into_iter().flatten().collect())
}

/// Replace each column with one 0/1 indicator column per distinct value.
///
/// Indicators are named `<column>_<value>` and appended after the
/// remaining columns. A missing cell is 0 in every indicator.
pub fn one_hot(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    frame::ensure_columns(df, columns)?;

    let mut out: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|c| !columns.iter().any(|name| name == c.name().as_str()))
        .cloned()
        .collect();

    for name in columns {
        let series = frame::column(df, name)?;
        let labels = frame::string_values(series)?;
        for category in categories(series)? {
            let indicator: Vec<i32> = labels
                .iter()
                .map(|label| i32::from(label.as_deref() == Some(category.as_str())))
                .collect();
            let indicator_name = format!("{name}_{category}");
            out.push(Column::from(Series::new(indicator_name.into(), indicator)));
        }
    }

    Ok(DataFrame::new(out)?)
}

/// Replace each column's values with their rank among the sorted distinct
/// values, starting at 0. Missing cells become -1.
pub fn ordinal(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    frame::ensure_columns(df, columns)?;

    let mut out = df.clone();
    for name in columns {
        let series = frame::column(&out, name)?;
        let codes: HashMap<String, i64> = categories(series)?.into_iter().zip(0_i64..).collect();
        let encoded: Vec<i64> = frame::string_values(series)?
            .iter()
            .map(|label| {
                label
                    .as_ref()
                    .and_then(|l| codes.get(l))
                    .copied()
                    .unwrap_or(-1)
            })
            .collect();
        let encoded = Series::new(series.name().clone(), encoded);
        out.with_column(encoded)?;
    }
    Ok(out)
}
