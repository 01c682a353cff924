use super::stats;
use super::types::ScaleMethod;
use crate::error::Result;
use crate::frame;
use polars::prelude::*;

/// Rescale numeric columns using each column's own statistics.
///
/// A column with zero range (`minmax`) or zero deviation (`standard`) maps
/// to 0. Missing cells stay missing.
pub fn scale(df: &DataFrame, columns: &[String], method: ScaleMethod) -> Result<DataFrame> {
    frame::ensure_columns(df, columns)?;
    let mut out = df.clone();
    for name in columns {
        let scaled = scale_series(frame::column(&out, name)?, method)?;
        out.with_column(scaled)?;
    }
    Ok(out)
}

pub fn scale_series(series: &Series, method: ScaleMethod) -> Result<Series> {
    let values = frame::float_values(series)?;
    let present = stats::present(&values);

    let params = match method {
        ScaleMethod::MinMax => stats::min_max(&present).map(|(min, max)| (min, max - min)),
        ScaleMethod::Standard => stats::mean(&present).zip(stats::std_dev(&present, 0)),
    };
    let Some((offset, spread)) = params else {
        return Ok(Series::new(series.name().clone(), values));
    };
    let divisor = if spread.abs() <= f64::EPSILON { 1.0 } else { spread };

    let scaled: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| v.map(|x| (x - offset) / divisor))
        .collect();
    Ok(Series::new(series.name().clone(), scaled))
}
