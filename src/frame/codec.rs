//! CSV text codec for tables.

use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::io::Cursor;

/// Decode an uploaded buffer into a table.
///
/// The first row is the header. Column types are inferred from every row,
/// and date/datetime-looking text columns are parsed as temporal.
///
/// # Errors
///
/// `Parse` for an empty or non UTF-8 buffer, or when the reader rejects the
/// structure (ragged rows, bad quoting).
pub fn decode(bytes: &[u8]) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(PrepError::Parse("upload is empty".to_owned()));
    }
    if let Err(e) = std::str::from_utf8(bytes) {
        return Err(PrepError::Parse(format!("upload is not valid UTF-8: {e}")));
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_try_parse_dates(true))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| PrepError::Parse(e.to_string()))
}

/// Encode a table as CSV text with a header row.
pub fn encode(df: &DataFrame) -> Result<String> {
    let mut df = df.clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)?;
    String::from_utf8(buf)
        .map_err(|e| PrepError::Internal(format!("CSV writer produced invalid UTF-8: {e}")))
}

/// Replace NaN and infinities in float columns with missing cells.
pub fn sanitize_for_output(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        if !series.dtype().is_float() {
            continue;
        }
        let values = series.cast(&DataType::Float64)?;
        let values = values.f64()?;
        if values.into_iter().flatten().all(f64::is_finite) {
            continue;
        }
        let cleaned: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        out.with_column(Series::new(series.name().clone(), cleaned))?;
    }
    Ok(out)
}
