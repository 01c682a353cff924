//! Single-shot operations over an uploaded buffer.
//!
//! Each flow decodes the upload, transforms the whole table and returns a
//! preview of the result. Nothing here touches session history.

use super::dropped::DroppedColumnCache;
use super::types::{EncodeMethod, FilterSpec, ImputeMethod, ScaleMethod, TargetDtype};
use super::{
    columns as column_ops, encode as encode_ops, impute as impute_ops, rows as row_ops,
    scale as scale_ops,
};
use crate::error::{Result, ResultExt as _};
use crate::frame::{self, Preview};
use std::collections::HashMap;

fn load(bytes: &[u8]) -> Result<polars::prelude::DataFrame> {
    frame::decode(bytes).context("Failed to read upload")
}

pub fn preview(bytes: &[u8], rows: usize) -> Result<Preview> {
    frame::preview(&load(bytes)?, rows)
}

pub fn impute(
    bytes: &[u8],
    columns: &[String],
    method: ImputeMethod,
    value: Option<&str>,
    rows: usize,
) -> Result<Preview> {
    tracing::info!("Imputing {:?} with {}", columns, method.as_str());
    let df = impute_ops::impute(&load(bytes)?, columns, method, value)?;
    frame::preview(&df, rows)
}

pub fn encode(bytes: &[u8], columns: &[String], method: EncodeMethod, rows: usize) -> Result<Preview> {
    tracing::info!("Encoding {:?} with {:?}", columns, method);
    let df = encode_ops::encode(&load(bytes)?, columns, method)?;
    frame::preview(&df, rows)
}

pub fn scale(bytes: &[u8], columns: &[String], method: ScaleMethod, rows: usize) -> Result<Preview> {
    tracing::info!("Scaling {:?} with {:?}", columns, method);
    let df = scale_ops::scale(&load(bytes)?, columns, method)?;
    frame::preview(&df, rows)
}

pub fn drop_columns(bytes: &[u8], columns: &[String], rows: usize) -> Result<Preview> {
    tracing::info!("Dropping columns {:?}", columns);
    let df = column_ops::drop_columns(&load(bytes)?, columns)?;
    frame::preview(&df, rows)
}

pub fn filter_rows(bytes: &[u8], spec: &FilterSpec, rows: usize) -> Result<Preview> {
    tracing::info!("Filtering rows on '{}'", spec.column);
    let df = row_ops::filter_rows(&load(bytes)?, spec)?;
    frame::preview(&df, rows)
}

pub fn rename_columns(bytes: &[u8], mapping: &HashMap<String, String>, rows: usize) -> Result<Preview> {
    tracing::info!("Renaming {} column(s)", mapping.len());
    let df = column_ops::rename_columns(&load(bytes)?, mapping)?;
    frame::preview(&df, rows)
}

pub fn change_dtypes(bytes: &[u8], dtypes: &[(String, TargetDtype)], rows: usize) -> Result<Preview> {
    tracing::info!("Changing dtypes {:?}", dtypes);
    let df = column_ops::change_dtypes(&load(bytes)?, dtypes)?;
    frame::preview(&df, rows)
}

pub fn drop_duplicates(bytes: &[u8], subset: Option<&[String]>, rows: usize) -> Result<Preview> {
    tracing::info!("Dropping duplicates (subset: {:?})", subset);
    let source = load(bytes)?;
    let df = row_ops::drop_duplicates(&source, subset)?;
    tracing::info!("Removed {} duplicate row(s)", source.height() - df.height());
    frame::preview(&df, rows)
}

/// Drop columns and cache their values; returns the preview and operation id.
pub fn drop_columns_with_cache(
    cache: &DroppedColumnCache,
    bytes: &[u8],
    columns: &[String],
    rows: usize,
) -> Result<(Preview, String)> {
    let (df, operation_id) = cache.drop_columns(&load(bytes)?, columns)?;
    Ok((frame::preview(&df, rows)?, operation_id))
}

pub fn restore_dropped_columns(
    cache: &DroppedColumnCache,
    bytes: &[u8],
    operation_id: &str,
    rows: usize,
) -> Result<Preview> {
    let df = cache.restore(&load(bytes)?, operation_id)?;
    frame::preview(&df, rows)
}
