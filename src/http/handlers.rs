//! HTTP handlers for the REST API.
//!
//! Each handler reads its multipart form, then runs the core operation on
//! the blocking pool; decoding and transforming a table is CPU bound.

use axum::{
    Json,
    extract::{Query, State},
};
use std::collections::BTreeMap;

use super::dto::{
    CloseSessionResponse, DroppedResponse, HealthResponse, RowsQuery, SessionResponse,
    StatsResponse, UndoableResponse,
};
use super::error::AppError;
use super::form::UploadForm;
use super::state::AppState;
use crate::diagnostics;
use crate::error::{PrepError, Result};
use crate::frame::{self, Preview};
use crate::lifecycle::ActionParams;
use crate::ops::{EncodeMethod, FilterSpec, ImputeMethod, ScaleMethod, TargetDtype, flows};

/// Result type for handlers.
pub type HandlerResult<T> = std::result::Result<Json<T>, AppError>;

async fn run_blocking<T, F>(task: F) -> std::result::Result<T, AppError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| PrepError::Internal(format!("Worker task failed: {e}")))?;
    Ok(outcome?)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        sessions: state.sessions().len()?,
    }))
}

// =============================================================================
// Single-shot operations
// =============================================================================

/// POST /preview
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let file = form.file()?;
    let preview = run_blocking(move || flows::preview(&file, rows)).await?;
    Ok(Json(preview))
}

/// POST /impute
///
/// Fields: `method` (mean, median, mode, constant), `columns`, `value`.
pub async fn impute(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let method: ImputeMethod = form.required("method")?.parse()?;
    let columns = form.list("columns")?;
    let value = form.optional("value").map(str::to_owned);
    let file = form.file()?;
    let preview = run_blocking(move || {
        flows::impute(&file, &columns, method, value.as_deref(), rows)
    })
    .await?;
    Ok(Json(preview))
}

/// POST /encode
pub async fn encode(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let method: EncodeMethod = form.required("method")?.parse()?;
    let columns = form.list("columns")?;
    let file = form.file()?;
    let preview = run_blocking(move || flows::encode(&file, &columns, method, rows)).await?;
    Ok(Json(preview))
}

/// POST /scale
pub async fn scale(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let method: ScaleMethod = form.required("method")?.parse()?;
    let columns = form.list("columns")?;
    let file = form.file()?;
    let preview = run_blocking(move || flows::scale(&file, &columns, method, rows)).await?;
    Ok(Json(preview))
}

/// POST /drop_columns
pub async fn drop_columns(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let columns = form.list("columns")?;
    let file = form.file()?;
    let preview = run_blocking(move || flows::drop_columns(&file, &columns, rows)).await?;
    Ok(Json(preview))
}

/// POST /filter_rows
///
/// Fields: `column`, and any of `value`, `min_value`, `max_value`, `regex`.
pub async fn filter_rows(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let spec = FilterSpec {
        column: form.required("column")?.to_owned(),
        value: form.optional("value").map(str::to_owned),
        min_value: form.optional("min_value").map(str::to_owned),
        max_value: form.optional("max_value").map(str::to_owned),
        regex: form.optional("regex").map(str::to_owned),
    };
    let file = form.file()?;
    let preview = run_blocking(move || flows::filter_rows(&file, &spec, rows)).await?;
    Ok(Json(preview))
}

/// POST /rename_columns
pub async fn rename_columns(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let mapping = form.json("rename_map")?;
    let file = form.file()?;
    let preview = run_blocking(move || flows::rename_columns(&file, &mapping, rows)).await?;
    Ok(Json(preview))
}

/// POST /change_dtypes
pub async fn change_dtypes(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let requested: BTreeMap<String, String> = form.json("dtype_map")?;
    let dtypes = requested
        .into_iter()
        .map(|(column, dtype)| dtype.parse::<TargetDtype>().map(|dtype| (column, dtype)))
        .collect::<Result<Vec<_>>>()?;
    let file = form.file()?;
    let preview = run_blocking(move || flows::change_dtypes(&file, &dtypes, rows)).await?;
    Ok(Json(preview))
}

/// POST /drop_duplicates
pub async fn drop_duplicates(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let subset = form.optional_list("subset")?;
    let file = form.file()?;
    let preview =
        run_blocking(move || flows::drop_duplicates(&file, subset.as_deref(), rows)).await?;
    Ok(Json(preview))
}

// =============================================================================
// Dropped-column cache
// =============================================================================

/// POST /drop_columns_with_cache
pub async fn drop_columns_with_cache(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<DroppedResponse> {
    let rows = state.rows(query);
    let columns = form.list("columns")?;
    let file = form.file()?;
    let cache = state.drops.clone();
    let (preview, operation_id) = run_blocking(move || {
        flows::drop_columns_with_cache(&cache, &file, &columns, rows)
    })
    .await?;
    Ok(Json(DroppedResponse {
        preview,
        operation_id,
    }))
}

/// POST /restore_dropped_columns
pub async fn restore_dropped_columns(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<Preview> {
    let rows = state.rows(query);
    let operation_id = form.required("operation_id")?.to_owned();
    let file = form.file()?;
    let cache = state.drops.clone();
    let preview = run_blocking(move || {
        flows::restore_dropped_columns(&cache, &file, &operation_id, rows)
    })
    .await?;
    Ok(Json(preview))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /create_session
pub async fn create_session(
    State(state): State<AppState>,
    form: UploadForm,
) -> HandlerResult<SessionResponse> {
    let file = form.file()?;
    let sessions = state.sessions().clone();
    let session_id = run_blocking(move || sessions.create(&file)).await?;
    Ok(Json(SessionResponse { session_id }))
}

/// POST /apply_transformation
///
/// Fields: `session_id`, `action` (drop, impute), `columns`, `params`
/// (JSON object, optional).
pub async fn apply_transformation(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<UndoableResponse> {
    let rows = state.rows(query);
    let session_id = form.required("session_id")?.to_owned();
    let action = form.required("action")?.to_owned();
    let columns = form.list("columns")?;
    let params = ActionParams::from_json(form.optional("params").unwrap_or_default())?;
    let file = form.file()?;
    let engine = state.engine.clone();
    let applied = run_blocking(move || {
        engine.apply(&session_id, &action, columns, &params, &file, rows)
    })
    .await?;
    Ok(Json(applied.into()))
}

/// POST /undo
pub async fn undo(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
    form: UploadForm,
) -> HandlerResult<UndoableResponse> {
    let rows = state.rows(query);
    let session_id = form.required("session_id")?.to_owned();
    let file = form.file()?;
    let engine = state.engine.clone();
    let applied = run_blocking(move || engine.undo(&session_id, &file, rows)).await?;
    Ok(Json(applied.into()))
}

/// POST /close_session
pub async fn close_session(
    State(state): State<AppState>,
    form: UploadForm,
) -> HandlerResult<CloseSessionResponse> {
    let session_id = form.required("session_id")?.to_owned();
    let closed = state.sessions().close(&session_id)?;
    Ok(Json(CloseSessionResponse { session_id, closed }))
}

/// POST /column_stats
///
/// Diagnoses the session's latest snapshot when `session_id` names a
/// session with history, otherwise the upload.
pub async fn column_stats(
    State(state): State<AppState>,
    form: UploadForm,
) -> HandlerResult<StatsResponse> {
    let session_id = form.optional("session_id").map(str::to_owned);
    let file = form.file()?;
    let sessions = state.sessions().clone();
    let stats = run_blocking(move || {
        let top = match session_id {
            Some(id) => match sessions.get_top(&id) {
                Ok(df) => Some(df),
                Err(PrepError::NotFound(_)) => None,
                Err(err) => return Err(err),
            },
            None => None,
        };
        let df = match top {
            Some(df) => df,
            None => frame::decode(&file)?,
        };
        diagnostics::analyze(&df)
    })
    .await?;
    Ok(Json(StatsResponse { stats }))
}
