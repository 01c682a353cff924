//! Response bodies and query parameters.

use crate::diagnostics::DiagnosticsReport;
use crate::frame::Preview;
use crate::lifecycle::Applied;
use serde::{Deserialize, Serialize};

/// `?rows=N`; absent means the configured default.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RowsQuery {
    pub rows: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedResponse {
    #[serde(flatten)]
    pub preview: Preview,
    pub operation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoableResponse {
    #[serde(flatten)]
    pub preview: Preview,
    pub can_undo: bool,
}

impl From<Applied> for UndoableResponse {
    fn from(applied: Applied) -> Self {
        Self {
            preview: applied.preview,
            can_undo: applied.can_undo,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseSessionResponse {
    pub session_id: String,
    pub closed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub stats: DiagnosticsReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: usize,
}
