//! Session transforms and the undoable transformation engine

use super::session::SessionRegistry;
use crate::error::{PrepError, Result};
use crate::frame::{self, Preview};
use crate::ops::{self, ImputeMethod};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Actions a session accepts. The single-shot operations in [`crate::ops`]
/// cover more; only these are recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Drop,
    Impute,
}

impl FromStr for Action {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drop" => Ok(Self::Drop),
            "impute" => Ok(Self::Impute),
            _ => Err(PrepError::UnsupportedAction(s.to_owned())),
        }
    }
}

/// Parameters of a session action, sent as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParams {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl ActionParams {
    /// Parse a JSON object; blank input means no parameters.
    pub fn from_json(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// `value` as text: strings verbatim, numbers and booleans rendered.
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// A table transformation that can be recorded in a session.
pub trait Transform: Send + Sync {
    /// Produce a new table; `df` itself is left as is.
    fn apply(&self, df: &DataFrame) -> Result<DataFrame>;

    /// Action name the transform was built from.
    fn name(&self) -> &'static str;

    /// Resolved parameters, defaults filled in.
    fn parameters(&self) -> BTreeMap<String, serde_json::Value>;

    fn description(&self) -> String;
}

/// Build the transform for `action`.
///
/// # Errors
///
/// `UnknownMethod` for an unsupported imputation method.
pub fn instantiate_transform(
    action: Action,
    columns: Vec<String>,
    params: &ActionParams,
) -> Result<Box<dyn Transform>> {
    match action {
        Action::Drop => Ok(Box::new(DropTransform::new(columns))),
        Action::Impute => Ok(Box::new(ImputeTransform::from_parameters(columns, params)?)),
    }
}

/// Remove columns
#[derive(Debug, Clone)]
pub struct DropTransform {
    columns: Vec<String>,
}

impl DropTransform {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl Transform for DropTransform {
    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        ops::drop_columns(df, &self.columns)
    }

    fn name(&self) -> &'static str {
        "drop"
    }

    fn parameters(&self) -> BTreeMap<String, serde_json::Value> {
        BTreeMap::from([("columns".to_owned(), serde_json::json!(self.columns))])
    }

    fn description(&self) -> String {
        format!("Drop {} column(s)", self.columns.len())
    }
}

/// Fill missing values
#[derive(Debug, Clone)]
pub struct ImputeTransform {
    columns: Vec<String>,
    method: ImputeMethod,
    value: Option<String>,
}

impl ImputeTransform {
    pub fn new(columns: Vec<String>, method: ImputeMethod, value: Option<String>) -> Self {
        Self {
            columns,
            method,
            value,
        }
    }

    /// `method` defaults to `mean`.
    pub fn from_parameters(columns: Vec<String>, params: &ActionParams) -> Result<Self> {
        let method = params.method.as_deref().unwrap_or("mean").parse()?;
        Ok(Self::new(columns, method, params.value_text()))
    }
}

impl Transform for ImputeTransform {
    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        ops::impute(df, &self.columns, self.method, self.value.as_deref())
    }

    fn name(&self) -> &'static str {
        "impute"
    }

    fn parameters(&self) -> BTreeMap<String, serde_json::Value> {
        BTreeMap::from([
            ("columns".to_owned(), serde_json::json!(self.columns)),
            ("method".to_owned(), serde_json::json!(self.method.as_str())),
            ("value".to_owned(), serde_json::json!(self.value)),
        ])
    }

    fn description(&self) -> String {
        format!(
            "Impute {} column(s) with {}",
            self.columns.len(),
            self.method.as_str()
        )
    }
}

/// Outcome of `apply` or `undo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applied {
    pub preview: Preview,
    pub can_undo: bool,
}

/// Applies transforms to session snapshots and undoes them.
///
/// Each call holds the session's history lock from reading the top to
/// pushing or popping, so calls on one session never interleave.
#[derive(Clone)]
pub struct TransformationEngine {
    sessions: SessionRegistry,
}

impl TransformationEngine {
    pub fn new(sessions: SessionRegistry) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Apply `action` to the session top and push the result.
    ///
    /// A session without history starts from `fallback`, the caller's
    /// upload. `can_undo` is whether the stack is non-empty after the push,
    /// which always holds.
    ///
    /// # Errors
    ///
    /// `UnsupportedAction` for actions other than `drop` and `impute`,
    /// `UnknownMethod` / `UnknownColumn` / `InvalidParameter` from the
    /// transform, and `Parse` when the fallback is needed but unreadable.
    pub fn apply(
        &self,
        session_id: &str,
        action: &str,
        columns: Vec<String>,
        params: &ActionParams,
        fallback: &[u8],
        rows: usize,
    ) -> Result<Applied> {
        let transform = instantiate_transform(action.parse()?, columns, params)?;

        let history = self.sessions.history_or_create(session_id)?;
        let mut stack = history.lock().map_err(PrepError::lock_poisoned)?;

        let base = match stack.last() {
            Some(top) => top.clone(),
            None => {
                tracing::info!("Session {} has no history, starting from upload", session_id);
                frame::decode(fallback)?
            }
        };

        let next = frame::sanitize_for_output(&transform.apply(&base)?)?;
        let preview = frame::preview(&next, rows)?;
        stack.push(next);
        let can_undo = !stack.is_empty();

        tracing::info!(
            "{} in session {} (depth {})",
            transform.description(),
            session_id,
            stack.len()
        );
        tracing::debug!(
            "Recorded {} with parameters {}",
            transform.name(),
            serde_json::Value::Object(transform.parameters().into_iter().collect())
        );
        Ok(Applied { preview, can_undo })
    }

    /// Pop the latest snapshot and preview the one below it.
    ///
    /// When the pop empties the stack the preview comes from `fallback`.
    ///
    /// # Errors
    ///
    /// `NoHistory` when the session is unknown or its stack is empty.
    pub fn undo(&self, session_id: &str, fallback: &[u8], rows: usize) -> Result<Applied> {
        let history = self
            .sessions
            .history(session_id)?
            .ok_or(PrepError::NoHistory)?;
        let mut stack = history.lock().map_err(PrepError::lock_poisoned)?;

        if stack.pop().is_none() {
            return Err(PrepError::NoHistory);
        }

        let preview = match stack.last() {
            Some(top) => frame::preview(top, rows)?,
            None => frame::preview(&frame::decode(fallback)?, rows)?,
        };
        let can_undo = !stack.is_empty();

        tracing::info!("Undo in session {} (depth {})", session_id, stack.len());
        Ok(Applied { preview, can_undo })
    }
}
