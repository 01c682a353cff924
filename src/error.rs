//! Centralized error handling for dataprepper.
//!
//! Every core operation returns [`Result`], whose error type [`PrepError`]
//! enumerates the failure taxonomy surfaced to callers:
//!
//! | Variant                | Meaning                                         |
//! |------------------------|-------------------------------------------------|
//! | `Parse`                | The uploaded buffer is not a readable table     |
//! | `UnknownColumn`        | A named column does not exist                   |
//! | `UnknownMethod`        | Method/dtype name outside the supported set     |
//! | `UnsupportedAction`    | Action not allowed inside a session             |
//! | `UnknownOperation`     | No cached drop under the given operation id     |
//! | `RowCountMismatch`     | Restored column length differs from the table   |
//! | `NoHistory`            | Undo with an empty history                      |
//! | `NotFound`             | Unknown session id                              |
//!
//! All of these (plus `InvalidParameter`) are caller errors: the HTTP layer
//! maps them to `400 Bad Request` with the `Display` text as message.
//!
//! ```
//! use dataprepper::error::PrepError;
//!
//! let err = PrepError::UnknownColumn("age".to_owned());
//! assert!(err.is_client_error());
//! assert_eq!(err.to_string(), "Unknown column: age");
//! ```

use std::fmt;

/// Main error type for dataprepper operations.
#[derive(Debug)]
pub enum PrepError {
    /// Malformed input table (ragged rows, unreadable encoding, empty buffer)
    Parse(String),

    /// A referenced column is absent from the table
    UnknownColumn(String),

    /// Unsupported imputation/encoding/scaling method or dtype name
    UnknownMethod(String),

    /// Action name not in the session engine's allow-list
    UnsupportedAction(String),

    /// Dropped-column cache has no entry for this operation id
    UnknownOperation(String),

    /// A cached column cannot be restored because the row counts differ
    RowCountMismatch { column: String },

    /// Undo requested with nothing on the history stack
    NoHistory,

    /// Unknown session id, or a session whose history is empty
    NotFound(String),

    /// Caller-supplied value that cannot be used (bad regex, missing constant, ...)
    InvalidParameter(String),

    /// Polars failures not attributable to the caller
    DataProcessing(String),

    /// I/O errors
    Io(std::io::Error),

    /// Configuration errors
    Config(String),

    /// Poisoned locks, failed worker joins and similar
    Internal(String),
}

impl PrepError {
    /// Whether this failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Internal(_) | Self::Config(_))
    }

    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "PARSE_ERROR",
            Self::UnknownColumn(_) => "UNKNOWN_COLUMN",
            Self::UnknownMethod(_) => "UNKNOWN_METHOD",
            Self::UnsupportedAction(_) => "UNSUPPORTED_ACTION",
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
            Self::RowCountMismatch { .. } => "ROW_COUNT_MISMATCH",
            Self::NoHistory => "NO_HISTORY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::DataProcessing(_) => "DATA_PROCESSING",
            Self::Io(_) => "IO_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub(crate) fn lock_poisoned(err: impl fmt::Display) -> Self {
        Self::Internal(format!("Lock poisoned: {err}"))
    }
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Could not parse table: {msg}"),
            Self::UnknownColumn(name) => write!(f, "Unknown column: {name}"),
            Self::UnknownMethod(msg) => write!(f, "Unknown method: {msg}"),
            Self::UnsupportedAction(action) => {
                write!(f, "Unsupported action for history: {action}")
            }
            Self::UnknownOperation(op_id) => {
                write!(f, "No dropped columns found for operation ID: {op_id}")
            }
            Self::RowCountMismatch { column } => {
                write!(f, "Cannot restore column '{column}': row count mismatch.")
            }
            Self::NoHistory => write!(f, "No history to undo."),
            Self::NotFound(session_id) => write!(f, "Session not found: {session_id}"),
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for PrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for PrepError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidParameter(format!("JSON error: {err}"))
    }
}

impl From<regex::Error> for PrepError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidParameter(format!("invalid regex: {err}"))
    }
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        use polars::error::PolarsError;
        match err {
            PolarsError::ColumnNotFound(msg) => Self::UnknownColumn(msg.to_string()),
            other => Self::DataProcessing(other.to_string()),
        }
    }
}

impl From<PrepError> for String {
    fn from(err: PrepError) -> Self {
        err.to_string()
    }
}

/// Result type alias for dataprepper operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(e.into(), msg.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// Context keeps the variant so client/server classification survives.
fn wrap(err: PrepError, msg: String) -> PrepError {
    match err {
        PrepError::Parse(inner) => PrepError::Parse(format!("{msg}: {inner}")),
        PrepError::InvalidParameter(inner) => {
            PrepError::InvalidParameter(format!("{msg}: {inner}"))
        }
        PrepError::DataProcessing(inner) => PrepError::DataProcessing(format!("{msg}: {inner}")),
        PrepError::Config(inner) => PrepError::Config(format!("{msg}: {inner}")),
        PrepError::Io(e) => PrepError::Io(std::io::Error::new(e.kind(), format!("{msg}: {e}"))),
        PrepError::Internal(inner) => PrepError::Internal(format!("{msg}: {inner}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::RowCountMismatch {
            column: "price".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot restore column 'price': row count mismatch."
        );
        assert_eq!(PrepError::NoHistory.to_string(), "No history to undo.");
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = PrepError::UnsupportedAction("encode".to_owned());
        let s: String = err.into();
        assert_eq!(s, "Unsupported action for history: encode");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PrepError::NotFound("abc".to_owned()).is_client_error());
        assert!(PrepError::Parse("ragged".to_owned()).is_client_error());
        assert!(!PrepError::Internal("boom".to_owned()).is_client_error());
        assert!(!PrepError::Io(std::io::Error::other("disk")).is_client_error());
    }

    #[test]
    fn test_result_context_keeps_variant() {
        let result: Result<()> = Err(PrepError::Parse("ragged rows".to_owned()));
        let result = result.context("Failed to decode upload");

        match result {
            Err(PrepError::Parse(msg)) => {
                assert!(msg.contains("Failed to decode upload"));
                assert!(msg.contains("ragged rows"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_regex_error_is_invalid_parameter() {
        let err: PrepError = regex::Regex::new("(unclosed")
            .map(|_| ())
            .map_err(PrepError::from)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETER");
    }
}
