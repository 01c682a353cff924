//! Multipart upload forms: one `file` part plus text fields.

use super::error::AppError;
use crate::error::{PrepError, Result};
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Name of the part carrying the uploaded table.
pub const FILE_FIELD: &str = "file";

/// A parsed multipart body.
///
/// Text fields keep their raw value; typed accessors parse on demand so a
/// bad field surfaces as an error for that request only.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    file: Option<Bytes>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> std::result::Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            if name == FILE_FIELD {
                form.file = Some(field.bytes().await?);
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    /// Build a form directly, as the CLI and tests do.
    pub fn with_file(file: impl Into<Bytes>) -> Self {
        Self {
            file: Some(file.into()),
            fields: HashMap::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The uploaded table bytes. Cloning shares the buffer.
    pub fn file(&self) -> std::result::Result<Bytes, AppError> {
        self.file
            .clone()
            .ok_or_else(|| AppError::BadRequest(format!("Missing form field: {FILE_FIELD}")))
    }

    /// A text field; empty values count as absent.
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &str) -> std::result::Result<&str, AppError> {
        self.optional(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing form field: {name}")))
    }

    /// A list field: a JSON array, or a bare single name.
    pub fn list(&self, name: &str) -> std::result::Result<Vec<String>, AppError> {
        Ok(parse_list(self.required(name)?)?)
    }

    pub fn optional_list(&self, name: &str) -> std::result::Result<Option<Vec<String>>, AppError> {
        Ok(self.optional(name).map(parse_list).transpose()?)
    }

    /// A JSON-encoded field.
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> std::result::Result<T, AppError> {
        let text = self.required(name)?;
        serde_json::from_str(text)
            .map_err(|e| PrepError::InvalidParameter(format!("{name}: {e}")).into())
    }
}

impl<S: Send + Sync> FromRequest<S> for UploadForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Self::from_multipart(multipart).await
    }
}

/// `["a", "b"]` as two names; anything not starting with `[` as one name.
pub fn parse_list(text: &str) -> Result<Vec<String>> {
    if text.trim_start().starts_with('[') {
        Ok(serde_json::from_str(text)?)
    } else {
        Ok(vec![text.to_owned()])
    }
}
