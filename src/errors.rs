use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    NotFound(String),
    BadRequest(String),
    Content(ContentError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                write!(f, "validation error: {}", join_field_errors(errors))
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Content(err) => write!(f, "Content error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::Content(ContentError::InvalidEntries(entries)) => {
                serde_json::json!({
                    "error": "Invalid content",
                    "details": entries
                })
            }
            _ => {
                serde_json::json!({"error": self.to_string()})
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Content(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(field_errors(&errors))
    }
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        AppError::Content(err)
    }
}

/// Flattens `ValidationErrors` into one `FieldError` per violation,
/// ordered by field name and then by error code.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flattened: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| FieldError {
                field: field.to_string(),
                code: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
                expected: e
                    .params
                    .get("expected")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                received: e.params.get("value").cloned(),
            })
        })
        .collect();

    flattened.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    flattened
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors.iter()
        .map(|e| format!("{}:{}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Display)]
pub enum ContentError {
    #[display("failed to read {_0}: {_1}")]
    Io(String, String),
    #[display("malformed front matter in {_0}: {_1}")]
    MalformedFrontMatter(String, String),
    #[display("duplicate entry slug '{_0}' in {_1}")]
    DuplicateSlug(String, String),
    #[display("{} invalid work entries: {}", _0.len(), summarize_entries(_0))]
    InvalidEntries(Vec<EntryError>),
}

fn summarize_entries(entries: &[EntryError]) -> String {
    entries.iter()
        .map(|e| format!("{} ({})", e.source, join_field_errors(&e.errors)))
        .collect::<Vec<_>>()
        .join("; ")
}

impl std::error::Error for ContentError {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryError {
    pub source: String,
    pub errors: Vec<FieldError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_error(source: &str, field: &str, message: &str) -> EntryError {
        EntryError {
            source: source.to_string(),
            errors: vec![FieldError {
                field: field.to_string(),
                code: "required".to_string(),
                message: message.to_string(),
                expected: None,
                received: None,
            }],
        }
    }

    #[test]
    fn content_errors_name_their_source() {
        let io = ContentError::Io("content/work".into(), "not found".into());
        assert_eq!(io.to_string(), "failed to read content/work: not found");

        let dup = ContentError::DuplicateSlug("my-site".into(), "my-site.md".into());
        assert_eq!(dup.to_string(), "duplicate entry slug 'my-site' in my-site.md");
    }

    #[test]
    fn invalid_entries_are_summarized_per_source() {
        let err = ContentError::InvalidEntries(vec![
            entry_error("a.md", "img", "Required"),
            entry_error("b.md", "title", "Required"),
        ]);

        assert_eq!(
            err.to_string(),
            "2 invalid work entries: a.md (img:Required); b.md (title:Required)"
        );
        assert_eq!(AppError::from(err).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
