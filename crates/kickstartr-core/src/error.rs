//! Error types module
//!
//! `ApiError` is the single error type returned by every remote call, real or
//! mocked. HTTP failures keep the decoded ProblemDetails body (when the backend
//! sent one) so callers can show the most specific message available.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback shown when neither the backend nor the transport produced anything readable.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Field name to validation messages, in the order the backend listed them.
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// RFC 7807 style error body returned by the backend on validation failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default, deserialize_with = "deserialize_field_errors")]
    pub errors: FieldErrors,
}

impl ProblemDetails {
    /// Parse a response body; `None` when it is not a JSON object.
    pub fn from_body(body: &str) -> Option<Self> {
        // Decoded straight from the text: a `Value` round trip would sort the fields.
        if !body.trim_start().starts_with('{') {
            return None;
        }
        serde_json::from_str(body).ok()
    }

    /// First message of the first field error.
    pub fn first_field_error(&self) -> Option<&str> {
        self.errors
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Most specific message: first field error, else title.
    pub fn display_message(&self) -> Option<String> {
        self.first_field_error()
            .or(self.title.as_deref())
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
    }
}

/// Backend errors map each field to either a list of messages or a single string.
fn deserialize_field_errors<'de, D>(deserializer: D) -> Result<FieldErrors, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Messages {
        Many(Vec<String>),
        One(String),
    }

    let raw: Option<IndexMap<String, Messages>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(field, messages)| {
            let messages = match messages {
                Messages::Many(list) => list,
                Messages::One(single) => vec![single],
            };
            (field, messages)
        })
        .collect())
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("API request failed with status {status}: {message}")]
    Http {
        status: u16,
        message: String,
        problem: Option<ProblemDetails>,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Build an HTTP error from a non-success status and its raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let problem = ProblemDetails::from_body(body);
        let message = problem
            .as_ref()
            .and_then(ProblemDetails::display_message)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

        ApiError::Http {
            status,
            message,
            problem,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn problem(&self) -> Option<&ProblemDetails> {
        match self {
            ApiError::Http { problem, .. } => problem.as_ref(),
            _ => None,
        }
    }

    /// Field errors carried by a ProblemDetails body, empty otherwise.
    pub fn field_errors(&self) -> FieldErrors {
        self.problem()
            .map(|p| p.errors.clone())
            .unwrap_or_default()
    }

    /// Message suitable for showing to a user next to the form.
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}
