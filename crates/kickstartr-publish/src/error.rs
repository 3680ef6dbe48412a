use kickstartr_core::{ApiError, FieldErrors};

use crate::state::PublishStep;

/// Failure of a publish, tagged with the step that failed
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Required local input missing; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to obtain upload URL: {0}")]
    Grant(#[source] ApiError),

    #[error("Artifact upload failed: {0}")]
    Upload(#[source] ApiError),

    /// The artifact is already stored when this happens
    #[error("Record creation failed: {message}")]
    Record {
        message: String,
        field_errors: FieldErrors,
        #[source]
        source: ApiError,
    },
}

impl PublishError {
    pub fn record(source: ApiError) -> Self {
        PublishError::Record {
            message: source.user_message(),
            field_errors: source.field_errors(),
            source,
        }
    }

    /// Remote step that failed; `None` for local validation.
    pub fn step(&self) -> Option<PublishStep> {
        match self {
            PublishError::Validation(_) => None,
            PublishError::Grant(_) => Some(PublishStep::Grant),
            PublishError::Upload(_) => Some(PublishStep::Upload),
            PublishError::Record { .. } => Some(PublishStep::Record),
        }
    }

    /// Most specific message for display next to the form
    pub fn user_message(&self) -> String {
        match self {
            PublishError::Validation(message) => message.clone(),
            PublishError::Grant(source) | PublishError::Upload(source) => source.user_message(),
            PublishError::Record { message, .. } => message.clone(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            PublishError::Record { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }
}
