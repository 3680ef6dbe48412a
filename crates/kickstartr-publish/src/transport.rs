//! Transport capability used by the publish coordinator.

use async_trait::async_trait;
use kickstartr_core::models::{
    ArtifactFile, CreateRecordResponse, CreateTemplateRequest, CreateTemplateVersionRequest,
    UploadGrant, UploadRequest,
};
use kickstartr_core::{ApiError, ApiResult};
use validator::Validate;

use crate::progress::ProgressTracker;

/// Record to create once the artifact is stored
#[derive(Debug, Clone, PartialEq)]
pub enum RecordMetadata {
    /// New template with its initial version
    Template(CreateTemplateRequest),
    /// New version of an existing template
    Version(CreateTemplateVersionRequest),
}

impl RecordMetadata {
    pub fn kind(&self) -> &'static str {
        match self {
            RecordMetadata::Template(_) => "template",
            RecordMetadata::Version(_) => "version",
        }
    }

    /// Slug and version the record refers to
    pub fn slug_and_version(&self) -> (&str, &str) {
        match self {
            RecordMetadata::Template(r) => (&r.slug, &r.version),
            RecordMetadata::Version(r) => (&r.slug, &r.version),
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        let result = match self {
            RecordMetadata::Template(r) => r.validate(),
            RecordMetadata::Version(r) => r.validate(),
        };
        result.map_err(|e| ApiError::Validation(e.to_string()))
    }

    /// Message used when the backend answers without an id
    pub fn missing_id_message(&self) -> &'static str {
        match self {
            RecordMetadata::Template(_) => "Template creation failed",
            RecordMetadata::Version(_) => "Version creation failed",
        }
    }
}

/// The three remote operations of a publish.
///
/// Implemented by the HTTP client and by the in-memory mock. Implementations
/// must not retry and must not cache grants.
#[async_trait]
pub trait ArtifactTransport: Send + Sync {
    /// Ask the backend for a signed upload grant for (slug, version)
    async fn request_grant(&self, request: &UploadRequest) -> ApiResult<UploadGrant>;

    /// PUT the archive to the grant URL, advancing `progress` as bytes go out
    async fn put_object(
        &self,
        grant: &UploadGrant,
        file: &ArtifactFile,
        progress: &ProgressTracker,
    ) -> ApiResult<()>;

    /// Create the template or version record
    async fn create_record(&self, metadata: &RecordMetadata) -> ApiResult<CreateRecordResponse>;
}
