//! Publish coordinator
//!
//! Drives grant → upload → record for one artifact and reports state
//! transitions and upload progress to an optional observer.

use std::sync::Arc;

use kickstartr_core::models::{ArtifactFile, UploadRequest};
use kickstartr_core::ApiError;
use serde::Serialize;
use validator::Validate;

use crate::error::PublishError;
use crate::progress::{ProgressSink, ProgressTracker};
use crate::state::{PublishObserver, PublishState, PublishStep};
use crate::transport::{ArtifactTransport, RecordMetadata};

/// Arguments of one publish
#[derive(Debug, Clone)]
pub struct PublishInput<'a> {
    pub template_slug: String,
    pub version: String,
    /// Borrowed for the duration of the upload only
    pub file: Option<&'a ArtifactFile>,
    pub metadata: RecordMetadata,
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifact {
    pub record_id: String,
    pub container: String,
    pub object_name: String,
}

/// Sequences the three publish steps over an injected transport.
///
/// Holds no per-publish state: every call requests a fresh grant. Concurrent
/// calls for the same slug and version are not deduplicated.
#[derive(Clone)]
pub struct Publisher {
    transport: Arc<dyn ArtifactTransport>,
    observer: Option<Arc<dyn PublishObserver>>,
}

impl Publisher {
    pub fn new(transport: Arc<dyn ArtifactTransport>) -> Self {
        Self {
            transport,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PublishObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Publish an artifact and create its record.
    ///
    /// Fails with `PublishError::Validation` before any remote call when the
    /// slug, version or file is missing, or when the metadata names another
    /// slug or version. The record is only created after the
    /// upload succeeded; if record creation fails the stored object is left in
    /// place.
    #[tracing::instrument(
        skip(self, input),
        fields(
            template_slug = %input.template_slug,
            version = %input.version,
            record = input.metadata.kind(),
            operation = "publish_artifact"
        )
    )]
    pub async fn publish_artifact(
        &self,
        input: PublishInput<'_>,
    ) -> Result<PublishedArtifact, PublishError> {
        let (request, file) = validate_input(&input)?;
        let mut run = PublishRun::new(self.observer.clone());

        // 1. Grant
        run.enter(PublishState::RequestingGrant);
        let grant = match self.transport.request_grant(&request).await {
            Ok(grant) if grant.is_usable() => grant,
            Ok(_) => {
                return Err(run.fail(
                    PublishStep::Grant,
                    PublishError::Grant(ApiError::InvalidResponse(
                        "No upload URL received".to_string(),
                    )),
                ))
            }
            Err(e) => return Err(run.fail(PublishStep::Grant, PublishError::Grant(e))),
        };
        tracing::debug!(
            container = %grant.container,
            object_name = %grant.object_name,
            "Upload grant received"
        );

        // 2. Upload
        run.enter(PublishState::Uploading);
        let progress = ProgressTracker::new(file.size(), run.progress_sink());
        if let Err(e) = self.transport.put_object(&grant, file, &progress).await {
            return Err(run.fail(PublishStep::Upload, PublishError::Upload(e)));
        }
        progress.finish();
        tracing::info!(bytes = file.size(), "Artifact uploaded");

        // 3. Record
        run.enter(PublishState::CreatingRecord);
        let response = match self.transport.create_record(&input.metadata).await {
            Ok(response) => response,
            Err(e) => return Err(run.fail(PublishStep::Record, PublishError::record(e))),
        };
        let Some(record_id) = response.record_id().map(str::to_string) else {
            let message = input.metadata.missing_id_message().to_string();
            return Err(run.fail(
                PublishStep::Record,
                PublishError::record(ApiError::InvalidResponse(message)),
            ));
        };

        run.enter(PublishState::Done);
        tracing::info!(record_id = %record_id, "Artifact published");

        Ok(PublishedArtifact {
            record_id,
            container: grant.container,
            object_name: grant.object_name,
        })
    }
}

fn validate_input<'a>(
    input: &PublishInput<'a>,
) -> Result<(UploadRequest, &'a ArtifactFile), PublishError> {
    let request = UploadRequest::new(input.template_slug.trim(), input.version.trim());
    request
        .validate()
        .map_err(|e| PublishError::Validation(e.to_string()))?;
    let file = input
        .file
        .ok_or_else(|| PublishError::Validation("No zip file selected".to_string()))?;
    input
        .metadata
        .validate()
        .map_err(|e| PublishError::Validation(e.user_message()))?;

    // The record must describe the object this run uploads.
    let (slug, version) = input.metadata.slug_and_version();
    if slug.trim() != request.template_slug || version.trim() != request.version {
        return Err(PublishError::Validation(format!(
            "Record is for {}/{} but the artifact is {}/{}",
            slug.trim(),
            version.trim(),
            request.template_slug,
            request.version
        )));
    }
    Ok((request, file))
}

/// Current state of one publish plus the observer to notify.
struct PublishRun {
    state: PublishState,
    observer: Option<Arc<dyn PublishObserver>>,
}

impl PublishRun {
    fn new(observer: Option<Arc<dyn PublishObserver>>) -> Self {
        Self {
            state: PublishState::Idle,
            observer,
        }
    }

    fn enter(&mut self, next: PublishState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal publish transition {} -> {}",
            self.state,
            next
        );
        tracing::info!(from = %self.state, to = %next, "Publish state changed");
        self.state = next;
        if let Some(observer) = &self.observer {
            observer.on_state(next);
        }
    }

    fn fail(&mut self, step: PublishStep, error: PublishError) -> PublishError {
        tracing::warn!(step = %step, error = %error, "Publish failed");
        self.enter(PublishState::Failed(step));
        error
    }

    fn progress_sink(&self) -> Option<ProgressSink> {
        self.observer.clone().map(|observer| {
            let sink: ProgressSink = Arc::new(move |percent| {
                tracing::debug!(percent, "Upload progress");
                observer.on_progress(percent);
            });
            sink
        })
    }
}
