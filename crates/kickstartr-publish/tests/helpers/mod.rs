//! Shared fakes for publish tests

#![allow(dead_code)]

use async_trait::async_trait;
use kickstartr_core::models::{
    ArtifactFile, CreateRecordResponse, CreateTemplateRequest, CreateTemplateVersionRequest,
    UploadGrant, UploadRequest, Visibility,
};
use kickstartr_core::{ApiError, ApiResult};
use kickstartr_publish::{
    ArtifactTransport, ProgressTracker, PublishObserver, PublishState, RecordMetadata,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Remote call observed by the fake transport
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Grant(UploadRequest),
    Put { url: String, bytes: u64, content_type: String },
    Record(RecordMetadata),
}

/// Transport with scripted outcomes that records every call in order
pub struct FakeTransport {
    pub calls: Mutex<Vec<Call>>,
    grant: Mutex<ApiResult<UploadGrant>>,
    put: Mutex<ApiResult<()>>,
    record: Mutex<ApiResult<CreateRecordResponse>>,
    chunk_size: usize,
}

impl FakeTransport {
    pub fn succeeding(record_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            grant: Mutex::new(Ok(grant("https://storage/x"))),
            put: Mutex::new(Ok(())),
            record: Mutex::new(Ok(CreateRecordResponse {
                id: Some(record_id.to_string()),
            })),
            chunk_size: 64 * 1024,
        }
    }

    pub fn failing_grant(self, error: ApiError) -> Self {
        *self.grant.lock().unwrap() = Err(error);
        self
    }

    pub fn returning_grant(self, grant: UploadGrant) -> Self {
        *self.grant.lock().unwrap() = Ok(grant);
        self
    }

    pub fn failing_put(self, error: ApiError) -> Self {
        *self.put.lock().unwrap() = Err(error);
        self
    }

    pub fn failing_record(self, error: ApiError) -> Self {
        *self.record.lock().unwrap() = Err(error);
        self
    }

    pub fn returning_record(self, response: CreateRecordResponse) -> Self {
        *self.record.lock().unwrap() = Ok(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn grant_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Grant(_)))
            .count()
    }

    pub fn put_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Put { .. }))
            .count()
    }

    pub fn record_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Record(_)))
            .count()
    }
}

#[async_trait]
impl ArtifactTransport for FakeTransport {
    async fn request_grant(&self, request: &UploadRequest) -> ApiResult<UploadGrant> {
        self.calls.lock().unwrap().push(Call::Grant(request.clone()));
        self.grant.lock().unwrap().clone()
    }

    async fn put_object(
        &self,
        grant: &UploadGrant,
        file: &ArtifactFile,
        progress: &ProgressTracker,
    ) -> ApiResult<()> {
        self.calls.lock().unwrap().push(Call::Put {
            url: grant.url.clone(),
            bytes: file.size(),
            content_type: file.effective_content_type().to_string(),
        });
        let outcome = self.put.lock().unwrap().clone();
        // Partial progress before a failure, full progress on success
        let chunks: Vec<&[u8]> = file.data.chunks(self.chunk_size).collect();
        let to_send = if outcome.is_ok() { chunks.len() } else { chunks.len() / 2 };
        for chunk in chunks.iter().take(to_send) {
            progress.advance(chunk.len() as u64);
        }
        outcome
    }

    async fn create_record(&self, metadata: &RecordMetadata) -> ApiResult<CreateRecordResponse> {
        self.calls.lock().unwrap().push(Call::Record(metadata.clone()));
        self.record.lock().unwrap().clone()
    }
}

/// Observer that keeps every state and progress event
#[derive(Default)]
pub struct RecordingObserver {
    pub states: Mutex<Vec<PublishState>>,
    pub progress: Mutex<Vec<u8>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn states(&self) -> Vec<PublishState> {
        self.states.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.progress.lock().unwrap().clone()
    }
}

impl PublishObserver for RecordingObserver {
    fn on_state(&self, state: PublishState) {
        self.states.lock().unwrap().push(state);
    }

    fn on_progress(&self, percent: u8) {
        self.progress.lock().unwrap().push(percent);
    }
}

pub fn grant(url: &str) -> UploadGrant {
    UploadGrant {
        url: url.to_string(),
        container: "templates".to_string(),
        object_name: "demo-app/1.0.0.zip".to_string(),
        headers: BTreeMap::new(),
    }
}

/// 2 MB archive
pub fn zip_file() -> ArtifactFile {
    ArtifactFile::new("demo-app.zip", vec![0x50u8; 2 * 1024 * 1024])
}

pub fn template_metadata(slug: &str, version: &str) -> RecordMetadata {
    RecordMetadata::Template(CreateTemplateRequest {
        name: "Demo App".to_string(),
        description: "A demo".to_string(),
        slug: slug.to_string(),
        visibility: Visibility::Public,
        price: "0".to_string(),
        currency: "USD".to_string(),
        version: version.to_string(),
        tags: vec![],
    })
}

pub fn version_metadata(template_id: &str, slug: &str, version: &str) -> RecordMetadata {
    RecordMetadata::Version(CreateTemplateVersionRequest {
        template_id: template_id.to_string(),
        version: version.to_string(),
        slug: slug.to_string(),
        description: "Bug fixes".to_string(),
    })
}
