//! In-memory transport used in mock mode.
//!
//! Issues grants for a fake storage host, keeps uploaded archives in memory
//! and creates records with generated ids. Like the real backend it refuses a
//! second record for the same slug and version.

use async_trait::async_trait;
use bytes::Bytes;
use kickstartr_core::models::{
    ArtifactFile, CreateRecordResponse, UploadGrant, UploadRequest,
};
use kickstartr_core::{ApiError, ApiResult};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::progress::ProgressTracker;
use crate::transport::{ArtifactTransport, RecordMetadata};

const MOCK_STORAGE_HOST: &str = "https://mock-storage.kickstartr.local";
const MOCK_CONTAINER: &str = "templates";
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

pub struct MockTransport {
    chunk_size: usize,
    grants_issued: AtomicUsize,
    objects: Mutex<HashMap<String, Bytes>>,
    records: Mutex<HashSet<(String, String)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            grants_issued: AtomicUsize::new(0),
            objects: Mutex::new(HashMap::new()),
            records: Mutex::new(HashSet::new()),
        }
    }

    pub fn grants_issued(&self) -> usize {
        self.grants_issued.load(Ordering::SeqCst)
    }

    /// Stored archive bytes (for test assertions)
    pub fn object(&self, object_name: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(object_name)
            .cloned()
    }

    pub fn has_record(&self, slug: &str, version: &str) -> bool {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(slug.to_string(), version.to_string()))
    }

    fn object_name(slug: &str, version: &str) -> String {
        format!("{}/{}.zip", slug, version)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactTransport for MockTransport {
    async fn request_grant(&self, request: &UploadRequest) -> ApiResult<UploadGrant> {
        self.grants_issued.fetch_add(1, Ordering::SeqCst);

        let object_name = Self::object_name(&request.template_slug, &request.version);
        let mut headers = BTreeMap::new();
        headers.insert("x-ms-blob-type".to_string(), "BlockBlob".to_string());

        Ok(UploadGrant {
            url: format!(
                "{}/{}/{}?sig={}",
                MOCK_STORAGE_HOST,
                MOCK_CONTAINER,
                object_name,
                Uuid::new_v4().simple()
            ),
            container: MOCK_CONTAINER.to_string(),
            object_name,
            headers,
        })
    }

    async fn put_object(
        &self,
        grant: &UploadGrant,
        file: &ArtifactFile,
        progress: &ProgressTracker,
    ) -> ApiResult<()> {
        if !grant.url.starts_with(MOCK_STORAGE_HOST) {
            return Err(ApiError::from_response(
                403,
                "Grant was not issued by this storage",
            ));
        }
        for chunk in file.data.chunks(self.chunk_size) {
            progress.advance(chunk.len() as u64);
        }
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(grant.object_name.clone(), file.data.clone());
        Ok(())
    }

    async fn create_record(&self, metadata: &RecordMetadata) -> ApiResult<CreateRecordResponse> {
        let (slug, version) = metadata.slug_and_version();
        let object_name = Self::object_name(slug, version);

        if !self
            .objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&object_name)
        {
            return Err(problem(400, "Artifact", "Artifact has not been uploaded"));
        }

        let inserted = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((slug.to_string(), version.to_string()));
        if !inserted {
            return Err(problem(
                409,
                "Version",
                &format!("Version {} already exists for {}", version, slug),
            ));
        }

        Ok(CreateRecordResponse {
            id: Some(Uuid::new_v4().to_string()),
        })
    }
}

fn problem(status: u16, field: &str, message: &str) -> ApiError {
    let mut errors = serde_json::Map::new();
    errors.insert(field.to_string(), serde_json::json!([message]));
    let body = serde_json::json!({
        "title": "One or more validation errors occurred.",
        "status": status,
        "errors": errors
    });
    ApiError::from_response(status, &body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickstartr_core::models::CreateTemplateVersionRequest;

    fn version_record(slug: &str, version: &str) -> RecordMetadata {
        RecordMetadata::Version(CreateTemplateVersionRequest {
            template_id: "t-1".to_string(),
            version: version.to_string(),
            slug: slug.to_string(),
            description: String::new(),
        })
    }

    #[tokio::test]
    async fn record_requires_uploaded_artifact() {
        let transport = MockTransport::new();
        let err = transport
            .create_record(&version_record("demo-app", "1.0.0"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message(), "Artifact has not been uploaded");
    }

    #[tokio::test]
    async fn duplicate_version_is_rejected() {
        let transport = MockTransport::with_chunk_size(4);
        let grant = transport
            .request_grant(&UploadRequest::new("demo-app", "1.0.0"))
            .await
            .unwrap();
        let file = ArtifactFile::new("demo.zip", vec![7u8; 10]);
        let progress = ProgressTracker::silent(file.size());
        transport.put_object(&grant, &file, &progress).await.unwrap();
        assert_eq!(progress.sent(), 10);
        assert_eq!(transport.object("demo-app/1.0.0.zip").unwrap().len(), 10);

        let record = version_record("demo-app", "1.0.0");
        assert!(transport.create_record(&record).await.unwrap().record_id().is_some());
        let err = transport.create_record(&record).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(transport.has_record("demo-app", "1.0.0"));
        assert_eq!(transport.grants_issued(), 1);
    }

    #[tokio::test]
    async fn concurrent_grants_are_all_counted() {
        let transport = MockTransport::new();
        let request = UploadRequest::new("demo-app", "1.0.0");
        let (a, b, c) = tokio::join!(
            transport.request_grant(&request),
            transport.request_grant(&request),
            transport.request_grant(&request)
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_ne!(a.unwrap().url, b.unwrap().url);
        assert_eq!(transport.grants_issued(), 3);
    }

    #[tokio::test]
    async fn foreign_grant_is_rejected() {
        let transport = MockTransport::new();
        let grant = UploadGrant {
            url: "https://elsewhere/x".to_string(),
            container: String::new(),
            object_name: "x".to_string(),
            headers: BTreeMap::new(),
        };
        let file = ArtifactFile::new("demo.zip", vec![1u8]);
        let err = transport
            .put_object(&grant, &file, &ProgressTracker::silent(1))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }
}
