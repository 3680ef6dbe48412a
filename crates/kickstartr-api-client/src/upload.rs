//! Signed-upload calls: grant request, direct PUT to storage, record creation.

use async_trait::async_trait;
use bytes::Bytes;
use kickstartr_core::models::{
    ArtifactFile, CreateRecordResponse, CreateTemplateRequest, CreateTemplateVersionRequest,
    UploadGrant, UploadRequest, UploadUrlResponse,
};
use kickstartr_core::{ApiError, ApiResult};
use kickstartr_publish::{ArtifactTransport, ProgressTracker, RecordMetadata};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};

use crate::api::TEMPLATE_PATH;
use crate::{ensure_success, transport_error, ApiClient};

impl ApiClient {
    /// Ask for a signed upload URL for (slug, version).
    pub async fn request_upload_url(&self, request: &UploadRequest) -> ApiResult<UploadGrant> {
        let response: UploadUrlResponse = self
            .post_json(&format!("{}/upload-url", TEMPLATE_PATH), request)
            .await?;
        response.into_grant()
    }

    /// PUT the archive to the grant URL.
    ///
    /// The body is streamed in chunks of the configured size and `progress`
    /// advances as each chunk is handed to the connection. Grant headers
    /// override the default `Content-Type`. No retry.
    pub async fn upload_artifact(
        &self,
        grant: &UploadGrant,
        file: &ArtifactFile,
        progress: &ProgressTracker,
    ) -> ApiResult<()> {
        let headers = upload_headers(grant, file)?;

        let tracker = progress.clone();
        let chunks = split_chunks(&file.data, self.upload_chunk_size());
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            tracker.advance(chunk.len() as u64);
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        tracing::debug!(
            object_name = %grant.object_name,
            bytes = file.size(),
            "Uploading artifact"
        );
        let response = self
            .client()
            .put(&grant.url)
            .headers(headers)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        Ok(())
    }

    pub async fn create_template(
        &self,
        request: &CreateTemplateRequest,
    ) -> ApiResult<CreateRecordResponse> {
        self.post_json(TEMPLATE_PATH, request).await
    }

    pub async fn create_template_version(
        &self,
        template_id: &str,
        request: &CreateTemplateVersionRequest,
    ) -> ApiResult<CreateRecordResponse> {
        self.post_json(
            &format!(
                "{}/version/{}",
                TEMPLATE_PATH,
                urlencoding::encode(template_id)
            ),
            request,
        )
        .await
    }
}

#[async_trait]
impl ArtifactTransport for ApiClient {
    async fn request_grant(&self, request: &UploadRequest) -> ApiResult<UploadGrant> {
        self.request_upload_url(request).await
    }

    async fn put_object(
        &self,
        grant: &UploadGrant,
        file: &ArtifactFile,
        progress: &ProgressTracker,
    ) -> ApiResult<()> {
        self.upload_artifact(grant, file, progress).await
    }

    async fn create_record(&self, metadata: &RecordMetadata) -> ApiResult<CreateRecordResponse> {
        match metadata {
            RecordMetadata::Template(request) => self.create_template(request).await,
            RecordMetadata::Version(request) => {
                self.create_template_version(&request.template_id, request)
                    .await
            }
        }
    }
}

fn upload_headers(grant: &UploadGrant, file: &ArtifactFile) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(file.effective_content_type())
            .map_err(|e| ApiError::Validation(format!("Invalid content type: {}", e)))?,
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(file.size()));

    for (name, value) in &grant.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidResponse(format!("Invalid grant header {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidResponse(format!("Invalid grant header value: {}", e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Zero-copy chunking; an empty file yields no chunks.
fn split_chunks(data: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn split_chunks_covers_all_bytes() {
        let data = Bytes::from(vec![1u8; 10]);
        let chunks = split_chunks(&data, 4);
        assert_eq!(
            chunks.iter().map(Bytes::len).collect::<Vec<_>>(),
            vec![4, 4, 2]
        );
        assert!(split_chunks(&Bytes::new(), 4).is_empty());
        assert_eq!(split_chunks(&data, 0).len(), 10);
    }

    #[test]
    fn grant_headers_override_content_type() {
        let mut grant_headers = BTreeMap::new();
        grant_headers.insert("x-ms-blob-type".to_string(), "BlockBlob".to_string());
        grant_headers.insert("Content-Type".to_string(), "application/octet-stream".to_string());
        let grant = UploadGrant {
            url: "https://storage/x".to_string(),
            container: String::new(),
            object_name: String::new(),
            headers: grant_headers,
        };
        let file = ArtifactFile::new("a.zip", vec![0u8; 3]);

        let headers = upload_headers(&grant, &file).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(headers[CONTENT_LENGTH], "3");
        assert_eq!(headers["x-ms-blob-type"], "BlockBlob");
    }

    #[test]
    fn invalid_grant_header_is_rejected() {
        let mut grant_headers = BTreeMap::new();
        grant_headers.insert("bad header".to_string(), "x".to_string());
        let grant = UploadGrant {
            url: "https://storage/x".to_string(),
            container: String::new(),
            object_name: String::new(),
            headers: grant_headers,
        };
        let file = ArtifactFile::new("a.zip", vec![0u8; 3]);
        assert!(matches!(
            upload_headers(&grant, &file),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
