//! Upload grant and artifact types for the signed-upload flow.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use validator::Validate;

use crate::error::{ApiError, ApiResult};

/// Content type used when the artifact does not declare one
pub const DEFAULT_ARTIFACT_CONTENT_TYPE: &str = "application/zip";

/// Body for `POST /api/Template/upload-url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[validate(length(min = 1, message = "Template slug is required"))]
    pub template_slug: String,
    #[validate(length(min = 1, message = "Version is required"))]
    pub version: String,
}

impl UploadRequest {
    pub fn new(template_slug: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            template_slug: template_slug.into(),
            version: version.into(),
        }
    }
}

/// Raw `uploadUrl` object; every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadUrlDto {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Response of `POST /api/Template/upload-url`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    #[serde(default)]
    pub upload_url: Option<UploadUrlDto>,
}

impl UploadUrlResponse {
    /// Validate the wire shape; a grant without a URL is unusable.
    pub fn into_grant(self) -> ApiResult<UploadGrant> {
        let dto = self
            .upload_url
            .ok_or_else(|| ApiError::InvalidResponse("No upload URL received".to_string()))?;
        let url = dto
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("No upload URL received".to_string()))?;

        Ok(UploadGrant {
            url,
            container: dto.container.unwrap_or_default(),
            object_name: dto.name.unwrap_or_default(),
            headers: dto.headers.unwrap_or_default(),
        })
    }
}

/// Short-lived authorization to write one object to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadGrant {
    pub url: String,
    pub container: String,
    pub object_name: String,
    /// Extra headers the storage service expects on the PUT
    pub headers: BTreeMap<String, String>,
}

impl UploadGrant {
    pub fn is_usable(&self) -> bool {
        let url = self.url.trim();
        url.starts_with("http://") || url.starts_with("https://")
    }
}

/// The template archive selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub file_name: String,
    /// Declared MIME type, if any
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ArtifactFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an archive from disk. The content type is declared only for `.zip` files.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("artifact.zip")
            .to_string();
        let is_zip = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

        Ok(Self {
            file_name,
            content_type: is_zip.then(|| DEFAULT_ARTIFACT_CONTENT_TYPE.to_string()),
            data: Bytes::from(data),
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Declared content type, defaulting to `application/zip`.
    pub fn effective_content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_ARTIFACT_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn into_grant_maps_wire_fields() {
        let response: UploadUrlResponse = serde_json::from_str(
            r#"{ "uploadUrl": {
                "url": "https://storage.example/templates/demo-app/1.0.0.zip?sig=abc",
                "container": "templates",
                "name": "demo-app/1.0.0.zip",
                "headers": { "x-ms-blob-type": "BlockBlob" }
            } }"#,
        )
        .unwrap();
        let grant = response.into_grant().unwrap();
        assert_eq!(grant.container, "templates");
        assert_eq!(grant.object_name, "demo-app/1.0.0.zip");
        assert_eq!(grant.headers["x-ms-blob-type"], "BlockBlob");
        assert!(grant.is_usable());
    }

    #[test]
    fn into_grant_rejects_missing_url() {
        let missing: UploadUrlResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            missing.into_grant(),
            Err(ApiError::InvalidResponse(_))
        ));

        let empty: UploadUrlResponse =
            serde_json::from_str(r#"{ "uploadUrl": { "url": "" } }"#).unwrap();
        assert!(empty.into_grant().is_err());
    }

    #[test]
    fn into_grant_defaults_optional_fields() {
        let response: UploadUrlResponse =
            serde_json::from_str(r#"{ "uploadUrl": { "url": "https://storage/x" } }"#).unwrap();
        let grant = response.into_grant().unwrap();
        assert!(grant.headers.is_empty());
        assert!(grant.object_name.is_empty());
    }

    #[test]
    fn upload_request_serializes_camel_case() {
        let json = serde_json::to_value(UploadRequest::new("demo-app", "1.0.0")).unwrap();
        assert_eq!(json["templateSlug"], "demo-app");
        assert_eq!(json["version"], "1.0.0");
    }

    #[test]
    fn upload_request_validation() {
        assert!(UploadRequest::new("demo-app", "1.0.0").validate().is_ok());
        assert!(UploadRequest::new("", "1.0.0").validate().is_err());
        assert!(UploadRequest::new("demo-app", "").validate().is_err());
    }

    #[test]
    fn effective_content_type_defaults_to_zip() {
        let file = ArtifactFile::new("a.zip", vec![1u8, 2, 3]);
        assert_eq!(file.effective_content_type(), DEFAULT_ARTIFACT_CONTENT_TYPE);
        assert_eq!(file.size(), 3);
        let typed = file.with_content_type("application/x-zip-compressed");
        assert_eq!(typed.effective_content_type(), "application/x-zip-compressed");
    }

    #[tokio::test]
    async fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.zip");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"PK\x03\x04demo").unwrap();

        let file = ArtifactFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "demo.zip");
        assert_eq!(file.content_type.as_deref(), Some("application/zip"));
        assert_eq!(file.size(), 8);
    }
}
