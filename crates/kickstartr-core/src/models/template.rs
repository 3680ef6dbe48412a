use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::comment::CommentDto;
use super::package::PackageDto;
use super::tag::TagDto;

/// Template visibility as the backend encodes it (0=Public, 1=Private).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl From<Visibility> for u8 {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Public => 0,
            Visibility::Private => 1,
        }
    }
}

impl TryFrom<u8> for Visibility {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Visibility::Public),
            1 => Ok(Visibility::Private),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" | "0" => Ok(Visibility::Public),
            "private" | "1" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

/// Catalog entry as listed by `GET /api/Template`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListItemDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub tech_stack_summary: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagDto>,
}

impl TemplateListItemDto {
    pub fn price_label(&self) -> String {
        super::price_label(self.is_free, self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersionDto {
    #[serde(default)]
    pub id: Option<String>,
    pub version: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_latest: bool,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TemplateVersionDto {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Template detail as returned by `GET /api/Template/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetailDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub tech_stack_summary: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub main_download_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagDto>,
    #[serde(default)]
    pub packages: Vec<PackageDto>,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
    #[serde(default)]
    pub template_versions: Vec<TemplateVersionDto>,
}

impl TemplateDetailDto {
    pub fn price_label(&self) -> String {
        super::price_label(self.is_free, self.price)
    }

    /// Versions with the latest first, then newest first; undated versions last.
    pub fn sorted_versions(&self) -> Vec<&TemplateVersionDto> {
        let mut versions: Vec<&TemplateVersionDto> = self.template_versions.iter().collect();
        versions.sort_by(|a, b| {
            b.is_latest
                .cmp(&a.is_latest)
                .then_with(|| b.created_at_utc().cmp(&a.created_at_utc()))
        });
        versions
    }

    pub fn latest_version(&self) -> Option<&TemplateVersionDto> {
        self.template_versions.iter().find(|v| v.is_latest)
    }

    /// Short description, falling back to the long one.
    pub fn summary(&self) -> Option<&str> {
        self.short_description
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.long_description.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllPublicTemplatesResponse {
    #[serde(default)]
    pub templates: Vec<TemplateListItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTemplateResponse {
    #[serde(default)]
    pub template: Option<TemplateDetailDto>,
}

/// Body for `POST /api/Template`
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 200, message = "Template name is required"))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 1, max = 200, message = "Slug is required"))]
    pub slug: String,
    pub visibility: Visibility,
    /// Sent as typed by the admin; the backend parses it
    pub price: String,
    pub currency: String,
    #[validate(length(min = 1, max = 50, message = "Version is required"))]
    pub version: String,
    pub tags: Vec<TagDto>,
}

/// Body for `POST /api/Template/version/{templateId}`
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateVersionRequest {
    #[validate(length(min = 1, message = "Template is required"))]
    pub template_id: String,
    #[validate(length(min = 1, max = 50, message = "Version is required"))]
    pub version: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    pub description: String,
}

/// Response of the record creation endpoints; success is a present, non-empty id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordResponse {
    #[serde(default)]
    pub id: Option<String>,
}

impl CreateRecordResponse {
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// The backend emits RFC 3339 as well as offset-less ISO timestamps.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
