use serde::{Deserialize, Serialize};
use validator::Validate;

use super::template::TemplateListItemDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleDto {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub templates: Vec<TemplateListItemDto>,
}

impl BundleDto {
    pub fn price_label(&self) -> String {
        super::price_label(false, self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllPublicBundlesResponse {
    #[serde(default)]
    pub bundles: Vec<BundleDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBundleResponse {
    #[serde(default)]
    pub bundle: Option<BundleDto>,
}

/// Admin request to create a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBundleRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "Slug is required"))]
    pub slug: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    pub is_active: bool,
    #[validate(length(min = 1, message = "Select at least one template"))]
    pub template_ids: Vec<String>,
}
