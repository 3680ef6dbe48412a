//! Wire types for the storefront REST API.
//!
//! Field names follow the backend's camelCase JSON. Optional fields are
//! optional here too; nothing is accessed "defensively" past this boundary.

pub mod bundle;
pub mod comment;
pub mod package;
pub mod tag;
pub mod template;
pub mod upload;
pub mod user;

pub use bundle::{BundleDto, CreateBundleRequest, GetAllPublicBundlesResponse, GetBundleResponse};
pub use comment::{CommentDto, PostCommentRequest};
pub use package::{CreatePackageRequest, PackageDto, PackageManager};
pub use tag::{CreateTagRequest, TagDto};
pub use template::{
    CreateRecordResponse, CreateTemplateRequest, CreateTemplateVersionRequest,
    GetAllPublicTemplatesResponse, GetTemplateResponse, TemplateDetailDto, TemplateListItemDto,
    TemplateVersionDto, Visibility,
};
pub use upload::{ArtifactFile, UploadGrant, UploadRequest, UploadUrlDto, UploadUrlResponse};
pub use user::{
    License, LicenseTemplate, LoginRequest, MeResponse, RegisterRequest, UserDto, UserProfile,
    UserProfileResponse,
};

/// Price label used by the catalog pages.
pub fn price_label(is_free: bool, price: Option<f64>) -> String {
    match price {
        Some(p) if !is_free => format!("${}", p),
        _ => "Free".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_label_cases() {
        assert_eq!(price_label(true, Some(10.0)), "Free");
        assert_eq!(price_label(false, None), "Free");
        assert_eq!(price_label(false, Some(49.99)), "$49.99");
        assert_eq!(price_label(false, Some(0.0)), "$0");
    }
}
