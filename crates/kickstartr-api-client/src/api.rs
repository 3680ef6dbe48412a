//! Domain methods for the storefront API client.

use crate::ApiClient;
use kickstartr_core::models::{
    BundleDto, CreateBundleRequest, CreatePackageRequest, CreateRecordResponse, CreateTagRequest,
    GetAllPublicBundlesResponse, GetAllPublicTemplatesResponse, GetBundleResponse,
    GetTemplateResponse, LoginRequest, MeResponse, PostCommentRequest, RegisterRequest, TagDto,
    TemplateListItemDto, UserProfileResponse,
};
use kickstartr_core::{ApiError, ApiResult};
use validator::Validate;

pub const AUTH_PATH: &str = "/api/Auth";
pub const USER_PATH: &str = "/api/User";
pub const TEMPLATE_PATH: &str = "/api/Template";
pub const BUNDLE_PATH: &str = "/api/Bundle";
pub const TAG_PATH: &str = "/api/Tag";
pub const PACKAGE_PATH: &str = "/api/Package";

fn validated<T: Validate>(request: &T) -> ApiResult<()> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))
}

impl ApiClient {
    /// Log in; the session cookie is kept by the client.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<()> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json_no_content(&format!("{}/login", AUTH_PATH), &body)
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<()> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json_no_content(&format!("{}/register", AUTH_PATH), &body)
            .await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.post_json_no_content(&format!("{}/logout", AUTH_PATH), &serde_json::json!({}))
            .await
    }

    /// Current user, `user_info` is `None` when not logged in.
    pub async fn me(&self) -> ApiResult<MeResponse> {
        self.get(&format!("{}/me", USER_PATH)).await
    }

    /// Profile with licenses.
    pub async fn user_profile(&self) -> ApiResult<UserProfileResponse> {
        self.get(&format!("{}/userProfile", USER_PATH)).await
    }

    pub async fn get_templates(&self) -> ApiResult<Vec<TemplateListItemDto>> {
        let response: GetAllPublicTemplatesResponse = self.get(TEMPLATE_PATH).await?;
        Ok(response.templates)
    }

    pub async fn get_template(&self, id: &str) -> ApiResult<GetTemplateResponse> {
        self.get(&format!("{}/{}", TEMPLATE_PATH, urlencoding::encode(id)))
            .await
    }

    pub async fn get_bundles(&self) -> ApiResult<Vec<BundleDto>> {
        let response: GetAllPublicBundlesResponse = self.get(BUNDLE_PATH).await?;
        Ok(response.bundles)
    }

    pub async fn get_bundle(&self, id: &str) -> ApiResult<GetBundleResponse> {
        self.get(&format!("{}/{}", BUNDLE_PATH, urlencoding::encode(id)))
            .await
    }

    pub async fn get_tags(&self) -> ApiResult<Vec<TagDto>> {
        self.get(TAG_PATH).await
    }

    /// Post a public comment, or a private note to the developer.
    pub async fn post_template_comment(
        &self,
        template_id: &str,
        comment: &str,
        is_for_developer: bool,
    ) -> ApiResult<()> {
        let body = PostCommentRequest {
            comment: comment.to_string(),
            is_for_developer,
            template_id: template_id.to_string(),
        };
        validated(&body)?;
        self.post_json_no_content(
            &format!("{}/{}/comment", TEMPLATE_PATH, urlencoding::encode(template_id)),
            &body,
        )
        .await
    }

    pub async fn create_tag(&self, request: &CreateTagRequest) -> ApiResult<CreateRecordResponse> {
        validated(request)?;
        self.post_json(TAG_PATH, request).await
    }

    pub async fn create_package(
        &self,
        request: &CreatePackageRequest,
    ) -> ApiResult<CreateRecordResponse> {
        validated(request)?;
        self.post_json(PACKAGE_PATH, request).await
    }

    pub async fn create_bundle(
        &self,
        request: &CreateBundleRequest,
    ) -> ApiResult<CreateRecordResponse> {
        validated(request)?;
        self.post_json(BUNDLE_PATH, request).await
    }
}
