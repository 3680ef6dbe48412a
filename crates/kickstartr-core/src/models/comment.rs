use serde::{Deserialize, Serialize};
use validator::Validate;

use super::template::Visibility;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user_display_name: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

/// Body for `POST /api/Template/{id}/comment`
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentRequest {
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub comment: String,
    /// Private note to the template author instead of a public comment
    pub is_for_developer: bool,
    pub template_id: String,
}
