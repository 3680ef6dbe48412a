//! Kickstartr Core Library
//!
//! Domain models, error types, configuration and admin form logic shared by
//! the API client, the publish coordinator and the CLI.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod forms;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, FieldErrors, ProblemDetails};
pub use forms::{slugify, SlugField, TagPicker};
pub use models::upload::{ArtifactFile, UploadGrant, UploadRequest};
