//! Read-side catalog backed by the API or by the built-in sample data.

use kickstartr_core::fixtures;
use kickstartr_core::models::{BundleDto, TagDto, TemplateDetailDto, TemplateListItemDto, UserDto};
use kickstartr_core::{ApiError, ApiResult, ClientConfig};

use crate::ApiClient;

pub enum Catalog {
    Remote(ApiClient),
    Sample,
}

impl Catalog {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        if config.mock_mode {
            tracing::info!("Mock mode enabled, serving sample catalog");
            return Ok(Catalog::Sample);
        }
        Ok(Catalog::Remote(ApiClient::new(config)?))
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, Catalog::Sample)
    }

    pub async fn templates(&self) -> ApiResult<Vec<TemplateListItemDto>> {
        match self {
            Catalog::Remote(client) => client.get_templates().await,
            Catalog::Sample => Ok(fixtures::templates()),
        }
    }

    /// Template detail; an absent template is `ApiError::NotFound`.
    pub async fn template(&self, id: &str) -> ApiResult<TemplateDetailDto> {
        let template = match self {
            Catalog::Remote(client) => client.get_template(id).await?.template,
            Catalog::Sample => fixtures::template_detail(id),
        };
        template.ok_or_else(|| ApiError::NotFound(format!("Template {} not found", id)))
    }

    pub async fn bundles(&self) -> ApiResult<Vec<BundleDto>> {
        match self {
            Catalog::Remote(client) => client.get_bundles().await,
            Catalog::Sample => Ok(fixtures::bundles()),
        }
    }

    pub async fn bundle(&self, id: &str) -> ApiResult<BundleDto> {
        let bundle = match self {
            Catalog::Remote(client) => client.get_bundle(id).await?.bundle,
            Catalog::Sample => fixtures::bundle(id),
        };
        bundle.ok_or_else(|| ApiError::NotFound(format!("Bundle {} not found", id)))
    }

    pub async fn tags(&self) -> ApiResult<Vec<TagDto>> {
        match self {
            Catalog::Remote(client) => client.get_tags().await,
            Catalog::Sample => Ok(fixtures::tags()),
        }
    }

    /// Current user, `None` when the session is anonymous.
    pub async fn current_user(&self) -> ApiResult<Option<UserDto>> {
        match self {
            Catalog::Remote(client) => Ok(client.me().await?.user_info),
            Catalog::Sample => Ok(Some(fixtures::user())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_catalog_serves_fixtures() {
        let catalog = Catalog::from_config(&ClientConfig::default().with_mock_mode(true)).unwrap();
        assert!(catalog.is_sample());
        assert_eq!(catalog.templates().await.unwrap().len(), 3);
        assert_eq!(catalog.bundles().await.unwrap().len(), 2);
        assert!(!catalog.tags().await.unwrap().is_empty());
        assert!(catalog.current_user().await.unwrap().is_some());

        let detail = catalog
            .template("123e4567-e89b-12d3-a456-426614174000")
            .await
            .unwrap();
        assert_eq!(detail.latest_version().unwrap().version, "1.1.0");
    }

    #[tokio::test]
    async fn sample_catalog_reports_missing_items() {
        let catalog = Catalog::Sample;
        assert!(matches!(
            catalog.template("nope").await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            catalog.bundle("nope").await,
            Err(ApiError::NotFound(_))
        ));
    }
}
