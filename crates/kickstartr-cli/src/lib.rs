use kickstartr_core::models::{BundleDto, TemplateListItemDto};
use kickstartr_core::ArtifactFile;
use kickstartr_publish::{PublishError, PublishObserver, PublishState};
use std::path::Path;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One table line per template: slug, price, description.
pub fn template_row(template: &TemplateListItemDto) -> String {
    format!(
        "{:<32} {:>10}  {}",
        truncate_string(&template.slug, 32),
        template.price_label(),
        truncate_string(template.short_description.as_deref().unwrap_or(""), 60)
    )
}

pub fn bundle_row(bundle: &BundleDto) -> String {
    format!(
        "{:<32} {:>10}  {} templates",
        truncate_string(&bundle.slug, 32),
        bundle.price_label(),
        bundle.templates.len()
    )
}

/// Read the archive to publish; anything but a `.zip` is refused.
pub async fn load_archive(path: &Path) -> anyhow::Result<ArtifactFile> {
    let is_zip = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
    if !is_zip {
        anyhow::bail!("{} is not a .zip archive", path.display());
    }
    ArtifactFile::from_path(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

/// Error for a failed publish: the step-specific message, followed by the
/// field errors not already shown as that message.
pub fn publish_failure(err: &PublishError) -> anyhow::Error {
    let headline = err.user_message();
    let mut message = headline.clone();
    let mut headline_shown = false;
    if let Some(fields) = err.field_errors() {
        for (field, messages) in fields {
            for m in messages {
                if !headline_shown && *m == headline {
                    headline_shown = true;
                    continue;
                }
                message.push_str(&format!("\n  {}: {}", field, m));
            }
        }
    }
    anyhow::anyhow!(message)
}

/// Renders publish state and upload progress through tracing.
pub struct TracingObserver;

impl PublishObserver for TracingObserver {
    fn on_state(&self, state: PublishState) {
        match state {
            PublishState::Failed(step) => tracing::warn!(%step, "Publish failed"),
            other => tracing::info!(state = %other, "Publish"),
        }
    }

    fn on_progress(&self, percent: u8) {
        if percent % 10 == 0 {
            tracing::info!(percent, "Uploading");
        } else {
            tracing::debug!(percent, "Uploading");
        }
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickstartr_core::ApiError;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_chars() {
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn template_row_shows_free_label() {
        let template = kickstartr_core::fixtures::templates()
            .into_iter()
            .find(|t| t.is_free)
            .unwrap();
        let row = template_row(&template);
        assert!(row.starts_with(&template.slug));
        assert!(row.contains("Free"));
    }

    #[test]
    fn publish_failure_lists_remaining_field_errors_once() {
        let err = PublishError::record(ApiError::from_response(
            400,
            r#"{ "errors": {
                "Version": ["Version 1.0.0 already exists", "Version must be semver"],
                "Slug": ["Slug is taken"]
            } }"#,
        ));
        let message = publish_failure(&err).to_string();
        assert_eq!(
            message,
            "Version 1.0.0 already exists\n  Version: Version must be semver\n  Slug: Slug is taken"
        );
        assert_eq!(message.matches("Version 1.0.0 already exists").count(), 1);
    }

    #[test]
    fn publish_failure_without_fields_is_the_headline() {
        let err = PublishError::Upload(ApiError::from_response(403, "Signature expired"));
        assert_eq!(publish_failure(&err).to_string(), "Signature expired");
    }

    #[tokio::test]
    async fn load_archive_rejects_other_extensions() {
        assert!(load_archive(Path::new("notes.txt")).await.is_err());
        assert!(load_archive(Path::new("missing.zip")).await.is_err());
    }
}
