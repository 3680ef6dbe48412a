//! Built-in sample catalog served in mock mode.

use crate::models::{
    BundleDto, CommentDto, PackageDto, PackageManager, TagDto, TemplateDetailDto,
    TemplateListItemDto, TemplateVersionDto, UserDto, Visibility,
};

fn tag(id: &str, name: &str, slug: &str, category: &str) -> TagDto {
    TagDto {
        id: Some(id.to_string()),
        name: name.to_string(),
        slug: slug.to_string(),
        category: Some(category.to_string()),
    }
}

pub fn tags() -> Vec<TagDto> {
    vec![
        tag("tag-1", "React", "react", "Framework"),
        tag("tag-2", "TypeScript", "typescript", "Language"),
        tag("tag-3", "Vite", "vite", "Build Tool"),
        tag("tag-4", "Next.js", "nextjs", "Framework"),
        tag("tag-5", "E-commerce", "ecommerce", "Category"),
        tag("tag-6", "Stripe", "stripe", "Payment"),
        tag("tag-10", "Node.js", "nodejs", "Runtime"),
    ]
}

fn tags_by_id(ids: &[&str]) -> Vec<TagDto> {
    tags()
        .into_iter()
        .filter(|t| t.id.as_deref().is_some_and(|id| ids.contains(&id)))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn listed(
    id: &str,
    name: &str,
    slug: &str,
    description: &str,
    price: f64,
    stack: &str,
    created_at: &str,
    tag_ids: &[&str],
) -> TemplateListItemDto {
    TemplateListItemDto {
        id: Some(id.to_string()),
        name: name.to_string(),
        slug: slug.to_string(),
        short_description: Some(description.to_string()),
        is_free: price == 0.0,
        price: Some(price),
        tech_stack_summary: Some(stack.to_string()),
        created_at: Some(created_at.to_string()),
        thumbnail_url: None,
        tags: tags_by_id(tag_ids),
    }
}

pub fn templates() -> Vec<TemplateListItemDto> {
    vec![
        listed(
            "123e4567-e89b-12d3-a456-426614174000",
            "React TypeScript Starter",
            "react-typescript-starter",
            "A modern React app with TypeScript, Vite, and Tailwind CSS",
            0.0,
            "React 18, TypeScript, Vite, Tailwind",
            "2024-01-15T10:00:00Z",
            &["tag-1", "tag-2", "tag-3"],
        ),
        listed(
            "123e4567-e89b-12d3-a456-426614174001",
            "Next.js E-commerce",
            "nextjs-ecommerce",
            "Full-featured e-commerce solution with Next.js 14 and Stripe",
            49.99,
            "Next.js 14, Prisma, PostgreSQL, Stripe",
            "2024-02-20T14:30:00Z",
            &["tag-4", "tag-5", "tag-6"],
        ),
        listed(
            "123e4567-e89b-12d3-a456-426614174003",
            "Node.js REST API",
            "nodejs-rest-api",
            "Production-ready REST API with Express, MongoDB, and JWT auth",
            0.0,
            "Node.js, Express, MongoDB, JWT",
            "2024-04-05T11:00:00Z",
            &["tag-10"],
        ),
    ]
}

/// Detail view for a sample template, with versions, packages and comments.
pub fn template_detail(id: &str) -> Option<TemplateDetailDto> {
    let item = templates().into_iter().find(|t| t.id.as_deref() == Some(id))?;
    let created_at = item.created_at.clone();

    Some(TemplateDetailDto {
        id: item.id,
        name: item.name,
        slug: item.slug.clone(),
        short_description: item.short_description,
        long_description: None,
        is_free: item.is_free,
        price: item.price,
        author_name: Some("Kickstartr Team".to_string()),
        tech_stack_summary: item.tech_stack_summary,
        created_at: created_at.clone(),
        thumbnail_url: item.thumbnail_url,
        main_download_url: Some(format!(
            "https://example.com/downloads/{}-v1.0.0.zip",
            item.slug
        )),
        tags: item.tags,
        packages: vec![PackageDto {
            id: Some("pkg-1".to_string()),
            name: "typescript".to_string(),
            version: Some("5.3.3".to_string()),
            package_manager: PackageManager::Npm,
            url: Some("https://www.npmjs.com/package/typescript".to_string()),
        }],
        comments: vec![CommentDto {
            id: Some("comment-1".to_string()),
            content: "Great starter template! Got up and running in minutes.".to_string(),
            created_at: Some("2024-01-20T15:30:00Z".to_string()),
            user_display_name: Some("John Developer".to_string()),
            visibility: Visibility::Public,
        }],
        template_versions: vec![
            TemplateVersionDto {
                id: Some("ver-1".to_string()),
                version: "1.0.0".to_string(),
                notes: Some("Initial release".to_string()),
                is_latest: false,
                is_deprecated: false,
                created_at,
            },
            TemplateVersionDto {
                id: Some("ver-2".to_string()),
                version: "1.1.0".to_string(),
                notes: Some("Dependency updates".to_string()),
                is_latest: true,
                is_deprecated: false,
                created_at: Some("2024-06-01T09:00:00Z".to_string()),
            },
        ],
    })
}

pub fn bundles() -> Vec<BundleDto> {
    let all = templates();
    let pick = |slugs: &[&str]| -> Vec<TemplateListItemDto> {
        all.iter()
            .filter(|t| slugs.contains(&t.slug.as_str()))
            .cloned()
            .collect()
    };

    vec![
        BundleDto {
            id: Some("bundle-1".to_string()),
            name: "Full Stack Starter Pack".to_string(),
            slug: "full-stack-starter-pack".to_string(),
            description: Some(
                "Everything you need to build modern full-stack applications.".to_string(),
            ),
            price: Some(79.99),
            is_active: true,
            created_at: Some("2024-03-01T10:00:00Z".to_string()),
            templates: pick(&["react-typescript-starter", "nodejs-rest-api"]),
        },
        BundleDto {
            id: Some("bundle-2".to_string()),
            name: "E-commerce Pro Bundle".to_string(),
            slug: "ecommerce-pro-bundle".to_string(),
            description: Some("Storefront and API for launching an online business.".to_string()),
            price: Some(149.99),
            is_active: true,
            created_at: Some("2024-04-15T14:00:00Z".to_string()),
            templates: pick(&["nextjs-ecommerce", "nodejs-rest-api"]),
        },
    ]
}

pub fn bundle(id: &str) -> Option<BundleDto> {
    bundles().into_iter().find(|b| b.id.as_deref() == Some(id))
}

pub fn user() -> UserDto {
    UserDto {
        id: Some("user-123".to_string()),
        name: None,
        email: Some("demo@kickstartr.dev".to_string()),
        display_name: Some("Demo User".to_string()),
        avatar_url: None,
        created_at: Some("2024-01-01T00:00:00Z".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_is_consistent() {
        for template in templates() {
            let id = template.id.clone().unwrap();
            let detail = template_detail(&id).unwrap();
            assert_eq!(detail.slug, template.slug);
            assert!(detail.latest_version().is_some());
        }
        assert!(template_detail("missing").is_none());
        assert_eq!(bundle("bundle-1").unwrap().templates.len(), 2);
        assert!(bundle("bundle-9").is_none());
    }
}
