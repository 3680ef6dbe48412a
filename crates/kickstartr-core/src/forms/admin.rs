use validator::Validate;

use super::SlugField;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateBundleRequest, CreatePackageRequest, CreateTagRequest, PackageManager};

fn validated<T: Validate>(request: T) -> ApiResult<T> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(request)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct TagForm {
    name: String,
    slug: SlugField,
    pub category: String,
}

impl TagForm {
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.slug.on_name_change(name);
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.slug.set(slug);
    }

    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    pub fn can_submit(&self) -> bool {
        !self.name.is_empty() && !self.slug().is_empty()
    }

    pub fn to_request(&self) -> ApiResult<CreateTagRequest> {
        if !self.can_submit() {
            return Err(ApiError::Validation("Name and slug are required".to_string()));
        }
        validated(CreateTagRequest {
            name: self.name.clone(),
            slug: self.slug().to_string(),
            category: non_empty(&self.category),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageForm {
    pub name: String,
    pub version: String,
    pub package_manager: PackageManager,
    pub url: String,
}

impl PackageForm {
    pub fn can_submit(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn to_request(&self) -> ApiResult<CreatePackageRequest> {
        if !self.can_submit() {
            return Err(ApiError::Validation("Name is required".to_string()));
        }
        validated(CreatePackageRequest {
            name: self.name.clone(),
            version: non_empty(&self.version),
            package_manager: self.package_manager,
            url: non_empty(&self.url),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BundleForm {
    name: String,
    slug: SlugField,
    pub description: String,
    pub price: String,
    pub is_active: bool,
    template_ids: Vec<String>,
}

impl Default for BundleForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: SlugField::default(),
            description: String::new(),
            price: String::new(),
            is_active: true,
            template_ids: Vec::new(),
        }
    }
}

impl BundleForm {
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.slug.on_name_change(name);
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.slug.set(slug);
    }

    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    /// Add the template if absent, remove it if present.
    pub fn toggle_template(&mut self, template_id: &str) {
        if let Some(pos) = self.template_ids.iter().position(|id| id == template_id) {
            self.template_ids.remove(pos);
        } else {
            self.template_ids.push(template_id.to_string());
        }
    }

    pub fn template_ids(&self) -> &[String] {
        &self.template_ids
    }

    pub fn can_submit(&self) -> bool {
        !self.name.is_empty() && !self.slug().is_empty() && !self.template_ids.is_empty()
    }

    pub fn to_request(&self) -> ApiResult<CreateBundleRequest> {
        if !self.can_submit() {
            return Err(ApiError::Validation(
                "Name, slug and at least one template are required".to_string(),
            ));
        }
        let price = match non_empty(&self.price) {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| ApiError::Validation(format!("Invalid price: {}", raw)))?,
            None => 0.0,
        };
        validated(CreateBundleRequest {
            name: self.name.clone(),
            slug: self.slug().to_string(),
            description: self.description.clone(),
            price,
            is_active: self.is_active,
            template_ids: self.template_ids.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_form_optional_category() {
        let mut form = TagForm::default();
        assert!(!form.can_submit());
        form.set_name("Build Tool");
        let request = form.to_request().unwrap();
        assert_eq!(request.slug, "build-tool");
        assert_eq!(request.category, None);

        form.category = "Tooling".to_string();
        assert_eq!(form.to_request().unwrap().category.as_deref(), Some("Tooling"));
    }

    #[test]
    fn package_form_blank_fields_become_none() {
        let mut form = PackageForm {
            name: "react".to_string(),
            version: "  ".to_string(),
            package_manager: PackageManager::Pnpm,
            url: "https://www.npmjs.com/package/react".to_string(),
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.version, None);
        assert!(request.url.is_some());

        form.name.clear();
        assert!(form.to_request().is_err());
    }

    #[test]
    fn bundle_form_toggles_and_parses_price() {
        let mut form = BundleForm::default();
        form.set_name("Full Stack Starter Pack");
        assert!(!form.can_submit());

        form.toggle_template("t-1");
        form.toggle_template("t-2");
        form.toggle_template("t-1");
        assert_eq!(form.template_ids(), &["t-2".to_string()]);

        let request = form.to_request().unwrap();
        assert_eq!(request.price, 0.0);
        assert!(request.is_active);

        form.price = "79.99".to_string();
        assert_eq!(form.to_request().unwrap().price, 79.99);

        form.price = "abc".to_string();
        assert!(matches!(form.to_request(), Err(ApiError::Validation(_))));

        form.price = "-5".to_string();
        assert!(form.to_request().is_err());
    }
}
