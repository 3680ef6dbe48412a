use validator::Validate;

use super::{SlugField, TagPicker};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ArtifactFile, CreateTemplateRequest, CreateTemplateVersionRequest, TagDto,
    TemplateListItemDto, UploadRequest, Visibility,
};

const DEFAULT_CURRENCY: &str = "USD";

/// "Create template" form: metadata plus the initial version's archive.
#[derive(Debug, Clone)]
pub struct TemplateForm {
    name: String,
    pub description: String,
    slug: SlugField,
    pub visibility: Visibility,
    pub price: String,
    pub currency: String,
    pub version: String,
    pub tags: TagPicker,
    pub zip_file: Option<ArtifactFile>,
}

impl Default for TemplateForm {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TemplateForm {
    pub fn new(available_tags: Vec<TagDto>) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            slug: SlugField::default(),
            visibility: Visibility::Public,
            price: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            version: String::new(),
            tags: TagPicker::new(available_tags),
            zip_file: None,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.slug.on_name_change(name);
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.slug.set(slug);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    pub fn can_submit(&self) -> bool {
        !self.name.is_empty()
            && !self.slug().is_empty()
            && !self.version.is_empty()
            && self.zip_file.is_some()
    }

    pub fn upload_request(&self) -> UploadRequest {
        UploadRequest::new(self.slug(), self.version.clone())
    }

    pub fn to_request(&self) -> ApiResult<CreateTemplateRequest> {
        if !self.can_submit() {
            return Err(ApiError::Validation(
                "Name, slug, version and a zip file are required".to_string(),
            ));
        }
        let request = CreateTemplateRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            slug: self.slug().to_string(),
            visibility: self.visibility,
            price: self.price.clone(),
            currency: self.currency.clone(),
            version: self.version.clone(),
            tags: self.tags.selected_tags(),
        };
        request
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok(request)
    }
}

/// "Add version" form for an existing template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVersionForm {
    templates: Vec<TemplateListItemDto>,
    template_id: String,
    selected: Option<TemplateListItemDto>,
    pub version: String,
    pub notes: String,
    pub zip_file: Option<ArtifactFile>,
}

impl TemplateVersionForm {
    pub fn new(templates: Vec<TemplateListItemDto>) -> Self {
        Self {
            templates,
            ..Self::default()
        }
    }

    /// Select by id; an unknown id clears the selection but keeps the raw value.
    pub fn select_template(&mut self, template_id: &str) {
        self.template_id = template_id.to_string();
        self.selected = self
            .templates
            .iter()
            .find(|t| t.id.as_deref() == Some(template_id))
            .cloned();
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn selected_template(&self) -> Option<&TemplateListItemDto> {
        self.selected.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        !self.template_id.is_empty()
            && !self.version.is_empty()
            && self.zip_file.is_some()
            && self.selected.is_some()
    }

    /// Grant request keyed by the selected template's slug.
    pub fn upload_request(&self) -> Option<UploadRequest> {
        self.selected
            .as_ref()
            .map(|t| UploadRequest::new(t.slug.clone(), self.version.clone()))
    }

    pub fn to_request(&self) -> ApiResult<CreateTemplateVersionRequest> {
        let selected = match (&self.selected, self.can_submit()) {
            (Some(selected), true) => selected,
            _ => {
                return Err(ApiError::Validation(
                    "Template, version and a zip file are required".to_string(),
                ))
            }
        };
        let request = CreateTemplateVersionRequest {
            template_id: self.template_id.clone(),
            version: self.version.clone(),
            slug: selected.slug.clone(),
            description: self.notes.clone(),
        };
        request
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok(request)
    }

    pub fn reset(&mut self) {
        self.template_id.clear();
        self.selected = None;
        self.version.clear();
        self.notes.clear();
        self.zip_file = None;
    }
}
