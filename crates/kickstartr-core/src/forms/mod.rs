//! Admin form state: slug derivation, tag selection and submit gating.
//!
//! Each form mirrors one admin creation screen. `can_submit` is the gate the
//! submit control uses; `to_request` builds the API payload and refuses to
//! do so while the gate is closed.

pub mod admin;
pub mod tags;
pub mod template;

pub use admin::{BundleForm, PackageForm, TagForm};
pub use tags::TagPicker;
pub use template::{TemplateForm, TemplateVersionForm};

/// Lowercase, drop quotes, collapse every run of other non-alphanumerics into
/// one `-`, and strip leading/trailing dashes.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.trim().to_lowercase().chars() {
        if c == '\'' || c == '"' {
            continue;
        }
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Slug that follows its name until the user edits it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugField {
    value: String,
    edited: bool,
}

impl SlugField {
    /// Name changed. An empty name leaves the slug alone.
    pub fn on_name_change(&mut self, name: &str) {
        if !self.edited && !name.is_empty() {
            self.value = slugify(name);
        }
    }

    /// Slug typed by hand; it stops tracking the name from now on.
    pub fn set(&mut self, raw: &str) {
        self.edited = true;
        self.value = slugify(raw);
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
