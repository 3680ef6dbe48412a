use crate::models::TagDto;

/// Tag autocomplete state for the template form.
#[derive(Debug, Clone, Default)]
pub struct TagPicker {
    available: Vec<TagDto>,
    selected: Vec<String>,
}

impl TagPicker {
    pub fn new(available: Vec<TagDto>) -> Self {
        Self {
            available,
            selected: Vec::new(),
        }
    }

    pub fn available(&self) -> &[TagDto] {
        &self.available
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    /// Unselected tags matching the query; an empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&TagDto> {
        self.available
            .iter()
            .filter(|tag| {
                tag.id
                    .as_ref()
                    .is_some_and(|id| !self.selected.contains(id))
            })
            .filter(|tag| tag.matches(query))
            .collect()
    }

    /// Returns false for empty or already-selected ids.
    pub fn add(&mut self, tag_id: &str) -> bool {
        if tag_id.is_empty() || self.selected.iter().any(|id| id == tag_id) {
            return false;
        }
        self.selected.push(tag_id.to_string());
        true
    }

    pub fn remove(&mut self, tag_id: &str) {
        self.selected.retain(|id| id != tag_id);
    }

    /// Selected tags resolved against the available list; unknown ids are dropped.
    pub fn selected_tags(&self) -> Vec<TagDto> {
        self.selected
            .iter()
            .filter_map(|id| {
                self.available
                    .iter()
                    .find(|tag| tag.id.as_deref() == Some(id.as_str()))
                    .cloned()
            })
            .collect()
    }

    /// Display label for a selected id: the tag name, or the raw id when unknown.
    pub fn label(&self, tag_id: &str) -> String {
        self.available
            .iter()
            .find(|tag| tag.id.as_deref() == Some(tag_id))
            .map(|tag| tag.name.clone())
            .unwrap_or_else(|| tag_id.to_string())
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
