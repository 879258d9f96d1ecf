use crate::ValidationError;
use labdesk_types::OptionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A selectable referenced entity, produced by entity creation or preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedEntityOption {
    pub id: OptionId,
    pub label: String,
}

impl ReferencedEntityOption {
    pub fn new(id: OptionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A select-type form field: an append-only options set plus a current value.
///
/// The value always refers to one of the field's own options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectField {
    name: String,
    options: Vec<ReferencedEntityOption>,
    value: Option<OptionId>,
}

impl SelectField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            value: None,
        }
    }

    /// Preloads options (e.g. existing referrers fetched with the page).
    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = ReferencedEntityOption>) -> Self {
        for option in options {
            self.push_option(option);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[ReferencedEntityOption] {
        &self.options
    }

    pub fn value(&self) -> Option<OptionId> {
        self.value
    }

    /// The option the current value refers to.
    pub fn selected_option(&self) -> Option<&ReferencedEntityOption> {
        let id = self.value?;
        self.options.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: OptionId) -> bool {
        self.options.iter().any(|o| o.id == id)
    }

    /// Points the field at an existing option.
    pub fn select(&mut self, id: OptionId) -> Result<(), ValidationError> {
        if !self.contains(id) {
            return Err(ValidationError::UnknownOption {
                field: self.name.clone(),
                id,
            });
        }
        self.value = Some(id);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Appends the option and selects it. The option is in place before the
    /// value changes, so the field never names an unknown id.
    pub fn insert_and_select(&mut self, option: ReferencedEntityOption) {
        let id = option.id;
        self.push_option(option);
        self.value = Some(id);
    }

    fn push_option(&mut self, option: ReferencedEntityOption) {
        if !self.contains(option.id) {
            self.options.push(option);
        }
    }
}

/// All select fields of one form, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionFields {
    fields: BTreeMap<String, SelectField>,
}

impl SelectionFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field.
    #[must_use]
    pub fn with_field(mut self, field: SelectField) -> Self {
        self.insert(field);
        self
    }

    pub fn insert(&mut self, field: SelectField) {
        self.fields.insert(field.name.clone(), field);
    }

    pub fn field(&self, name: &str) -> Option<&SelectField> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut SelectField> {
        self.fields.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Appends `option` to the named field and selects it in one step.
    pub fn insert_and_select(
        &mut self,
        name: &str,
        option: ReferencedEntityOption,
    ) -> Result<(), ValidationError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| ValidationError::UnknownSelectField(name.to_string()))?;
        field.insert_and_select(option);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectField> {
        self.fields.values()
    }
}
