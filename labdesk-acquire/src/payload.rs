//! Flattening form state into one submission payload.

use crate::collection::OwningCollection;
use labdesk_model::{CommittedItem, ReferencedEntityOption, SelectionFields, ValidationError};
use labdesk_types::SessionContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sibling fields of the owning collections on one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    /// Free-text fields (diagnosis, advice, follow-up, ...).
    pub fields: BTreeMap<String, String>,
    /// Select fields, including those fed by entity creation.
    pub selections: SelectionFields,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_selections(mut self, selections: SelectionFields) -> Self {
        self.selections = selections;
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }
}

/// Which parts of the form must be filled before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadSchema {
    pub required_fields: Vec<String>,
    pub required_selections: Vec<String>,
    pub non_empty_collections: Vec<String>,
}

impl PayloadSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn require_field(mut self, name: impl Into<String>) -> Self {
        self.required_fields.push(name.into());
        self
    }

    #[must_use]
    pub fn require_selection(mut self, name: impl Into<String>) -> Self {
        self.required_selections.push(name.into());
        self
    }

    #[must_use]
    pub fn require_items(mut self, collection: impl Into<String>) -> Self {
        self.non_empty_collections.push(collection.into());
        self
    }
}

/// The normalized structure handed to the submission provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub context: SessionContext,
    /// Trimmed, non-blank free-text fields.
    pub fields: BTreeMap<String, String>,
    /// Select fields that have a value.
    pub selections: BTreeMap<String, ReferencedEntityOption>,
    /// Each collection as flat `{id, label, ...attributes}` objects, in order.
    pub collections: BTreeMap<String, Vec<serde_json::Map<String, Value>>>,
}

impl Payload {
    /// Items of one collection.
    pub fn items(&self, collection: &str) -> &[serde_json::Map<String, Value>] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PayloadAssembler {
    schema: PayloadSchema,
}

impl PayloadAssembler {
    pub fn new(schema: PayloadSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &PayloadSchema {
        &self.schema
    }

    /// Builds the payload from the current form. Reads only.
    pub fn assemble(
        &self,
        ctx: &SessionContext,
        form: &FormState,
        collections: &[&OwningCollection],
    ) -> Result<Payload, ValidationError> {
        let fields: BTreeMap<String, String> = form
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        if let Some(missing) = self
            .schema
            .required_fields
            .iter()
            .find(|name| !fields.contains_key(name.as_str()))
        {
            return Err(ValidationError::MissingField(missing.clone()));
        }

        let selections: BTreeMap<String, ReferencedEntityOption> = form
            .selections
            .iter()
            .filter_map(|field| {
                field
                    .selected_option()
                    .map(|option| (field.name().to_string(), option.clone()))
            })
            .collect();
        if let Some(missing) = self
            .schema
            .required_selections
            .iter()
            .find(|name| !selections.contains_key(name.as_str()))
        {
            return Err(ValidationError::MissingField(missing.clone()));
        }

        let mut flattened: BTreeMap<String, Vec<serde_json::Map<String, Value>>> = BTreeMap::new();
        for collection in collections {
            let items = collection.iter().map(CommittedItem::flatten).collect();
            if flattened.insert(collection.name().to_string(), items).is_some() {
                return Err(ValidationError::DuplicateCollection(
                    collection.name().to_string(),
                ));
            }
        }
        let collections = flattened;
        if let Some(empty) = self
            .schema
            .non_empty_collections
            .iter()
            .find(|name| collections.get(name.as_str()).is_none_or(Vec::is_empty))
        {
            return Err(ValidationError::EmptyCollection(empty.clone()));
        }

        Ok(Payload {
            context: ctx.clone(),
            fields,
            selections,
            collections,
        })
    }
}
