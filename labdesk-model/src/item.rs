use crate::error::ValidationError;
use labdesk_types::ItemKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form per-item fields (type, unit, dosage, nested per-type data, ...).
pub type Attributes = serde_json::Map<String, Value>;

/// Names that [`CommittedItem::flatten`] fills from the item identity.
pub const RESERVED_FIELDS: [&str; 2] = ["id", "label"];

/// Rejects overlay writes to a field name the payload reserves.
pub fn check_field_name(field: &str) -> Result<(), ValidationError> {
    if RESERVED_FIELDS.contains(&field) {
        return Err(ValidationError::ReservedField(field.to_string()));
    }
    Ok(())
}

/// A hit returned by a search provider. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub key: ItemKey,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl SearchResultItem {
    pub fn new(key: impl Into<ItemKey>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            attributes: Attributes::new(),
        }
    }

    /// Adds a base attribute.
    #[must_use]
    pub fn with_attribute(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    /// Extract a string attribute using a JSON pointer (e.g., "/unit").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        pointer_get(&self.attributes, pointer).and_then(Value::as_str)
    }
}

/// A member of an owning collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedItem {
    pub key: ItemKey,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl CommittedItem {
    pub fn new(key: impl Into<ItemKey>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builds the committed form of a search hit: base attributes with
    /// `overrides` applied on top. Overrides win on every collision.
    pub fn merged(item: &SearchResultItem, overrides: &Attributes) -> Self {
        let mut attributes = item.attributes.clone();
        for (field, value) in overrides {
            attributes.insert(field.clone(), value.clone());
        }
        Self {
            key: item.key.clone(),
            label: item.label.clone(),
            attributes,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    /// Writes one field in place, returning the previous value.
    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(field.into(), value.into())
    }

    /// Extract a string attribute using a JSON pointer (e.g., "/dosage").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        pointer_get(&self.attributes, pointer).and_then(Value::as_str)
    }

    /// Extract a numeric attribute using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        pointer_get(&self.attributes, pointer).and_then(Value::as_f64)
    }

    /// One flat object: `id` and `label` followed by every attribute.
    /// `id` and `label` cannot be shadowed by attributes of the same name.
    pub fn flatten(&self) -> serde_json::Map<String, Value> {
        let mut flat = serde_json::Map::with_capacity(self.attributes.len() + 2);
        flat.insert("id".into(), Value::String(self.key.to_string()));
        flat.insert("label".into(), Value::String(self.label.clone()));
        for (field, value) in &self.attributes {
            if field != "id" && field != "label" {
                flat.insert(field.clone(), value.clone());
            }
        }
        flat
    }
}

fn pointer_get<'a>(attributes: &'a Attributes, pointer: &str) -> Option<&'a Value> {
    let rest = pointer.strip_prefix('/')?;
    let (head, tail) = match rest.split_once('/') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    };
    let value = attributes.get(head)?;
    match tail {
        Some(tail) => value.pointer(&format!("/{tail}")),
        None => Some(value),
    }
}
