use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw field values typed into an entity creation surface.
pub type FormFields = BTreeMap<String, String>;

/// Which kind of referenced entity a creation surface is configuring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionContext {
    /// A referring doctor.
    Referrer,
    /// A sample collection agent.
    CollectionAgent,
    /// An entry of some other catalog linked from the form (e.g. "department").
    GenericCatalogLink { catalog: String },
}

/// Format rule applied to a non-blank field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Text,
    Phone,
    Email,
}

/// One input on a creation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub format: FieldFormat,
}

impl FieldSpec {
    const fn required(name: &'static str, format: FieldFormat) -> Self {
        Self { name, required: true, format }
    }

    const fn optional(name: &'static str, format: FieldFormat) -> Self {
        Self { name, required: false, format }
    }
}

const REFERRER_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("title", FieldFormat::Text),
    FieldSpec::required("first_name", FieldFormat::Text),
    FieldSpec::optional("last_name", FieldFormat::Text),
    FieldSpec::required("phone", FieldFormat::Phone),
    FieldSpec::optional("email", FieldFormat::Email),
    FieldSpec::optional("specialization", FieldFormat::Text),
];

const COLLECTION_AGENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldFormat::Text),
    FieldSpec::required("phone", FieldFormat::Phone),
    FieldSpec::optional("area", FieldFormat::Text),
];

const CATALOG_LINK_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldFormat::Text),
    FieldSpec::optional("code", FieldFormat::Text),
];

impl SelectionContext {
    /// The inputs this context shows, in display order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::Referrer => REFERRER_FIELDS,
            Self::CollectionAgent => COLLECTION_AGENT_FIELDS,
            Self::GenericCatalogLink { .. } => CATALOG_LINK_FIELDS,
        }
    }

    /// Name of the select field on the parent form that receives the new option.
    pub fn target_field(&self) -> &str {
        match self {
            Self::Referrer => "referrer",
            Self::CollectionAgent => "collection_agent",
            Self::GenericCatalogLink { catalog } => catalog.as_str(),
        }
    }

    /// Checks required fields first (in display order), then format rules.
    /// Fields this context does not declare are ignored.
    pub fn validate(&self, fields: &FormFields) -> Result<(), ValidationError> {
        let specs = self.fields();
        for spec in specs.iter().filter(|s| s.required) {
            if value_of(fields, spec.name).is_none() {
                return Err(ValidationError::MissingField(spec.name.to_string()));
            }
        }
        for spec in specs {
            if let Some(value) = value_of(fields, spec.name) {
                check_format(spec, value)?;
            }
        }
        Ok(())
    }

    /// Human label for the created option. Assumes `validate` passed.
    pub fn label(&self, fields: &FormFields) -> String {
        match self {
            Self::Referrer => ["title", "first_name", "last_name"]
                .iter()
                .filter_map(|name| value_of(fields, name))
                .collect::<Vec<_>>()
                .join(" "),
            Self::CollectionAgent => value_of(fields, "name").unwrap_or_default().to_string(),
            Self::GenericCatalogLink { .. } => {
                let name = value_of(fields, "name").unwrap_or_default();
                match value_of(fields, "code") {
                    Some(code) => format!("{name} ({code})"),
                    None => name.to_string(),
                }
            }
        }
    }
}

/// Trimmed, non-blank value of a field.
fn value_of<'a>(fields: &'a FormFields, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn check_format(spec: &FieldSpec, value: &str) -> Result<(), ValidationError> {
    let malformed = |reason: &str| ValidationError::Malformed {
        field: spec.name.to_string(),
        reason: reason.to_string(),
    };
    match spec.format {
        FieldFormat::Text => Ok(()),
        FieldFormat::Phone => {
            let digits = value.strip_prefix('+').unwrap_or(value);
            let digits: String = digits.chars().filter(|c| *c != ' ' && *c != '-').collect();
            if !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(malformed("must contain only digits"));
            }
            if !(7..=15).contains(&digits.len()) {
                return Err(malformed("must have 7 to 15 digits"));
            }
            Ok(())
        }
        FieldFormat::Email => match value.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && domain.contains('.') && !domain.contains('@') =>
            {
                Ok(())
            }
            _ => Err(malformed("not an email address")),
        },
    }
}
