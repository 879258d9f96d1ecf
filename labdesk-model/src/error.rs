use labdesk_types::{ItemKey, OptionId};
use thiserror::Error;

/// A user-correctable problem: surfaced inline, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field is present but does not match its format rule.
    #[error("invalid {field}: {reason}")]
    Malformed { field: String, reason: String },

    /// A collection that must carry at least one item is empty.
    #[error("collection {0} must not be empty")]
    EmptyCollection(String),

    /// Two collections handed to payload assembly share a name.
    #[error("collection {0} appears more than once")]
    DuplicateCollection(String),

    /// The field name is reserved for the item identity (`id`, `label`).
    #[error("field {0} is reserved")]
    ReservedField(String),

    /// Overlay fields were written to a candidate that is not selected.
    #[error("candidate {0} is not selected")]
    NotSelected(ItemKey),

    /// The key is not among the offered candidates.
    #[error("unknown candidate: {0}")]
    UnknownCandidate(ItemKey),

    /// The key is not in the owning collection.
    #[error("unknown item: {0}")]
    UnknownItem(ItemKey),

    /// An in-place edit was attempted on an item whose overlay is not open.
    #[error("overlay for {0} is not expanded")]
    NotExpanded(ItemKey),

    /// Entity creation was submitted without an open creation surface.
    #[error("no entity creation is in progress")]
    NoActiveContext,

    /// The form has no select field with this name.
    #[error("unknown select field: {0}")]
    UnknownSelectField(String),

    /// The select field does not offer this option.
    #[error("field {field} has no option {id}")]
    UnknownOption { field: String, id: OptionId },
}
