//! Core model for the LabDesk acquisition workflow.
//!
//! Defines the types the engine moves between search, staging and the form:
//! - [`SearchResultItem`]: an immutable catalog hit (key, label, base attributes)
//! - [`CommittedItem`]: a member of an owning collection, overlay already applied
//! - [`SelectField`] / [`ReferencedEntityOption`]: select fields fed by entity creation
//! - [`SelectionContext`]: which kind of referenced entity is being created,
//!   with its field list, validation and label rule
//! - [`DuplicatePolicy`]: how an identity already in a collection is handled
//!
//! These types carry no async or provider concerns; the engine lives in
//! `labdesk-acquire`.

mod error;
mod item;
mod option;
mod policy;
mod selection;

pub use error::ValidationError;
pub use item::{check_field_name, Attributes, CommittedItem, SearchResultItem, RESERVED_FIELDS};
pub use option::{ReferencedEntityOption, SelectField, SelectionFields};
pub use policy::DuplicatePolicy;
pub use selection::{FieldFormat, FieldSpec, FormFields, SelectionContext};
