//! Core type definitions for LabDesk.
//!
//! This crate defines the small, domain-agnostic types shared by the
//! acquisition engine and its collaborators:
//! - Item keys (opaque natural identities of catalog entries)
//! - Option identifiers (UUID v7, minted for newly created referenced entities)
//! - The explicit session context passed into every workflow entry point

mod context;
mod ids;

pub use context::SessionContext;
pub use ids::{ItemKey, OptionId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
