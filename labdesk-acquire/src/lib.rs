//! Staged multi-item acquisition engine for LabDesk forms.
//!
//! A clinician types into a search field, ticks several hits, tweaks each one
//! (dosage, frequency, sample type...) and confirms them into a list on the
//! form. Referenced people such as referrers can be created inline without
//! leaving the form. The form is finally flattened into one payload and
//! handed to a submission provider.
//!
//! # Architecture
//!
//! Components are plain state machines taking `&mut self`; only the search
//! field runs background work.
//!
//! ## Components
//!
//! - **Search**: debounced lookups with last-issued-wins discard of stale answers
//! - **Staging**: candidates offered by search, their selection and overrides
//! - **Overlay**: the single open editor shared by staged and committed items
//! - **Collection**: the ordered owning list and the commit merge into it
//! - **Bridge**: inline creation of referenced entities into select fields
//! - **Payload**: validation and flattening of the whole form
//! - **Workflow**: the facade wiring search, staging, overlay and collection
//!
//! ## Acquisition Flow
//!
//! 1. **Search**: the query settles for the debounce interval, then a lookup runs
//! 2. **Stage**: hits are offered; toggling one selects it and opens its overlay
//! 3. **Adjust**: override fields are written on selected candidates
//! 4. **Commit**: selected candidates merge into the collection in selection order
//! 5. **Submit**: the assembled payload goes to the submission provider
//!
//! # Example
//!
//! ```
//! use labdesk_acquire::{commit, OwningCollection, StagingSet};
//! use labdesk_model::{DuplicatePolicy, SearchResultItem};
//! use labdesk_types::ItemKey;
//!
//! let mut staging = StagingSet::new();
//! staging.offer(&[SearchResultItem::new("paracetamol", "Paracetamol 500mg")
//!     .with_attribute("dosage", "1 tab")]);
//!
//! let key = ItemKey::from("paracetamol");
//! staging.toggle(&key).unwrap();
//! staging.set_override(&key, "dosage", "2 tab").unwrap();
//!
//! let mut medicines = OwningCollection::new("medicines");
//! commit(&mut staging, &mut medicines, DuplicatePolicy::Reject).unwrap();
//!
//! assert_eq!(medicines.len(), 1);
//! assert_eq!(medicines.items()[0].get_str("/dosage"), Some("2 tab"));
//! assert!(staging.is_empty());
//! ```

pub mod bridge;
pub mod collection;
pub mod config;
mod error;
pub mod overlay;
pub mod payload;
pub mod provider;
pub mod search;
pub mod staging;
pub mod submission;
pub mod workflow;

pub use bridge::EntityCreationBridge;
pub use collection::{commit, CommitReport, OwningCollection, Placement};
pub use config::{AcquireConfig, DEFAULT_DEBOUNCE, DEFAULT_REQUEST_TIMEOUT};
pub use error::{AcquireError, AcquireResult, ProviderError};
pub use overlay::{OverlayEditor, OverlayState, OverlayTarget};
pub use payload::{FormState, Payload, PayloadAssembler, PayloadSchema};
pub use provider::{
    ArtifactRef, EntityCreationProvider, LocalEntityProvider, SearchProvider, SubmissionProvider,
};
pub use search::{QueryChange, RequestToken, SearchController, SearchSnapshot, SearchState};
pub use staging::{StagedCandidate, StagingSet};
pub use submission::submit;
pub use workflow::AcquisitionWorkflow;
