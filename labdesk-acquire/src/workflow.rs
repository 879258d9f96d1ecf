//! One owning collection together with the search, staging and overlay state
//! that feeds it.
//!
//! The components are independent; this facade wires them: selecting a
//! candidate opens its overlay, deselecting or removing the open item closes
//! it, and a commit or close returns search to idle.

use crate::collection::{self, CommitReport, OwningCollection, Placement};
use crate::config::AcquireConfig;
use crate::error::AcquireResult;
use crate::overlay::{OverlayEditor, OverlayTarget};
use crate::provider::SearchProvider;
use crate::search::{SearchController, SearchSnapshot, SearchState};
use crate::staging::StagingSet;
use labdesk_model::{CommittedItem, DuplicatePolicy, ValidationError};
use labdesk_types::{ItemKey, SessionContext};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub struct AcquisitionWorkflow {
    search: SearchController,
    staging: StagingSet,
    editor: OverlayEditor,
    collection: OwningCollection,
    policy: DuplicatePolicy,
}

impl AcquisitionWorkflow {
    /// Creates a workflow owning an empty collection called `name`.
    pub fn new(
        name: impl Into<String>,
        ctx: SessionContext,
        provider: Arc<dyn SearchProvider>,
        config: &AcquireConfig,
    ) -> Self {
        Self {
            search: SearchController::new(ctx, provider, config),
            staging: StagingSet::new(),
            editor: OverlayEditor::new(),
            collection: OwningCollection::new(name),
            policy: config.duplicate_policy,
        }
    }

    /// Starts from an existing collection, e.g. a prescription being edited.
    #[must_use]
    pub fn with_collection(mut self, collection: OwningCollection) -> Self {
        self.collection = collection;
        self
    }

    pub fn name(&self) -> &str {
        self.collection.name()
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    // ── Search ──

    pub fn set_query(&mut self, text: &str) {
        self.search.set_query(text);
    }

    pub fn search_snapshot(&self) -> SearchSnapshot {
        self.search.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    pub fn has_pending_search(&self) -> bool {
        self.search.has_pending_timer()
    }

    // ── Staging ──

    /// Offers the current search results to the staging set.
    pub fn offer_results(&mut self) {
        let results = self.search.snapshot().results;
        self.staging.offer(&results);
    }

    /// Flips selection of a candidate. A newly selected candidate becomes the
    /// overlay target; a deselected one loses the overlay if it had it.
    pub fn toggle(&mut self, key: &ItemKey) -> Result<bool, ValidationError> {
        self.offer_results();
        let selected = self.staging.toggle(key)?;
        let target = OverlayTarget::Staged(key.clone());
        if selected {
            self.editor.expand(target);
        } else {
            self.editor.collapse_if(&target);
        }
        Ok(selected)
    }

    /// Selects a candidate. Re-selecting an already selected candidate
    /// collapses its overlay instead. Returns whether anything was selected.
    pub fn select(&mut self, key: &ItemKey) -> Result<bool, ValidationError> {
        self.offer_results();
        let target = OverlayTarget::Staged(key.clone());
        let selected = self.staging.select(key)?;
        if selected {
            self.editor.expand(target);
        } else {
            self.editor.collapse_if(&target);
        }
        Ok(selected)
    }

    pub fn set_override(
        &mut self,
        key: &ItemKey,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        self.staging.set_override(key, field, value)
    }

    /// Drops every candidate and returns search to idle.
    pub fn close_staging(&mut self) {
        self.staging.clear();
        self.collapse_staged();
        self.search.reset();
    }

    // ── Overlay ──

    pub fn toggle_overlay(&mut self, target: OverlayTarget) -> Result<bool, ValidationError> {
        self.check_target(&target)?;
        Ok(self.editor.toggle(target))
    }

    pub fn expand(&mut self, target: OverlayTarget) -> Result<(), ValidationError> {
        self.check_target(&target)?;
        self.editor.expand(target);
        Ok(())
    }

    pub fn collapse(&mut self) {
        self.editor.collapse();
    }

    // ── Collection ──

    /// Commits the selected candidates, then resets search and staging.
    /// On a conflict nothing changes.
    pub fn commit(&mut self) -> AcquireResult<CommitReport> {
        let report = collection::commit(&mut self.staging, &mut self.collection, self.policy)?;
        self.collapse_staged();
        self.search.reset();
        Ok(report)
    }

    /// Adds an item typed in by hand, under the workflow's duplicate policy.
    pub fn add_manual(&mut self, item: CommittedItem) -> AcquireResult<Placement> {
        debug!("Manual entry {} into {}", item.key, self.collection.name());
        self.collection.add(item, self.policy)
    }

    /// Edits a committed item. Its overlay must be the open one.
    pub fn edit_committed(
        &mut self,
        key: &ItemKey,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ValidationError> {
        if !self
            .editor
            .is_expanded(&OverlayTarget::Committed(key.clone()))
        {
            return Err(ValidationError::NotExpanded(key.clone()));
        }
        self.collection.edit(key, field, value)
    }

    pub fn remove(&mut self, key: &ItemKey) -> Option<CommittedItem> {
        self.editor
            .collapse_if(&OverlayTarget::Committed(key.clone()));
        self.collection.remove(key)
    }

    // ── Accessors ──

    pub fn collection(&self) -> &OwningCollection {
        &self.collection
    }

    pub fn staging(&self) -> &StagingSet {
        &self.staging
    }

    pub fn editor(&self) -> &OverlayEditor {
        &self.editor
    }

    fn check_target(&self, target: &OverlayTarget) -> Result<(), ValidationError> {
        match target {
            OverlayTarget::Staged(key) => match self.staging.get(key) {
                Some(candidate) if candidate.is_selected() => Ok(()),
                Some(_) => Err(ValidationError::NotSelected(key.clone())),
                None => Err(ValidationError::UnknownCandidate(key.clone())),
            },
            OverlayTarget::Committed(key) if self.collection.contains(key) => Ok(()),
            OverlayTarget::Committed(key) => Err(ValidationError::UnknownItem(key.clone())),
        }
    }

    fn collapse_staged(&mut self) {
        if matches!(self.editor.expanded(), Some(OverlayTarget::Staged(_))) {
            self.editor.collapse();
        }
    }
}
