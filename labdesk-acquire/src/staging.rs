//! Candidates offered by search, pending confirmation.

use labdesk_model::{
    check_field_name, Attributes, CommittedItem, SearchResultItem, ValidationError,
};
use labdesk_types::ItemKey;
use serde_json::Value;

/// A search hit under consideration.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedCandidate {
    item: SearchResultItem,
    selected: bool,
    overrides: Attributes,
    /// Position in selection order; 0 while unselected.
    selected_seq: u64,
}

impl StagedCandidate {
    fn offered(item: SearchResultItem) -> Self {
        Self {
            item,
            selected: false,
            overrides: Attributes::new(),
            selected_seq: 0,
        }
    }

    pub fn key(&self) -> &ItemKey {
        &self.item.key
    }

    pub fn item(&self) -> &SearchResultItem {
        &self.item
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Overlay values; `None` while unselected since they carry no meaning then.
    pub fn overrides(&self) -> Option<&Attributes> {
        self.selected.then_some(&self.overrides)
    }

    /// The committed form of this candidate, or `None` if it is not selected.
    pub fn to_committed(&self) -> Option<CommittedItem> {
        self.overrides()
            .map(|overrides| CommittedItem::merged(&self.item, overrides))
    }
}

/// Rows offered for selection plus whatever the user has selected.
///
/// Selected candidates survive new result sets; unselected rows are replaced
/// whenever results change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagingSet {
    candidates: Vec<StagedCandidate>,
}

impl StagingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a result set. Unselected rows not in `results` are dropped;
    /// selected candidates are kept even if the new results omit them.
    pub fn offer(&mut self, results: &[SearchResultItem]) {
        self.candidates
            .retain(|c| c.selected || results.iter().any(|r| r.key == c.item.key));
        for item in results {
            if !self.contains(&item.key) {
                self.candidates.push(StagedCandidate::offered(item.clone()));
            }
        }
    }

    /// Flips selection. Deselecting drops the overlay values.
    /// Returns the new selection state.
    pub fn toggle(&mut self, key: &ItemKey) -> Result<bool, ValidationError> {
        if self.find(key)?.selected {
            self.deselect(key)?;
            Ok(false)
        } else {
            self.select(key)?;
            Ok(true)
        }
    }

    /// Selects the candidate. Returns `false` if it was already selected,
    /// in which case nothing changes.
    pub fn select(&mut self, key: &ItemKey) -> Result<bool, ValidationError> {
        let seq = self.next_seq();
        let candidate = self.find_mut(key)?;
        if candidate.selected {
            return Ok(false);
        }
        candidate.selected = true;
        candidate.selected_seq = seq;
        Ok(true)
    }

    /// Deselects the candidate and clears its overrides. Returns `false` if it
    /// was not selected.
    pub fn deselect(&mut self, key: &ItemKey) -> Result<bool, ValidationError> {
        let candidate = self.find_mut(key)?;
        if !candidate.selected {
            return Ok(false);
        }
        candidate.selected = false;
        candidate.selected_seq = 0;
        candidate.overrides.clear();
        Ok(true)
    }

    /// Writes one overlay field of a selected candidate.
    pub fn set_override(
        &mut self,
        key: &ItemKey,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ValidationError> {
        let field = field.into();
        check_field_name(&field)?;
        let candidate = self.find_mut(key)?;
        if !candidate.selected {
            return Err(ValidationError::NotSelected(key.clone()));
        }
        candidate.overrides.insert(field, value.into());
        Ok(())
    }

    pub fn get(&self, key: &ItemKey) -> Option<&StagedCandidate> {
        self.candidates.iter().find(|c| &c.item.key == key)
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.get(key).is_some()
    }

    /// All candidates in display order.
    pub fn candidates(&self) -> &[StagedCandidate] {
        &self.candidates
    }

    /// Selected candidates in the order they were selected.
    pub fn selected(&self) -> Vec<&StagedCandidate> {
        let mut selected: Vec<_> = self.candidates.iter().filter(|c| c.selected).collect();
        selected.sort_by_key(|c| c.selected_seq);
        selected
    }

    pub fn selected_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.selected).count()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Drops every candidate, selected or not.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    // Derived from the current selection so that select/deselect pairs
    // leave no trace.
    fn next_seq(&self) -> u64 {
        self.candidates
            .iter()
            .map(|c| c.selected_seq)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn find(&self, key: &ItemKey) -> Result<&StagedCandidate, ValidationError> {
        self.get(key)
            .ok_or_else(|| ValidationError::UnknownCandidate(key.clone()))
    }

    fn find_mut(&mut self, key: &ItemKey) -> Result<&mut StagedCandidate, ValidationError> {
        self.candidates
            .iter_mut()
            .find(|c| &c.item.key == key)
            .ok_or_else(|| ValidationError::UnknownCandidate(key.clone()))
    }
}
