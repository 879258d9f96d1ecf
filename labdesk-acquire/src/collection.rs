//! The owning collection and the commit that feeds it.

use crate::error::{AcquireError, AcquireResult};
use crate::staging::StagingSet;
use labdesk_model::{check_field_name, CommittedItem, DuplicatePolicy, ValidationError};
use labdesk_types::ItemKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Where an added item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Appended,
    /// Replaced the existing entry at this index.
    Replaced(usize),
}

/// Named, insertion-ordered list of committed items. Keys are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CollectionParts")]
pub struct OwningCollection {
    name: String,
    items: Vec<CommittedItem>,
}

/// Unchecked wire form; duplicate keys are refused on the way in.
#[derive(Deserialize)]
struct CollectionParts {
    name: String,
    #[serde(default)]
    items: Vec<CommittedItem>,
}

impl TryFrom<CollectionParts> for OwningCollection {
    type Error = AcquireError;

    fn try_from(parts: CollectionParts) -> AcquireResult<Self> {
        let mut collection = Self::new(parts.name);
        for item in parts.items {
            collection.add(item, DuplicatePolicy::Reject)?;
        }
        Ok(collection)
    }
}

impl OwningCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[CommittedItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommittedItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &ItemKey) -> Option<&CommittedItem> {
        self.items.iter().find(|item| &item.key == key)
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.position(key).is_some()
    }

    pub fn position(&self, key: &ItemKey) -> Option<usize> {
        self.items.iter().position(|item| &item.key == key)
    }

    /// Adds one item under `policy`. Used for manual entry and by commit.
    pub fn add(&mut self, item: CommittedItem, policy: DuplicatePolicy) -> AcquireResult<Placement> {
        match (self.position(&item.key), policy) {
            (None, _) => {
                self.items.push(item);
                Ok(Placement::Appended)
            }
            (Some(index), DuplicatePolicy::Replace) => {
                self.items[index] = item;
                Ok(Placement::Replaced(index))
            }
            (Some(_), DuplicatePolicy::Reject) => Err(AcquireError::Conflict {
                collection: self.name.clone(),
                key: item.key,
            }),
        }
    }

    /// Removes the item with `key`. Missing keys are a no-op.
    pub fn remove(&mut self, key: &ItemKey) -> Option<CommittedItem> {
        let index = self.position(key)?;
        debug!("Removed {} from {}", key, self.name);
        Some(self.items.remove(index))
    }

    /// Edits one field of a committed item in place, returning the old value.
    pub fn edit(
        &mut self,
        key: &ItemKey,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ValidationError> {
        let field = field.into();
        check_field_name(&field)?;
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.key == key)
            .ok_or_else(|| ValidationError::UnknownItem(key.clone()))?;
        Ok(item.set_field(field, value))
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub appended: Vec<ItemKey>,
    pub replaced: Vec<ItemKey>,
}

impl CommitReport {
    pub fn total(&self) -> usize {
        self.appended.len() + self.replaced.len()
    }
}

/// Folds the selected candidates into `collection`, in selection order, then
/// empties `staging`.
///
/// Under [`DuplicatePolicy::Reject`] a key that is already committed fails the
/// whole commit before anything is written, and `staging` is left as is.
pub fn commit(
    staging: &mut StagingSet,
    collection: &mut OwningCollection,
    policy: DuplicatePolicy,
) -> AcquireResult<CommitReport> {
    let merged: Vec<CommittedItem> = staging
        .selected()
        .into_iter()
        .filter_map(|candidate| candidate.to_committed())
        .collect();

    if policy == DuplicatePolicy::Reject {
        if let Some(duplicate) = merged.iter().find(|item| collection.contains(&item.key)) {
            warn!("Commit to {} rejected: {} already present", collection.name, duplicate.key);
            return Err(AcquireError::Conflict {
                collection: collection.name.clone(),
                key: duplicate.key.clone(),
            });
        }
    }

    let mut report = CommitReport::default();
    for item in merged {
        let key = item.key.clone();
        match collection.add(item, policy)? {
            Placement::Appended => report.appended.push(key),
            Placement::Replaced(_) => report.replaced.push(key),
        }
    }
    staging.clear();

    info!(
        "Committed {} item(s) to {} ({} appended, {} replaced)",
        report.total(),
        collection.name,
        report.appended.len(),
        report.replaced.len()
    );
    Ok(report)
}
