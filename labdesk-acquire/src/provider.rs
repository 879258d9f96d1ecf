//! External collaborator contracts.
//!
//! The engine never talks to the network itself. Search, entity creation and
//! submission are reached through these traits so the same workflow runs
//! against a real backend, a local stub, or the in-memory mocks below.

use crate::error::ProviderError;
use crate::payload::Payload;
use async_trait::async_trait;
use labdesk_model::{FormFields, SearchResultItem, SelectionContext};
use labdesk_types::{OptionId, SessionContext};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a generated artifact (e.g. a rendered prescription document).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote lookup behind a search field.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns the matches for `query` (possibly none).
    async fn search(
        &self,
        ctx: &SessionContext,
        query: &str,
    ) -> Result<Vec<SearchResultItem>, ProviderError>;
}

/// Creates referenced entities (referrers, collection agents, ...).
#[async_trait]
pub trait EntityCreationProvider: Send + Sync {
    /// Creates the entity and returns its identity. Fields were validated
    /// locally already; the provider may still reject them.
    async fn create_entity(
        &self,
        ctx: &SessionContext,
        context: &SelectionContext,
        fields: &FormFields,
    ) -> Result<OptionId, ProviderError>;
}

/// Turns an assembled payload into an artifact.
#[async_trait]
pub trait SubmissionProvider: Send + Sync {
    async fn submit(
        &self,
        ctx: &SessionContext,
        payload: &Payload,
    ) -> Result<ArtifactRef, ProviderError>;
}

/// Entity creation that only mints an identity. Nothing is persisted; the
/// option lives as long as the form that received it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEntityProvider;

#[async_trait]
impl EntityCreationProvider for LocalEntityProvider {
    async fn create_entity(
        &self,
        _ctx: &SessionContext,
        _context: &SelectionContext,
        _fields: &FormFields,
    ) -> Result<OptionId, ProviderError> {
        Ok(OptionId::new())
    }
}

/// In-memory providers for tests and demos.
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Case-insensitive substring search over a fixed catalog.
    ///
    /// Latency and failures can be scripted per query to exercise debounce,
    /// stale-response and timeout handling.
    #[derive(Debug, Default)]
    pub struct CatalogSearch {
        items: Vec<SearchResultItem>,
        latency: Mutex<HashMap<String, Duration>>,
        failing: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl CatalogSearch {
        pub fn new(items: Vec<SearchResultItem>) -> Self {
            Self {
                items,
                ..Default::default()
            }
        }

        /// Delays the answer for `query`.
        pub fn with_latency(self, query: impl Into<String>, delay: Duration) -> Self {
            lock(&self.latency).insert(query.into(), delay);
            self
        }

        /// Makes lookups for `query` fail.
        pub fn fail_on(self, query: impl Into<String>) -> Self {
            lock(&self.failing).insert(query.into());
            self
        }

        /// Every query received, in call order.
        pub fn calls(&self) -> Vec<String> {
            lock(&self.calls).clone()
        }
    }

    #[async_trait]
    impl SearchProvider for CatalogSearch {
        async fn search(
            &self,
            _ctx: &SessionContext,
            query: &str,
        ) -> Result<Vec<SearchResultItem>, ProviderError> {
            lock(&self.calls).push(query.to_string());
            let delay = lock(&self.latency).get(query).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if lock(&self.failing).contains(query) {
                return Err(ProviderError::Unavailable(format!("lookup failed for {query}")));
            }
            let needle = query.to_lowercase();
            Ok(self
                .items
                .iter()
                .filter(|item| {
                    item.label.to_lowercase().contains(&needle)
                        || item.key.as_str().to_lowercase().contains(&needle)
                })
                .cloned()
                .collect())
        }
    }

    /// Entity creation that always refuses.
    #[derive(Debug, Clone)]
    pub struct RejectingEntityProvider {
        reason: String,
    }

    impl RejectingEntityProvider {
        pub fn new(reason: impl Into<String>) -> Self {
            Self {
                reason: reason.into(),
            }
        }
    }

    #[async_trait]
    impl EntityCreationProvider for RejectingEntityProvider {
        async fn create_entity(
            &self,
            _ctx: &SessionContext,
            _context: &SelectionContext,
            _fields: &FormFields,
        ) -> Result<OptionId, ProviderError> {
            Err(ProviderError::Rejected(self.reason.clone()))
        }
    }

    /// Records submitted payloads and answers with `doc-<n>` references.
    #[derive(Debug, Default)]
    pub struct RecordingSubmitter {
        submitted: Mutex<Vec<Payload>>,
        failures_left: Mutex<usize>,
        latency: Option<Duration>,
    }

    impl RecordingSubmitter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fails the next `count` submissions.
        pub fn failing(self, count: usize) -> Self {
            *lock(&self.failures_left) = count;
            self
        }

        pub fn with_latency(mut self, delay: Duration) -> Self {
            self.latency = Some(delay);
            self
        }

        pub fn submitted(&self) -> Vec<Payload> {
            lock(&self.submitted).clone()
        }
    }

    #[async_trait]
    impl SubmissionProvider for RecordingSubmitter {
        async fn submit(
            &self,
            _ctx: &SessionContext,
            payload: &Payload,
        ) -> Result<ArtifactRef, ProviderError> {
            if let Some(delay) = self.latency {
                tokio::time::sleep(delay).await;
            }
            {
                let mut failures = lock(&self.failures_left);
                if *failures > 0 {
                    *failures -= 1;
                    return Err(ProviderError::Unavailable("document service down".into()));
                }
            }
            let mut submitted = lock(&self.submitted);
            submitted.push(payload.clone());
            Ok(ArtifactRef::new(format!("doc-{}", submitted.len())))
        }
    }
}
