//! Key-addressed response cache with declared invalidation.
//!
//! Reads are addressed by a [`ResourceKey`]. Every write is described by a
//! [`Mutation`] that lists the [`KeyScope`]s whose entries become stale, so
//! the read-after-write dependencies live in one table instead of being
//! spread over call sites.
//!
//! Each key owns a slot guarded by an async mutex. A second read of a key
//! whose fetch is still running waits on that mutex and then finds the value
//! in place, so identical concurrent reads hit the network once. A fetch that
//! fails leaves the slot empty.

use crate::libs::hierarchy::SectionsQuery;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Me,
    Sections(SectionsQuery),
    Section(Uuid),
    TasksByDate { not_before: NaiveDate, not_after: NaiveDate },
    Archived,
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyScope {
    Exact(ResourceKey),
    AllSections,
    AllSectionDetails,
    AllTasksByDate,
    Archived,
    AllSearches,
    Me,
    Everything,
}

impl KeyScope {
    pub fn matches(&self, key: &ResourceKey) -> bool {
        match (self, key) {
            (KeyScope::Exact(expected), key) => expected == key,
            (KeyScope::AllSections, ResourceKey::Sections(_)) => true,
            (KeyScope::AllSectionDetails, ResourceKey::Section(_)) => true,
            (KeyScope::AllTasksByDate, ResourceKey::TasksByDate { .. }) => true,
            (KeyScope::Archived, ResourceKey::Archived) => true,
            (KeyScope::AllSearches, ResourceKey::Search(_)) => true,
            (KeyScope::Me, ResourceKey::Me) => true,
            (KeyScope::Everything, _) => true,
            _ => false,
        }
    }
}

/// Every write the client can perform, with the data it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    TaskCreated { section_id: Uuid },
    TaskUpdated { section_id: Uuid },
    TaskRemoved { section_id: Uuid },
    TaskMoved { from_section_id: Uuid, to_section_id: Uuid },
    TaskCompletionToggled { section_id: Uuid },
    TaskArchiveToggled { section_id: Uuid },
    AttachmentChanged { section_id: Uuid },
    SectionCreated,
    SectionEdited,
    SectionMoved,
    SectionShuffled { section_id: Uuid },
    SessionChanged,
}

impl Mutation {
    pub fn invalidates(&self) -> Vec<KeyScope> {
        let section = |id: &Uuid| KeyScope::Exact(ResourceKey::Section(*id));
        match self {
            Mutation::TaskCreated { section_id } => {
                vec![section(section_id), KeyScope::AllTasksByDate, KeyScope::AllSearches]
            }
            Mutation::TaskUpdated { section_id }
            | Mutation::TaskRemoved { section_id }
            | Mutation::TaskCompletionToggled { section_id }
            | Mutation::TaskArchiveToggled { section_id }
            | Mutation::AttachmentChanged { section_id } => vec![
                section(section_id),
                KeyScope::AllTasksByDate,
                KeyScope::Archived,
                KeyScope::AllSearches,
            ],
            Mutation::TaskMoved {
                from_section_id,
                to_section_id,
            } => vec![
                section(from_section_id),
                section(to_section_id),
                KeyScope::AllTasksByDate,
                KeyScope::AllSearches,
            ],
            Mutation::SectionCreated | Mutation::SectionEdited | Mutation::SectionMoved => {
                vec![KeyScope::AllSections, KeyScope::AllSectionDetails]
            }
            Mutation::SectionShuffled { section_id } => vec![section(section_id)],
            Mutation::SessionChanged => vec![KeyScope::Everything],
        }
    }
}

type Value = Arc<dyn Any + Send + Sync>;
type Slot = Arc<tokio::sync::Mutex<Option<Value>>>;

#[derive(Default)]
pub struct ResourceCache {
    slots: Mutex<HashMap<ResourceKey, Slot>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &ResourceKey) -> Slot {
        self.slots.lock().entry(key.clone()).or_default().clone()
    }

    /// Cached value for `key`, or the result of `fetch` which is then cached.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: ResourceKey, fetch: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(&key);
        let mut entry = slot.lock().await;

        if let Some(value) = entry.as_ref().and_then(|value| value.downcast_ref::<T>()) {
            tracing::trace!(?key, "cache hit");
            return Ok(value.clone());
        }

        tracing::debug!(?key, "cache miss");
        let value = fetch().await?;
        *entry = Some(Arc::new(value.clone()));
        Ok(value)
    }

    pub fn get<T: Clone + 'static>(&self, key: &ResourceKey) -> Option<T> {
        let slot = self.slots.lock().get(key)?.clone();
        let entry = slot.try_lock().ok()?;
        entry.as_ref()?.downcast_ref::<T>().cloned()
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.slots
            .lock()
            .get(key)
            .is_some_and(|slot| slot.try_lock().map(|entry| entry.is_some()).unwrap_or(true))
    }

    /// Drops every entry matched by one of `scopes`; returns how many keys
    /// were dropped. A fetch still running for a dropped key completes into a
    /// detached slot and is not seen by later reads.
    pub fn invalidate(&self, scopes: &[KeyScope]) -> usize {
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|key, _| !scopes.iter().any(|scope| scope.matches(key)));
        let dropped = before - slots.len();
        if dropped > 0 {
            tracing::debug!(dropped, ?scopes, "cache invalidated");
        }
        dropped
    }

    pub fn apply(&self, mutation: &Mutation) -> usize {
        self.invalidate(&mutation.invalidates())
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
