//! In-memory projection of the persisted content, keyed by slot key.
//!
//! The store is owned by [`crate::services::scheduler::ContentScheduler`],
//! which only mutates it after the persistence collaborator confirmed the
//! matching write.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::content::Content;
use crate::domain::slot::{SlotAddress, SlotKey, overflow_keys};
use crate::domain::types::ContentId;

/// A write targeted a key already held by a different record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("slot key {key} is held by content {occupant}")]
pub struct SlotConflict {
    pub key: SlotKey,
    pub occupant: ContentId,
}

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    entries: BTreeMap<SlotKey, Content>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from a persistence snapshot.
    ///
    /// Rows are placed in id order. A row whose key is already taken is moved
    /// to a free key of the same cell instead of replacing the earlier row.
    pub fn from_snapshot(mut rows: Vec<Content>) -> Self {
        rows.sort_by_key(|content| content.id);
        let mut store = Self::new();
        for mut content in rows {
            if store.find_by_id(content.id).is_some() {
                log::warn!("Skipping duplicate content id {} in snapshot", content.id);
                continue;
            }
            if store.entries.contains_key(&content.slot_key) {
                let rekeyed = store.allocate_key(&content.slot_key.address(), content.id);
                log::warn!(
                    "Content {} shares key {} with another record; keeping it as {}",
                    content.id,
                    content.slot_key,
                    rekeyed
                );
                content.slot_key = rekeyed;
            }
            store.entries.insert(content.slot_key.clone(), content);
        }
        store
    }

    pub fn get(&self, key: &SlotKey) -> Option<&Content> {
        self.entries.get(key)
    }

    pub fn find_by_id(&self, id: ContentId) -> Option<&Content> {
        self.entries.values().find(|content| content.id == id)
    }

    /// Writes `content` under its slot key, dropping any older entry with the
    /// same id. Returns that older entry.
    pub fn upsert(&mut self, content: Content) -> Result<Option<Content>, SlotConflict> {
        match self.entries.get(&content.slot_key) {
            Some(occupant) if occupant.id != content.id => {
                return Err(SlotConflict {
                    key: content.slot_key.clone(),
                    occupant: occupant.id,
                });
            }
            _ => {}
        }
        let previous = self.remove_by_id(content.id);
        self.entries.insert(content.slot_key.clone(), content);
        Ok(previous)
    }

    pub fn remove(&mut self, key: &SlotKey) -> Option<Content> {
        self.entries.remove(key)
    }

    pub fn remove_by_id(&mut self, id: ContentId) -> Option<Content> {
        let key = self.find_by_id(id).map(|content| content.slot_key.clone())?;
        self.entries.remove(&key)
    }

    /// Snapshot of every record, ordered by slot key.
    pub fn all(&self) -> Vec<Content> {
        self.entries.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Content> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every record in the cell: the primary occupant first, then overflow
    /// records by discriminator.
    pub fn occupants(&self, address: &SlotAddress) -> Vec<&Content> {
        let primary = address.key();
        let mut occupants: Vec<&Content> = self.entries.get(&primary).into_iter().collect();
        occupants.extend(
            overflow_keys(&primary, self.entries.keys())
                .into_iter()
                .filter_map(|key| self.entries.get(key)),
        );
        occupants
    }

    /// Record shown for the cell: the primary occupant, or the first overflow
    /// record when the primary key is free.
    pub fn occupant(&self, address: &SlotAddress) -> Option<&Content> {
        let primary = address.key();
        self.entries.get(&primary).or_else(|| {
            overflow_keys(&primary, self.entries.keys())
                .first()
                .and_then(|key| self.entries.get(*key))
        })
    }

    /// Key record `id` should take in the cell: the primary key when it is
    /// free, otherwise the first overflow key not held by another record.
    pub fn allocate_key(&self, address: &SlotAddress, id: ContentId) -> SlotKey {
        let available = |key: &SlotKey| {
            self.entries
                .get(key)
                .is_none_or(|occupant| occupant.id == id)
        };
        let primary = address.key();
        if available(&primary) {
            return primary;
        }
        (0..=u32::MAX)
            .map(|attempt| SlotKey::overflow_candidate(address, id, attempt))
            .find(|key| available(key))
            .unwrap_or_else(|| SlotKey::overflow(address, id))
    }
}
