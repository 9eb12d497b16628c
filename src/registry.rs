// 📋 Entry Registry
//
// Owns the ordered list of parking entries and its persistence.
// Loaded once at construction, saved after every mutation.
//
// The registry reports through return values only. It does not validate
// entries and does not re-check slot uniqueness on add: callers ask
// `is_slot_taken` first so they can explain a rejection before anything changes.

use crate::entry::Entry;
use crate::search::filter_entries;
use crate::store::KeyValueStore;
use anyhow::{Context, Result};

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "entries";

pub struct Registry<S: KeyValueStore> {
    store: S,
    key: String,
    entries: Vec<Entry>,
}

impl<S: KeyValueStore> Registry<S> {
    /// Open the registry under the default storage key
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = load_entries(&store, &key);

        Registry { store, key, entries }
    }

    /// All entries in insertion order
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    /// Append an entry and persist the whole collection.
    ///
    /// On a failed write the in-memory list is left as it was.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        tracing::debug!(
            slot = %entry.slot_number,
            plate = %entry.license_plate,
            "adding entry"
        );

        self.entries.push(entry);
        if let Err(err) = self.save() {
            self.entries.pop();
            return Err(err);
        }

        Ok(())
    }

    /// Delete every entry with this license plate and persist the rest.
    /// Returns how many entries were removed.
    pub fn remove(&mut self, license_plate: &str) -> Result<usize> {
        let remaining: Vec<Entry> = self
            .entries
            .iter()
            .filter(|entry| entry.license_plate != license_plate)
            .cloned()
            .collect();
        let removed = self.entries.len() - remaining.len();

        let previous = std::mem::replace(&mut self.entries, remaining);
        if let Err(err) = self.save() {
            self.entries = previous;
            return Err(err);
        }

        tracing::debug!(plate = %license_plate, removed, "removed entries");
        Ok(removed)
    }

    /// Exact text comparison: "01" and "1" are different slots.
    pub fn is_slot_taken(&self, slot_number: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.slot_number == slot_number)
    }

    /// Suggested slot for the next entry: last inserted slot + 1, or 1.
    ///
    /// Only a suggestion. It is not checked against taken slots.
    pub fn next_slot_number(&self) -> u64 {
        match self.entries.last() {
            None => 1,
            Some(last) => last.slot_value().map_or(1, |slot| slot.saturating_add(1)),
        }
    }

    pub fn search(&self, query: &str) -> Vec<Entry> {
        filter_entries(&self.entries, query)
    }

    pub fn find_by_plate(&self, license_plate: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.license_plate == license_plate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-read the persisted collection, discarding the in-memory copy
    pub fn reload(&mut self) {
        self.entries = load_entries(&self.store, &self.key);
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store
            .set(&self.key, &json)
            .context("Failed to persist parking entries")
    }
}

/// Read the collection; missing, unreadable or malformed data yields an empty list.
fn load_entries<S: KeyValueStore>(store: &S, key: &str) -> Vec<Entry> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "store unavailable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Entry>>(&raw) {
        Ok(entries) => {
            tracing::debug!(key, count = entries.len(), "loaded entries");
            entries
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "stored entries are malformed, starting empty");
            Vec::new()
        }
    }
}
