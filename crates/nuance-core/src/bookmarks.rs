use nuance_types::WordEntry;

use crate::storage::{KeyValueStore, StorageError};

pub const DEFAULT_KEY: &str = "quranic_words_dictionary";

/// Saved words, most recent first, persisted in full after every change.
pub struct BookmarkStore<S: KeyValueStore> {
    storage: S,
    key: String,
    entries: Vec<WordEntry>,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, DEFAULT_KEY)
    }

    /// Read the saved list. A missing or unreadable value starts an empty list.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries: Vec<WordEntry> = match storage.get(&key) {
            Ok(Some(data)) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!("saved words under '{key}' are unreadable, starting empty: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("failed to load saved words: {e}");
                Vec::new()
            }
        };

        let entries = dedupe(entries);
        tracing::info!("loaded {} saved words", entries.len());
        Self {
            storage,
            key,
            entries,
        }
    }

    /// Remove the word if saved, otherwise put it at the front. The new list is
    /// written before returning; a failed write is logged and the in-memory
    /// list is kept.
    pub fn toggle(&mut self, entry: &WordEntry) -> &[WordEntry] {
        if self.contains(entry) {
            self.entries.retain(|saved| !saved.same_word(entry));
            tracing::debug!("unsaved '{}'", entry.arabic());
        } else {
            self.entries.insert(0, entry.clone());
            tracing::debug!("saved '{}'", entry.arabic());
        }

        if let Err(e) = self.flush() {
            tracing::error!("failed to persist saved words: {e}");
        }

        &self.entries
    }

    pub fn contains(&self, entry: &WordEntry) -> bool {
        self.entries.iter().any(|saved| saved.same_word(entry))
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        let data = serde_json::to_string(&self.entries)?;
        self.storage.set(&self.key, &data)
    }
}

/// Keep the first (most recent) copy of each word
fn dedupe(entries: Vec<WordEntry>) -> Vec<WordEntry> {
    let total = entries.len();
    let mut unique: Vec<WordEntry> = Vec::with_capacity(total);
    for entry in entries {
        if !unique.iter().any(|kept| kept.same_word(&entry)) {
            unique.push(entry);
        }
    }
    if unique.len() < total {
        tracing::warn!("dropped {} duplicate saved words", total - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_words;
    use crate::storage::{JsonFileStore, MemoryStore};

    fn word(arabic: &str, reference: &str, nuance: &str) -> WordEntry {
        WordEntry::new(arabic, "t", "m", nuance, reference)
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn toggle_prepends_then_removes() {
        let mut store = BookmarkStore::load(MemoryStore::new());
        let [a, b, c] = default_words();

        store.toggle(&a);
        store.toggle(&b);
        let original = store.entries().to_vec();

        let after_add = store.toggle(&c).to_vec();
        assert_eq!(after_add, vec![c.clone(), b.clone(), a.clone()]);

        let after_remove = store.toggle(&c).to_vec();
        assert_eq!(after_remove, original);
    }

    #[test]
    fn identity_ignores_nuance() {
        let mut store = BookmarkStore::load(MemoryStore::new());
        let first = word("صَبْر", "২:১৫৩", "one reading");
        let second = word("صَبْر", "২:১৫৩", "another reading");

        store.toggle(&first);
        assert!(store.contains(&second));

        store.toggle(&second);
        assert!(!store.contains(&first));
        assert!(store.is_empty());
    }

    #[test]
    fn same_arabic_different_reference_are_distinct() {
        let mut store = BookmarkStore::load(MemoryStore::new());
        store.toggle(&word("قَلْب", "৫০:৩৭", ""));
        store.toggle(&word("قَلْب", "২:৭", ""));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn every_toggle_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let [a, b, _] = default_words();

        {
            let mut store = BookmarkStore::load(JsonFileStore::new(dir.path()));
            store.toggle(&a);
            store.toggle(&b);
        }

        let reloaded = BookmarkStore::load(JsonFileStore::new(dir.path()));
        assert_eq!(reloaded.entries(), &[b, a]);
    }

    #[test]
    fn corrupted_value_loads_empty() {
        let mut storage = MemoryStore::new();
        storage.set(DEFAULT_KEY, "{not json").unwrap();

        let store = BookmarkStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_saved_words_collapse_to_the_newest() {
        let newer = word("صَبْر", "২:১৫৩", "newer reading");
        let older = word("صَبْر", "২:১৫৩", "older reading");
        let other = word("قَلْب", "৫০:৩৭", "");

        let mut storage = MemoryStore::new();
        let data = serde_json::to_string(&[&newer, &other, &older]).unwrap();
        storage.set(DEFAULT_KEY, &data).unwrap();

        let mut store = BookmarkStore::load(storage);
        assert_eq!(store.entries(), &[newer.clone(), other.clone()]);
        assert_eq!(store.entries()[0].nuance(), "newer reading");

        store.toggle(&older);
        assert_eq!(store.entries(), &[other]);
    }

    #[test]
    fn storage_failures_are_not_fatal() {
        let mut store = BookmarkStore::load(FailingStore);
        assert!(store.is_empty());

        let [a, ..] = default_words();
        assert_eq!(store.toggle(&a).len(), 1);
        assert!(store.contains(&a));
    }
}
