use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::Entry;

/// Single key the whole sequence persists under.
pub const STORE_KEY: &str = "training_data";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not reach training data storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("persisted training data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Key-value string persistence. One key holds the serialized entry
/// sequence; swapping the backing medium means swapping this impl.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// File-per-key store: `<key>.json` under a directory.
pub struct FileBlob {
    dir: PathBuf,
}

impl FileBlob {
    pub fn new(dir: PathBuf) -> Self {
        FileBlob { dir }
    }

    /// Platform data directory, falling back to the working directory.
    pub fn in_data_dir() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trainingLog");
        FileBlob::new(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlob {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        Ok(fs::write(self.path_for(key), value)?)
    }
}

/// Ordered sequence of logged sets, written back in full on every change.
pub struct EntryStore<B: BlobStore> {
    entries: Vec<Entry>,
    blob: B,
}

impl<B: BlobStore> EntryStore<B> {
    /// Hydrate from the persisted blob; an absent blob is an empty log.
    pub fn load(blob: B) -> Result<Self, StoreError> {
        let entries = match blob.get(STORE_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(EntryStore { entries, blob })
    }

    /// Empty store over `blob`, for recovering from a failed hydrate. The
    /// bad blob stays on disk until the next successful save.
    pub fn empty(blob: B) -> Self {
        EntryStore {
            entries: Vec::new(),
            blob,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Append to the end of the sequence, then persist all of it. The
    /// in-memory sequence keeps the entry even if the write fails.
    pub fn append(&mut self, entry: Entry) -> Result<(), StoreError> {
        self.entries.push(entry);
        self.persist()
    }

    /// Wholesale replacement, used by import.
    pub fn replace_all(&mut self, entries: Vec<Entry>) -> Result<(), StoreError> {
        self.entries = entries;
        self.persist()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.entries)?;
        self.blob.set(STORE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Clone, Default)]
    struct MemBlob {
        map: HashMap<String, String>,
    }

    impl BlobStore for MemBlob {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.map.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.map.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn set(week: i32, exercise: &str) -> Entry {
        Entry::logged(week, exercise.to_string(), 100.0, 5, 2)
    }

    #[test]
    fn absent_blob_loads_empty() {
        let store = EntryStore::load(MemBlob::default()).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn append_then_reload_reproduces_the_sequence() {
        let mut store = EntryStore::load(MemBlob::default()).unwrap();
        store.append(set(1, "Squat")).unwrap();
        store.append(set(2, "Bench")).unwrap();

        let snapshot = store.entries().to_vec();
        let reloaded = EntryStore::load(store.blob.clone()).unwrap();
        assert_eq!(reloaded.entries(), snapshot.as_slice());
    }

    #[test]
    fn duplicates_accumulate() {
        let mut store = EntryStore::load(MemBlob::default()).unwrap();
        store.append(set(1, "Squat")).unwrap();
        store.append(set(1, "Squat")).unwrap();
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn replace_all_discards_previous_contents() {
        let mut store = EntryStore::load(MemBlob::default()).unwrap();
        store.append(set(1, "Squat")).unwrap();
        store.append(set(2, "Bench")).unwrap();

        store.replace_all(vec![set(9, "Deadlift")]).unwrap();
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].exercise, "Deadlift");

        let reloaded = EntryStore::load(store.blob.clone()).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
    }

    #[test]
    fn malformed_blob_surfaces_a_parse_error() {
        let mut blob = MemBlob::default();
        blob.set(STORE_KEY, "not json").unwrap();
        assert!(matches!(EntryStore::load(blob), Err(StoreError::Parse(_))));
    }

    #[test]
    fn file_blob_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = EntryStore::load(FileBlob::new(dir.path().to_path_buf())).unwrap();
        store.append(set(1, "Deadlift")).unwrap();

        let reloaded = EntryStore::load(FileBlob::new(dir.path().to_path_buf())).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].exercise, "Deadlift");
    }
}
