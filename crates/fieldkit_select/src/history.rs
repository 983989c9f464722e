//! Persisted column-selection presets.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::conf::{C_HISTORY_KEY, C_HISTORY_NAME_DEFAULT, N_HISTORY_ENTRIES_MAX};
use crate::spec::{SpecHistoryEntry, StorageError};

////////////////////////////////////////////////////////////////////////////////
// #region StorageBackends

/// Key-value string storage.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage; contents are lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    dict_values: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.dict_values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.dict_values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.dict_values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `path_dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path_dir: PathBuf,
}

impl FileStorage {
    /// Bind to `path_dir`; the directory is created on first write.
    pub fn new(path_dir: impl Into<PathBuf>) -> Self {
        Self {
            path_dir: path_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.path_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.path_dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path_file = self.path_for(key);
        match fs::read_to_string(&path_file) {
            Ok(c_value) => Ok(Some(c_value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                path: path_file,
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.path_dir).map_err(|source| StorageError::Io {
            path: self.path_dir.clone(),
            source,
        })?;
        let path_file = self.path_for(key);
        fs::write(&path_file, value).map_err(|source| StorageError::Io {
            path: path_file,
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path_file = self.path_for(key);
        match fs::remove_file(&path_file) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path: path_file,
                source,
            }),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HistoryStore

/// Newest-first preset list, capped and de-duplicated by column signature.
#[derive(Debug, Clone)]
pub struct HistoryStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> HistoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stored presets, newest first. Unreadable or corrupt data yields an empty list.
    pub fn load(&self) -> Vec<SpecHistoryEntry> {
        let c_raw = match self.backend.get(C_HISTORY_KEY) {
            Ok(Some(c_raw)) => c_raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "preset storage unreadable; using empty history");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<SpecHistoryEntry>>(&c_raw) {
            Ok(l_entries) => l_entries,
            Err(err) => {
                tracing::warn!(error = %err, "preset storage corrupt; using empty history");
                Vec::new()
            }
        }
    }

    /// Record `columns` under `name`, stamped with the current time.
    pub fn save(
        &mut self,
        name: &str,
        columns: &[String],
    ) -> Result<Vec<SpecHistoryEntry>, StorageError> {
        self.save_at(name, columns, Utc::now().timestamp_millis())
    }

    /// Record `columns` under `name` with an explicit timestamp.
    ///
    /// An entry with the same column signature is replaced and moved to the
    /// front; the list keeps at most [`N_HISTORY_ENTRIES_MAX`] entries.
    pub fn save_at(
        &mut self,
        name: &str,
        columns: &[String],
        ts: i64,
    ) -> Result<Vec<SpecHistoryEntry>, StorageError> {
        let c_name = name.trim();
        let entry = SpecHistoryEntry {
            name: if c_name.is_empty() {
                C_HISTORY_NAME_DEFAULT.to_string()
            } else {
                c_name.to_string()
            },
            columns: columns.to_vec(),
            ts,
        };
        let c_signature = entry.signature();

        let mut l_entries = self.load();
        l_entries.retain(|e| e.signature() != c_signature);
        l_entries.insert(0, entry);
        l_entries.truncate(N_HISTORY_ENTRIES_MAX);

        self.backend
            .set(C_HISTORY_KEY, &serde_json::to_string(&l_entries)?)?;
        tracing::debug!(n_entries = l_entries.len(), "preset saved");
        Ok(l_entries)
    }

    /// Preset at `index` in newest-first order.
    pub fn get(&self, index: usize) -> Option<SpecHistoryEntry> {
        self.load().into_iter().nth(index)
    }

    /// Drop every preset.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.backend.remove(C_HISTORY_KEY)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn to_strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resave_moves_entry_to_front() {
        let mut history = HistoryStore::new(MemoryStorage::new());
        history.save_at("a", &to_strings(&["X", "Y"]), 1).unwrap();
        history.save_at("b", &to_strings(&["Y", "X"]), 2).unwrap();
        let l_entries = history.save_at("c", &to_strings(&["X", "Y"]), 3).unwrap();

        assert_eq!(l_entries.len(), 2);
        assert_eq!(l_entries[0].name, "c");
        assert_eq!(l_entries[0].ts, 3);
        assert_eq!(l_entries[1].columns, to_strings(&["Y", "X"]));
        assert_eq!(history.load(), l_entries);
    }

    #[test]
    fn list_is_capped_with_unique_signatures() {
        let mut history = HistoryStore::new(MemoryStorage::new());
        for n_idx in 0..30 {
            history
                .save_at("p", &[format!("C{}", n_idx % 25)], n_idx)
                .unwrap();
        }
        let l_entries = history.load();
        assert_eq!(l_entries.len(), N_HISTORY_ENTRIES_MAX);
        assert_eq!(l_entries[0].columns, to_strings(&["C4"]));

        let mut l_signatures: Vec<String> = l_entries.iter().map(|e| e.signature()).collect();
        l_signatures.sort();
        l_signatures.dedup();
        assert_eq!(l_signatures.len(), l_entries.len());
    }

    #[test]
    fn blank_name_uses_default() {
        let mut history = HistoryStore::new(MemoryStorage::new());
        history.save("  ", &to_strings(&["A"])).unwrap();
        assert_eq!(history.get(0).unwrap().name, "untitled");
        assert!(history.get(1).is_none());
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let mut backend = MemoryStorage::new();
        backend.set(C_HISTORY_KEY, "{not json").unwrap();
        let mut history = HistoryStore::new(backend);
        assert!(history.load().is_empty());

        let l_entries = history.save_at("a", &to_strings(&["A"]), 1).unwrap();
        assert_eq!(l_entries.len(), 1);
    }

    #[test]
    fn file_storage_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path_dir = dir.path().join("nested");

        let mut history = HistoryStore::new(FileStorage::new(&path_dir));
        assert!(history.load().is_empty());
        history.save_at("people", &to_strings(&["City", "Name"]), 7).unwrap();
        assert!(path_dir.join(format!("{C_HISTORY_KEY}.json")).is_file());

        let history_reopened = HistoryStore::new(FileStorage::new(&path_dir));
        assert_eq!(history_reopened.load()[0].label(), "people · City, Name");

        history.clear().unwrap();
        history.clear().unwrap();
        assert!(history.load().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        #[test]
        fn random_saves_stay_capped_and_unique(
            l_saves in proptest::collection::vec(
                (
                    "[a-z ]{0,6}",
                    proptest::collection::vec(prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")], 0..4),
                ),
                0..60,
            ),
        ) {
            let mut history = HistoryStore::new(MemoryStorage::new());
            for (n_ts, (c_name, l_columns)) in l_saves.iter().enumerate() {
                let l_columns = to_strings(l_columns);
                let l_entries = history.save_at(c_name, &l_columns, n_ts as i64).unwrap();

                prop_assert!(l_entries.len() <= N_HISTORY_ENTRIES_MAX);
                prop_assert_eq!(&l_entries[0].columns, &l_columns);
                prop_assert_eq!(l_entries[0].ts, n_ts as i64);
                prop_assert!(!l_entries[0].name.is_empty());

                let mut l_signatures: Vec<String> =
                    l_entries.iter().map(|e| e.signature()).collect();
                l_signatures.sort();
                l_signatures.dedup();
                prop_assert_eq!(l_signatures.len(), l_entries.len());
                prop_assert_eq!(history.load(), l_entries);
            }
        }
    }
}
