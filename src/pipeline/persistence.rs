// flat string key/value storage for settings; survives restarts via a json file
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const VOLUME_ENTRY: &str = "drum_volume";
pub const BPM_ENTRY: &str = "drum_bpm";
pub const MAPPING_ENTRY: &str = "drum_key_mapping";

const DRUMKIT_DIR: &str = ".drumkit";
const SETTINGS_FILE: &str = "settings.json";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
struct Entries(BTreeMap<String, String>);

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Entries,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.0.insert(key.to_string(), value);
        Ok(())
    }
}

/// <data_dir>/.drumkit/settings.json, rewritten whole on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Entries,
}

pub fn settings_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DRUMKIT_DIR).join(SETTINGS_FILE)
}

pub fn drumkit_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(DRUMKIT_DIR)
}

impl JsonFileStore {
    /// Never fails: a missing file is an empty store, a broken one is
    /// logged and ignored (it gets overwritten on the next write).
    pub fn open(data_dir: &Path) -> Self {
        let path = settings_file_path(data_dir);
        let entries = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable settings file {}: {e}", path.display());
                Entries::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::default(),
            Err(e) => {
                log::warn!("could not read settings file {}: {e}", path.display());
                Entries::default()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?; // create .drumkit/ if needed
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.0.insert(key.to_string(), value);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(BPM_ENTRY), None);
        store.set(BPM_ENTRY, "90".to_string()).unwrap();
        assert_eq!(store.get(BPM_ENTRY).as_deref(), Some("90"));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path());
        assert_eq!(store.get(VOLUME_ENTRY), None);

        store.set(VOLUME_ENTRY, "0.5".to_string()).unwrap();
        assert!(settings_file_path(dir.path()).exists());

        let reopened = JsonFileStore::open(dir.path());
        assert_eq!(reopened.get(VOLUME_ENTRY).as_deref(), Some("0.5"));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(drumkit_dir(dir.path())).unwrap();
        std::fs::write(settings_file_path(dir.path()), "[1, 2").unwrap();

        let mut store = JsonFileStore::open(dir.path());
        assert_eq!(store.get(BPM_ENTRY), None);

        // and is replaced by the next write
        store.set(BPM_ENTRY, "100".to_string()).unwrap();
        assert_eq!(JsonFileStore::open(dir.path()).get(BPM_ENTRY).as_deref(), Some("100"));
    }
}
