use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Opaque byte storage keyed by name, the only persistence the engine needs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, String>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), String>;
}

fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
        return Err(format!("Invalid storage key '{}'", key));
    }
    Ok(())
}

/// One file per key inside `directory`.
pub struct FileKeyValueStore {
    directory: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, String> {
        validate_key(key)?;
        Ok(self.directory.join(format!("{}.yaml", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, String> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) => match err.kind() {
                ErrorKind::NotFound => Ok(None),
                _ => Err(format!("Failed to read {}: {}", path.display(), err)),
            },
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), String> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.directory)
            .map_err(|e| format!("Failed to create {}: {}", self.directory.display(), e))?;
        std::fs::write(&path, value).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, String> {
        validate_key(key)?;
        let values = self
            .values
            .lock()
            .map_err(|_| "Storage lock poisoned".to_string())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), String> {
        validate_key(key)?;
        let mut values = self
            .values
            .lock()
            .map_err(|_| "Storage lock poisoned".to_string())?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_memory_tiles_store_{}", random_number));
        path
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let store = FileKeyValueStore::new(get_temp_dir());

        assert_eq!(store.get("highScores").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip_creates_directory() {
        let directory = get_temp_dir();
        let store = FileKeyValueStore::new(directory.clone());

        store.set("settings", b"theme: Dark").unwrap();

        assert!(directory.join("settings.yaml").exists());
        assert_eq!(store.get("settings").unwrap(), Some(b"theme: Dark".to_vec()));
    }

    #[test]
    fn test_keys_with_separators_rejected() {
        let store = FileKeyValueStore::new(get_temp_dir());

        assert!(store.set("../escape", b"x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryKeyValueStore::new();

        store.set("statistics", b"one").unwrap();
        store.set("statistics", b"two").unwrap();

        assert_eq!(store.get("statistics").unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
