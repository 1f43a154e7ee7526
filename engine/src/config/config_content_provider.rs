use std::io::ErrorKind;
use std::sync::Arc;

use crate::storage::KeyValueStore;

pub trait ConfigContentProvider {
    fn get_config_content(&self) -> Result<Option<String>, String>;
    fn set_config_content(&self, content: &str) -> Result<(), String>;
}

pub struct FileContentConfigProvider {
    file_path: String,
}

impl FileContentConfigProvider {
    pub fn new(file_path: String) -> Self {
        Self { file_path }
    }
}

impl ConfigContentProvider for FileContentConfigProvider {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(self.file_path.as_str()) {
            Ok(content) => Ok(Some(content)),
            Err(err) => match err.kind() {
                ErrorKind::NotFound => Ok(None),
                _ => Err(format!("Failed to read config file: {}", err)),
            },
        }
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        std::fs::write(self.file_path.as_str(), content)
            .map_err(|e| format!("Failed to write config file: {}", e))
    }
}

/// Serves one key of a [`KeyValueStore`] as config content.
pub struct KeyValueContentProvider<TStore: KeyValueStore> {
    store: Arc<TStore>,
    key: String,
}

impl<TStore: KeyValueStore> KeyValueContentProvider<TStore> {
    pub fn new(store: Arc<TStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }
}

impl<TStore: KeyValueStore> ConfigContentProvider for KeyValueContentProvider<TStore> {
    fn get_config_content(&self) -> Result<Option<String>, String> {
        let Some(bytes) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| format!("Value for '{}' is not UTF-8: {}", self.key, e))
    }

    fn set_config_content(&self, content: &str) -> Result<(), String> {
        self.store.set(&self.key, content.as_bytes())
    }
}
