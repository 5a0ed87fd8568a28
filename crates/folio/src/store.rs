//! Remembering the user's preferences between visits.

use color_eyre::eyre::{ContextCompat as _, Result};

/// The name of the file that preferences are saved in, inside Folio's state directory.
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// A durable store of string values.
pub trait KeyValueStore {
    /// The value saved under `key`, if there is one.
    fn get(&self, key: &str) -> Option<String>;

    /// Save a value under `key`, replacing any previous value.
    ///
    /// # Errors
    /// When the value can't be made durable.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept as a single flat JSON object in a file.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Where the JSON lives.
    path: std::path::PathBuf,
    /// Everything in the file.
    values: serde_json::Map<String, serde_json::Value>,
}

impl JsonFileStore {
    /// The default location of the preferences file.
    #[must_use]
    pub fn default_path() -> std::path::PathBuf {
        crate::config::main::Config::state_directory().join(PREFERENCES_FILE_NAME)
    }

    /// Read the store from disk. A missing file is just an empty store. As are unreadable
    /// contents: losing a preference isn't worth refusing to start over.
    ///
    /// # Errors
    /// When the file exists but can't be read.
    pub fn open(path: std::path::PathBuf) -> Result<Self> {
        let mut values = serde_json::Map::new();
        if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&data) {
                Ok(existing) => values = existing,
                Err(error) => {
                    tracing::warn!("Ignoring unparseable preferences at {path:?}: {error:?}");
                }
            }
        }

        tracing::debug!("Opened preferences store at {path:?}");
        Ok(Self { path, values })
    }

    /// Write everything back to disk.
    fn save(&self) -> Result<()> {
        let directory = self
            .path
            .parent()
            .context("Couldn't get preferences path's parent")?;
        std::fs::create_dir_all(directory)?;
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        tracing::trace!("Saving preference {key}={value}");
        self.values
            .insert(key.to_owned(), serde_json::Value::String(value.to_owned()));
        self.save()
    }
}

/// A store that only lives as long as it's in memory.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// Everything stored, shared between clones so tests can peek at it.
    pub values: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|error| color_eyre::eyre::eyre!("Poisoned store: {error:?}"))?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
