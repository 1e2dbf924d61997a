// Global key/value state: a JSON object file mirroring a per-installation
// memento. Every call goes back to disk; nothing is cached between calls.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::warn;

use super::{read_optional, write_atomic, StoreError};

#[derive(Debug, Clone)]
pub struct GlobalState {
    path: PathBuf,
}

impl GlobalState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value stored under `key`; absent file or key reads as `None`.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    /// Replace the value under `key`, keeping every other key intact.
    pub async fn update(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value);
        let bytes = serde_json::to_vec_pretty(&Value::Object(entries))
            .map_err(|source| StoreError::Encode { path: self.path.clone(), source })?;
        write_atomic(&self.path, &bytes).await
    }

    async fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let Some(bytes) = read_optional(&self.path).await? else {
            return Ok(Map::new());
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => {
                warn!(path = %self.path.display(), "global state is not a JSON object; treating it as empty");
                Ok(Map::new())
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "global state is not valid JSON; treating it as empty");
                Ok(Map::new())
            }
        }
    }
}
