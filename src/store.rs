//! Durable key-value store shared by the control surface and the page agent.
//!
//! Values are JSON; the store is last-write-wins with no versioning. Two
//! implementations are provided: [`MemoryStore`] (clones share one map) and
//! [`JsonFileStore`] (one JSON object on disk, rewritten atomically).

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use tokio::sync::Mutex;

use crate::data::model::HiddenSet;
use crate::error::{Error, Result};

/// Key holding the hidden module ids (a JSON array of strings).
pub const HIDDEN_MODULES_KEY: &str = "hiddenModules";
/// Key holding the colour theme (`"dark"` or `"light"`).
pub const THEME_KEY: &str = "theme";

/// Asynchronous get/set by key.
///
/// `set` returning `Ok` is the write acknowledgment; callers treat a value as
/// committed only after that.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<JsonValue>>;
    async fn set(&self, key: &str, value: JsonValue) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Typed accessors
// ---------------------------------------------------------------------------

/// Read the hidden set; a missing key is the empty set.
pub async fn load_hidden(store: &dyn DurableStore) -> Result<HiddenSet> {
    match store.get(HIDDEN_MODULES_KEY).await? {
        None | Some(JsonValue::Null) => Ok(HiddenSet::new()),
        Some(value) => serde_json::from_value(value).map_err(|source| Error::CorruptValue {
            key: HIDDEN_MODULES_KEY.to_string(),
            source,
        }),
    }
}

pub async fn save_hidden(store: &dyn DurableStore, hidden: &HiddenSet) -> Result<()> {
    let value = serde_json::to_value(hidden).map_err(|e| Error::StoreWrite {
        key: HIDDEN_MODULES_KEY.to_string(),
        reason: e.to_string(),
    })?;
    store.set(HIDDEN_MODULES_KEY, value).await
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store. Cloning yields another handle onto the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, JsonValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let map = self.inner.read().map_err(|e| Error::StoreRead {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let mut map = self.inner.write().map_err(|e| Error::StoreWrite {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        map.insert(key.to_string(), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Store backed by a single JSON object file.
///
/// Writes within one process are serialised; separate processes sharing the
/// file race and the last rename wins.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> std::io::Result<Option<Map<String, JsonValue>>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<JsonValue>(&text) {
            Ok(JsonValue::Object(map)) => Ok(Some(map)),
            Ok(_) | Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not a JSON object", self.path.display()),
            )),
        }
    }
}

#[async_trait]
impl DurableStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let map = self.read_map().await.map_err(|e| Error::StoreRead {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(map.and_then(|mut m| m.remove(key)))
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let write_err = |e: std::io::Error| Error::StoreWrite {
            key: key.to_string(),
            reason: e.to_string(),
        };

        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await.map_err(write_err)?.unwrap_or_default();
        map.insert(key.to_string(), value);

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await.map_err(write_err)?;
        let text = serde_json::to_string_pretty(&JsonValue::Object(map)).map_err(|e| {
            Error::StoreWrite {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;

        // Each write gets its own temp file so other handles on the same path
        // never share one.
        let target = self.path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(text.as_bytes())?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| write_err(std::io::Error::other(e)))?
        .map_err(write_err)?;
        log::debug!("Persisted '{key}' to {}", self.path.display());
        Ok(())
    }
}
