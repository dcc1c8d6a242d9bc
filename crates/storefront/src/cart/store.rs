//! Durable cart ID storage.
//!
//! The cart ID lives in a small key-value document under a fixed key, so the
//! same cart survives restarts. Entries are only ever written, never removed.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tokio::fs;
use tracing::debug;

use vanilla_connector_core::CartId;

/// Key the cart ID is stored under.
pub const CART_ID_KEY: &str = "shopify_cart_id";

/// Errors from reading or writing the cart ID store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt store file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable single-slot storage for the cart ID.
pub trait CartIdStore: Send + Sync {
    /// Read the stored cart ID, if any.
    fn load(&self) -> impl Future<Output = Result<Option<CartId>, StoreError>> + Send;

    /// Overwrite the stored cart ID.
    fn save(&self, cart_id: &CartId) -> impl Future<Output = Result<(), StoreError>> + Send;
}

// =============================================================================
// File store
// =============================================================================

/// JSON object file holding string values by key.
///
/// Unknown keys already in the file are preserved on write.
#[derive(Debug, Clone)]
pub struct FileCartIdStore {
    path: PathBuf,
}

impl FileCartIdStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write-then-rename so a crash never leaves a half-written file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await.map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).await.map_err(io_err)?;

        Ok(())
    }
}

impl CartIdStore for FileCartIdStore {
    async fn load(&self) -> Result<Option<CartId>, StoreError> {
        let entries = self.read_entries().await?;
        Ok(entries
            .get(CART_ID_KEY)
            .filter(|value| !value.is_empty())
            .map(|value| CartId::new(value.as_str())))
    }

    async fn save(&self, cart_id: &CartId) -> Result<(), StoreError> {
        let mut entries = self.read_entries().await?;
        entries.insert(CART_ID_KEY.to_string(), cart_id.to_string());
        self.write_entries(&entries).await?;

        debug!(path = %self.path.display(), "Cart ID persisted");
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local store with the same semantics as the file store.
#[derive(Debug, Default)]
pub struct MemoryCartIdStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCartIdStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a cart ID.
    #[must_use]
    pub fn with_cart_id(cart_id: &CartId) -> Self {
        let store = Self::new();
        store.put(cart_id);
        store
    }

    /// Synchronous peek at the stored value.
    #[must_use]
    pub fn get(&self) -> Option<CartId> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(CART_ID_KEY)
            .filter(|value| !value.is_empty())
            .map(|value| CartId::new(value.as_str()))
    }

    fn put(&self, cart_id: &CartId) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(CART_ID_KEY.to_string(), cart_id.to_string());
    }
}

impl CartIdStore for MemoryCartIdStore {
    async fn load(&self) -> Result<Option<CartId>, StoreError> {
        Ok(self.get())
    }

    async fn save(&self, cart_id: &CartId) -> Result<(), StoreError> {
        self.put(cart_id);
        Ok(())
    }
}

/// Shared handles store into the same slot.
impl<S: CartIdStore> CartIdStore for std::sync::Arc<S> {
    fn load(&self) -> impl Future<Output = Result<Option<CartId>, StoreError>> + Send {
        (**self).load()
    }

    fn save(&self, cart_id: &CartId) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save(cart_id)
    }
}
