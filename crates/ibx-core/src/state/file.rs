// # File State Store
//
// JSON file persistence for resource snapshots, keyed by resource address.
//
// ## Crash Recovery
//
// - Atomic writes: write to a `.tmp` sibling, then rename over the state file
// - Backup: the previous state file is copied to a `.backup` sibling before
//   every write
// - Recovery: a state file that fails to parse is replaced by its backup
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "resources": {
//     "infoblox_nsgroup_fwd.primary": {
//       "resource_type": "infoblox_nsgroup_fwd",
//       "id": "nsgroup:forwardingmember/ZG5z...:primary",
//       "attributes": { "name": "primary", "comment": "managed" },
//       "last_synced": "2026-01-09T12:00:00Z"
//     }
//   }
// }
// ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::state::memory::ResourceSnapshot;

/// State file format version
const STATE_FILE_VERSION: &str = "1.0";

/// File-backed snapshot store
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    resources: Arc<RwLock<BTreeMap<String, ResourceSnapshot>>>,
}

/// Serializable state file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StateFileFormat {
    version: String,
    resources: BTreeMap<String, ResourceSnapshot>,
}

/// Why a state file could not be loaded
enum LoadFailure {
    /// The file exists but is not a valid state file
    Corrupt(Error),
    /// The file could not be read at all
    Unreadable(Error),
}

impl FileStateStore {
    /// Create or load a file state store
    ///
    /// Creates parent directories as needed. A corrupt state file is
    /// recovered from its backup; with no usable backup the store starts
    /// empty.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::state(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let resources = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            resources: Arc::new(RwLock::new(resources)),
        })
    }

    async fn load_with_recovery(path: &Path) -> Result<BTreeMap<String, ResourceSnapshot>, Error> {
        let err = match Self::load(path).await {
            Ok(resources) => {
                tracing::debug!("Loaded state from file: {} resource(s)", resources.len());
                return Ok(resources);
            }
            Err(LoadFailure::Unreadable(e)) => return Err(e),
            Err(LoadFailure::Corrupt(e)) => e,
        };

        tracing::warn!(
            "State file appears corrupted: {}. Attempting recovery from backup.",
            err
        );

        let backup_path = Self::backup_path(path);
        if !backup_path.exists() {
            tracing::warn!("No backup file found. Starting with empty state.");
            return Ok(BTreeMap::new());
        }

        match Self::load(&backup_path).await {
            Ok(resources) => {
                tracing::info!(
                    "Recovered state from backup: {} resource(s)",
                    resources.len()
                );
                if let Err(e) = fs::copy(&backup_path, path).await {
                    tracing::error!("Failed to restore state file from backup: {}", e);
                }
                Ok(resources)
            }
            Err(LoadFailure::Corrupt(e)) | Err(LoadFailure::Unreadable(e)) => {
                tracing::error!("Backup also unusable: {}. Starting with empty state.", e);
                Ok(BTreeMap::new())
            }
        }
    }

    async fn load(path: &Path) -> Result<BTreeMap<String, ResourceSnapshot>, LoadFailure> {
        if !path.exists() {
            tracing::debug!("State file does not exist: {}", path.display());
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            LoadFailure::Unreadable(Error::state(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            )))
        })?;

        let state_file: StateFileFormat = serde_json::from_str(&content).map_err(|e| {
            LoadFailure::Corrupt(Error::state(format!(
                "Failed to parse state file {}: {}",
                path.display(),
                e
            )))
        })?;

        if state_file.version != STATE_FILE_VERSION {
            tracing::warn!(
                "State file version mismatch: expected {}, got {}. Attempting to load anyway.",
                STATE_FILE_VERSION,
                state_file.version
            );
        }

        Ok(state_file.resources)
    }

    /// Write state to file atomically
    async fn write_state(&self) -> Result<(), Error> {
        let json = {
            let resources = self.resources.read().await;
            let state_file = StateFileFormat {
                version: STATE_FILE_VERSION.to_string(),
                resources: resources.clone(),
            };
            serde_json::to_string_pretty(&state_file)
                .map_err(|e| Error::state(format!("Failed to serialize state: {}", e)))?
        };

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            file.write_all(json.as_bytes()).await?;
            file.flush().await?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }

    /// Snapshot stored under `address`
    pub async fn get(&self, address: &str) -> Option<ResourceSnapshot> {
        self.resources.read().await.get(address).cloned()
    }

    /// Store a snapshot under `address` and write the file
    pub async fn put(&self, address: &str, snapshot: ResourceSnapshot) -> Result<(), Error> {
        self.resources
            .write()
            .await
            .insert(address.to_string(), snapshot);
        self.write_state().await
    }

    /// Forget `address` and write the file
    pub async fn remove(&self, address: &str) -> Result<(), Error> {
        self.resources.write().await.remove(address);
        self.write_state().await
    }

    /// Stored addresses, sorted
    pub async fn list(&self) -> Vec<String> {
        self.resources.read().await.keys().cloned().collect()
    }
}
