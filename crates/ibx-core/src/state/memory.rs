// # Memory Resource Data
//
// In-memory implementation of ResourceData.
//
// ## Model
//
// Two attribute maps are kept:
// - `synced`: the last state reflected from the remote API
// - `current`: `synced` overlaid with planned (user-desired) values
//
// `set` writes both maps, because a value the bridge writes is by definition
// in sync with the remote. `plan` writes only `current`. `commit_planned`
// copies `current` over `synced` once the remote has applied the plan. An attribute has a
// change exactly when the two maps disagree on it (null and absent compare
// equal).
//
// ## When to Use
//
// - Tests
// - `ibxctl`, which persists snapshots through `FileStateStore`
// - Embedding the bridge in hosts without their own state model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::ResourceData;

/// Persistable view of one resource's synced state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Resource type name (e.g. "infoblox_nsgroup_fwd")
    pub resource_type: String,
    /// Remote reference; empty when the resource does not exist
    pub id: String,
    /// Attributes as last reflected from the remote API
    pub attributes: Map<String, Value>,
    /// When the snapshot was taken
    pub last_synced: DateTime<Utc>,
}

/// In-memory resource state
///
/// # Example
///
/// ```rust
/// use ibx_core::state::MemoryResourceData;
/// use ibx_core::traits::ResourceData;
/// use serde_json::json;
///
/// let data = MemoryResourceData::new()
///     .with_synced("comment", json!("old"))
///     .with_planned("comment", json!("new"));
///
/// assert!(data.has_change("comment"));
/// assert_eq!(data.get_ok("comment"), Some(json!("new")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryResourceData {
    id: String,
    synced: Map<String, Value>,
    current: Map<String, Value>,
}

impl MemoryResourceData {
    /// Create an empty, absent resource
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a snapshot; nothing is planned afterwards
    pub fn from_snapshot(snapshot: &ResourceSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            synced: snapshot.attributes.clone(),
            current: snapshot.attributes.clone(),
        }
    }

    /// Take a snapshot of the synced state
    pub fn snapshot(&self, resource_type: impl Into<String>) -> ResourceSnapshot {
        ResourceSnapshot {
            resource_type: resource_type.into(),
            id: self.id.clone(),
            attributes: self.synced.clone(),
            last_synced: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder-style synced value (as if read from the remote)
    pub fn with_synced(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        self.synced.insert(key.clone(), value.clone());
        self.current.insert(key, value);
        self
    }

    /// Builder-style planned value
    pub fn with_planned(mut self, key: impl Into<String>, value: Value) -> Self {
        self.plan(key, value);
        self
    }

    /// Plan a new value for `key`
    pub fn plan(&mut self, key: impl Into<String>, value: Value) {
        self.current.insert(key.into(), value);
    }

    /// Plan removal of `key`
    pub fn unplan(&mut self, key: &str) {
        self.current.remove(key);
    }

    /// Plan every entry of `config`
    pub fn apply_config(&mut self, config: Map<String, Value>) {
        for (key, value) in config {
            self.plan(key, value);
        }
    }

    /// Current (planned) attributes
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.current
    }

    /// Last synced attributes
    pub fn synced_attributes(&self) -> &Map<String, Value> {
        &self.synced
    }

    /// Keys whose planned value differs from the synced one
    pub fn changed_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .current
            .keys()
            .chain(self.synced.keys())
            .filter(|key| self.has_change(key))
            .cloned()
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

impl ResourceData for MemoryResourceData {
    fn get_ok(&self, key: &str) -> Option<Value> {
        present(self.current.get(key)).cloned()
    }

    fn has_change(&self, key: &str) -> bool {
        present(self.current.get(key)) != present(self.synced.get(key))
    }

    fn set(&mut self, key: &str, value: Value) {
        self.synced.insert(key.to_string(), value.clone());
        self.current.insert(key.to_string(), value);
    }

    fn commit_planned(&mut self) {
        self.synced = self.current.clone();
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn id(&self) -> &str {
        &self.id
    }
}
