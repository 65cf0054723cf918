//! Plugin-based registry for remote clients and resource types
//!
//! The registry maps client type names to factories and resource type
//! names to their definitions, so integration layers can wire a bridge from
//! configuration without hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ibx_core::registry::Registry;
//! use ibx_core::config::ClientConfig;
//!
//! let registry = Registry::new();
//! ibx_wapi::register(&registry);
//! ibx_core::resources::register_builtin(&registry);
//!
//! let client = registry.create_client(&ClientConfig::wapi("https://gm", "admin", "secret"))?;
//! let resource = registry.resource("infoblox_nsgroup_fwd")?;
//! ```

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::resources::ResourceDefinition;
use crate::traits::{RemoteClient, RemoteClientFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of client factories and resource definitions
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct Registry {
    /// Registered remote client factories
    clients: RwLock<HashMap<String, Box<dyn RemoteClientFactory>>>,

    /// Registered resource definitions
    resources: RwLock<HashMap<String, Arc<ResourceDefinition>>>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a remote client factory under a client type name
    /// (e.g. "wapi")
    pub fn register_client(&self, name: impl Into<String>, factory: Box<dyn RemoteClientFactory>) {
        let name = name.into();
        let mut clients = self.clients.write().unwrap();
        clients.insert(name, factory);
    }

    /// Register a resource definition under its own name
    pub fn register_resource(&self, definition: ResourceDefinition) {
        let mut resources = self.resources.write().unwrap();
        resources.insert(definition.name.to_string(), Arc::new(definition));
    }

    /// Create a remote client from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RemoteClient>)`: Created client instance
    /// - `Err(Error)`: If the configuration is invalid, the client type is not
    ///   registered, or creation fails
    pub fn create_client(&self, config: &ClientConfig) -> Result<Box<dyn RemoteClient>> {
        config.validate()?;

        let client_type = config.type_name();
        let clients = self.clients.read().unwrap();

        let factory = clients
            .get(client_type)
            .ok_or_else(|| Error::config(format!("Unknown client type: {}", client_type)))?;

        factory.create(config)
    }

    /// Look up a resource definition by resource type name
    pub fn resource(&self, name: &str) -> Result<Arc<ResourceDefinition>> {
        let resources = self.resources.read().unwrap();
        resources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", name)))
    }

    /// List all registered client types
    pub fn list_clients(&self) -> Vec<String> {
        let clients = self.clients.read().unwrap();
        clients.keys().cloned().collect()
    }

    /// List all registered resource types, sorted
    pub fn list_resources(&self) -> Vec<String> {
        let resources = self.resources.read().unwrap();
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a client type is registered
    pub fn has_client(&self, name: &str) -> bool {
        let clients = self.clients.read().unwrap();
        clients.contains_key(name)
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, name: &str) -> bool {
        let resources = self.resources.read().unwrap();
        resources.contains_key(name)
    }
}
