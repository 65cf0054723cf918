//! Collaborator traits for the bridge
//!
//! This module defines the interfaces the core consumes but does not own.
//!
//! - [`RemoteClient`]: Create/Read/Update/Delete against the remote object API
//! - [`ResourceData`]: the host framework's per-resource state

pub mod remote_client;
pub mod resource_data;

pub use remote_client::{RemoteClient, RemoteClientFactory};
pub use resource_data::ResourceData;
