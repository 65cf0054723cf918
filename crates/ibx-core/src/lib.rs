// # ibx-core
//
// Core library for the Infoblox CRUD bridge.
//
// A declarative host describes desired resource state; this library turns
// that state into Create/Read/Update/Delete calls against a reference-based
// object API and reflects the API's answers back into host state.
//
// ## Architecture Overview
//
// - **ResourceSchema**: static attribute declarations, source of attribute descriptors
// - **reflect**: value conversion, object serialization/deserialization, extattrs wrapping
// - **RemoteClient**: trait for the remote object API (transport is not our concern)
// - **ResourceData**: trait for the host's per-resource state
// - **CrudEngine**: orchestrates the four operations and owns identity transitions
// - **Registry**: plugin-based registry for clients and resource types
//
// ## Design Principles
//
// 1. **Schema-driven**: one engine for every resource type; types differ only in schema
// 2. **Explicit failure classes**: remote failures are `Error`s, shape mismatches panic
// 3. **No hidden state**: each CRUD call owns its descriptors and remote object
// 4. **Library-First**: the `ibxctl` binary is a thin wiring layer over this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod object;
pub mod reflect;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod state;
pub mod traits;
pub mod validation;
pub mod value;

// Re-export core types for convenience
pub use config::ClientConfig;
pub use engine::{CrudEngine, CrudOutcome};
pub use error::{Error, Result};
pub use object::{EXTATTRS_FIELD, REF_FIELD, RemoteObject};
pub use registry::Registry;
pub use resources::ResourceDefinition;
pub use schema::{AttributeDescriptor, AttributeSchema, Optionality, ResourceSchema, ValueType};
pub use state::{FileStateStore, MemoryResourceData, ResourceSnapshot};
pub use traits::{RemoteClient, RemoteClientFactory, ResourceData};
pub use value::{ShapeError, ValueKind};
