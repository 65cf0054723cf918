//! CRUD orchestration
//!
//! The CrudEngine is responsible for:
//! - Serializing host state before Create/Update
//! - Calling the remote client
//! - Keeping the host's resource identity consistent with the outcome
//! - Reflecting the canonical remote object back into host state
//!
//! ## State Machine
//!
//! ```text
//!            create ok                       read/update ok
//!  ┌────────┐ ───────────────► ┌─────────┐ ◄──────────────┐
//!  │ Absent │                  │ Present │ ───────────────┘
//!  └────────┘ ◄─────────────── └─────────┘
//!     ▲  │    read err / delete ok    │
//!     └──┘                            │ update err / delete err
//!   create err                        └──► (identity unchanged)
//! ```
//!
//! Identity is empty exactly when the resource is Absent.
//!
//! ## Flow
//!
//! 1. Create: serialize everything set → client.create → set identity → commit plan → Read
//! 2. Read: client.read(identity, schema keys) → deserialize
//! 3. Update: if anything changed, serialize changes → client.update → set identity → commit plan; then Read
//! 4. Delete: client.delete(identity) → clear identity

use crate::error::{Error, Result};
use crate::reflect::{deserialize, serialize};
use crate::resources::ResourceDefinition;
use crate::traits::{RemoteClient, ResourceData};
use tracing::{debug, info, warn};

/// What a CRUD call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudOutcome {
    /// Object created and read back
    Created { reference: String },

    /// Object read into host state
    Read { reference: String },

    /// Changed fields sent to the remote, then read back
    Updated { previous: String, reference: String },

    /// Nothing changed; no remote update was issued, only a read
    Unchanged { reference: String },

    /// Object deleted; host identity cleared
    Deleted { reference: String },
}

impl CrudOutcome {
    /// Remote reference the outcome refers to
    pub fn reference(&self) -> &str {
        match self {
            CrudOutcome::Created { reference }
            | CrudOutcome::Read { reference }
            | CrudOutcome::Updated { reference, .. }
            | CrudOutcome::Unchanged { reference }
            | CrudOutcome::Deleted { reference } => reference,
        }
    }
}

/// CRUD orchestrator over a remote client
///
/// ## Threading
///
/// The engine holds no per-resource state; each call owns its descriptors
/// and remote object. Calls for the same resource must be serialized by the
/// host, which already holds `&mut` to the resource's state.
pub struct CrudEngine {
    /// Remote API client
    client: Box<dyn RemoteClient>,
}

impl CrudEngine {
    /// Create a new engine
    pub fn new(client: Box<dyn RemoteClient>) -> Self {
        Self { client }
    }

    /// Name of the underlying client
    pub fn client_name(&self) -> &'static str {
        self.client.client_name()
    }

    /// Create the resource and read back its canonical state
    ///
    /// On any failure the identity is reset to empty.
    pub async fn create(
        &self,
        resource: &ResourceDefinition,
        data: &mut dyn ResourceData,
    ) -> Result<CrudOutcome> {
        if let Err(e) = resource.schema.validate(&*data) {
            data.set_id("");
            return Err(e);
        }

        let object = serialize(
            resource.object_type,
            resource.schema.descriptors(),
            &*data,
            false,
        );

        info!(
            "Creating {} object with {} field(s)",
            resource.object_type,
            object.len()
        );

        let reference = match self.client.create(resource.object_type, &object).await {
            Ok(reference) => reference,
            Err(e) => {
                warn!(
                    "Create of {} via {} failed: {}",
                    resource.object_type,
                    self.client.client_name(),
                    e
                );
                data.set_id("");
                return Err(e);
            }
        };

        info!("Created {}", reference);
        data.set_id(&reference);
        data.commit_planned();

        self.read(resource, data).await?;
        Ok(CrudOutcome::Created { reference })
    }

    /// Read the resource into host state, requesting exactly the schema's
    /// attributes
    ///
    /// On failure the identity is cleared: the resource is considered gone.
    pub async fn read(
        &self,
        resource: &ResourceDefinition,
        data: &mut dyn ResourceData,
    ) -> Result<CrudOutcome> {
        let reference = require_identity(resource, &*data)?;
        let fields = resource.schema.keys();

        debug!("Reading {} fields {:?}", reference, fields);

        match self.client.read(&reference, &fields).await {
            Ok(object) => {
                deserialize(object, data);
                Ok(CrudOutcome::Read { reference })
            }
            Err(e) => {
                warn!(
                    "Read of {} via {} failed: {}",
                    reference,
                    self.client.client_name(),
                    e
                );
                data.set_id("");
                Err(e)
            }
        }
    }

    /// Send changed attributes, then read back
    ///
    /// When no attribute reports a change the remote update is skipped. A
    /// failed update leaves the identity untouched.
    pub async fn update(
        &self,
        resource: &ResourceDefinition,
        data: &mut dyn ResourceData,
    ) -> Result<CrudOutcome> {
        let previous = require_identity(resource, &*data)?;
        resource.schema.validate(&*data)?;

        let descriptors = resource.schema.descriptors();
        let needs_update = descriptors.iter().any(|d| data.has_change(&d.name));

        let outcome = if needs_update {
            let object = serialize(resource.object_type, descriptors, &*data, true);

            info!(
                "Updating {} with field(s) {:?}",
                previous,
                object.keys().collect::<Vec<_>>()
            );

            let reference = self.client.update(&previous, &object).await.map_err(|e| {
                warn!(
                    "Update of {} via {} failed: {}",
                    previous,
                    self.client.client_name(),
                    e
                );
                e
            })?;

            data.set_id(&reference);
            data.commit_planned();
            CrudOutcome::Updated {
                previous,
                reference,
            }
        } else {
            debug!("No changes for {}, skipping remote update", previous);
            CrudOutcome::Unchanged {
                reference: previous,
            }
        };

        self.read(resource, data).await?;
        Ok(outcome)
    }

    /// Delete the resource and clear its identity
    ///
    /// A failed delete leaves the identity untouched.
    pub async fn delete(
        &self,
        resource: &ResourceDefinition,
        data: &mut dyn ResourceData,
    ) -> Result<CrudOutcome> {
        let reference = require_identity(resource, &*data)?;

        info!("Deleting {}", reference);

        let deleted = self.client.delete(&reference).await.map_err(|e| {
            warn!(
                "Delete of {} via {} failed: {}",
                reference,
                self.client.client_name(),
                e
            );
            e
        })?;

        data.set_id("");
        Ok(CrudOutcome::Deleted { reference: deleted })
    }
}

fn require_identity(resource: &ResourceDefinition, data: &dyn ResourceData) -> Result<String> {
    match data.id() {
        "" => Err(Error::not_found(format!(
            "{} has no remote reference",
            resource.name
        ))),
        reference => Ok(reference.to_string()),
    }
}
