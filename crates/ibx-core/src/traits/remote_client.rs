// # Remote Client Trait
//
// Defines the interface to the remote object API (Infoblox WAPI or any
// service with the same reference-based object model).
//
// ## Implementations
//
// - WAPI over HTTPS: `ibx-wapi` crate
//
// ## Usage
//
// ```rust,ignore
// use ibx_core::{RemoteClient, RemoteObject};
//
// async fn example(client: &dyn RemoteClient) -> ibx_core::Result<()> {
//     let object = RemoteObject::new().with_field("name", serde_json::json!("ns-group-1"));
//     let reference = client.create("nsgroup:forwardingmember", &object).await?;
//     let fields = vec!["name".to_string(), "comment".to_string()];
//     let current = client.read(&reference, &fields).await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::object::RemoteObject;

/// Trait for remote API clients
///
/// Objects on the remote side are addressed by an opaque reference string
/// returned from `create` and `update`. Clients translate the four calls
/// below to whatever transport the API uses.
///
/// # Responsibilities
///
/// Clients own transport, authentication and wire encoding. They must not:
/// - retry or back off (a failure is returned as-is to the engine)
/// - cache objects between calls
/// - touch host state or resource identity (owned by `CrudEngine`)
/// - decide whether a call is needed (owned by `CrudEngine`)
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Create an object of `object_type`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: reference of the new object
    /// - `Err(Error)`: if the API rejected the object or the call failed
    async fn create(
        &self,
        object_type: &str,
        object: &RemoteObject,
    ) -> Result<String, crate::Error>;

    /// Read the object behind `reference`, asking for exactly `fields`
    ///
    /// The returned object may carry `_ref` alongside the requested fields.
    async fn read(
        &self,
        reference: &str,
        fields: &[String],
    ) -> Result<RemoteObject, crate::Error>;

    /// Apply `object` (a partial set of fields) to the object behind `reference`
    ///
    /// # Returns
    ///
    /// The object's reference after the update, which may differ from the
    /// one passed in (references embed names on some object types).
    async fn update(
        &self,
        reference: &str,
        object: &RemoteObject,
    ) -> Result<String, crate::Error>;

    /// Delete the object behind `reference`
    ///
    /// # Returns
    ///
    /// The reference of the deleted object as echoed by the API.
    async fn delete(&self, reference: &str) -> Result<String, crate::Error>;

    /// Client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing remote clients from configuration
pub trait RemoteClientFactory: Send + Sync {
    /// Create a RemoteClient instance from configuration
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn RemoteClient>, crate::Error>;
}
