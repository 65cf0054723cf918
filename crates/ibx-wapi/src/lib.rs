// # Infoblox WAPI Client
//
// This crate provides the `RemoteClient` implementation for the Infoblox
// Web API (WAPI).
//
// ## Scope
//
// - One HTTP request per client call
// - Errors are mapped to `ibx_core::Error` and returned to the engine
// - No retries, no caching, no background tasks
//
// ## Security Requirements
//
// - The WAPI password never appears in logs or `Debug` output
// - Credentials are provided by the caller (the `ibxctl` binary reads them
//   from the environment)
//
// ## API Reference
//
// - Base path: `{url}/wapi/v{version}`
// - Create: POST `/{object_type}` → JSON string reference
// - Read: GET `/{ref}?_return_fields=a,b,c` → JSON object
// - Update: PUT `/{ref}` → JSON string reference
// - Delete: DELETE `/{ref}` → JSON string reference

use async_trait::async_trait;
use ibx_core::config::ClientConfig;
use ibx_core::traits::{RemoteClient, RemoteClientFactory};
use ibx_core::{Error, RemoteObject, Result};
use serde_json::Value;
use std::time::Duration;

/// Client name used in errors and logs
pub const CLIENT_NAME: &str = "wapi";

/// Infoblox WAPI client
///
/// # Security
///
/// The Debug implementation does NOT expose the password.
pub struct WapiClient {
    /// `{url}/wapi/v{version}`, without trailing slash
    base_url: String,

    username: String,

    /// ⚠️ NEVER log this value
    password: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for WapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WapiClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl WapiClient {
    /// Create a new WAPI client
    ///
    /// # Parameters
    ///
    /// - `url`: Grid master URL, e.g. `https://gm.example.net`
    /// - `wapi_version`: e.g. `2.6.1`
    /// - `ignore_ssl`: accept invalid TLS certificates (lab grids)
    /// - `timeout`: per-request timeout
    pub fn new(
        url: &str,
        wapi_version: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        ignore_ssl: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() || password.is_empty() {
            return Err(Error::config("WAPI credentials cannot be empty"));
        }

        if ignore_ssl {
            tracing::warn!("TLS certificate verification disabled for {}", url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(ignore_ssl)
            .build()
            .map_err(|e| Error::client(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: format!("{}/wapi/v{}", url.trim_end_matches('/'), wapi_version),
            username,
            password,
            client,
        })
    }

    /// Base URL every request is made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and return the JSON body of a successful response
    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<Value> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: request failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(map_status(status.as_u16(), &body, what));
        }

        response
            .json()
            .await
            .map_err(|e| Error::remote(CLIENT_NAME, format!("{}: failed to parse response: {}", what, e)))
    }
}

/// Map a non-success WAPI response to an error
///
/// WAPI error bodies look like
/// `{"Error": "AdmConDataNotFoundError: ...", "code": "Client.Ibap.Data.NotFound", "text": "..."}`;
/// the `text` field is used when present.
fn map_status(status: u16, body: &str, what: &str) -> Error {
    let text = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("text").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => Error::auth(format!("{}: status {}: {}", what, status, text)),
        404 => Error::not_found(format!("{}: {}", what, text)),
        429 => Error::rate_limited(format!("{}: {}", what, text)),
        500..=599 => Error::remote(
            CLIENT_NAME,
            format!("{}: server error {}: {}", what, status, text),
        ),
        _ => Error::remote(CLIENT_NAME, format!("{}: status {}: {}", what, status, text)),
    }
}

/// Extract the reference string WAPI returns for create/update/delete
fn reference_from(body: Value, what: &str) -> Result<String> {
    match body {
        Value::String(reference) if !reference.is_empty() => Ok(reference),
        other => Err(Error::remote(
            CLIENT_NAME,
            format!("{}: expected a reference string, got {}", what, other),
        )),
    }
}

#[async_trait]
impl RemoteClient for WapiClient {
    async fn create(&self, object_type: &str, object: &RemoteObject) -> Result<String> {
        let what = format!("create {}", object_type);
        tracing::debug!("POST {}", self.endpoint(object_type));

        let request = self.client.post(self.endpoint(object_type)).json(object);
        let body = self.send(request, &what).await?;
        reference_from(body, &what)
    }

    async fn read(&self, reference: &str, fields: &[String]) -> Result<RemoteObject> {
        let what = format!("read {}", reference);
        tracing::debug!("GET {} fields {:?}", self.endpoint(reference), fields);

        let request = self
            .client
            .get(self.endpoint(reference))
            .query(&[("_return_fields", fields.join(","))]);

        // A reference lookup answers with one object; tolerate a one-element list
        let body = match self.send(request, &what).await? {
            Value::Array(mut items) if items.len() == 1 => items.remove(0),
            Value::Array(items) if items.is_empty() => {
                return Err(Error::not_found(what));
            }
            other => other,
        };

        RemoteObject::try_from(body).map_err(|e| {
            Error::remote(CLIENT_NAME, format!("{}: unexpected response shape: {}", what, e))
        })
    }

    async fn update(&self, reference: &str, object: &RemoteObject) -> Result<String> {
        let what = format!("update {}", reference);
        tracing::debug!("PUT {}", self.endpoint(reference));

        let request = self.client.put(self.endpoint(reference)).json(object);
        let body = self.send(request, &what).await?;
        reference_from(body, &what)
    }

    async fn delete(&self, reference: &str) -> Result<String> {
        let what = format!("delete {}", reference);
        tracing::debug!("DELETE {}", self.endpoint(reference));

        let request = self.client.delete(self.endpoint(reference));
        let body = self.send(request, &what).await?;
        reference_from(body, &what)
    }

    fn client_name(&self) -> &'static str {
        CLIENT_NAME
    }
}

/// Factory for creating WAPI clients
pub struct WapiFactory;

impl RemoteClientFactory for WapiFactory {
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn RemoteClient>> {
        match config {
            ClientConfig::Wapi {
                url,
                username,
                password,
                wapi_version,
                ignore_ssl,
                timeout_secs,
            } => Ok(Box::new(WapiClient::new(
                url,
                wapi_version,
                username.clone(),
                password.clone(),
                *ignore_ssl,
                Duration::from_secs(*timeout_secs),
            )?)),
            _ => Err(Error::config("Invalid config for WAPI client")),
        }
    }
}

/// Register the WAPI client with a registry
///
/// # Example
///
/// ```rust
/// use ibx_core::Registry;
///
/// let registry = Registry::new();
/// ibx_wapi::register(&registry);
/// assert!(registry.has_client("wapi"));
/// ```
pub fn register(registry: &ibx_core::Registry) {
    registry.register_client(CLIENT_NAME, Box::new(WapiFactory));
}
