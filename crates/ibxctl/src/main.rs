// # ibxctl - IBX bridge driver
//
// A thin integration layer over ibx-core: it reads configuration from the
// environment, wires the registry, runs one CRUD operation for one resource
// and persists the resulting state. All reflection and identity handling
// lives in ibx-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Remote API
// - `IBX_URL`: Grid master URL (e.g. https://gm.example.net)
// - `IBX_USERNAME`: WAPI user
// - `IBX_PASSWORD`: WAPI password
// - `IBX_WAPI_VERSION`: WAPI version (default 2.6.1)
// - `IBX_IGNORE_SSL`: Accept invalid TLS certificates (default false)
// - `IBX_TIMEOUT_SECS`: Per-request timeout (default 30)
//
// ### Operation
// - `IBX_OPERATION`: create, read, update or delete
// - `IBX_RESOURCE`: Resource type (infoblox_nsgroup_fwd, infoblox_network)
// - `IBX_ADDRESS`: Key of the resource in the state file (default: resource type)
// - `IBX_DESIRED_PATH`: JSON object of desired attributes (required for create)
//
// ### State
// - `IBX_STATE_PATH`: Path to state file (default ./ibx-state.json)
//
// ### Logging
// - `IBX_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export IBX_URL=https://gm.example.net
// export IBX_USERNAME=admin
// export IBX_PASSWORD=...
// export IBX_OPERATION=create
// export IBX_RESOURCE=infoblox_nsgroup_fwd
// export IBX_ADDRESS=edge_forwarders
// export IBX_DESIRED_PATH=./edge_forwarders.json
//
// ibxctl
// ```

use anyhow::{Context, Result};
use ibx_core::config::{ClientConfig, DEFAULT_WAPI_VERSION};
use ibx_core::traits::ResourceData;
use ibx_core::{
    CrudEngine, CrudOutcome, FileStateStore, MemoryResourceData, Registry, ResourceDefinition,
};
use serde_json::{Map, Value};
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_STATE_PATH: &str = "ibx-state.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Exit codes for different termination scenarios
///
/// - 0: Operation succeeded
/// - 1: Configuration or startup error
/// - 2: Runtime error (the remote call or state persistence failed)
#[derive(Debug, Clone, Copy)]
enum IbxExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<IbxExitCode> for ExitCode {
    fn from(code: IbxExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "read" => Ok(Operation::Read),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            _ => anyhow::bail!(
                "IBX_OPERATION '{}' is not valid. \
                Valid operations: create, read, update, delete",
                s
            ),
        }
    }
}

/// Application configuration
struct Config {
    url: String,
    username: String,
    password: String,
    wapi_version: String,
    ignore_ssl: bool,
    timeout_secs: u64,
    operation: String,
    resource: String,
    address: Option<String>,
    state_path: String,
    desired_path: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("IBX_URL").context("IBX_URL is required")?,
            username: env::var("IBX_USERNAME").context("IBX_USERNAME is required")?,
            password: env::var("IBX_PASSWORD").context("IBX_PASSWORD is required")?,
            wapi_version: env::var("IBX_WAPI_VERSION")
                .unwrap_or_else(|_| DEFAULT_WAPI_VERSION.to_string()),
            ignore_ssl: match env::var("IBX_IGNORE_SSL") {
                Ok(v) => parse_bool(&v).context("IBX_IGNORE_SSL must be true or false")?,
                Err(_) => false,
            },
            timeout_secs: match env::var("IBX_TIMEOUT_SECS") {
                Ok(v) => v
                    .parse()
                    .with_context(|| format!("IBX_TIMEOUT_SECS is not a number: {}", v))?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            },
            operation: env::var("IBX_OPERATION").context("IBX_OPERATION is required")?,
            resource: env::var("IBX_RESOURCE").context("IBX_RESOURCE is required")?,
            address: env::var("IBX_ADDRESS").ok(),
            state_path: env::var("IBX_STATE_PATH")
                .unwrap_or_else(|_| DEFAULT_STATE_PATH.to_string()),
            desired_path: env::var("IBX_DESIRED_PATH").ok(),
            log_level: env::var("IBX_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.client_config().validate()?;

        let operation: Operation = self.operation.parse()?;

        if self.resource.is_empty() {
            anyhow::bail!(
                "IBX_RESOURCE cannot be empty. \
                Set it via: export IBX_RESOURCE=infoblox_nsgroup_fwd"
            );
        }

        if self.address.as_ref().is_some_and(|a| a.is_empty()) {
            anyhow::bail!("IBX_ADDRESS cannot be empty when set");
        }

        if operation == Operation::Create && self.desired_path.is_none() {
            anyhow::bail!("IBX_DESIRED_PATH is required when IBX_OPERATION=create");
        }

        if self.state_path.is_empty() {
            anyhow::bail!("IBX_STATE_PATH cannot be empty");
        }

        if let Some(parent) = std::path::Path::new(&self.state_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "IBX_STATE_PATH parent directory does not exist: {}. \
                    Create it first: mkdir -p {}",
                parent.display(),
                parent.display()
            );
        }

        if self.url.starts_with("http://") {
            eprintln!(
                "WARNING: IBX_URL uses HTTP (not HTTPS). \
                      Credentials will be sent in clear text."
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "IBX_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig::Wapi {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            wapi_version: self.wapi_version.clone(),
            ignore_ssl: self.ignore_ssl,
            timeout_secs: self.timeout_secs,
        }
    }

    /// State file key; defaults to the resource type
    fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(&self.resource)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => anyhow::bail!("not a boolean: {}", value),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return IbxExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return IbxExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IbxExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IbxExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(()) => IbxExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                IbxExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Run one operation against one resource
async fn run(config: Config) -> Result<()> {
    let operation: Operation = config.operation.parse()?;

    let registry = Registry::new();
    ibx_wapi::register(&registry);
    ibx_core::resources::register_builtin(&registry);

    let resource = registry.resource(&config.resource)?;
    let engine = CrudEngine::new(registry.create_client(&config.client_config())?);

    info!(
        "{:?} {} ({}) via {}",
        operation,
        config.address(),
        resource.object_type,
        engine.client_name()
    );

    let store = FileStateStore::new(&config.state_path).await?;

    let mut data = match store.get(config.address()).await {
        Some(snapshot) if snapshot.resource_type != resource.name => anyhow::bail!(
            "{} is recorded as a {}, not a {}",
            config.address(),
            snapshot.resource_type,
            resource.name
        ),
        Some(snapshot) => MemoryResourceData::from_snapshot(&snapshot),
        None => MemoryResourceData::new(),
    };

    if let Some(path) = &config.desired_path {
        data.apply_config(load_desired(path).await?);
    }

    let outcome = execute(
        &engine,
        &resource,
        operation,
        &store,
        config.address(),
        &mut data,
    )
    .await?;
    report(&outcome, &data)?;
    Ok(())
}

/// Run `operation` and record the resulting identity in the state file
///
/// State is written even when the operation fails: a failed create or read
/// clears the identity.
async fn execute(
    engine: &CrudEngine,
    resource: &ResourceDefinition,
    operation: Operation,
    store: &FileStateStore,
    address: &str,
    data: &mut MemoryResourceData,
) -> Result<CrudOutcome> {
    let result = match operation {
        Operation::Create => {
            if !data.id().is_empty() {
                anyhow::bail!("{} already exists as {}; use update", address, data.id());
            }
            engine.create(resource, data).await
        }
        Operation::Read => engine.read(resource, data).await,
        Operation::Update => engine.update(resource, data).await,
        Operation::Delete => engine.delete(resource, data).await,
    };

    persist(store, address, resource.name, data).await?;
    Ok(result?)
}

/// Store the snapshot under `address`, or forget it once the resource is gone
async fn persist(
    store: &FileStateStore,
    address: &str,
    resource_type: &str,
    data: &MemoryResourceData,
) -> Result<()> {
    if data.id().is_empty() {
        store.remove(address).await?;
    } else {
        store.put(address, data.snapshot(resource_type)).await?;
    }
    Ok(())
}

async fn load_desired(path: &str) -> Result<Map<String, Value>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read desired state from {}", path))?;

    match serde_json::from_str::<Value>(&content)
        .with_context(|| format!("Failed to parse desired state from {}", path))?
    {
        Value::Object(attributes) => Ok(attributes),
        other => anyhow::bail!("{} must hold a JSON object, got {}", path, other),
    }
}

/// Print the outcome and resulting attributes as JSON on stdout
fn report(outcome: &CrudOutcome, data: &MemoryResourceData) -> Result<()> {
    match outcome {
        CrudOutcome::Unchanged { reference } => info!("{} unchanged", reference),
        CrudOutcome::Updated {
            previous,
            reference,
        } if previous != reference => {
            warn!("Remote reference changed: {} -> {}", previous, reference)
        }
        _ => info!("{:?}", outcome),
    }

    let report = serde_json::json!({
        "reference": outcome.reference(),
        "id": data.id(),
        "attributes": data.synced_attributes(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibx_core::resources::nsgroup_forward;
    use ibx_core::traits::RemoteClient;
    use ibx_core::{Error, RemoteObject};
    use serde_json::json;
    use tempfile::tempdir;

    /// Remote that answers reads from a fixed object, or fails them
    struct StubClient {
        object: Option<Value>,
    }

    #[async_trait::async_trait]
    impl RemoteClient for StubClient {
        async fn create(
            &self,
            object_type: &str,
            _object: &RemoteObject,
        ) -> ibx_core::Result<String> {
            Ok(format!("{}/stub", object_type))
        }

        async fn read(
            &self,
            reference: &str,
            _fields: &[String],
        ) -> ibx_core::Result<RemoteObject> {
            match &self.object {
                Some(object) => Ok(RemoteObject::try_from(object.clone()).unwrap()),
                None => Err(Error::not_found(reference.to_string())),
            }
        }

        async fn update(
            &self,
            reference: &str,
            _object: &RemoteObject,
        ) -> ibx_core::Result<String> {
            Ok(reference.to_string())
        }

        async fn delete(&self, reference: &str) -> ibx_core::Result<String> {
            Ok(reference.to_string())
        }

        fn client_name(&self) -> &'static str {
            "stub"
        }
    }

    fn engine(object: Option<Value>) -> CrudEngine {
        CrudEngine::new(Box::new(StubClient { object }))
    }

    /// Store holding one existing group under "edge"
    async fn seeded_store(path: &std::path::Path) -> FileStateStore {
        let store = FileStateStore::new(path).await.unwrap();
        let existing = MemoryResourceData::new()
            .with_id("nsgroup/abc123")
            .with_synced("name", json!("edge"));
        store
            .put("edge", existing.snapshot(nsgroup_forward::RESOURCE_NAME))
            .await
            .unwrap();
        store
    }

    fn config() -> Config {
        Config {
            url: "https://gm.example.net".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            wapi_version: DEFAULT_WAPI_VERSION.to_string(),
            ignore_ssl: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            operation: "read".to_string(),
            resource: "infoblox_network".to_string(),
            address: None,
            state_path: DEFAULT_STATE_PATH.to_string(),
            desired_path: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
        assert_eq!(config().address(), "infoblox_network");
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("Create".parse::<Operation>().unwrap(), Operation::Create);
        assert_eq!("delete".parse::<Operation>().unwrap(), Operation::Delete);
        assert!("upsert".parse::<Operation>().is_err());
    }

    #[test]
    fn test_create_requires_desired_state() {
        let mut cfg = config();
        cfg.operation = "create".to_string();
        assert!(cfg.validate().is_err());

        cfg.desired_path = Some("network.json".to_string());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut cfg = config();
        cfg.log_level = "verbose".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.url = "gm.example.net".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.timeout_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.address = Some(String::new());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[tokio::test]
    async fn test_failed_read_forgets_resource() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = seeded_store(&path).await;
        let resource = nsgroup_forward::definition();

        let mut data = MemoryResourceData::from_snapshot(&store.get("edge").await.unwrap());
        let result = execute(&engine(None), &resource, Operation::Read, &store, "edge", &mut data).await;

        assert!(result.is_err());
        assert!(store.get("edge").await.is_none());
        let reloaded = FileStateStore::new(&path).await.unwrap();
        assert!(reloaded.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_forgets_resource() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = seeded_store(&path).await;
        let resource = nsgroup_forward::definition();

        let mut data = MemoryResourceData::from_snapshot(&store.get("edge").await.unwrap());
        let outcome = execute(&engine(None), &resource, Operation::Delete, &store, "edge", &mut data)
            .await
            .unwrap();

        assert!(matches!(outcome, CrudOutcome::Deleted { .. }));
        let reloaded = FileStateStore::new(&path).await.unwrap();
        assert!(reloaded.get("edge").await.is_none());
    }

    #[tokio::test]
    async fn test_successful_read_records_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = seeded_store(&path).await;
        let resource = nsgroup_forward::definition();
        let remote = json!({"_ref": "nsgroup/abc123", "name": "edge", "comment": "set elsewhere"});

        let mut data = MemoryResourceData::from_snapshot(&store.get("edge").await.unwrap());
        execute(&engine(Some(remote)), &resource, Operation::Read, &store, "edge", &mut data)
            .await
            .unwrap();

        let reloaded = FileStateStore::new(&path).await.unwrap();
        let snapshot = reloaded.get("edge").await.unwrap();
        assert_eq!(snapshot.id, "nsgroup/abc123");
        assert_eq!(snapshot.resource_type, "infoblox_nsgroup_fwd");
        assert_eq!(snapshot.attributes["comment"], json!("set elsewhere"));
    }

    #[tokio::test]
    async fn test_create_refuses_existing_identity() {
        let dir = tempdir().unwrap();
        let store = seeded_store(&dir.path().join("state.json")).await;
        let resource = nsgroup_forward::definition();

        let mut data = MemoryResourceData::from_snapshot(&store.get("edge").await.unwrap());
        let result = execute(&engine(None), &resource, Operation::Create, &store, "edge", &mut data).await;

        assert!(result.is_err());
        assert_eq!(store.get("edge").await.unwrap().id, "nsgroup/abc123");
    }
}
