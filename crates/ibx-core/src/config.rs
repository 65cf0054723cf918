//! Configuration types for the bridge
//!
//! The only thing the core needs configured is the remote client it talks
//! through. Resource schemas are static declarations (see [`crate::resources`]).

use serde::{Deserialize, Serialize};

/// WAPI version the built-in resource schemas are written against
pub const DEFAULT_WAPI_VERSION: &str = "2.6.1";

/// Remote client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientConfig {
    /// Infoblox WAPI over HTTP(S)
    Wapi {
        /// Grid master URL (e.g. "https://gm.example.net")
        url: String,
        /// WAPI user
        username: String,
        /// WAPI password
        password: String,
        /// WAPI version segment of the base path
        #[serde(default = "default_wapi_version")]
        wapi_version: String,
        /// Accept invalid TLS certificates
        #[serde(default)]
        ignore_ssl: bool,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom client
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ClientConfig {
    /// WAPI configuration with default version, TLS verification and timeout
    pub fn wapi(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ClientConfig::Wapi {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            wapi_version: default_wapi_version(),
            ignore_ssl: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the client configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ClientConfig::Wapi {
                url,
                username,
                password,
                wapi_version,
                timeout_secs,
                ..
            } => {
                if url.is_empty() {
                    return Err(crate::Error::config("WAPI URL cannot be empty"));
                }
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(crate::Error::config(format!(
                        "WAPI URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                if username.is_empty() {
                    return Err(crate::Error::config("WAPI username cannot be empty"));
                }
                if password.is_empty() {
                    return Err(crate::Error::config("WAPI password cannot be empty"));
                }
                if wapi_version.is_empty()
                    || !wapi_version
                        .chars()
                        .all(|c| c.is_ascii_digit() || c == '.')
                {
                    return Err(crate::Error::config(format!(
                        "WAPI version must look like 2.6.1. Got: '{}'",
                        wapi_version
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("WAPI timeout must be > 0"));
                }
                Ok(())
            }
            ClientConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom client factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom client config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the client type name
    pub fn type_name(&self) -> &str {
        match self {
            ClientConfig::Wapi { .. } => "wapi",
            ClientConfig::Custom { factory, .. } => factory,
        }
    }
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientConfig::Wapi {
                url,
                username,
                wapi_version,
                ignore_ssl,
                timeout_secs,
                ..
            } => f
                .debug_struct("Wapi")
                .field("url", url)
                .field("username", username)
                .field("password", &"<REDACTED>")
                .field("wapi_version", wapi_version)
                .field("ignore_ssl", ignore_ssl)
                .field("timeout_secs", timeout_secs)
                .finish(),
            ClientConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

fn default_wapi_version() -> String {
    DEFAULT_WAPI_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
