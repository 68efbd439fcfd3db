//! Configuration for the `netident` binary.
//!
//! Settings live in a RON file. Every section is optional and falls back to
//! its default, so a file only needs the values it changes:
//!
//! ```ron
//! (
//!     fetch: (timeout_ms: 3000),
//!     device_sources: [user_agent],
//! )
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use netident_core::CompatPolicy;
use netident_engine::{
    ClientHints, DeviceSettings, DeviceSourceKind, EngineConfig, Endpoints, FetchSettings,
    HighEntropyValues, ProviderRules,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "./netident.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            timeout_ms: duration_ms(settings.timeout),
            connect_timeout_ms: duration_ms(settings.connect_timeout),
            max_bytes: settings.max_bytes,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub endpoints: Endpoints,
    pub compat: CompatPolicy,
    pub provider_rules: ProviderRules,
    /// Device sources in the order they are asked.
    pub device_sources: Vec<DeviceSourceKind>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            endpoints: Endpoints::default(),
            compat: CompatPolicy::default(),
            provider_rules: ProviderRules::default(),
            device_sources: DeviceSettings::default().sources,
        }
    }
}

impl AppConfig {
    /// Builds the engine configuration, applying the command-line overrides.
    pub fn engine_config(
        &self,
        user_agent: &str,
        client_hints: ClientHints,
        timeout_override_ms: Option<u64>,
    ) -> EngineConfig {
        let timeout_ms = timeout_override_ms.unwrap_or(self.fetch.timeout_ms);
        EngineConfig {
            fetch: FetchSettings {
                timeout: Duration::from_millis(timeout_ms),
                connect_timeout: Duration::from_millis(self.fetch.connect_timeout_ms),
                max_bytes: self.fetch.max_bytes,
                ..FetchSettings::default()
            },
            endpoints: self.endpoints.clone(),
            provider_rules: self.provider_rules.clone(),
            device: DeviceSettings {
                user_agent: user_agent.to_string(),
                client_hints,
                sources: self.device_sources.clone(),
            },
        }
    }
}

/// Loads the configuration.
///
/// An explicit path must exist and parse. Without one, [`DEFAULT_CONFIG_PATH`]
/// is used when present; if it cannot be used the defaults apply.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_or_default(explicit, Path::new(DEFAULT_CONFIG_PATH))
}

fn load_or_default(explicit: Option<&Path>, default_path: &Path) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    if !default_path.exists() {
        engine_debug!("No config at {:?}; using defaults", default_path);
        return Ok(AppConfig::default());
    }
    match read_config(default_path) {
        Ok(config) => Ok(config),
        Err(err) => {
            engine_warn!("Ignoring config: {}", err);
            Ok(AppConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    engine_info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Reads a client-hints document. A document that cannot be used counts as a
/// refused query, so identification falls back to the user-agent parser.
pub fn read_client_hints(path: Option<&Path>) -> ClientHints {
    let Some(path) = path else {
        return ClientHints::Absent;
    };
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            engine_warn!("Cannot read client hints {:?}: {}", path, err);
            return ClientHints::Denied(err.to_string());
        }
    };
    match serde_json::from_str::<HighEntropyValues>(&text) {
        Ok(values) => ClientHints::Granted(values),
        Err(err) => {
            engine_warn!("Malformed client hints {:?}: {}", path, err);
            ClientHints::Denied(err.to_string())
        }
    }
}
