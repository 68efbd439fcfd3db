use serde::{Deserialize, Serialize};

use crate::{ClientHints, ClientHintsSource, DeviceSource, FetchSettings, ProviderRules, UserAgentSource};

/// Fixed lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Plain-text echo of the caller's IPv4 address (IPv4-only host).
    pub ipv4: String,
    /// Plain-text echo of the caller's IPv6 address (IPv6-only host).
    pub ipv6: String,
    /// JSON geolocation of the caller's address.
    pub geolocation: String,
    /// JSON document carrying the caller's reverse-DNS `hostname`.
    pub hostname: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ipv4: "https://ipv4.icanhazip.com".to_string(),
            ipv6: "https://ipv6.icanhazip.com".to_string(),
            geolocation: "https://ipwho.is/".to_string(),
            hostname: "https://ipinfo.io/json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSourceKind {
    ClientHints,
    UserAgent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    pub user_agent: String,
    pub client_hints: ClientHints,
    /// Tried in order; the first source to answer a field wins it.
    pub sources: Vec<DeviceSourceKind>,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            client_hints: ClientHints::Absent,
            sources: vec![DeviceSourceKind::ClientHints, DeviceSourceKind::UserAgent],
        }
    }
}

impl DeviceSettings {
    pub fn build_sources(&self) -> Vec<Box<dyn DeviceSource>> {
        self.sources
            .iter()
            .map(|kind| -> Box<dyn DeviceSource> {
                match kind {
                    DeviceSourceKind::ClientHints => {
                        Box::new(ClientHintsSource::new(self.client_hints.clone()))
                    }
                    DeviceSourceKind::UserAgent => {
                        Box::new(UserAgentSource::new(self.user_agent.clone()))
                    }
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub endpoints: Endpoints,
    pub provider_rules: ProviderRules,
    pub device: DeviceSettings,
}
