//! Netident engine: network lookups, heuristics and job execution.
mod address;
mod config;
mod device;
mod engine;
mod fetch;
mod geo;
mod provider;
mod types;

pub use address::{is_valid_address, resolve_address, AddressResult, IpFamily};
pub use config::{DeviceSettings, DeviceSourceKind, EngineConfig, Endpoints};
pub use device::{
    identify, select_brand, BrandVersion, ClientHints, ClientHintsSource, DeviceError,
    DeviceHints, DeviceIdentity, DeviceSource, DeviceSourceError, HighEntropyValues,
    UserAgentSource,
};
pub use engine::{EngineError, EngineHandle, LookupJob};
pub use fetch::{looks_like_name_resolution, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_TIMEOUT};
pub use geo::{flag_glyph, resolve_location, Location};
pub use provider::{
    deduce_provider, resolve_provider, Confidence, ProviderName, ProviderResult, ProviderRules,
};
pub use types::{EngineEvent, FailureKind, FetchError, FetchOutput};
