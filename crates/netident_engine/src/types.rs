use std::fmt;

use serde::de::DeserializeOwned;

use crate::{AddressResult, DeviceError, DeviceIdentity, IpFamily, Location, ProviderResult};

/// One event per finished lookup job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AddressResolved {
        family: IpFamily,
        result: AddressResult,
    },
    LocationResolved(Result<Location, FetchError>),
    ProviderResolved(Result<ProviderResult, FetchError>),
    DeviceIdentified(Result<DeviceIdentity, DeviceError>),
}

/// Raw response returned by the timed fetch wrapper; callers decide what a
/// non-2xx status means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchOutput {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fails with `HttpStatus` unless the status is 2xx.
    pub fn ensure_success(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::new(
                FailureKind::HttpStatus(self.status),
                format!("HTTP {}", self.status),
            ))
        }
    }

    pub fn text(&self) -> Result<&str, FetchError> {
        std::str::from_utf8(&self.body)
            .map_err(|err| FetchError::new(FailureKind::InvalidBody, err.to_string()))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body)
            .map_err(|err| FetchError::new(FailureKind::InvalidBody, err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    /// The host name could not be resolved.
    NameResolution,
    Network,
    HttpStatus(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not text, not JSON, or failed shape validation.
    InvalidBody,
    /// The API answered but reported its own failure.
    Api,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::NameResolution => write!(f, "name not resolved"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidBody => write!(f, "invalid body"),
            FailureKind::Api => write!(f, "api error"),
        }
    }
}
