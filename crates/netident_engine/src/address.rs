use std::sync::LazyLock;

use engine_logging::{engine_info, engine_warn};
use regex::Regex;

use crate::{FailureKind, FetchError, Fetcher};

static IPV4_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("valid IPv4 pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    pub fn label(self) -> &'static str {
        match self {
            IpFamily::V4 => "IPv4",
            IpFamily::V6 => "IPv6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResult {
    Found(String),
    /// IPv6 host could not be resolved: the network most likely has no IPv6.
    DnsUnavailable,
    Failed(FetchError),
}

/// Shape check only: four dot-separated groups of 1-3 digits for IPv4, at
/// least one colon and three characters for IPv6.
pub fn is_valid_address(family: IpFamily, text: &str) -> bool {
    match family {
        IpFamily::V4 => IPV4_SHAPE.is_match(text),
        IpFamily::V6 => text.contains(':') && text.chars().count() >= 3,
    }
}

pub async fn resolve_address(fetcher: &dyn Fetcher, url: &str, family: IpFamily) -> AddressResult {
    match fetch_address(fetcher, url, family).await {
        Ok(address) => {
            engine_info!("{} resolved via {}", family.label(), url);
            AddressResult::Found(address)
        }
        Err(err) if family == IpFamily::V6 && err.kind == FailureKind::NameResolution => {
            engine_info!("IPv6 endpoint not resolvable, treating as no IPv6: {}", err);
            AddressResult::DnsUnavailable
        }
        Err(err) => {
            engine_warn!("{} lookup via {} failed: {}", family.label(), url, err);
            AddressResult::Failed(err)
        }
    }
}

async fn fetch_address(
    fetcher: &dyn Fetcher,
    url: &str,
    family: IpFamily,
) -> Result<String, FetchError> {
    let output = fetcher.get(url).await?.ensure_success()?;
    let address = output.text()?.trim().to_string();
    if is_valid_address(family, &address) {
        Ok(address)
    } else {
        let preview: String = address.chars().take(64).collect();
        Err(FetchError::new(
            FailureKind::InvalidBody,
            format!("invalid {} format: {:?}", family.label(), preview),
        ))
    }
}
