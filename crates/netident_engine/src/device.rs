//! Browser and OS identification.
//!
//! Sources are tried in order and merged; the first source to name the browser
//! (or OS) wins that pair. Later sources are only consulted while something is
//! still missing.

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use serde::{Deserialize, Serialize};

/// Brands preferred over anything else in a client-hints brand list.
const PREFERRED_BRANDS: &[&str] = &["Microsoft Edge", "Google Chrome", "Opera"];

const WOOTHEE_UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandVersion {
    pub brand: String,
    pub version: String,
}

/// High-entropy client hints, in the shape the browser API reports them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighEntropyValues {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub platform_version: Option<String>,
    #[serde(default)]
    pub full_version_list: Vec<BrandVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceHints {
    pub browser_name: Option<String>,
    pub browser_version: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
}

impl DeviceHints {
    pub fn is_complete(&self) -> bool {
        self.browser_name.is_some()
            && self.browser_version.is_some()
            && self.os_name.is_some()
            && self.os_version.is_some()
    }

    fn fill_from(&mut self, other: DeviceHints) {
        fill_pair(
            (&mut self.browser_name, &mut self.browser_version),
            (other.browser_name, other.browser_version),
        );
        fill_pair(
            (&mut self.os_name, &mut self.os_version),
            (other.os_name, other.os_version),
        );
    }
}

/// Takes name and version together; a lone version is only borrowed from a
/// source that agrees on the name.
fn fill_pair(
    (name, version): (&mut Option<String>, &mut Option<String>),
    (other_name, other_version): (Option<String>, Option<String>),
) {
    if name.is_none() {
        if other_name.is_some() {
            *name = other_name;
            *version = other_version;
        }
        return;
    }
    let same_name = matches!(
        (name.as_deref(), other_name.as_deref()),
        (Some(current), Some(other)) if current.eq_ignore_ascii_case(other)
    );
    if version.is_none() && same_name {
        *version = other_version;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceSourceError {
    #[error("source unavailable")]
    Unavailable,
    #[error("query failed: {0}")]
    Query(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("user-agent parser unavailable")]
    ParserUnavailable,
}

#[async_trait::async_trait]
pub trait DeviceSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this source parses the raw user-agent string.
    fn is_user_agent_parser(&self) -> bool {
        false
    }

    async fn query(&self) -> Result<DeviceHints, DeviceSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClientHints {
    #[default]
    Absent,
    Granted(HighEntropyValues),
    /// The hints exist but could not be read (permission, malformed document).
    Denied(String),
}

#[derive(Debug, Clone)]
pub struct ClientHintsSource {
    hints: ClientHints,
}

impl ClientHintsSource {
    pub fn new(hints: ClientHints) -> Self {
        Self { hints }
    }
}

#[async_trait::async_trait]
impl DeviceSource for ClientHintsSource {
    fn name(&self) -> &'static str {
        "client hints"
    }

    async fn query(&self) -> Result<DeviceHints, DeviceSourceError> {
        let values = match &self.hints {
            ClientHints::Absent => return Err(DeviceSourceError::Unavailable),
            ClientHints::Denied(reason) => return Err(DeviceSourceError::Query(reason.clone())),
            ClientHints::Granted(values) => values,
        };
        let brand = select_brand(&values.full_version_list);
        Ok(DeviceHints {
            browser_name: brand.and_then(|b| non_empty(&b.brand)),
            browser_version: brand.and_then(|b| non_empty(&b.version)),
            os_name: values.platform.as_deref().and_then(non_empty),
            os_version: values.platform_version.as_deref().and_then(non_empty),
        })
    }
}

/// Picks Edge, then Chrome, then Opera, then the first brand that is neither a
/// "Not A Brand" placeholder nor the Chromium umbrella entry.
pub fn select_brand(list: &[BrandVersion]) -> Option<&BrandVersion> {
    PREFERRED_BRANDS
        .iter()
        .find_map(|wanted| list.iter().find(|entry| entry.brand == *wanted))
        .or_else(|| {
            list.iter().find(|entry| {
                let brand = entry.brand.to_lowercase();
                !brand.contains("not") && !brand.contains("chromium")
            })
        })
}

#[derive(Debug, Clone)]
pub struct UserAgentSource {
    user_agent: String,
}

impl UserAgentSource {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait::async_trait]
impl DeviceSource for UserAgentSource {
    fn name(&self) -> &'static str {
        "user-agent parser"
    }

    fn is_user_agent_parser(&self) -> bool {
        true
    }

    async fn query(&self) -> Result<DeviceHints, DeviceSourceError> {
        let parser = woothee::parser::Parser::new();
        let result = parser
            .parse(&self.user_agent)
            .ok_or_else(|| DeviceSourceError::Query("user-agent not recognised".to_string()))?;
        Ok(DeviceHints {
            browser_name: known(&result.name),
            browser_version: known(&result.version),
            os_name: known(&result.os),
            os_version: known(&result.os_version),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn known(value: &str) -> Option<String> {
    non_empty(value).filter(|v| v != WOOTHEE_UNKNOWN)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceIdentity {
    pub hints: DeviceHints,
}

impl DeviceIdentity {
    pub fn browser_display(&self) -> String {
        compose(&self.hints.browser_name, &self.hints.browser_version)
    }

    pub fn os_display(&self) -> String {
        compose(&self.hints.os_name, &self.hints.os_version)
    }
}

fn compose(name: &Option<String>, version: &Option<String>) -> String {
    format!(
        "{} {}",
        name.as_deref().unwrap_or("Unknown"),
        version.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}

pub async fn identify(sources: &[Box<dyn DeviceSource>]) -> Result<DeviceIdentity, DeviceError> {
    let mut merged = DeviceHints::default();
    for source in sources {
        if merged.is_complete() {
            break;
        }
        match source.query().await {
            Ok(hints) => {
                engine_debug!("Device hints from {}: {:?}", source.name(), hints);
                merged.fill_from(hints);
            }
            Err(DeviceSourceError::Unavailable) => {
                engine_debug!("Device source {} unavailable", source.name());
            }
            Err(err) => {
                engine_warn!("Could not query {}: {}", source.name(), err);
            }
        }
    }

    if !merged.is_complete() && !sources.iter().any(|source| source.is_user_agent_parser()) {
        engine_error!("User-agent parser not configured; cannot complete device identification");
        return Err(DeviceError::ParserUnavailable);
    }

    let identity = DeviceIdentity { hints: merged };
    engine_info!(
        "Device identified: browser='{}' os='{}'",
        identity.browser_display(),
        identity.os_display()
    );
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(brand: &str, version: &str) -> BrandVersion {
        BrandVersion {
            brand: brand.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn prefers_named_brands_over_placeholders() {
        let list = vec![
            brand("Not A Brand", "99.0.0.0"),
            brand("Chromium", "124.0.6367.91"),
            brand("Google Chrome", "124.0.6367.91"),
        ];
        assert_eq!(select_brand(&list), Some(&list[2]));
    }

    #[test]
    fn edge_beats_chrome() {
        let list = vec![
            brand("Google Chrome", "124.0.0.0"),
            brand("Microsoft Edge", "124.0.2478.67"),
        ];
        assert_eq!(select_brand(&list).map(|b| b.brand.as_str()), Some("Microsoft Edge"));
    }

    #[test]
    fn falls_back_to_first_real_brand() {
        let list = vec![
            brand("Not)A;Brand", "8.0.0.0"),
            brand("Chromium", "124.0.0.0"),
            brand("Brave", "124.0.0.0"),
        ];
        assert_eq!(select_brand(&list).map(|b| b.brand.as_str()), Some("Brave"));
        assert_eq!(select_brand(&list[..2]), None);
        assert_eq!(select_brand(&[]), None);
    }

    #[test]
    fn pair_fill_keeps_first_name() {
        let mut hints = DeviceHints {
            browser_name: Some("Google Chrome".into()),
            browser_version: None,
            ..DeviceHints::default()
        };
        hints.fill_from(DeviceHints {
            browser_name: Some("Chrome".into()),
            browser_version: Some("124.0".into()),
            os_name: Some("Linux".into()),
            os_version: None,
        });
        assert_eq!(hints.browser_name.as_deref(), Some("Google Chrome"));
        assert_eq!(hints.browser_version, None);
        assert_eq!(hints.os_name.as_deref(), Some("Linux"));

        hints.fill_from(DeviceHints {
            browser_name: Some("google chrome".into()),
            browser_version: Some("124.0.6367.91".into()),
            ..DeviceHints::default()
        });
        assert_eq!(hints.browser_version.as_deref(), Some("124.0.6367.91"));
    }

    #[test]
    fn display_trims_missing_version() {
        let identity = DeviceIdentity {
            hints: DeviceHints {
                browser_name: Some("Opera".into()),
                ..DeviceHints::default()
            },
        };
        assert_eq!(identity.browser_display(), "Opera");
        assert_eq!(identity.os_display(), "Unknown");
    }
}
