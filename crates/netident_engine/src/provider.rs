//! Network provider deduction from a reverse-DNS host name.
//!
//! Host names such as `123-45-67-89.nat-pool-soyuz.in.ua` usually carry the
//! provider's name somewhere between the address-derived noise on the left and
//! the public suffix on the right. [`deduce_provider`] digs it out with a
//! best-effort rule table ([`ProviderRules`]); there is no guarantee the result
//! is the real operator name.

use engine_logging::{engine_debug, engine_error, engine_info};
use serde::{Deserialize, Serialize};

use crate::{FetchError, Fetcher};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderRules {
    /// Bumped whenever the default tables change.
    pub version: u32,
    /// Words that describe address assignment rather than the operator.
    pub infrastructure_words: Vec<String>,
    /// Generic top/second-level labels that never name a provider.
    pub generic_suffixes: Vec<String>,
    pub min_label_len: usize,
}

impl Default for ProviderRules {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            version: 1,
            infrastructure_words: owned(&[
                "adsl", "bb", "broadband", "cable", "cgnat", "client", "clients", "cpe", "cust",
                "customer", "customers", "dhcp", "dial", "dialup", "dip", "dsl", "dyn", "dynamic",
                "fiber", "fibre", "ftth", "gateway", "gw", "host", "hosts", "ip", "ipv4", "ipv6",
                "lte", "mobile", "nat", "pool", "ppp", "pppoe", "res", "residential", "rev",
                "reverse", "static", "sub", "subscriber", "user", "users", "vdsl", "wan",
                "wireless", "xdsl",
            ]),
            generic_suffixes: owned(&[
                "ac", "biz", "co", "com", "edu", "firm", "gen", "go", "gov", "gr", "in", "ind",
                "info", "int", "ltd", "mil", "name", "ne", "net", "nom", "or", "org", "plc",
                "pro",
            ]),
            min_label_len: 3,
        }
    }
}

impl ProviderRules {
    fn is_infrastructure(&self, word: &str) -> bool {
        self.infrastructure_words
            .iter()
            .any(|w| w.eq_ignore_ascii_case(word))
    }

    fn is_generic_suffix(&self, label: &str) -> bool {
        self.generic_suffixes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// A label passed the length and suffix checks.
    Matched,
    /// Only a short label was left; it was used anyway.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderName {
    pub label: String,
    pub hostname: String,
    pub confidence: Confidence,
    pub rules_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResult {
    Named(ProviderName),
    /// No usable host name, or nothing provider-like in it.
    Unknown { hostname: Option<String> },
}

pub fn deduce_provider(hostname: &str, rules: &ProviderRules) -> Option<ProviderName> {
    let cleaned = hostname.trim().trim_end_matches('.').to_ascii_lowercase();
    let labels: Vec<&str> = cleaned.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return None;
    }
    // The last label is the TLD and never a candidate.
    let (_, candidates) = labels.split_last()?;

    let remaining: Vec<String> = candidates
        .iter()
        .skip_while(|label| is_noise_label(label, rules))
        .map(|label| strip_infrastructure_words(label, rules))
        .filter(|label| !label.is_empty())
        .collect();

    let matched = remaining
        .iter()
        .rev()
        .find(|label| label.len() >= rules.min_label_len && !rules.is_generic_suffix(label))
        .map(|label| (label, Confidence::Matched));
    let (label, confidence) = matched.or_else(|| {
        remaining
            .iter()
            .rev()
            .filter(|label| !rules.is_generic_suffix(label))
            .max_by_key(|label| label.len())
            .map(|label| (label, Confidence::Fallback))
    })?;

    Some(ProviderName {
        label: title_case(label),
        hostname: hostname.trim().to_string(),
        confidence,
        rules_version: rules.version,
    })
}

/// Address-looking labels (`123-45-67-89`, `c-73-1-2-3`, `ip10`) and labels made
/// only of infrastructure words.
fn is_noise_label(label: &str, rules: &ProviderRules) -> bool {
    is_numeric_looking(label) || strip_infrastructure_words(label, rules).is_empty()
}

fn is_numeric_looking(label: &str) -> bool {
    let alnum = label.chars().filter(char::is_ascii_alphanumeric).count();
    let digits = label.chars().filter(char::is_ascii_digit).count();
    digits > 0 && digits * 2 >= alnum
}

/// `nat-pool-soyuz` -> `soyuz`; `static-1-2-3` -> empty.
fn strip_infrastructure_words(label: &str, rules: &ProviderRules) -> String {
    label
        .split('-')
        .skip_while(|word| {
            word.is_empty() || rules.is_infrastructure(word) || word.chars().all(|c| c.is_ascii_digit())
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn title_case(label: &str) -> String {
    label
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub async fn resolve_provider(
    fetcher: &dyn Fetcher,
    url: &str,
    rules: &ProviderRules,
) -> Result<ProviderResult, FetchError> {
    let payload: serde_json::Value = match fetcher.get(url).await.and_then(|out| out.ensure_success()) {
        Ok(output) => match output.json() {
            Ok(value) => value,
            Err(err) => {
                engine_error!("Error reading host name payload from {}: {}", url, err);
                return Err(err);
            }
        },
        Err(err) => {
            engine_error!("Error fetching host name from {}: {}", url, err);
            return Err(err);
        }
    };

    let hostname = payload
        .get("hostname")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|name| name.contains('.'));
    let Some(hostname) = hostname else {
        engine_debug!("No usable host name in payload from {}", url);
        return Ok(ProviderResult::Unknown { hostname: None });
    };

    match deduce_provider(hostname, rules) {
        Some(name) => {
            engine_info!(
                "Provider '{}' deduced from {} ({:?}, rules v{})",
                name.label,
                hostname,
                name.confidence,
                name.rules_version
            );
            Ok(ProviderResult::Named(name))
        }
        None => {
            engine_debug!("No provider label in host name {}", hostname);
            Ok(ProviderResult::Unknown {
                hostname: Some(hostname.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label(hostname: &str) -> Option<String> {
        deduce_provider(hostname, &ProviderRules::default()).map(|name| name.label)
    }

    #[test]
    fn strips_numeric_and_pool_labels() {
        let name = deduce_provider("123-45-67-89.nat-pool-soyuz.in.ua", &ProviderRules::default())
            .expect("provider");
        assert_eq!(name.label, "Soyuz");
        assert_eq!(name.confidence, Confidence::Matched);
        assert_eq!(name.hostname, "123-45-67-89.nat-pool-soyuz.in.ua");
    }

    #[test]
    fn picks_registrable_label_over_region_noise() {
        assert_eq!(label("c-73-22-1-9.hsd1.ca.comcast.net").as_deref(), Some("Comcast"));
        assert_eq!(label("pool-71-1-2-3.nycmny.fios.verizon.net").as_deref(), Some("Verizon"));
        assert_eq!(
            label("host-1-2-3-4.static.deutsche-telekom.de").as_deref(),
            Some("Deutsche Telekom")
        );
        assert_eq!(
            label("dsl-203-0-113-5.customers.provider.co.uk").as_deref(),
            Some("Provider")
        );
    }

    #[test]
    fn short_label_is_used_as_fallback() {
        let name = deduce_provider("1-2-3-4.bt.com", &ProviderRules::default());
        // "com" is the TLD; "bt" is short but the only candidate.
        let name = name.expect("fallback");
        assert_eq!(name.label, "Bt");
        assert_eq!(name.confidence, Confidence::Fallback);
    }

    #[test]
    fn never_returns_a_bare_suffix() {
        assert_eq!(label("co.uk"), None);
        assert_eq!(label("1-2-3-4.com.ua"), None);
        assert_eq!(label("static.dynamic.net"), None);
    }

    #[test]
    fn malformed_names_yield_nothing() {
        assert_eq!(label(""), None);
        assert_eq!(label("localhost"), None);
        assert_eq!(label("a..b"), None);
    }

    #[test]
    fn trailing_dot_and_case_are_ignored() {
        assert_eq!(label("Static-1-2-3.Soyuz.IN.UA.").as_deref(), Some("Soyuz"));
    }

    #[test]
    fn deduction_is_idempotent() {
        let rules = ProviderRules::default();
        for host in [
            "123-45-67-89.nat-pool-soyuz.in.ua",
            "c-73-22-1-9.hsd1.ca.comcast.net",
            "1-2-3-4.bt.com",
            "co.uk",
        ] {
            assert_eq!(deduce_provider(host, &rules), deduce_provider(host, &rules));
        }
    }

    #[test]
    fn rules_are_data() {
        let rules = ProviderRules {
            infrastructure_words: vec!["soyuz".into()],
            ..ProviderRules::default()
        };
        // With "soyuz" treated as infrastructure only suffixes are left.
        assert_eq!(deduce_provider("soyuz.in.ua", &rules), None);
        assert_eq!(label("soyuz.in.ua").as_deref(), Some("Soyuz"));
    }
}
