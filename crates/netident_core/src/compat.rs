//! Browser compatibility gate.
//!
//! The user-agent is reduced to a browser family with a small ordered token
//! table, then checked against an allow-list and a deny-list. Browsers on
//! neither list are let through.

use serde::{Deserialize, Serialize};

/// Ordered `(token, family)` table. The first token found in the user-agent wins,
/// so wrapped and derived browsers must precede the engines they embed.
const BROWSER_TOKENS: &[(&str, &str)] = &[
    ("EdgiOS/", "Edge iOS"),
    ("EdgA/", "Edge"),
    ("Edg/", "Edge"),
    ("Edge/", "Edge"),
    ("OPR/", "Opera"),
    ("Opera/", "Opera"),
    ("Vivaldi/", "Vivaldi"),
    ("Brave/", "Brave"),
    ("SamsungBrowser/", "Samsung Internet"),
    ("CriOS/", "Chrome iOS"),
    ("FxiOS/", "Firefox iOS"),
    ("Firefox/", "Firefox"),
    ("Chromium/", "Chromium"),
    ("Chrome/", "Chrome"),
];

const UNKNOWN_FAMILY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedBrowser {
    pub family: String,
    pub version: Option<String>,
}

impl DetectedBrowser {
    pub fn unknown() -> Self {
        Self {
            family: UNKNOWN_FAMILY.to_string(),
            version: None,
        }
    }

    pub fn describe(&self) -> String {
        format!("{} {}", self.family, self.version.as_deref().unwrap_or(""))
            .trim()
            .to_string()
    }
}

pub fn detect_browser(user_agent: &str) -> DetectedBrowser {
    for (token, family) in BROWSER_TOKENS {
        if let Some(version) = version_after(user_agent, token) {
            return DetectedBrowser {
                family: (*family).to_string(),
                version,
            };
        }
    }

    if user_agent.contains("Safari/") {
        let family = if user_agent.contains("Mobile") {
            "Mobile Safari"
        } else {
            "Safari"
        };
        return DetectedBrowser {
            family: family.to_string(),
            version: version_after(user_agent, "Version/").flatten(),
        };
    }

    DetectedBrowser::unknown()
}

/// `None` when the token is absent, `Some(None)` when it is present without a version.
fn version_after(user_agent: &str, token: &str) -> Option<Option<String>> {
    let start = user_agent.find(token)? + token.len();
    let version: String = user_agent[start..]
        .chars()
        .take_while(|c| !c.is_whitespace() && !matches!(*c, ';' | ')' | '('))
        .collect();
    Some((!version.is_empty()).then_some(version))
}

/// Allow/deny policy, matched case-insensitively as substrings of the family name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatPolicy {
    pub allow: Vec<String>,
    /// Families that match `allow` but must not count as allow-listed.
    pub allow_except: Vec<String>,
    pub deny: Vec<String>,
}

impl Default for CompatPolicy {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            allow: owned(&[
                "chrome", "chromium", "edge", "opera", "brave", "vivaldi", "samsung",
            ]),
            allow_except: owned(&["chrome ios", "edge ios"]),
            deny: owned(&["safari", "firefox", "fxios"]),
        }
    }
}

impl CompatPolicy {
    pub fn is_allowed(&self, family: &str) -> bool {
        let family = family.to_lowercase();
        matches_any(&family, &self.allow) && !matches_any(&family, &self.allow_except)
    }

    pub fn is_denied(&self, family: &str) -> bool {
        matches_any(&family.to_lowercase(), &self.deny)
    }
}

fn matches_any(family: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .map(|p| p.trim().to_lowercase())
        .any(|p| !p.is_empty() && family.contains(&p))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityNotice {
    pub heading: String,
    pub lines: Vec<String>,
    pub detected: String,
}

impl CompatibilityNotice {
    pub fn for_browser(browser: &DetectedBrowser) -> Self {
        let family = if browser.family.is_empty() {
            UNKNOWN_FAMILY
        } else {
            browser.family.as_str()
        };
        let detected = format!(
            "Detected browser: {} {}",
            family,
            browser.version.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string();
        Self {
            heading: "Compatibility Notice".to_string(),
            lines: vec![
                "This report is tuned for modern Chromium-based browsers (such as Google Chrome, Microsoft Edge, Opera, Brave).".to_string(),
                "For the best experience, please switch to one of these browsers.".to_string(),
            ],
            detected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Supported { browser: DetectedBrowser },
    /// Neither allow- nor deny-listed: permitted.
    Unlisted { browser: DetectedBrowser },
    Blocked { notice: CompatibilityNotice },
}

impl Verdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Blocked { .. })
    }
}

pub fn classify(user_agent: &str, policy: &CompatPolicy) -> Verdict {
    let browser = detect_browser(user_agent);
    if policy.is_allowed(&browser.family) {
        return Verdict::Supported { browser };
    }
    if policy.is_denied(&browser.family) {
        return Verdict::Blocked {
            notice: CompatibilityNotice::for_browser(&browser),
        };
    }
    Verdict::Unlisted { browser }
}
