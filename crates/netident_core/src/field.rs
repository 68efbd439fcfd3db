use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Report rows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Ipv4,
    Ipv6,
    Location,
    Provider,
    Browser,
    Os,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Ipv4,
        Field::Ipv6,
        Field::Location,
        Field::Provider,
        Field::Browser,
        Field::Os,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Ipv4 => "IPv4",
            Field::Ipv6 => "IPv6",
            Field::Location => "Location",
            Field::Provider => "Provider",
            Field::Browser => "Browser",
            Field::Os => "OS",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}' (expected ipv4, ipv6, location, provider, browser or os)")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::ALL
            .into_iter()
            .find(|field| field.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownField(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn field(self) -> Field {
        match self {
            AddressFamily::V4 => Field::Ipv4,
            AddressFamily::V6 => Field::Ipv6,
        }
    }
}

/// Final outcome of one field's lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Settlement {
    /// A genuine value. `decoration` is rendered in front of the value but is
    /// never part of what gets copied (e.g. a flag glyph).
    Value {
        text: String,
        decoration: Option<String>,
    },
    /// Expected condition shown with informational styling.
    Unavailable { label: String },
    /// Failure shown with error styling.
    Failed { label: String },
}

impl Settlement {
    pub fn value(text: impl Into<String>) -> Self {
        Settlement::Value {
            text: text.into(),
            decoration: None,
        }
    }

    pub fn decorated(text: impl Into<String>, decoration: Option<String>) -> Self {
        Settlement::Value {
            text: text.into(),
            decoration,
        }
    }

    pub fn unavailable(label: impl Into<String>) -> Self {
        Settlement::Unavailable {
            label: label.into(),
        }
    }

    pub fn failed(label: impl Into<String>) -> Self {
        Settlement::Failed {
            label: label.into(),
        }
    }

    /// Text shown after the field label. Empty values read as "N/A".
    pub fn display_value(&self) -> String {
        match self {
            Settlement::Value { text, decoration } => {
                let text = if text.trim().is_empty() { "N/A" } else { text };
                match decoration {
                    Some(glyph) if !glyph.is_empty() => format!("{glyph} {text}"),
                    _ => text.to_string(),
                }
            }
            Settlement::Unavailable { label } | Settlement::Failed { label } => label.clone(),
        }
    }

    /// Raw value for the clipboard, or `None` when this settlement carries
    /// nothing worth copying.
    pub fn copy_value(&self) -> Option<&str> {
        match self {
            Settlement::Value { text, .. } if !is_placeholder(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Settlement::Failed { .. })
    }
}

/// Values that only stand in for missing data.
pub const PLACEHOLDER_VALUES: &[&str] = &[
    "Loading...",
    "Error",
    "Unavailable",
    "Unavailable (DNS)",
    "Could not determine",
    "Unknown",
    "N/A",
];

pub fn is_placeholder(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || PLACEHOLDER_VALUES.iter().any(|p| text.contains(p))
}
