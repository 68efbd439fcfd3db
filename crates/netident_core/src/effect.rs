use serde::Serialize;

use crate::Field;

/// Independent lookups launched once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LookupKind {
    Ipv4,
    Ipv6,
    Geolocation,
    Provider,
    Device,
}

impl LookupKind {
    pub const ALL: [LookupKind; 5] = [
        LookupKind::Ipv4,
        LookupKind::Ipv6,
        LookupKind::Geolocation,
        LookupKind::Provider,
        LookupKind::Device,
    ];

    /// Report rows filled by this lookup.
    pub fn fields(self) -> &'static [Field] {
        match self {
            LookupKind::Ipv4 => &[Field::Ipv4],
            LookupKind::Ipv6 => &[Field::Ipv6],
            LookupKind::Geolocation => &[Field::Location],
            LookupKind::Provider => &[Field::Provider],
            LookupKind::Device => &[Field::Browser, Field::Os],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Lookup(LookupKind),
    CopyToClipboard { field: Field, text: String },
}
