use crate::{AddressFamily, Field, Settlement, Verdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Compatibility verdict for this session; launches the lookups unless blocked.
    Started { verdict: Verdict },
    /// Public address lookup settled.
    AddressSettled {
        family: AddressFamily,
        settlement: Settlement,
    },
    /// Geolocation lookup settled.
    LocationSettled(Settlement),
    /// Reverse-DNS provider lookup settled.
    ProviderSettled(Settlement),
    /// Device identification settled; browser and OS always settle together.
    DeviceSettled { browser: Settlement, os: Settlement },
    /// User asked to copy a field's value.
    CopyClicked { field: Field },
    /// Clipboard write finished.
    CopyCompleted { field: Field, ok: bool, now_ms: u64 },
    /// Clock tick used to expire copy acknowledgments.
    Tick { now_ms: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
