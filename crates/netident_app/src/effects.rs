use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use netident_core::{AddressFamily, Effect, Field, LookupKind, Msg, Settlement};
use netident_engine::{
    AddressResult, DeviceError, EngineConfig, EngineError, EngineEvent, EngineHandle, IpFamily,
    LookupJob, ProviderResult,
};

use crate::clipboard::ClipboardProvider;

/// Carries effects out: lookups go to the engine, clipboard writes happen
/// here and are answered with a `CopyCompleted` message.
pub struct EffectRunner {
    engine: EngineHandle,
    clipboard: Box<dyn ClipboardProvider>,
}

impl EffectRunner {
    pub fn new(
        config: EngineConfig,
        clipboard: Box<dyn ClipboardProvider>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config)?;
        Ok(Self { engine, clipboard })
    }

    /// Runs `effects`, returning messages that are already known.
    pub fn enqueue(&mut self, effects: Vec<Effect>, now_ms: u64) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::Lookup(kind) => {
                    if let Err(err) = self.engine.enqueue(map_lookup(kind)) {
                        engine_warn!("{}", err);
                        follow_up.push(lookup_not_launched(kind));
                    }
                }
                Effect::CopyToClipboard { field, text } => {
                    follow_up.push(copy_to_clipboard(self.clipboard.as_mut(), field, &text, now_ms));
                }
            }
        }
        follow_up
    }

    /// Waits up to `wait` for the next finished lookup.
    pub fn next_msg(&self, wait: Duration) -> Option<Msg> {
        self.engine.recv_timeout(wait).map(map_event)
    }
}

pub fn copy_to_clipboard(
    clipboard: &mut dyn ClipboardProvider,
    field: Field,
    text: &str,
    now_ms: u64,
) -> Msg {
    let ok = match clipboard.set_text(text) {
        Ok(()) => {
            engine_info!("Copied {} to clipboard", field);
            true
        }
        Err(err) => {
            engine_warn!("Failed to copy {}: {}", field, err);
            false
        }
    };
    Msg::CopyCompleted { field, ok, now_ms }
}

/// Settles the fields of a lookup the engine refused, so nothing waits on it.
fn lookup_not_launched(kind: LookupKind) -> Msg {
    match kind {
        LookupKind::Ipv4 => Msg::AddressSettled {
            family: AddressFamily::V4,
            settlement: Settlement::failed("Could not determine"),
        },
        LookupKind::Ipv6 => Msg::AddressSettled {
            family: AddressFamily::V6,
            settlement: Settlement::failed("Unavailable"),
        },
        LookupKind::Geolocation => Msg::LocationSettled(Settlement::failed("Error")),
        LookupKind::Provider => Msg::ProviderSettled(Settlement::failed("Error")),
        LookupKind::Device => Msg::DeviceSettled {
            browser: Settlement::failed("Error"),
            os: Settlement::failed("Error"),
        },
    }
}

fn map_lookup(kind: LookupKind) -> LookupJob {
    match kind {
        LookupKind::Ipv4 => LookupJob::Ipv4,
        LookupKind::Ipv6 => LookupJob::Ipv6,
        LookupKind::Geolocation => LookupJob::Geolocation,
        LookupKind::Provider => LookupJob::Provider,
        LookupKind::Device => LookupJob::Device,
    }
}

fn map_family(family: IpFamily) -> AddressFamily {
    match family {
        IpFamily::V4 => AddressFamily::V4,
        IpFamily::V6 => AddressFamily::V6,
    }
}

/// Turns an engine result into the settlement shown for its field.
pub fn map_event(event: EngineEvent) -> Msg {
    engine_debug!("Engine event: {:?}", event);
    match event {
        EngineEvent::AddressResolved { family, result } => {
            let settlement = match (family, result) {
                (_, AddressResult::Found(address)) => Settlement::value(address),
                (_, AddressResult::DnsUnavailable) => Settlement::unavailable("Unavailable (DNS)"),
                (IpFamily::V4, AddressResult::Failed(_)) => Settlement::failed("Could not determine"),
                (IpFamily::V6, AddressResult::Failed(_)) => Settlement::failed("Unavailable"),
            };
            Msg::AddressSettled {
                family: map_family(family),
                settlement,
            }
        }
        EngineEvent::LocationResolved(Ok(location)) => {
            Msg::LocationSettled(Settlement::decorated(location.display(), location.flag))
        }
        EngineEvent::LocationResolved(Err(_)) => Msg::LocationSettled(Settlement::failed("Error")),
        EngineEvent::ProviderResolved(Ok(ProviderResult::Named(name))) => {
            Msg::ProviderSettled(Settlement::value(name.label))
        }
        EngineEvent::ProviderResolved(Ok(ProviderResult::Unknown { .. })) => {
            Msg::ProviderSettled(Settlement::value("N/A"))
        }
        EngineEvent::ProviderResolved(Err(_)) => Msg::ProviderSettled(Settlement::failed("Error")),
        EngineEvent::DeviceIdentified(Ok(identity)) => Msg::DeviceSettled {
            browser: Settlement::value(identity.browser_display()),
            os: Settlement::value(identity.os_display()),
        },
        EngineEvent::DeviceIdentified(Err(DeviceError::ParserUnavailable)) => Msg::DeviceSettled {
            browser: Settlement::failed("Error (Lib missing)"),
            os: Settlement::failed("Error (Lib missing)"),
        },
    }
}
