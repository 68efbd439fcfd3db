use crate::view_model::COPY_ACK_MS;
use crate::{AppState, Effect, Field, LookupKind, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started { verdict } => {
            // The gate runs before anything touches the network.
            if state.start(verdict) {
                LookupKind::ALL.into_iter().map(Effect::Lookup).collect()
            } else {
                Vec::new()
            }
        }
        Msg::AddressSettled { family, settlement } => {
            state.settle(family.field(), settlement);
            Vec::new()
        }
        Msg::LocationSettled(settlement) => {
            state.settle(Field::Location, settlement);
            Vec::new()
        }
        Msg::ProviderSettled(settlement) => {
            state.settle(Field::Provider, settlement);
            Vec::new()
        }
        Msg::DeviceSettled { browser, os } => {
            state.settle(Field::Browser, browser);
            state.settle(Field::Os, os);
            Vec::new()
        }
        Msg::CopyClicked { field } => match state.copy_value(field) {
            Some(text) => vec![Effect::CopyToClipboard { field, text }],
            None => Vec::new(),
        },
        Msg::CopyCompleted { field, ok, now_ms } => {
            if ok {
                state.mark_copied(field, now_ms.saturating_add(COPY_ACK_MS));
            }
            Vec::new()
        }
        Msg::Tick { now_ms } => {
            state.expire_copies(now_ms);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
