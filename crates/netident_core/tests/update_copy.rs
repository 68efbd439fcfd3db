use netident_core::{
    classify, update, AddressFamily, AppState, CompatPolicy, CopyAffordance, Effect, Field, Msg,
    Settlement, COPY_ACK_MS,
};

const CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

fn running_with_location(settlement: Settlement) -> AppState {
    let verdict = classify(CHROME, &CompatPolicy::default());
    let (state, _) = update(AppState::new(), Msg::Started { verdict });
    let (state, _) = update(state, Msg::LocationSettled(settlement));
    state
}

#[test]
fn copy_emits_raw_value_without_decoration() {
    let state = running_with_location(Settlement::decorated(
        "Lviv, Ukraine",
        Some("\u{1F1FA}\u{1F1E6}".to_string()),
    ));

    let view = state.view();
    let location = view.field(Field::Location).unwrap();
    assert_eq!(location.text, "Location: \u{1F1FA}\u{1F1E6} Lviv, Ukraine");

    let (_state, effects) = update(state, Msg::CopyClicked { field: Field::Location });
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            field: Field::Location,
            text: "Lviv, Ukraine".to_string(),
        }]
    );
}

#[test]
fn copy_is_refused_for_loading_failed_and_placeholder_values() {
    let state = running_with_location(Settlement::failed("Error"));
    let (state, effects) = update(state, Msg::CopyClicked { field: Field::Location });
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::CopyClicked { field: Field::Ipv4 });
    assert!(effects.is_empty(), "ipv4 is still loading");

    let (state, _) = update(
        state,
        Msg::AddressSettled {
            family: AddressFamily::V6,
            settlement: Settlement::value("Unavailable"),
        },
    );
    let (_state, effects) = update(state, Msg::CopyClicked { field: Field::Ipv6 });
    assert!(effects.is_empty());
}

#[test]
fn acknowledgment_reverts_after_fixed_duration() {
    let state = running_with_location(Settlement::value("Lviv, Ukraine"));
    let (state, _) = update(
        state,
        Msg::CopyCompleted {
            field: Field::Location,
            ok: true,
            now_ms: 10_000,
        },
    );
    assert_eq!(
        state.view().field(Field::Location).unwrap().copy,
        CopyAffordance::Copied
    );
    assert!(state.has_pending_acknowledgment());

    let (state, _) = update(state, Msg::Tick { now_ms: 10_000 + COPY_ACK_MS - 1 });
    assert_eq!(
        state.view().field(Field::Location).unwrap().copy,
        CopyAffordance::Copied
    );

    let (mut state, _) = update(state, Msg::Tick { now_ms: 10_000 + COPY_ACK_MS });
    assert!(state.consume_dirty());
    assert_eq!(
        state.view().field(Field::Location).unwrap().copy,
        CopyAffordance::Ready
    );
    assert!(!state.has_pending_acknowledgment());
}

#[test]
fn failed_copy_shows_no_acknowledgment() {
    let state = running_with_location(Settlement::value("Lviv, Ukraine"));
    let (state, _) = update(
        state,
        Msg::CopyCompleted {
            field: Field::Location,
            ok: false,
            now_ms: 5,
        },
    );
    assert_eq!(
        state.view().field(Field::Location).unwrap().copy,
        CopyAffordance::Ready
    );
}
