use netident_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn settlement_before_start_is_ignored() {
    let state = AppState::new();
    let (mut next, effects) = update(
        state,
        Msg::LocationSettled(netident_core::Settlement::value("Oslo, Norway")),
    );

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(
        next.field_status(netident_core::Field::Location),
        netident_core::FieldStatus::Idle
    );
}
