//! Netident core: pure state machine, compatibility gate and view-model helpers.
mod compat;
mod effect;
mod field;
mod msg;
mod state;
mod update;
mod view_model;

pub use compat::{
    classify, detect_browser, CompatPolicy, CompatibilityNotice, DetectedBrowser, Verdict,
};
pub use effect::{Effect, LookupKind};
pub use field::{is_placeholder, AddressFamily, Field, Settlement, UnknownField, PLACEHOLDER_VALUES};
pub use msg::Msg;
pub use state::{AppState, FieldStatus, SessionPhase};
pub use update::update;
pub use view_model::{AppViewModel, CopyAffordance, FieldView, Visual, COPY_ACK_MS};
