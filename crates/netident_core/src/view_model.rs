use serde::Serialize;

use crate::state::FieldStatus;
use crate::{CompatibilityNotice, DetectedBrowser, Field, SessionPhase, Settlement};

/// How long the "copied" acknowledgment stays visible.
pub const COPY_ACK_MS: u64 = 1_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visual {
    Idle,
    Loading,
    Settled,
    /// Expected missing data; not styled as an error.
    Informational,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyAffordance {
    Disabled,
    Ready,
    Copied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub field: Field,
    pub label: &'static str,
    pub text: String,
    pub visual: Visual,
    pub copy: CopyAffordance,
    pub copy_value: Option<String>,
}

impl FieldView {
    pub(crate) fn build(field: Field, status: &FieldStatus, copied: bool) -> Self {
        let label = field.label();
        let (value, visual, copy_value) = match status {
            FieldStatus::Idle => (String::new(), Visual::Idle, None),
            FieldStatus::Loading => ("Loading...".to_string(), Visual::Loading, None),
            FieldStatus::Settled(settlement) => {
                let visual = match settlement {
                    Settlement::Value { .. } => Visual::Settled,
                    Settlement::Unavailable { .. } => Visual::Informational,
                    Settlement::Failed { .. } => Visual::Error,
                };
                (
                    settlement.display_value(),
                    visual,
                    settlement.copy_value().map(ToOwned::to_owned),
                )
            }
        };
        let copy = match (&copy_value, copied) {
            (None, _) => CopyAffordance::Disabled,
            (Some(_), true) => CopyAffordance::Copied,
            (Some(_), false) => CopyAffordance::Ready,
        };
        let text = if value.is_empty() {
            format!("{label}:")
        } else {
            format!("{label}: {value}")
        };

        Self {
            field,
            label,
            text,
            visual,
            copy,
            copy_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AppViewModel {
    pub phase: SessionPhase,
    pub notice: Option<CompatibilityNotice>,
    pub detected_browser: Option<DetectedBrowser>,
    pub fields: Vec<FieldView>,
    pub all_settled: bool,
    #[serde(skip)]
    pub dirty: bool,
}

impl AppViewModel {
    pub fn field(&self, field: Field) -> Option<&FieldView> {
        self.fields.iter().find(|view| view.field == field)
    }
}
