use std::collections::BTreeMap;

use serde::Serialize;

use crate::view_model::{AppViewModel, FieldView};
use crate::{Field, Settlement, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Compatibility gate refused the browser; nothing was launched.
    Blocked,
    Running,
    /// Every field has settled.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldStatus {
    #[default]
    Idle,
    Loading,
    Settled(Settlement),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FieldState {
    status: FieldStatus,
    copied_until: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    verdict: Option<Verdict>,
    fields: BTreeMap<Field, FieldState>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.verdict {
            None => SessionPhase::Idle,
            Some(verdict) if verdict.is_blocked() => SessionPhase::Blocked,
            Some(_) if self.all_settled() => SessionPhase::Complete,
            Some(_) => SessionPhase::Running,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn field_status(&self, field: Field) -> FieldStatus {
        self.fields
            .get(&field)
            .map(|state| state.status.clone())
            .unwrap_or_default()
    }

    pub fn all_settled(&self) -> bool {
        Field::ALL.iter().all(|field| {
            matches!(
                self.fields.get(field).map(|s| &s.status),
                Some(FieldStatus::Settled(_))
            )
        })
    }

    pub fn view(&self) -> AppViewModel {
        let notice = match &self.verdict {
            Some(Verdict::Blocked { notice }) => Some(notice.clone()),
            _ => None,
        };
        let browser = match &self.verdict {
            Some(Verdict::Supported { browser } | Verdict::Unlisted { browser }) => {
                Some(browser.clone())
            }
            _ => None,
        };
        let fields = if notice.is_some() {
            Vec::new()
        } else {
            Field::ALL
                .iter()
                .map(|field| {
                    let state = self.fields.get(field).cloned().unwrap_or_default();
                    FieldView::build(*field, &state.status, state.copied_until.is_some())
                })
                .collect()
        };

        AppViewModel {
            phase: self.phase(),
            notice,
            detected_browser: browser,
            fields,
            all_settled: self.all_settled(),
            dirty: self.dirty,
        }
    }

    /// Records the verdict. Returns true when lookups should be launched.
    pub(crate) fn start(&mut self, verdict: Verdict) -> bool {
        if self.verdict.is_some() {
            return false;
        }
        let launch = !verdict.is_blocked();
        self.verdict = Some(verdict);
        if launch {
            for field in Field::ALL {
                self.fields.entry(field).or_default().status = FieldStatus::Loading;
            }
        }
        self.mark_dirty();
        launch
    }

    /// Settles a loading field. Fields settle once; later settlements are dropped.
    pub(crate) fn settle(&mut self, field: Field, settlement: Settlement) -> bool {
        let Some(state) = self.fields.get_mut(&field) else {
            return false;
        };
        if state.status != FieldStatus::Loading {
            return false;
        }
        state.status = FieldStatus::Settled(settlement);
        self.mark_dirty();
        true
    }

    pub(crate) fn copy_value(&self, field: Field) -> Option<String> {
        if self.phase() == SessionPhase::Blocked {
            return None;
        }
        match &self.fields.get(&field)?.status {
            FieldStatus::Settled(settlement) => settlement.copy_value().map(ToOwned::to_owned),
            FieldStatus::Idle | FieldStatus::Loading => None,
        }
    }

    pub(crate) fn mark_copied(&mut self, field: Field, until_ms: u64) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.copied_until = Some(until_ms);
            self.mark_dirty();
        }
    }

    /// Drops acknowledgments whose deadline has passed.
    pub(crate) fn expire_copies(&mut self, now_ms: u64) {
        let mut changed = false;
        for state in self.fields.values_mut() {
            if state.copied_until.is_some_and(|until| now_ms >= until) {
                state.copied_until = None;
                changed = true;
            }
        }
        if changed {
            self.mark_dirty();
        }
    }

    pub fn has_pending_acknowledgment(&self) -> bool {
        self.fields.values().any(|state| state.copied_until.is_some())
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
