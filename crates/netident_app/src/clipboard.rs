//! Clipboard access behind a trait so copy handling can be tested without a
//! display server.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard init failed: {0}")]
    InitFailed(String),
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via `arboard`, opened on first use.
#[derive(Default)]
pub struct RealClipboard {
    inner: Option<arboard::Clipboard>,
}

impl RealClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|err| ClipboardError::InitFailed(err.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::InitFailed("clipboard not initialized".to_string()))
    }
}

impl ClipboardProvider for RealClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text)
            .map_err(|err| ClipboardError::WriteFailed(err.to_string()))
    }
}
