//! Clipboard capability
//!
//! Copying is a side effect the page can't perform on its own; the host
//! supplies a [`Clipboard`] at initialization.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Why a clipboard write failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard access denied")]
    Denied,
}

/// Write access to the system clipboard
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: usize,
    denied: bool,
}

/// In-process clipboard
///
/// Clones share the same contents, so a host or test can keep one copy and
/// inspect what the page wrote through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully written text
    pub fn contents(&self) -> Option<String> {
        self.state.borrow().contents.clone()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Make subsequent writes fail with [`ClipboardError::Denied`]
    pub fn set_denied(&self, denied: bool) {
        self.state.borrow_mut().denied = denied;
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state.borrow_mut();
        if state.denied {
            return Err(ClipboardError::Denied);
        }
        state.contents = Some(text.to_string());
        state.writes += 1;
        Ok(())
    }
}

/// Clipboard for environments without one; every write fails
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable(
            "no clipboard in this environment".to_string(),
        ))
    }
}
