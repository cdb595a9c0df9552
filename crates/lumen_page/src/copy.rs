//! Click-to-copy code blocks
//!
//! Clicking a code block copies its text. On success the block briefly shows
//! an acknowledgment label with a highlight and is then restored; a failed
//! copy is only logged.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use lumen_animation::SchedulerHandle;
use lumen_core::{Color, Cursor, ElementId, SharedDocument};

use crate::clipboard::Clipboard;

/// The `[copy]` section of the page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub selector: String,
    /// Text shown in place of the code while the copy is acknowledged
    pub copied_label: String,
    /// Tooltip set on every block
    pub hint: String,
    pub highlight_background: Color,
    pub highlight_color: Color,
    pub restore_after_ms: u32,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            selector: "code".to_string(),
            copied_label: "✅ Copied!".to_string(),
            hint: "Click to copy".to_string(),
            highlight_background: Color::from_hex(0x10b981),
            highlight_color: Color::WHITE,
            restore_after_ms: 1000,
        }
    }
}

/// Copy behaviour for every code block on the page
pub struct CodeCopy {
    document: SharedDocument,
    scheduler: SchedulerHandle,
    blocks: Vec<ElementId>,
    /// Blocks currently showing the acknowledgment label
    acknowledging: Rc<RefCell<FxHashSet<ElementId>>>,
    config: CopyConfig,
}

impl CodeCopy {
    /// Mark every matching block as clickable
    pub fn install(
        document: SharedDocument,
        scheduler: SchedulerHandle,
        config: &CopyConfig,
    ) -> lumen_core::Result<Self> {
        let blocks = {
            let mut doc = document.borrow_mut();
            let blocks = doc.query_all(&config.selector)?;
            for id in &blocks {
                if let Some(style) = doc.style_mut(*id) {
                    style.cursor = Some(Cursor::Pointer);
                }
                doc.set_attribute(*id, "title", config.hint.clone());
            }
            blocks
        };
        tracing::debug!("CodeCopy: {} code blocks", blocks.len());

        Ok(Self {
            document,
            scheduler,
            blocks,
            acknowledging: Rc::new(RefCell::new(FxHashSet::default())),
            config: config.clone(),
        })
    }

    pub fn blocks(&self) -> &[ElementId] {
        &self.blocks
    }

    pub fn is_acknowledging(&self, block: ElementId) -> bool {
        self.acknowledging.borrow().contains(&block)
    }

    /// Innermost registered block containing `target`
    fn block_for(&self, target: ElementId) -> Option<ElementId> {
        let doc = self.document.borrow();
        let found = doc.closest(target, &self.config.selector).ok().flatten()?;
        self.blocks.contains(&found).then_some(found)
    }

    /// Handle a click; returns true if text was copied
    pub fn handle_click(&self, clipboard: &mut dyn Clipboard, target: ElementId) -> bool {
        let Some(block) = self.block_for(target) else {
            return false;
        };
        if self.is_acknowledging(block) {
            tracing::debug!("copy {:?}: acknowledgment showing, click ignored", block);
            return false;
        }

        let original = {
            let mut doc = self.document.borrow_mut();
            doc.select_contents(block);
            doc.text_content(block).unwrap_or_default()
        };

        if let Err(err) = clipboard.write_text(&original) {
            tracing::warn!("copy {:?}: {}", block, err);
            return false;
        }
        tracing::debug!("copy {:?}: {} bytes copied", block, original.len());

        {
            let mut doc = self.document.borrow_mut();
            doc.set_text(block, self.config.copied_label.clone());
            if let Some(style) = doc.style_mut(block) {
                style.background = Some(self.config.highlight_background);
                style.color = Some(self.config.highlight_color);
            }
        }
        self.acknowledging.borrow_mut().insert(block);

        let document = self.document.clone();
        let acknowledging = self.acknowledging.clone();
        let restore = move |_now: f64| {
            let mut doc = document.borrow_mut();
            doc.set_text(block, original);
            if let Some(style) = doc.style_mut(block) {
                style.background = None;
                style.color = None;
            }
            acknowledging.borrow_mut().remove(&block);
        };
        if self
            .scheduler
            .schedule(self.config.restore_after_ms as f64, restore)
            .is_none()
        {
            tracing::warn!("copy {:?}: scheduler gone, label will not be restored", block);
        }
        true
    }
}
