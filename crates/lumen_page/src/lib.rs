//! Lumen Page
//!
//! The behaviour layer of a landing page, wired into a single session:
//!
//! - collapsible navigation menu
//! - scroll-reactive and color-scheme-aware header
//! - count-up stats, staggered card entrances and the quote reveal
//!   (from `lumen_motion`)
//! - line-by-line hero code reveal
//! - click-to-copy code blocks
//! - smooth scrolling to a section below the fixed header
//!
//! # Example
//!
//! ```ignore
//! use lumen_page::{MemoryClipboard, PageConfig, PageEvent, PageRuntime};
//!
//! let mut page = PageRuntime::initialize(
//!     document.clone(),
//!     PageConfig::load("lumen.toml")?,
//!     Box::new(MemoryClipboard::new()),
//!     false,
//! )?;
//!
//! page.dispatch(PageEvent::Scroll { y: 640.0 });
//! while page.advance(clock.now_ms()) {
//!     clock.advance(16.0);
//! }
//! ```

pub mod clipboard;
pub mod config;
pub mod copy;
pub mod error;
pub mod header;
pub mod nav;
pub mod runtime;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, UnavailableClipboard};
pub use config::PageConfig;
pub use copy::{CodeCopy, CopyConfig};
pub use error::{PageError, Result};
pub use header::{HeaderConfig, HeaderStyler};
pub use nav::{NavConfig, NavMenu};
pub use runtime::{Installed, PageEvent, PageRuntime};

/// Set up a page session; shorthand for [`PageRuntime::initialize`]
pub fn initialize(
    document: lumen_core::SharedDocument,
    config: PageConfig,
    clipboard: Box<dyn Clipboard>,
    prefers_dark: bool,
) -> Result<PageRuntime> {
    PageRuntime::initialize(document, config, clipboard, prefers_dark)
}
