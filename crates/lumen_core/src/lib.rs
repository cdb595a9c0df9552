//! Lumen Core
//!
//! Foundational types shared by every Lumen crate:
//!
//! - **Geometry**: points, sizes, rectangles and viewport margins
//! - **Color**: CSS-compatible colors with parsing and formatting
//! - **Inline Styles**: opacity, translate transforms, transitions, shadows
//! - **Document**: the page element tree the behaviour layer mutates
//! - **Selectors**: a small CSS selector subset for locating elements
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{Document, ElementSpec, Rect};
//!
//! let mut doc = Document::new(1280.0, 800.0);
//! let root = doc.root();
//! let stat = doc.append(
//!     root,
//!     ElementSpec::new("div")
//!         .class("stat-number")
//!         .text("98.5%")
//!         .bounds(Rect::new(0.0, 900.0, 200.0, 60.0)),
//! );
//!
//! assert_eq!(doc.query_all(".stat-number").unwrap(), vec![stat]);
//! assert_eq!(doc.text(stat), Some("98.5%"));
//! ```

pub mod color;
mod css;
pub mod document;
pub mod error;
pub mod geometry;
pub mod selector;
pub mod style;

pub use color::Color;
pub use document::{
    Document, Element, ElementId, ElementSpec, ScrollBehavior, ScrollRequest, SharedDocument,
    Viewport,
};
pub use error::{CoreError, Result};
pub use geometry::{Margin, Point, Rect, Size};
pub use selector::{Selector, SelectorList};
pub use style::{Cursor, InlineStyle, Shadow, Transition, TransitionProperty, Translate};
