//! Page document model
//!
//! A minimal element tree standing in for the rendered page. The host owns
//! layout and pushes element bounds in document coordinates; the behaviour
//! layer reads those bounds, queries elements with selectors, and writes text,
//! classes and inline styles.
//!
//! Removed elements disappear from the slot map, so any lookup through a stale
//! [`ElementId`] yields `None` rather than an error.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{CoreError, Result};
use crate::geometry::Rect;
use crate::selector::SelectorList;
use crate::style::InlineStyle;

new_key_type! {
    /// Handle to an element in a [`Document`]
    pub struct ElementId;
}

/// Shared, single-threaded document handle
///
/// Everything in a page session runs on one event loop, so interior
/// mutability through `RefCell` is enough.
pub type SharedDocument = Rc<RefCell<Document>>;

/// A page element
#[derive(Clone, Debug)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 4]>,
    attributes: FxHashMap<String, String>,
    text: String,
    style: InlineStyle,
    bounds: Option<Rect>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text owned directly by this element (children excluded)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    /// Layout bounds, `None` until the host has laid the element out
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// Builder describing an element to insert
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 4]>,
    attributes: FxHashMap<String, String>,
    text: String,
    bounds: Option<Rect>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Scroll animation behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump immediately
    #[default]
    Auto,
    /// Host animates toward the target
    Smooth,
}

/// A scroll the host has been asked to perform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRequest {
    pub top: f32,
    pub behavior: ScrollBehavior,
}

/// The visible window onto the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Visible region in document coordinates
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }
}

/// The page element tree plus viewport state
#[derive(Debug)]
pub struct Document {
    elements: SlotMap<ElementId, Element>,
    root: ElementId,
    viewport: Viewport,
    selection: Option<ElementId>,
    pending_scroll: Option<ScrollRequest>,
}

impl Document {
    /// Create an empty document with a `body` root and the given viewport size
    pub fn new(width: f32, height: f32) -> Self {
        let mut elements = SlotMap::with_key();
        let root = elements.insert(Element {
            tag: "body".to_string(),
            id: None,
            classes: SmallVec::new(),
            attributes: FxHashMap::default(),
            text: String::new(),
            style: InlineStyle::default(),
            bounds: Some(Rect::new(0.0, 0.0, width, height)),
            parent: None,
            children: Vec::new(),
        });

        Self {
            elements,
            root,
            viewport: Viewport {
                scroll_y: 0.0,
                width,
                height,
            },
            selection: None,
            pending_scroll: None,
        }
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() <= 1
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    /// Append a new element as the last child of `parent`
    ///
    /// Appending to a removed parent attaches the element to the root instead.
    pub fn append(&mut self, parent: ElementId, spec: ElementSpec) -> ElementId {
        let parent = if self.elements.contains_key(parent) {
            parent
        } else {
            tracing::debug!("append: parent no longer exists, attaching to root");
            self.root
        };

        let id = self.elements.insert(Element {
            tag: spec.tag,
            id: spec.id,
            classes: spec.classes,
            attributes: spec.attributes,
            text: spec.text,
            style: InlineStyle::default(),
            bounds: spec.bounds,
            parent: Some(parent),
            children: Vec::new(),
        });

        if let Some(parent) = self.elements.get_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    /// Remove an element and its whole subtree
    pub fn remove(&mut self, id: ElementId) -> Result<()> {
        if id == self.root {
            return Err(CoreError::UnknownElement);
        }
        let parent = self
            .elements
            .get(id)
            .ok_or(CoreError::UnknownElement)?
            .parent;

        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(element) = self.elements.remove(next) {
                stack.extend(element.children);
            }
            if self.selection == Some(next) {
                self.selection = None;
            }
        }
        Ok(())
    }

    /// Remove every child of an element
    pub fn clear_children(&mut self, id: ElementId) {
        let children = match self.elements.get(id) {
            Some(element) => element.children.clone(),
            None => return,
        };
        for child in children {
            let _ = self.remove(child);
        }
    }

    // =========================================================================
    // Element access
    // =========================================================================

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    /// Own text followed by every descendant's text, in document order
    pub fn text_content(&self, id: ElementId) -> Option<String> {
        let element = self.elements.get(id)?;
        let mut out = element.text.clone();
        for child in &element.children {
            if let Some(text) = self.text_content(*child) {
                out.push_str(&text);
            }
        }
        Some(out)
    }

    /// Replace an element's content with plain text (children are removed)
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if !self.elements.contains_key(id) {
            return;
        }
        self.clear_children(id);
        if let Some(element) = self.elements.get_mut(id) {
            element.text = text.into();
        }
    }

    pub fn style(&self, id: ElementId) -> Option<&InlineStyle> {
        self.elements.get(id).map(|e| &e.style)
    }

    pub fn style_mut(&mut self, id: ElementId) -> Option<&mut InlineStyle> {
        self.elements.get_mut(id).map(|e| &mut e.style)
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.attribute(name))
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.elements.get_mut(id) {
            element.attributes.insert(name.to_string(), value.into());
        }
    }

    /// Layout bounds of a live element that has been laid out
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(id).and_then(|e| e.bounds)
    }

    /// Update layout bounds (document coordinates)
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(element) = self.elements.get_mut(id) {
            element.bounds = Some(bounds);
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(id)
            .map(|e| e.has_class(class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.elements.contains_key(id)
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First element matching the selector in document order
    pub fn query(&self, selector: &str) -> Result<Option<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.descendants_inclusive(self.root).find(|id| self.matches(*id, &list)))
    }

    /// Every element matching the selector in document order
    pub fn query_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants_inclusive(self.root)
            .filter(|id| self.matches(*id, &list))
            .collect())
    }

    /// First strict descendant of `scope` matching the selector
    pub fn query_within(&self, scope: ElementId, selector: &str) -> Result<Option<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants_inclusive(scope)
            .skip(1)
            .find(|id| self.matches(*id, &list)))
    }

    /// Nearest inclusive ancestor matching the selector
    pub fn closest(&self, id: ElementId, selector: &str) -> Result<Option<ElementId>> {
        let list = SelectorList::parse(selector)?;
        let mut current = Some(id);
        while let Some(next) = current {
            let Some(element) = self.elements.get(next) else {
                return Ok(None);
            };
            if list.matches(element) {
                return Ok(Some(next));
            }
            current = element.parent;
        }
        Ok(None)
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            if next == ancestor {
                return true;
            }
            current = self.elements.get(next).and_then(|e| e.parent);
        }
        false
    }

    /// Element carrying the given `id` attribute
    pub fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants_inclusive(self.root)
            .find(|el| self.elements.get(*el).and_then(|e| e.id()) == Some(id))
    }

    fn matches(&self, id: ElementId, list: &SelectorList) -> bool {
        self.elements
            .get(id)
            .map(|e| list.matches(e))
            .unwrap_or(false)
    }

    /// Pre-order traversal starting at (and including) `start`
    pub fn descendants_inclusive(&self, start: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack = if self.elements.contains_key(start) {
            vec![start]
        } else {
            Vec::new()
        };
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            if let Some(element) = self.elements.get(next) {
                stack.extend(element.children.iter().rev().copied());
            }
            Some(next)
        })
    }

    // =========================================================================
    // Viewport, selection and scrolling
    // =========================================================================

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        self.viewport.scroll_y = scroll_y.max(0.0);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
    }

    /// Select the full contents of an element (replaces any prior selection)
    pub fn select_contents(&mut self, id: ElementId) {
        if self.elements.contains_key(id) {
            self.selection = Some(id);
        }
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    /// Ask the host to scroll the viewport so `top` is at the top edge
    ///
    /// `Auto` scrolls apply immediately; `Smooth` scrolls are left for the
    /// host to animate and only recorded.
    pub fn scroll_to(&mut self, top: f32, behavior: ScrollBehavior) {
        let top = top.max(0.0);
        if behavior == ScrollBehavior::Auto {
            self.viewport.scroll_y = top;
        }
        self.pending_scroll = Some(ScrollRequest { top, behavior });
    }

    /// Take the most recent scroll request, clearing it
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.pending_scroll.take()
    }
}
