//! Page fixtures for headless simulation
//!
//! A fixture is a JSON description of a laid-out page plus a timed script of
//! user input:
//!
//! ```json
//! {
//!   "viewport": { "width": 1280, "height": 800 },
//!   "elements": [
//!     { "tag": "span", "class": ["stat-number"], "text": "1,234", "bounds": [0, 1200, 200, 60] }
//!   ],
//!   "script": [
//!     { "at": 100, "action": "scroll", "y": 1000 },
//!     { "at": 2500, "action": "click", "target": ".hamburger" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use lumen_core::{Document, ElementId, ElementSpec, Rect};

#[derive(Debug, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub viewport: ViewportSpec,
    #[serde(default)]
    pub prefers_dark: bool,
    pub elements: Vec<ElementNode>,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Deserialize)]
pub struct ViewportSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class: Vec<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    /// `[x, y, width, height]` in document coordinates
    #[serde(default)]
    pub bounds: Option<[f32; 4]>,
    #[serde(default)]
    pub children: Vec<ElementNode>,
}

/// One scripted input, applied on the first simulation step at or after `at`
#[derive(Clone, Debug, Deserialize)]
pub struct ScriptStep {
    pub at: f64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Scroll { y: f32 },
    Resize { width: f32, height: f32 },
    /// Click the first element matching a selector
    Click { target: String },
    Key { key: String },
    ColorScheme { prefers_dark: bool },
    ScrollToSection { id: String },
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid fixture {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut fixture: Fixture = serde_json::from_str(text)?;
        // Stable sort keeps same-time steps in file order
        fixture.script.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(fixture)
    }

    pub fn build_document(&self) -> Document {
        let mut doc = Document::new(self.viewport.width, self.viewport.height);
        let root = doc.root();
        for node in &self.elements {
            append_node(&mut doc, root, node);
        }
        doc
    }
}

fn append_node(doc: &mut Document, parent: ElementId, node: &ElementNode) -> ElementId {
    let mut spec = ElementSpec::new(node.tag.as_str());
    if let Some(id) = &node.id {
        spec = spec.id(id.as_str());
    }
    for class in &node.class {
        spec = spec.class(class.as_str());
    }
    for (name, value) in &node.attrs {
        spec = spec.attr(name.as_str(), value.as_str());
    }
    if let Some(text) = &node.text {
        spec = spec.text(text.as_str());
    }
    if let Some([x, y, width, height]) = node.bounds {
        spec = spec.bounds(Rect::new(x, y, width, height));
    }

    let id = doc.append(parent, spec);
    for child in &node.children {
        append_node(doc, id, child);
    }
    id
}
