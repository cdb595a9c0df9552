//! Scroll-reactive and color-scheme-aware header styling

use serde::{Deserialize, Serialize};

use lumen_core::{Color, Document, ElementId, Shadow};

/// The `[header]` section of the page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub selector: String,
    /// Scroll offset past which the header switches to its scrolled look
    pub scroll_threshold: f32,
    pub scrolled_background: Color,
    pub resting_background: Color,
    pub scrolled_shadow: Shadow,
    pub dark_background: Color,
    /// Space left between the header and a section scrolled into view
    pub section_gap: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            selector: ".header".to_string(),
            scroll_threshold: 100.0,
            scrolled_background: Color::rgba8(255, 255, 255, 0.98),
            resting_background: Color::rgba8(255, 255, 255, 0.95),
            scrolled_shadow: Shadow::Drop {
                offset_x: 0.0,
                offset_y: 2.0,
                blur: 20.0,
                color: Color::rgba8(0, 0, 0, 0.1),
            },
            dark_background: Color::rgba8(15, 23, 42, 0.95),
            section_gap: 20.0,
        }
    }
}

/// Applies header background and shadow
pub struct HeaderStyler {
    header: ElementId,
    config: HeaderConfig,
    prefers_dark: bool,
}

impl HeaderStyler {
    /// Locate the header and apply the initial color scheme
    ///
    /// Returns `None` (feature absent) when there is no header.
    pub fn install(
        doc: &mut Document,
        config: &HeaderConfig,
        prefers_dark: bool,
    ) -> lumen_core::Result<Option<Self>> {
        let Some(header) = doc.query(&config.selector)? else {
            tracing::debug!("HeaderStyler: no {} on page", config.selector);
            return Ok(None);
        };
        let styler = Self {
            header,
            config: config.clone(),
            prefers_dark,
        };
        styler.apply_color_scheme(doc);
        Ok(Some(styler))
    }

    pub fn element(&self) -> ElementId {
        self.header
    }

    /// Rendered height of the header, 0 if it has been removed
    pub fn height(&self, doc: &Document) -> f32 {
        doc.bounds(self.header).map(|b| b.height()).unwrap_or(0.0)
    }

    pub fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    pub fn on_scroll(&self, doc: &mut Document, scroll_y: f32) {
        let scrolled = scroll_y > self.config.scroll_threshold;
        let Some(style) = doc.style_mut(self.header) else {
            return;
        };
        if scrolled {
            style.background = Some(self.config.scrolled_background);
            style.box_shadow = Some(self.config.scrolled_shadow);
        } else {
            style.background = Some(self.config.resting_background);
            style.box_shadow = Some(Shadow::None);
        }
    }

    /// Record a new color-scheme signal; returns false if the value didn't change
    pub fn on_color_scheme(&mut self, doc: &mut Document, prefers_dark: bool) -> bool {
        if prefers_dark == self.prefers_dark {
            return false;
        }
        self.prefers_dark = prefers_dark;
        tracing::debug!("header: color scheme now {}", if prefers_dark { "dark" } else { "light" });
        self.apply_color_scheme(doc);
        true
    }

    fn apply_color_scheme(&self, doc: &mut Document) {
        let background = if self.prefers_dark {
            self.config.dark_background
        } else {
            self.config.resting_background
        };
        if let Some(style) = doc.style_mut(self.header) {
            style.background = Some(background);
        }
    }
}
