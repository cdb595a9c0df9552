//! Collapsible navigation menu

use serde::{Deserialize, Serialize};

use lumen_core::{Document, ElementId};

/// The `[navigation]` section of the page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub hamburger: String,
    pub menu: String,
    pub active_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            hamburger: ".hamburger".to_string(),
            menu: ".nav-menu".to_string(),
            active_class: "active".to_string(),
        }
    }
}

/// Hamburger toggle plus the menu it opens
#[derive(Clone, Debug)]
pub struct NavMenu {
    hamburger: ElementId,
    menu: ElementId,
    active_class: String,
}

impl NavMenu {
    /// Locate the hamburger and menu; `None` if either is missing
    pub fn install(doc: &Document, config: &NavConfig) -> lumen_core::Result<Option<Self>> {
        let hamburger = doc.query(&config.hamburger)?;
        let menu = doc.query(&config.menu)?;
        match (hamburger, menu) {
            (Some(hamburger), Some(menu)) => Ok(Some(Self {
                hamburger,
                menu,
                active_class: config.active_class.clone(),
            })),
            _ => {
                tracing::debug!("NavMenu: hamburger or menu missing, navigation disabled");
                Ok(None)
            }
        }
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.menu, &self.active_class)
    }

    /// React to a click; returns true if the menu state was touched
    ///
    /// A click on (or inside) the hamburger toggles both elements. A click
    /// directly on an in-page anchor inside the menu closes it.
    pub fn handle_click(&self, doc: &mut Document, target: ElementId) -> bool {
        if doc.is_inclusive_ancestor(self.hamburger, target) {
            doc.toggle_class(self.hamburger, &self.active_class);
            let open = doc.toggle_class(self.menu, &self.active_class);
            tracing::debug!("nav: menu {}", if open { "opened" } else { "closed" });
            return true;
        }

        if doc.is_inclusive_ancestor(self.menu, target) && is_in_page_link(doc, target) {
            self.close(doc);
            return true;
        }
        false
    }

    /// `Escape` closes the menu
    pub fn handle_key(&self, doc: &mut Document, key: &str) -> bool {
        if key != "Escape" {
            return false;
        }
        self.close(doc);
        true
    }

    fn close(&self, doc: &mut Document) {
        doc.remove_class(self.hamburger, &self.active_class);
        doc.remove_class(self.menu, &self.active_class);
        tracing::debug!("nav: menu closed");
    }
}

fn is_in_page_link(doc: &Document, target: ElementId) -> bool {
    doc.get(target).is_some_and(|el| {
        el.tag().eq_ignore_ascii_case("a")
            && el.attribute("href").is_some_and(|href| href.starts_with('#'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::ElementSpec;

    struct Page {
        doc: Document,
        nav: NavMenu,
        hamburger_bar: ElementId,
        anchor: ElementId,
        external: ElementId,
        item: ElementId,
    }

    fn page() -> Page {
        let mut doc = Document::new(375.0, 700.0);
        let root = doc.root();
        let header = doc.append(root, ElementSpec::new("header").class("header"));
        let hamburger = doc.append(header, ElementSpec::new("div").class("hamburger"));
        let hamburger_bar = doc.append(hamburger, ElementSpec::new("span").class("bar"));
        let menu = doc.append(header, ElementSpec::new("ul").class("nav-menu"));
        let item = doc.append(menu, ElementSpec::new("li"));
        let anchor = doc.append(item, ElementSpec::new("a").attr("href", "#features").text("Features"));
        let external = doc.append(item, ElementSpec::new("a").attr("href", "https://example.com"));
        let nav = NavMenu::install(&doc, &NavConfig::default()).unwrap().unwrap();
        Page {
            doc,
            nav,
            hamburger_bar,
            anchor,
            external,
            item,
        }
    }

    #[test]
    fn test_hamburger_toggles() {
        let mut p = page();
        assert!(p.nav.handle_click(&mut p.doc, p.hamburger_bar));
        assert!(p.nav.is_open(&p.doc));
        assert!(p.doc.has_class(p.nav.hamburger, "active"));

        p.nav.handle_click(&mut p.doc, p.hamburger_bar);
        assert!(!p.nav.is_open(&p.doc));
        assert!(!p.doc.has_class(p.nav.hamburger, "active"));
    }

    #[test]
    fn test_in_page_link_closes() {
        let mut p = page();
        p.nav.handle_click(&mut p.doc, p.hamburger_bar);

        // Not an anchor, and not an in-page anchor
        assert!(!p.nav.handle_click(&mut p.doc, p.item));
        assert!(!p.nav.handle_click(&mut p.doc, p.external));
        assert!(p.nav.is_open(&p.doc));

        assert!(p.nav.handle_click(&mut p.doc, p.anchor));
        assert!(!p.nav.is_open(&p.doc));
        assert!(!p.doc.has_class(p.nav.hamburger, "active"));
    }

    #[test]
    fn test_escape_closes() {
        let mut p = page();
        p.nav.handle_click(&mut p.doc, p.hamburger_bar);
        assert!(!p.nav.handle_key(&mut p.doc, "Enter"));
        assert!(p.nav.is_open(&p.doc));
        assert!(p.nav.handle_key(&mut p.doc, "Escape"));
        assert!(!p.nav.is_open(&p.doc));
    }

    #[test]
    fn test_missing_menu_disables() {
        let mut doc = Document::new(375.0, 700.0);
        let root = doc.root();
        doc.append(root, ElementSpec::new("div").class("hamburger"));
        assert!(NavMenu::install(&doc, &NavConfig::default()).unwrap().is_none());
    }
}
