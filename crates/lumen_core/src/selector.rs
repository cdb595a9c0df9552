//! Selector subset used to locate page elements
//!
//! Supports comma-separated lists of compound selectors built from a tag
//! name, `#id` and any number of `.class` parts (`code`, `.card`,
//! `a.nav-link`, `#features`, `.card, .tool-card`). Combinators are not
//! supported.

use smallvec::SmallVec;

use crate::css;
use crate::document::Element;
use crate::error::{CoreError, Result};

/// A compound selector such as `div.card.highlight`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: SmallVec<[String; 2]>,
}

impl Selector {
    /// Parse a single compound selector
    pub fn parse(input: &str) -> Result<Self> {
        css::parse_all(css::compound_selector, input)
            .ok_or_else(|| CoreError::InvalidSelector(input.to_string()))
    }

    /// Check whether an element satisfies every part of this selector
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
    }
}

/// A comma-separated list of selectors; matches when any member matches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    selectors: SmallVec<[Selector; 3]>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        let selectors = css::parse_all(css::selector_list, input)
            .ok_or_else(|| CoreError::InvalidSelector(input.to_string()))?;
        Ok(Self { selectors })
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.selectors.iter().any(|s| s.matches(element))
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let selector = Selector::parse("a.nav-link.active").unwrap();
        assert_eq!(selector.tag.as_deref(), Some("a"));
        assert_eq!(selector.classes.as_slice(), ["nav-link", "active"]);
        assert!(selector.id.is_none());
    }

    #[test]
    fn test_parse_id() {
        let selector = Selector::parse("#features").unwrap();
        assert_eq!(selector.id.as_deref(), Some("features"));
        assert!(selector.tag.is_none());
    }

    #[test]
    fn test_parse_list() {
        let list = SelectorList::parse(".card, .tool-card, .guideline-item").unwrap();
        assert_eq!(list.selectors().len(), 3);
        assert_eq!(list.selectors()[2].classes.as_slice(), ["guideline-item"]);
    }

    #[test]
    fn test_reject_invalid() {
        assert!(SelectorList::parse("").is_err());
        assert!(SelectorList::parse(".card,").is_err());
        assert!(Selector::parse("div .card").is_err());
        assert!(Selector::parse("..card").is_err());
        assert!(Selector::parse("#a#b").is_err());
        assert!(Selector::parse("div>a").is_err());
    }
}
