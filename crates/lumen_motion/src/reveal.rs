//! Pre-reveal and reveal style commits
//!
//! An entrance is two discrete style writes: [`prepare`] hides the element
//! and offsets it, [`commit`] brings it back. The browser-side transition
//! declared in between does the actual tweening.

use lumen_core::{Document, ElementId, Transition, Translate};

/// Hide an element, offset it, and declare its transition
///
/// Returns false if the element no longer exists.
pub fn prepare(doc: &mut Document, id: ElementId, offset: Translate, transition: Transition) -> bool {
    let Some(style) = doc.style_mut(id) else {
        return false;
    };
    style.opacity = Some(0.0);
    style.transform = Some(offset);
    style.transition = Some(transition);
    true
}

/// Show an element at its layout position
///
/// The axis of any existing offset is kept, so `translateX(-20px)` becomes
/// `translateX(0)`.
pub fn commit(doc: &mut Document, id: ElementId) -> bool {
    let Some(style) = doc.style_mut(id) else {
        return false;
    };
    style.opacity = Some(1.0);
    style.transform = Some(
        style
            .transform
            .map(|t| t.identity())
            .unwrap_or(Translate::Y(0.0)),
    );
    true
}

/// Whether an element is in its revealed state
pub fn is_revealed(doc: &Document, id: ElementId) -> bool {
    doc.style(id).is_some_and(|style| {
        style.effective_opacity() >= 1.0 && style.transform.map_or(true, |t| t.is_identity())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::ElementSpec;

    #[test]
    fn test_prepare_then_commit() {
        let mut doc = Document::new(800.0, 600.0);
        let root = doc.root();
        let card = doc.append(root, ElementSpec::new("div").class("card"));

        assert!(prepare(&mut doc, card, Translate::Y(20.0), Transition::fade_and_move(600)));
        assert!(!is_revealed(&doc, card));
        assert_eq!(
            doc.style(card).unwrap().to_string(),
            "opacity: 0; transform: translateY(20px); transition: opacity 0.6s ease, transform 0.6s ease"
        );

        assert!(commit(&mut doc, card));
        assert!(is_revealed(&doc, card));
        assert_eq!(doc.style(card).unwrap().transform, Some(Translate::Y(0.0)));
    }

    #[test]
    fn test_commit_keeps_axis() {
        let mut doc = Document::new(800.0, 600.0);
        let root = doc.root();
        let line = doc.append(root, ElementSpec::new("div"));

        prepare(&mut doc, line, Translate::X(-20.0), Transition::fade_and_move(500));
        commit(&mut doc, line);
        assert_eq!(doc.style(line).unwrap().transform, Some(Translate::X(0.0)));
    }

    #[test]
    fn test_missing_element() {
        let mut doc = Document::new(800.0, 600.0);
        let root = doc.root();
        let gone = doc.append(root, ElementSpec::new("div"));
        doc.remove(gone).unwrap();

        assert!(!prepare(&mut doc, gone, Translate::Y(20.0), Transition::fade_and_move(600)));
        assert!(!commit(&mut doc, gone));
    }
}
