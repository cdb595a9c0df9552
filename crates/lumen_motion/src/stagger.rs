//! Staggered entrance for batches of cards
//!
//! Every element starts hidden and shifted down. When an element becomes
//! visible its reveal is scheduled `index × stagger_ms` after its own
//! trigger, where `index` is its position in registration order. Elements
//! that enter in the same pass therefore cascade, and elements that enter
//! later still keep their registration-order offset.

use serde::{Deserialize, Serialize};

use lumen_core::{ElementId, Margin, Transition, Translate};

use crate::reveal;
use crate::tracker::MotionPhase;
use crate::visibility::{Detector, VisibilityPredicate};
use crate::MotionContext;

/// Card entrance settings, the `[cards]` section of the page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    pub selector: String,
    pub threshold: f32,
    pub margin_bottom: f32,
    /// Delay between consecutive elements' reveals (ms)
    pub stagger_ms: u32,
    /// Pre-reveal downward offset
    pub offset_y: f32,
    pub transition_ms: u32,
    /// Optional: cap the index used for the delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            selector: ".card, .tool-card, .guideline-item".to_string(),
            threshold: 0.1,
            margin_bottom: -50.0,
            stagger_ms: 100,
            offset_y: 20.0,
            transition_ms: 600,
            limit: None,
        }
    }
}

impl StaggerConfig {
    /// Reveal delay for the element registered at `index`
    pub fn delay_for_index(&self, index: usize) -> u32 {
        let capped_index = match self.limit {
            Some(limit) => index.min(limit),
            None => index,
        };
        self.stagger_ms.saturating_mul(capped_index as u32)
    }

    pub fn predicate(&self) -> VisibilityPredicate {
        VisibilityPredicate::new(self.threshold, Margin::bottom(self.margin_bottom))
    }

    pub fn pre_reveal(&self) -> (Translate, Transition) {
        (
            Translate::Y(self.offset_y),
            Transition::fade_and_move(self.transition_ms),
        )
    }
}

/// Applies the cascading card entrance
pub struct StaggerController;

impl StaggerController {
    /// Hide every matching element and register it with the detector
    ///
    /// Returns the registered elements; an element's position in the
    /// returned list is the index its delay is computed from.
    pub fn install<D>(
        ctx: &MotionContext,
        detector: &mut D,
        config: &StaggerConfig,
    ) -> lumen_core::Result<Vec<ElementId>>
    where
        D: Detector<ElementId> + ?Sized,
    {
        let elements = ctx.document.borrow().query_all(&config.selector)?;
        let (offset, transition) = config.pre_reveal();
        let predicate = config.predicate();

        {
            let mut doc = ctx.document.borrow_mut();
            for id in &elements {
                reveal::prepare(&mut doc, *id, offset, transition.clone());
            }
        }

        for (index, id) in elements.iter().enumerate() {
            ctx.tracker.register(*id);
            let delay_ms = config.delay_for_index(index);
            let ctx = ctx.clone();
            detector.observe(
                *id,
                predicate,
                Box::new(move |id: ElementId| Self::schedule_reveal(&ctx, id, index, delay_ms)),
            );
        }

        tracing::debug!(
            "StaggerController: {} elements registered ({}ms stagger)",
            elements.len(),
            config.stagger_ms
        );
        Ok(elements)
    }

    fn schedule_reveal(ctx: &MotionContext, id: ElementId, index: usize, delay_ms: u32) {
        ctx.tracker
            .transition(id, MotionPhase::Animating, ctx.scheduler.now_ms());
        tracing::debug!("stagger {:?}: index {} reveals in {}ms", id, index, delay_ms);

        let document = ctx.document.clone();
        let tracker = ctx.tracker.clone();
        let scheduled = ctx.scheduler.schedule(delay_ms as f64, move |now| {
            if reveal::commit(&mut document.borrow_mut(), id) {
                tracker.transition(id, MotionPhase::Settled, now);
            }
        });
        if scheduled.is_none() {
            tracing::warn!("stagger {:?}: scheduler gone, reveal dropped", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::ManualDetector;
    use lumen_animation::AnimationScheduler;
    use lumen_core::{Document, ElementSpec};

    fn page(cards: usize) -> (AnimationScheduler, MotionContext) {
        let mut doc = Document::new(1024.0, 768.0);
        let root = doc.root();
        for i in 0..cards {
            let class = match i % 3 {
                0 => "card",
                1 => "tool-card",
                _ => "guideline-item",
            };
            doc.append(root, ElementSpec::new("div").class(class));
        }
        doc.append(root, ElementSpec::new("div").class("other"));
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(doc.into_shared(), scheduler.handle());
        (scheduler, ctx)
    }

    #[test]
    fn test_delay_for_index() {
        let config = StaggerConfig::default();
        assert_eq!(config.delay_for_index(0), 0);
        assert_eq!(config.delay_for_index(4), 400);

        let capped = StaggerConfig {
            limit: Some(2),
            ..StaggerConfig::default()
        };
        assert_eq!(capped.delay_for_index(5), 200);
    }

    #[test]
    fn test_pre_reveal_applied_on_install() {
        let (_scheduler, ctx) = page(3);
        let mut detector = ManualDetector::new();
        let cards = StaggerController::install(&ctx, &mut detector, &StaggerConfig::default()).unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(detector.observed(), cards);

        let doc = ctx.document.borrow();
        for id in &cards {
            let style = doc.style(*id).unwrap();
            assert_eq!(style.opacity, Some(0.0));
            assert_eq!(style.transform, Some(Translate::Y(20.0)));
            assert_eq!(
                style.transition.as_ref().unwrap().to_string(),
                "opacity 0.6s ease, transform 0.6s ease"
            );
        }
        let predicate = detector.predicate(&cards[0]).unwrap();
        assert_eq!(predicate.threshold, 0.1);
        assert_eq!(predicate.margin.bottom, -50.0);
    }

    #[test]
    fn test_same_pass_cascade() {
        let (scheduler, ctx) = page(5);
        let mut detector = ManualDetector::new();
        let cards = StaggerController::install(&ctx, &mut detector, &StaggerConfig::default()).unwrap();

        scheduler.tick(1000.0);
        // Fire in reverse visual order; delays follow registration order
        let mut reversed = cards.clone();
        reversed.reverse();
        assert_eq!(detector.fire_many(&reversed), 5);

        let mut now = 1000.0;
        while scheduler.tick(now) {
            now += 10.0;
        }

        let settled: Vec<f64> = cards
            .iter()
            .map(|id| ctx.tracker.settled_at(*id).unwrap())
            .collect();
        assert_eq!(settled, vec![1000.0, 1100.0, 1200.0, 1300.0, 1400.0]);
        assert!(cards.iter().all(|id| reveal::is_revealed(&ctx.document.borrow(), *id)));
    }

    #[test]
    fn test_delay_relative_to_own_trigger() {
        let (scheduler, ctx) = page(3);
        let mut detector = ManualDetector::new();
        let cards = StaggerController::install(&ctx, &mut detector, &StaggerConfig::default()).unwrap();

        scheduler.tick(0.0);
        detector.fire(cards[2]);
        scheduler.tick(100.0);
        assert!(!reveal::is_revealed(&ctx.document.borrow(), cards[2]));

        scheduler.tick(5000.0);
        detector.fire(cards[1]);
        assert_eq!(ctx.tracker.settled_at(cards[2]), Some(5000.0));

        scheduler.tick(5100.0);
        assert_eq!(ctx.tracker.settled_at(cards[1]), Some(5100.0));
        assert_eq!(ctx.tracker.phase(cards[0]), Some(MotionPhase::Pending));
    }
}
