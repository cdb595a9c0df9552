//! Two-stage reveal of a quotation and its attribution
//!
//! When the section first becomes visible, the quote and its attribution are
//! hidden and offset, then each is revealed at a fixed delay measured from
//! the trigger. The two reveals are independent timers; neither waits for
//! the other.

use serde::{Deserialize, Serialize};

use lumen_core::{Document, ElementId, Margin, SelectorList, Transition, Translate};

use crate::reveal;
use crate::tracker::MotionPhase;
use crate::visibility::{Detector, VisibilityPredicate};
use crate::MotionContext;

/// Quote section settings, the `[quote]` section of the page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub selector: String,
    pub threshold: f32,
    /// Selector of the quoted text inside the section
    pub primary: String,
    /// Selector of the attribution inside the section
    pub attribution: String,
    pub primary_delay_ms: u32,
    pub attribution_delay_ms: u32,
    pub primary_offset_y: f32,
    pub attribution_offset_y: f32,
    pub transition_ms: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            selector: ".quote-section".to_string(),
            threshold: 0.3,
            primary: "blockquote".to_string(),
            attribution: "cite".to_string(),
            primary_delay_ms: 200,
            attribution_delay_ms: 600,
            primary_offset_y: 30.0,
            attribution_offset_y: 20.0,
            transition_ms: 800,
        }
    }
}

impl SequenceConfig {
    pub fn predicate(&self) -> VisibilityPredicate {
        VisibilityPredicate::new(self.threshold, Margin::ZERO)
    }

    /// `(selector, offset, delay)` for each stage, in reveal order
    fn stages(&self) -> [(&str, f32, u32); 2] {
        [
            (
                self.primary.as_str(),
                self.primary_offset_y,
                self.primary_delay_ms,
            ),
            (
                self.attribution.as_str(),
                self.attribution_offset_y,
                self.attribution_delay_ms,
            ),
        ]
    }
}

/// Reveals a quote section's children in a fixed order
pub struct SequentialRevealController;

impl SequentialRevealController {
    /// Register the first matching section, if there is one
    pub fn install<D>(
        ctx: &MotionContext,
        detector: &mut D,
        config: &SequenceConfig,
    ) -> lumen_core::Result<Option<ElementId>>
    where
        D: Detector<ElementId> + ?Sized,
    {
        // Child selectors are resolved on trigger; reject bad ones now
        SelectorList::parse(&config.primary)?;
        SelectorList::parse(&config.attribution)?;

        let Some(section) = ctx.document.borrow().query(&config.selector)? else {
            tracing::debug!("SequentialRevealController: no {} on page", config.selector);
            return Ok(None);
        };

        ctx.tracker.register(section);
        let trigger_ctx = ctx.clone();
        let trigger_config = config.clone();
        detector.observe(
            section,
            config.predicate(),
            Box::new(move |section: ElementId| Self::run(&trigger_ctx, &trigger_config, section)),
        );

        tracing::debug!("SequentialRevealController: watching {:?}", section);
        Ok(Some(section))
    }

    fn find_child(doc: &Document, section: ElementId, selector: &str) -> Option<ElementId> {
        match doc.query_within(section, selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!("sequence {:?}: {}", section, err);
                None
            }
        }
    }

    fn run(ctx: &MotionContext, config: &SequenceConfig, section: ElementId) {
        let now = ctx.scheduler.now_ms();
        ctx.tracker.transition(section, MotionPhase::Animating, now);

        let transition = Transition::fade_and_move(config.transition_ms);
        let stages: Vec<(ElementId, u32)> = {
            let mut doc = ctx.document.borrow_mut();
            config
                .stages()
                .into_iter()
                .filter_map(|(selector, offset, delay)| {
                    let child = Self::find_child(&doc, section, selector)?;
                    reveal::prepare(&mut doc, child, Translate::Y(offset), transition.clone());
                    Some((child, delay))
                })
                .collect()
        };

        if stages.is_empty() {
            tracing::debug!("sequence {:?}: nothing to reveal", section);
            ctx.tracker.transition(section, MotionPhase::Settled, now);
            return;
        }

        // The section settles with whichever stage commits last
        let last_delay = stages.iter().map(|(_, delay)| *delay).max().unwrap_or(0);
        for (child, delay) in stages {
            ctx.tracker.register(child);
            ctx.tracker.transition(child, MotionPhase::Animating, now);

            let document = ctx.document.clone();
            let tracker = ctx.tracker.clone();
            let settles_section = delay == last_delay;
            let scheduled = ctx.scheduler.schedule(delay as f64, move |now| {
                if reveal::commit(&mut document.borrow_mut(), child) {
                    tracker.transition(child, MotionPhase::Settled, now);
                }
                if settles_section {
                    tracker.transition(section, MotionPhase::Settled, now);
                }
            });
            if scheduled.is_none() {
                tracing::warn!("sequence {:?}: scheduler gone, reveal of {:?} dropped", section, child);
            }
        }
    }
}
