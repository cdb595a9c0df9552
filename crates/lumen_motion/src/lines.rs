//! Line-by-line reveal of the hero code sample
//!
//! Runs once at startup rather than on visibility: the sample's text is split
//! into one element per line and each line slides in from the left on a
//! fixed schedule.

use serde::{Deserialize, Serialize};

use lumen_core::{ElementId, ElementSpec, Transition, Translate};

use crate::reveal;
use crate::tracker::MotionPhase;
use crate::MotionContext;

/// Hero code settings, the `[hero_code]` section of the page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineRevealConfig {
    pub selector: String,
    /// Delay before the first line is revealed (ms)
    pub initial_delay_ms: u32,
    /// Delay between consecutive lines (ms)
    pub line_stagger_ms: u32,
    pub offset_x: f32,
    pub transition_ms: u32,
}

impl Default for LineRevealConfig {
    fn default() -> Self {
        Self {
            selector: ".python-code".to_string(),
            initial_delay_ms: 1000,
            line_stagger_ms: 100,
            offset_x: -20.0,
            transition_ms: 500,
        }
    }
}

impl LineRevealConfig {
    pub fn reveal_delay(&self, index: usize) -> u32 {
        self.initial_delay_ms
            .saturating_add(self.line_stagger_ms.saturating_mul(index as u32))
    }

    pub fn transition_for(&self, index: usize) -> Transition {
        Transition::fade_and_move(self.transition_ms)
            .with_delay(self.line_stagger_ms.saturating_mul(index as u32))
    }
}

pub struct LineRevealController;

impl LineRevealController {
    /// Split the first matching element into revealed lines
    ///
    /// Returns the line elements, or an empty list if nothing matches.
    pub fn install(ctx: &MotionContext, config: &LineRevealConfig) -> lumen_core::Result<Vec<ElementId>> {
        let Some(code) = ctx.document.borrow().query(&config.selector)? else {
            tracing::debug!("LineRevealController: no {} on page", config.selector);
            return Ok(Vec::new());
        };

        let lines: Vec<ElementId> = {
            let mut doc = ctx.document.borrow_mut();
            let text = doc.text_content(code).unwrap_or_default();
            doc.set_text(code, "");
            text.split('\n')
                .enumerate()
                .map(|(index, line)| {
                    let id = doc.append(code, ElementSpec::new("div").text(line));
                    reveal::prepare(
                        &mut doc,
                        id,
                        Translate::X(config.offset_x),
                        config.transition_for(index),
                    );
                    id
                })
                .collect()
        };

        let now = ctx.scheduler.now_ms();
        for (index, id) in lines.iter().copied().enumerate() {
            ctx.tracker.register(id);
            ctx.tracker.transition(id, MotionPhase::Animating, now);

            let document = ctx.document.clone();
            let tracker = ctx.tracker.clone();
            let scheduled = ctx
                .scheduler
                .schedule(config.reveal_delay(index) as f64, move |now| {
                    if reveal::commit(&mut document.borrow_mut(), id) {
                        tracker.transition(id, MotionPhase::Settled, now);
                    }
                });
            if scheduled.is_none() {
                tracing::warn!("line {}: scheduler gone, reveal dropped", index);
            }
        }

        tracing::debug!("LineRevealController: {} lines scheduled", lines.len());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_animation::AnimationScheduler;
    use lumen_core::Document;

    const SAMPLE: &str = "def greet(name):\n    return f\"Hello, {name}\"\n\nprint(greet(\"world\"))";

    fn page() -> (AnimationScheduler, MotionContext, ElementId) {
        let mut doc = Document::new(1024.0, 768.0);
        let root = doc.root();
        let pre = doc.append(root, ElementSpec::new("pre").class("python-code").text(SAMPLE));
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(doc.into_shared(), scheduler.handle());
        (scheduler, ctx, pre)
    }

    #[test]
    fn test_splits_into_lines() {
        let (_scheduler, ctx, pre) = page();
        let lines = LineRevealController::install(&ctx, &LineRevealConfig::default()).unwrap();
        assert_eq!(lines.len(), 4);

        let doc = ctx.document.borrow();
        assert_eq!(doc.text(pre), Some(""));
        assert_eq!(doc.get(pre).unwrap().children(), lines.as_slice());
        assert_eq!(doc.text(lines[2]), Some(""));
        assert_eq!(doc.text_content(pre).unwrap(), SAMPLE.replace('\n', ""));

        let last = doc.style(lines[3]).unwrap();
        assert_eq!(last.transform, Some(Translate::X(-20.0)));
        assert_eq!(
            last.transition.as_ref().unwrap().to_string(),
            "opacity 0.5s ease 0.3s, transform 0.5s ease 0.3s"
        );
    }

    #[test]
    fn test_reveal_schedule() {
        let (scheduler, ctx, _) = page();
        let lines = LineRevealController::install(&ctx, &LineRevealConfig::default()).unwrap();

        scheduler.tick(999.0);
        assert!(!reveal::is_revealed(&ctx.document.borrow(), lines[0]));

        let mut now = 1000.0;
        while scheduler.tick(now) {
            now += 100.0;
        }
        let settled: Vec<f64> = lines.iter().map(|id| ctx.tracker.settled_at(*id).unwrap()).collect();
        assert_eq!(settled, vec![1000.0, 1100.0, 1200.0, 1300.0]);
        assert_eq!(
            ctx.document.borrow().style(lines[0]).unwrap().transform,
            Some(Translate::X(0.0))
        );
    }

    #[test]
    fn test_install_without_scheduler() {
        let (scheduler, ctx, _) = page();
        drop(scheduler);

        let lines = LineRevealController::install(&ctx, &LineRevealConfig::default()).unwrap();
        assert_eq!(lines.len(), 4);
        let doc = ctx.document.borrow();
        assert!(lines.iter().all(|id| !reveal::is_revealed(&doc, *id)));
        assert!(lines.iter().all(|id| ctx.tracker.settled_at(*id).is_none()));
    }

    #[test]
    fn test_missing_code_block() {
        let doc = Document::new(1024.0, 768.0);
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(doc.into_shared(), scheduler.handle());
        let lines = LineRevealController::install(&ctx, &LineRevealConfig::default()).unwrap();
        assert!(lines.is_empty());
        assert!(!scheduler.has_pending());
    }
}
