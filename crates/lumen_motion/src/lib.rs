//! Lumen Motion
//!
//! Viewport-triggered animations for page elements.
//!
//! - [`visibility`] - fire-once visibility detection behind the [`Detector`] trait
//! - [`counter`] - count-up animation of numeric displays
//! - [`stagger`] - cascading entrance of a batch of cards
//! - [`sequence`] - fixed two-stage reveal of a quotation and its attribution
//! - [`lines`] - line-by-line reveal of a code sample at startup
//!
//! Controllers are installed once against a [`MotionContext`] and a detector.
//! They hold no state of their own beyond the closures registered with the
//! detector and the scheduler; per-element progress is recorded in the
//! context's [`MotionTracker`].
//!
//! ```ignore
//! let ctx = MotionContext::new(document.clone(), scheduler.handle());
//! let mut detector = IntersectionDetector::new();
//! CounterController::install(&ctx, &mut detector, &CounterConfig::default())?;
//! StaggerController::install(&ctx, &mut detector, &StaggerConfig::default())?;
//!
//! // host loop
//! scheduler.tick(now);
//! detector.recompute(&*document);
//! ```

pub mod counter;
pub mod lines;
pub mod reveal;
pub mod sequence;
pub mod stagger;
pub mod tracker;
pub mod visibility;

use lumen_animation::SchedulerHandle;
use lumen_core::SharedDocument;

pub use counter::{CounterConfig, CounterController, CounterSpec, NumberFormat, NumberStyle};
pub use lines::{LineRevealConfig, LineRevealController};
pub use sequence::{SequenceConfig, SequentialRevealController};
pub use stagger::{StaggerConfig, StaggerController};
pub use tracker::{MotionPhase, MotionTracker};
pub use visibility::{
    Detector, EnterCallback, IntersectionDetector, IntersectionSource, ManualDetector,
    VisibilityPredicate,
};

/// Everything a controller needs to mutate the page over time
#[derive(Clone)]
pub struct MotionContext {
    pub document: SharedDocument,
    pub scheduler: SchedulerHandle,
    pub tracker: MotionTracker,
}

impl MotionContext {
    pub fn new(document: SharedDocument, scheduler: SchedulerHandle) -> Self {
        Self {
            document,
            scheduler,
            tracker: MotionTracker::new(),
        }
    }
}
