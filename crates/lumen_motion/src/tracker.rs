//! Per-element motion lifecycle
//!
//! Every animated element moves through `Pending -> Animating -> Settled`
//! exactly once. The tracker only records transitions; it never drives them.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use lumen_core::ElementId;

/// Where an element is in its entrance/count-up lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MotionPhase {
    /// Registered and waiting to become visible
    #[default]
    Pending,
    /// Triggered; delayed reveal or interpolation in progress
    Animating,
    /// Final state committed
    Settled,
}

#[derive(Clone, Copy, Debug, Default)]
struct MotionRecord {
    phase: MotionPhase,
    triggered_at_ms: Option<f64>,
    settled_at_ms: Option<f64>,
}

/// Shared lifecycle table for all controllers on a page
///
/// Clones share the same table.
#[derive(Clone, Default)]
pub struct MotionTracker {
    records: Rc<RefCell<FxHashMap<ElementId, MotionRecord>>>,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an element in the `Pending` phase
    pub fn register(&self, id: ElementId) {
        self.records.borrow_mut().entry(id).or_default();
    }

    /// Current phase, or `None` if the element was never registered
    pub fn phase(&self, id: ElementId) -> Option<MotionPhase> {
        self.records.borrow().get(&id).map(|r| r.phase)
    }

    pub fn triggered_at(&self, id: ElementId) -> Option<f64> {
        self.records.borrow().get(&id).and_then(|r| r.triggered_at_ms)
    }

    pub fn settled_at(&self, id: ElementId) -> Option<f64> {
        self.records.borrow().get(&id).and_then(|r| r.settled_at_ms)
    }

    /// Advance an element to `phase` at `now_ms`
    ///
    /// Phases only move forward; a backwards or repeated transition is
    /// ignored and returns false.
    pub fn transition(&self, id: ElementId, phase: MotionPhase, now_ms: f64) -> bool {
        let mut records = self.records.borrow_mut();
        let record = records.entry(id).or_default();
        if phase <= record.phase {
            tracing::debug!(
                "motion {:?}: ignoring {:?} -> {:?}",
                id,
                record.phase,
                phase
            );
            return false;
        }
        match phase {
            MotionPhase::Pending => {}
            MotionPhase::Animating => record.triggered_at_ms = Some(now_ms),
            MotionPhase::Settled => {
                record.triggered_at_ms.get_or_insert(now_ms);
                record.settled_at_ms = Some(now_ms);
            }
        }
        record.phase = phase;
        true
    }

    /// Number of elements in the given phase
    pub fn count(&self, phase: MotionPhase) -> usize {
        self.records
            .borrow()
            .values()
            .filter(|r| r.phase == phase)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Document, ElementSpec};

    fn ids(n: usize) -> Vec<ElementId> {
        let mut doc = Document::new(100.0, 100.0);
        let root = doc.root();
        (0..n)
            .map(|_| doc.append(root, ElementSpec::new("div")))
            .collect()
    }

    #[test]
    fn test_phases_only_move_forward() {
        let tracker = MotionTracker::new();
        let id = ids(1)[0];

        tracker.register(id);
        assert_eq!(tracker.phase(id), Some(MotionPhase::Pending));

        assert!(tracker.transition(id, MotionPhase::Animating, 10.0));
        assert!(!tracker.transition(id, MotionPhase::Animating, 20.0));
        assert!(tracker.transition(id, MotionPhase::Settled, 30.0));
        assert!(!tracker.transition(id, MotionPhase::Pending, 40.0));

        assert_eq!(tracker.phase(id), Some(MotionPhase::Settled));
        assert_eq!(tracker.triggered_at(id), Some(10.0));
        assert_eq!(tracker.settled_at(id), Some(30.0));
    }

    #[test]
    fn test_clones_share_records() {
        let tracker = MotionTracker::new();
        let other = tracker.clone();
        let all = ids(3);
        for id in &all {
            tracker.register(*id);
        }
        other.transition(all[0], MotionPhase::Animating, 0.0);

        assert_eq!(tracker.count(MotionPhase::Pending), 2);
        assert_eq!(tracker.count(MotionPhase::Animating), 1);
        assert_eq!(tracker.phase(ElementId::default()), None);
    }
}
