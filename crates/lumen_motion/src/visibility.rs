//! Fire-once visibility detection
//!
//! A [`Detector`] watches items and reports the first moment each one
//! satisfies its [`VisibilityPredicate`]. After reporting, the item is no
//! longer watched and can never be reported again, even if it is observed a
//! second time.
//!
//! Two implementations are provided:
//! - [`IntersectionDetector`] - computes intersection ratios from geometry
//!   supplied by an [`IntersectionSource`] on each recomputation pass
//! - [`ManualDetector`] - fires only when told to, for driving controllers in tests

use std::cell::RefCell;
use std::hash::Hash;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::{Deserialize, Serialize};

use lumen_core::{Document, ElementId, Margin, Rect};

/// Callback run when a watched item first becomes visible
pub type EnterCallback<T> = Box<dyn FnOnce(T)>;

/// Condition an item must meet to count as visible
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPredicate {
    /// Fraction of the item's area that must lie inside the adjusted viewport
    pub threshold: f32,
    /// Adjustment applied to the viewport before intersecting
    #[serde(default)]
    pub margin: Margin,
}

impl VisibilityPredicate {
    pub fn new(threshold: f32, margin: Margin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            margin,
        }
    }

    /// Visible-area fraction of `bounds` inside `viewport` adjusted by the margin
    ///
    /// `None` when the item doesn't touch the adjusted viewport at all.
    /// Zero-area items that touch it count as fully visible.
    pub fn intersection_ratio(&self, bounds: Rect, viewport: Rect) -> Option<f32> {
        let root = viewport.outset(self.margin);
        let overlap = bounds.intersect(&root)?;
        let area = bounds.area();
        if area <= 0.0 {
            return Some(1.0);
        }
        Some((overlap.area() / area).clamp(0.0, 1.0))
    }

    pub fn is_satisfied(&self, bounds: Rect, viewport: Rect) -> bool {
        self.intersection_ratio(bounds, viewport)
            .is_some_and(|ratio| ratio >= self.threshold)
    }
}

/// Fire-once visibility notifications for items of type `T`
pub trait Detector<T> {
    /// Start watching `item`; `on_enter` runs once when it first becomes visible
    fn observe(&mut self, item: T, predicate: VisibilityPredicate, on_enter: EnterCallback<T>);

    /// Stop watching `item` without notifying
    fn unobserve(&mut self, item: &T) -> bool;

    fn is_observing(&self, item: &T) -> bool;

    /// Number of items still being watched
    fn watch_count(&self) -> usize;
}

/// Geometry the intersection detector measures against
pub trait IntersectionSource<T> {
    /// Current viewport in the same coordinate space as item bounds
    fn viewport(&self) -> Rect;

    /// Bounds of `item`, or `None` if it no longer exists
    fn bounds(&self, item: &T) -> Option<Rect>;
}

impl IntersectionSource<ElementId> for Document {
    fn viewport(&self) -> Rect {
        Document::viewport(self).rect()
    }

    fn bounds(&self, item: &ElementId) -> Option<Rect> {
        Document::bounds(self, *item)
    }
}

/// Measure through a `RefCell`, borrowing only for the duration of each query
impl<T, S> IntersectionSource<T> for RefCell<S>
where
    S: IntersectionSource<T>,
{
    fn viewport(&self) -> Rect {
        self.borrow().viewport()
    }

    fn bounds(&self, item: &T) -> Option<Rect> {
        self.borrow().bounds(item)
    }
}

struct Watch<T> {
    predicate: VisibilityPredicate,
    on_enter: EnterCallback<T>,
}

/// Shared bookkeeping for both detectors: watched items in registration
/// order plus the set of items that have already fired
struct WatchSet<T> {
    watches: IndexMap<T, Watch<T>, FxBuildHasher>,
    triggered: FxHashSet<T>,
}

impl<T> WatchSet<T>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
{
    fn new() -> Self {
        Self {
            watches: IndexMap::default(),
            triggered: FxHashSet::default(),
        }
    }

    fn observe(&mut self, item: T, predicate: VisibilityPredicate, on_enter: EnterCallback<T>) {
        if self.triggered.contains(&item) {
            tracing::debug!("observe {:?}: already triggered, ignoring", item);
            return;
        }
        if self.watches.contains_key(&item) {
            tracing::debug!("observe {:?}: already observed, ignoring", item);
            return;
        }
        tracing::trace!(
            "observe {:?} threshold={} margin={:?}",
            item,
            predicate.threshold,
            predicate.margin
        );
        self.watches.insert(item, Watch { predicate, on_enter });
    }

    fn unobserve(&mut self, item: &T) -> bool {
        self.watches.shift_remove(item).is_some()
    }

    /// Remove the given items and return their callbacks, in order
    fn take(&mut self, items: Vec<T>) -> Vec<(T, EnterCallback<T>)> {
        items
            .into_iter()
            .filter_map(|item| {
                let watch = self.watches.shift_remove(&item)?;
                self.triggered.insert(item);
                Some((item, watch.on_enter))
            })
            .collect()
    }
}

fn fire<T: std::fmt::Debug + Copy>(entered: Vec<(T, EnterCallback<T>)>) -> usize {
    let count = entered.len();
    for (item, on_enter) in entered {
        tracing::debug!("visibility: {:?} entered", item);
        on_enter(item);
    }
    count
}

/// Detector driven by geometric intersection passes
///
/// The host calls [`IntersectionDetector::recompute`] after layout or scroll
/// changes. Each pass first measures every watched item, then removes the
/// ones that entered, then runs their callbacks in registration order. The
/// watch set is never touched while it is being iterated.
pub struct IntersectionDetector<T> {
    set: WatchSet<T>,
}

impl<T> IntersectionDetector<T>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            set: WatchSet::new(),
        }
    }

    /// Run one visibility pass; returns how many items entered
    ///
    /// Items whose bounds are unavailable (removed, or not laid out yet) are skipped
    /// and stay watched, so they simply never fire.
    pub fn recompute<S>(&mut self, source: &S) -> usize
    where
        S: IntersectionSource<T> + ?Sized,
    {
        if self.set.watches.is_empty() {
            return 0;
        }

        let viewport = source.viewport();
        let entered: Vec<T> = self
            .set
            .watches
            .iter()
            .filter(|(item, watch)| {
                source
                    .bounds(item)
                    .is_some_and(|bounds| watch.predicate.is_satisfied(bounds, viewport))
            })
            .map(|(item, _)| *item)
            .collect();

        if entered.is_empty() {
            return 0;
        }

        let callbacks = self.set.take(entered);
        fire(callbacks)
    }

    /// Whether `item` has already been reported
    pub fn has_triggered(&self, item: &T) -> bool {
        self.set.triggered.contains(item)
    }
}

impl<T> Default for IntersectionDetector<T>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Detector<T> for IntersectionDetector<T>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
{
    fn observe(&mut self, item: T, predicate: VisibilityPredicate, on_enter: EnterCallback<T>) {
        self.set.observe(item, predicate, on_enter);
    }

    fn unobserve(&mut self, item: &T) -> bool {
        self.set.unobserve(item)
    }

    fn is_observing(&self, item: &T) -> bool {
        self.set.watches.contains_key(item)
    }

    fn watch_count(&self) -> usize {
        self.set.watches.len()
    }
}

/// Detector that fires only on demand
///
/// Keeps the same fire-once bookkeeping as [`IntersectionDetector`] so
/// controller behaviour can be tested without any geometry.
pub struct ManualDetector<T> {
    set: WatchSet<T>,
}

impl<T> ManualDetector<T>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            set: WatchSet::new(),
        }
    }

    /// Report `item` as visible; returns false if it isn't being watched
    pub fn fire(&mut self, item: T) -> bool {
        fire(self.set.take(vec![item])) == 1
    }

    /// Report several items in one pass, in the order given
    pub fn fire_many(&mut self, items: &[T]) -> usize {
        fire(self.set.take(items.to_vec()))
    }

    /// Report every watched item in registration order
    pub fn fire_all(&mut self) -> usize {
        let items: Vec<T> = self.set.watches.keys().copied().collect();
        fire(self.set.take(items))
    }

    /// Watched items in registration order
    pub fn observed(&self) -> Vec<T> {
        self.set.watches.keys().copied().collect()
    }

    pub fn predicate(&self, item: &T) -> Option<VisibilityPredicate> {
        self.set.watches.get(item).map(|w| w.predicate)
    }
}

impl<T> Default for ManualDetector<T>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Detector<T> for ManualDetector<T>
where
    T: Copy + Eq + Hash + std::fmt::Debug,
{
    fn observe(&mut self, item: T, predicate: VisibilityPredicate, on_enter: EnterCallback<T>) {
        self.set.observe(item, predicate, on_enter);
    }

    fn unobserve(&mut self, item: &T) -> bool {
        self.set.unobserve(item)
    }

    fn is_observing(&self, item: &T) -> bool {
        self.set.watches.contains_key(item)
    }

    fn watch_count(&self) -> usize {
        self.set.watches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    /// Items are plain integers whose bounds the test controls directly
    struct Geometry {
        viewport: Rect,
        items: Vec<Option<Rect>>,
    }

    impl IntersectionSource<usize> for Geometry {
        fn viewport(&self) -> Rect {
            self.viewport
        }

        fn bounds(&self, item: &usize) -> Option<Rect> {
            self.items.get(*item).copied().flatten()
        }
    }

    fn counter() -> (Rc<RefCell<Vec<usize>>>, impl Fn() -> EnterCallback<usize>) {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = hits.clone();
        let make = move || {
            let sink = sink.clone();
            Box::new(move |item: usize| sink.borrow_mut().push(item)) as EnterCallback<usize>
        };
        (hits, make)
    }

    #[test]
    fn test_ratio_with_negative_bottom_margin() {
        let predicate = VisibilityPredicate::new(0.7, Margin::bottom(-100.0));
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);

        // 100 tall item from 620..720: root ends at 700, so 80% visible
        let ratio = predicate
            .intersection_ratio(Rect::new(0.0, 620.0, 100.0, 100.0), viewport)
            .unwrap();
        assert!((ratio - 0.8).abs() < 1e-6);

        // Entirely inside the margin band
        assert_eq!(
            predicate.intersection_ratio(Rect::new(0.0, 750.0, 100.0, 40.0), viewport),
            None
        );
    }

    #[test]
    fn test_fire_once_under_oscillation() {
        let (hits, make) = counter();
        let mut detector = IntersectionDetector::new();
        detector.observe(0, VisibilityPredicate::new(0.5, Margin::ZERO), make());

        let inside = Some(Rect::new(0.0, 100.0, 50.0, 50.0));
        let outside = Some(Rect::new(0.0, 2000.0, 50.0, 50.0));
        let mut geometry = Geometry {
            viewport: Rect::new(0.0, 0.0, 500.0, 500.0),
            items: vec![outside],
        };

        for step in 0..10 {
            geometry.items[0] = if step % 2 == 0 { inside } else { outside };
            detector.recompute(&geometry);
        }

        assert_eq!(*hits.borrow(), vec![0]);
        assert!(!detector.is_observing(&0));
        assert!(detector.has_triggered(&0));
    }

    #[test]
    fn test_reobserve_after_trigger_is_ignored() {
        let (hits, make) = counter();
        let mut detector = IntersectionDetector::new();
        let geometry = Geometry {
            viewport: Rect::new(0.0, 0.0, 500.0, 500.0),
            items: vec![Some(Rect::new(0.0, 0.0, 10.0, 10.0))],
        };

        detector.observe(0, VisibilityPredicate::new(0.1, Margin::ZERO), make());
        detector.recompute(&geometry);
        detector.observe(0, VisibilityPredicate::new(0.1, Margin::ZERO), make());
        detector.recompute(&geometry);

        assert_eq!(*hits.borrow(), vec![0]);
        assert_eq!(detector.watch_count(), 0);
    }

    #[test]
    fn test_threshold_not_met() {
        let (hits, make) = counter();
        let mut detector = IntersectionDetector::new();
        detector.observe(0, VisibilityPredicate::new(0.7, Margin::ZERO), make());

        // Half the element is visible
        let geometry = Geometry {
            viewport: Rect::new(0.0, 0.0, 500.0, 500.0),
            items: vec![Some(Rect::new(0.0, 450.0, 100.0, 100.0))],
        };
        assert_eq!(detector.recompute(&geometry), 0);
        assert!(hits.borrow().is_empty());
        assert!(detector.is_observing(&0));
    }

    #[test]
    fn test_removed_item_never_fires() {
        let (hits, make) = counter();
        let mut detector = IntersectionDetector::new();
        detector.observe(0, VisibilityPredicate::new(0.0, Margin::ZERO), make());

        let geometry = Geometry {
            viewport: Rect::new(0.0, 0.0, 500.0, 500.0),
            items: vec![None],
        };
        assert_eq!(detector.recompute(&geometry), 0);
        assert!(hits.borrow().is_empty());
    }

    #[test]
    fn test_same_pass_fires_in_registration_order() {
        let (hits, make) = counter();
        let mut detector = IntersectionDetector::new();
        for item in [2, 0, 1] {
            detector.observe(item, VisibilityPredicate::new(0.1, Margin::ZERO), make());
        }

        let visible = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        let geometry = Geometry {
            viewport: Rect::new(0.0, 0.0, 500.0, 500.0),
            items: vec![visible, visible, visible],
        };
        assert_eq!(detector.recompute(&geometry), 3);
        assert_eq!(*hits.borrow(), vec![2, 0, 1]);
    }

    #[test]
    fn test_unobserve_prevents_firing() {
        let (hits, make) = counter();
        let mut detector = ManualDetector::new();
        detector.observe(7, VisibilityPredicate::new(0.3, Margin::ZERO), make());
        assert!(detector.unobserve(&7));
        assert!(!detector.fire(7));
        assert!(hits.borrow().is_empty());
    }

    #[test]
    fn test_manual_detector_fire_once() {
        let (hits, make) = counter();
        let mut detector = ManualDetector::new();
        detector.observe(1, VisibilityPredicate::new(0.3, Margin::ZERO), make());
        detector.observe(2, VisibilityPredicate::new(0.3, Margin::ZERO), make());

        assert_eq!(detector.predicate(&1).unwrap().threshold, 0.3);
        assert!(detector.fire(1));
        assert!(!detector.fire(1));
        assert_eq!(detector.fire_all(), 1);
        assert_eq!(*hits.borrow(), vec![1, 2]);
    }
}
