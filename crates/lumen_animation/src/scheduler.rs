//! Animation scheduler
//!
//! Single-threaded cooperative scheduling driven entirely by the host loop.
//! Two kinds of work are queued:
//! - **Timers** (`schedule`) - one-shot callbacks that run on the first tick at
//!   or after their due time, ordered by due time then registration order
//! - **Frame requests** (`request_frame`) - callbacks for the next rendering
//!   tick, delivered once per tick with that tick's timestamp
//!
//! The host calls [`AnimationScheduler::tick`] with a monotonic timestamp.
//! Callbacks run with no scheduler borrow held, so they may queue more work
//! through a [`SchedulerHandle`]; anything queued during a tick waits for the
//! next one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending one-shot timer
    pub struct TimerId;
    /// Handle to a pending rendering-tick callback
    pub struct FrameRequestId;
}

/// Timer callback, invoked with the tick timestamp in milliseconds
pub type TimerCallback = Box<dyn FnOnce(f64)>;

/// Frame callback, invoked with the rendering-tick timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

struct Timer {
    due_ms: f64,
    seq: u64,
    callback: TimerCallback,
}

struct FrameRequest {
    seq: u64,
    callback: FrameCallback,
}

/// Internal state of the scheduler
struct SchedulerInner {
    now_ms: f64,
    last_frame_ms: Option<f64>,
    timers: SlotMap<TimerId, Timer>,
    frames: SlotMap<FrameRequestId, FrameRequest>,
    next_seq: u64,
}

impl SchedulerInner {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn has_pending(&self) -> bool {
        !self.timers.is_empty() || !self.frames.is_empty()
    }
}

/// The scheduler that owns all pending timers and frame requests
///
/// Typically owned by the page runtime; controllers receive a
/// [`SchedulerHandle`] instead.
///
/// ```ignore
/// let scheduler = AnimationScheduler::new();
/// let handle = scheduler.handle();
/// handle.schedule(200.0, |now| println!("fired at {now}"));
/// scheduler.tick(250.0);
/// ```
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a scheduler whose notion of "now" starts at `now_ms`
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                now_ms,
                last_frame_ms: None,
                timers: SlotMap::with_key(),
                frames: SlotMap::with_key(),
                next_seq: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Timestamp of the most recent tick
    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    /// Run one host loop turn at `now_ms`
    ///
    /// Due timers run first, then at most one rendering tick of frame
    /// callbacks. A tick whose timestamp does not move past the previous
    /// rendering tick delivers no frames, which keeps frame timestamps
    /// strictly increasing. Time never runs backwards: earlier timestamps are
    /// treated as the current time.
    ///
    /// Returns true if timers or frame requests are still pending.
    pub fn tick(&self, now_ms: f64) -> bool {
        let now = {
            let mut inner = self.inner.borrow_mut();
            if now_ms > inner.now_ms {
                inner.now_ms = now_ms;
            }
            inner.now_ms
        };

        self.run_due_timers(now);
        self.run_frame_callbacks(now);

        self.has_pending()
    }

    fn run_due_timers(&self, now: f64) {
        let due: Vec<Timer> = {
            let mut inner = self.inner.borrow_mut();
            let mut ids: Vec<(f64, u64, TimerId)> = inner
                .timers
                .iter()
                .filter(|(_, t)| t.due_ms <= now)
                .map(|(id, t)| (t.due_ms, t.seq, id))
                .collect();
            ids.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            ids.into_iter()
                .filter_map(|(_, _, id)| inner.timers.remove(id))
                .collect()
        };

        if !due.is_empty() {
            tracing::trace!("AnimationScheduler: {} timers due at {}", due.len(), now);
        }

        for timer in due {
            (timer.callback)(now);
        }
    }

    fn run_frame_callbacks(&self, now: f64) {
        let requests: Vec<FrameRequest> = {
            let mut inner = self.inner.borrow_mut();
            if inner.last_frame_ms.is_some_and(|last| now <= last) {
                return;
            }
            if inner.frames.is_empty() {
                return;
            }
            inner.last_frame_ms = Some(now);
            let mut requests: Vec<FrameRequest> =
                inner.frames.drain().map(|(_, request)| request).collect();
            requests.sort_by_key(|r| r.seq);
            requests
        };

        for request in requests {
            (request.callback)(now);
        }
    }

    /// Check if any timers or frame requests are pending
    pub fn has_pending(&self) -> bool {
        self.inner.borrow().has_pending()
    }

    /// Get the number of pending timers
    pub fn timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Get the number of pending frame requests
    pub fn frame_request_count(&self) -> usize {
        self.inner.borrow().frames.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// This is passed to components that need to queue work.
/// It won't keep the scheduler alive; once the scheduler is dropped every
/// operation becomes a no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Current scheduler time, or 0 if the scheduler is gone
    pub fn now_ms(&self) -> f64 {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().now_ms)
            .unwrap_or(0.0)
    }

    /// Run `callback` on the first tick at least `after_ms` from now
    pub fn schedule<F>(&self, after_ms: f64, callback: F) -> Option<TimerId>
    where
        F: FnOnce(f64) + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.borrow_mut();
            let due_ms = guard.now_ms + after_ms.max(0.0);
            let seq = guard.next_seq();
            guard.timers.insert(Timer {
                due_ms,
                seq,
                callback: Box::new(callback),
            })
        })
    }

    /// Run `callback` on the next rendering tick
    pub fn request_frame<F>(&self, callback: F) -> Option<FrameRequestId>
    where
        F: FnOnce(f64) + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.borrow_mut();
            let seq = guard.next_seq();
            guard.frames.insert(FrameRequest {
                seq,
                callback: Box::new(callback),
            })
        })
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
