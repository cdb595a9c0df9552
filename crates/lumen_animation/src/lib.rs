//! Lumen Animation System
//!
//! Time-based value interpolation driven by a host-supplied clock.
//!
//! # Features
//!
//! - **Easing**: the quartic ease-out used by counters
//! - **Clocks**: a monotonic system clock and a virtual clock for deterministic tests
//! - **Scheduler**: one-shot timers plus rendering-tick frame requests, ticked by the host
//! - **Interpolation**: a lazy, time-ordered, finite sequence of frames that always
//!   lands exactly on the end value
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use lumen_animation::{animate, AnimationScheduler, AnimationSpec};
//!
//! let scheduler = AnimationScheduler::new();
//! let values = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = values.clone();
//! animate(&scheduler.handle(), AnimationSpec::new(0.0, 1234.0, 2000.0), move |frame| {
//!     sink.borrow_mut().push(frame.value);
//! });
//!
//! let mut now = 0.0;
//! while scheduler.has_pending() {
//!     now += 16.0;
//!     scheduler.tick(now);
//! }
//!
//! assert_eq!(values.borrow().last().copied(), Some(1234.0));
//! ```

pub mod clock;
pub mod easing;
pub mod interpolate;
pub mod scheduler;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use easing::ease_out_quart;
pub use interpolate::{animate, AnimationSpec, Frames, Interpolation, InterpolationFrame};
pub use scheduler::{
    AnimationScheduler, FrameCallback, FrameRequestId, SchedulerHandle, TimerCallback, TimerId,
};
