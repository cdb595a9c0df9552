//! Time-based value interpolation
//!
//! An [`Interpolation`] turns a start/end/duration triple into frames on
//! demand. It never reads a clock: timestamps come from the caller, either
//! through [`Interpolation::frames`] (any iterator of tick times) or through
//! [`animate`], which pulls them from the scheduler's rendering ticks.
//!
//! Guarantees:
//! - frame timestamps strictly increase
//! - progress is non-decreasing and reaches exactly 1 once `duration_ms` has elapsed
//! - the final frame's value is exactly `end`
//! - nothing is produced after the final frame
//!
//! All arithmetic is done in `f64` on unrounded values; rounding for display
//! is the caller's business.

use crate::easing::ease_out_quart;
use crate::scheduler::SchedulerHandle;

/// Parameters of a numeric animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub start: f64,
    pub end: f64,
    pub duration_ms: f64,
}

impl AnimationSpec {
    /// Animation eased with a quartic ease-out
    pub fn new(start: f64, end: f64, duration_ms: f64) -> Self {
        Self {
            start,
            end,
            duration_ms,
        }
    }

    /// Value at a given linear progress
    ///
    /// Progress of 1 (or more) returns `end` itself rather than
    /// `start + (end - start) * 1.0`, which can differ in the last bit.
    pub fn value_at(&self, progress: f64) -> f64 {
        if progress >= 1.0 {
            return self.end;
        }
        self.start + (self.end - self.start) * ease_out_quart(progress)
    }
}

/// One sample of a running interpolation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolationFrame {
    pub timestamp_ms: f64,
    pub progress: f64,
    pub value: f64,
}

impl InterpolationFrame {
    pub fn is_final(&self) -> bool {
        self.progress >= 1.0
    }
}

/// State of one interpolation run
#[derive(Clone, Debug)]
pub struct Interpolation {
    spec: AnimationSpec,
    started_at_ms: f64,
    last_timestamp_ms: Option<f64>,
    progress: f64,
}

impl Interpolation {
    pub fn new(spec: AnimationSpec, started_at_ms: f64) -> Self {
        Self {
            spec,
            started_at_ms,
            last_timestamp_ms: None,
            progress: 0.0,
        }
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    pub fn started_at_ms(&self) -> f64 {
        self.started_at_ms
    }

    /// Progress of the most recent frame
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Produce the frame for `now_ms`
    ///
    /// Returns `None` once finished, or when `now_ms` does not move past the
    /// previous frame's timestamp.
    pub fn sample(&mut self, now_ms: f64) -> Option<InterpolationFrame> {
        if self.is_finished() {
            return None;
        }
        if self.last_timestamp_ms.is_some_and(|last| now_ms <= last) {
            return None;
        }

        let elapsed = (now_ms - self.started_at_ms).max(0.0);
        let progress = if self.spec.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / self.spec.duration_ms).min(1.0)
        };
        // Clamped timestamps before the start can't regress progress
        let progress = progress.max(self.progress);

        self.last_timestamp_ms = Some(now_ms);
        self.progress = progress;

        Some(InterpolationFrame {
            timestamp_ms: now_ms,
            progress,
            value: self.spec.value_at(progress),
        })
    }

    /// Lazily map a sequence of tick timestamps to frames
    pub fn frames<I>(self, ticks: I) -> Frames<I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        Frames {
            interpolation: self,
            ticks: ticks.into_iter(),
        }
    }
}

/// Iterator of frames over caller-supplied tick timestamps
///
/// Ticks that don't advance time are skipped; iteration ends after the final
/// frame or when the ticks run out.
pub struct Frames<I> {
    interpolation: Interpolation,
    ticks: I,
}

impl<I> Iterator for Frames<I>
where
    I: Iterator<Item = f64>,
{
    type Item = InterpolationFrame;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.interpolation.is_finished() {
            let tick = self.ticks.next()?;
            if let Some(frame) = self.interpolation.sample(tick) {
                return Some(frame);
            }
        }
        None
    }
}

struct FrameLoop {
    handle: SchedulerHandle,
    interpolation: Interpolation,
    on_frame: Box<dyn FnMut(&InterpolationFrame)>,
}

impl FrameLoop {
    fn request_next(self) -> bool {
        let handle = self.handle.clone();
        handle
            .request_frame(move |timestamp| {
                let mut this = self;
                if let Some(frame) = this.interpolation.sample(timestamp) {
                    tracing::trace!(
                        "interpolation frame t={} progress={} value={}",
                        frame.timestamp_ms,
                        frame.progress,
                        frame.value
                    );
                    (this.on_frame)(&frame);
                }
                if this.interpolation.is_finished() {
                    tracing::debug!(
                        "interpolation finished at {} (end={})",
                        timestamp,
                        this.interpolation.spec().end
                    );
                } else {
                    this.request_next();
                }
            })
            .is_some()
    }
}

/// Drive an interpolation from the scheduler's rendering ticks
///
/// Starts at the scheduler's current time and delivers one frame per
/// rendering tick until the end value is reached. There is no cancellation:
/// once started the animation always runs to its end value.
///
/// Returns false if the scheduler is gone.
pub fn animate<F>(handle: &SchedulerHandle, spec: AnimationSpec, on_frame: F) -> bool
where
    F: FnMut(&InterpolationFrame) + 'static,
{
    let started_at = handle.now_ms();
    tracing::debug!(
        "animate {} -> {} over {}ms from t={}",
        spec.start,
        spec.end,
        spec.duration_ms,
        started_at
    );
    FrameLoop {
        handle: handle.clone(),
        interpolation: Interpolation::new(spec, started_at),
        on_frame: Box::new(on_frame),
    }
    .request_next()
}
