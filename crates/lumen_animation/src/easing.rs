//! Easing curve
//!
//! Counters decelerate into their target with a quartic ease-out. The curve
//! maps linear progress in `[0, 1]` to eased progress with `ease_out_quart(0)
//! == 0` and `ease_out_quart(1) == 1`. Input outside the range is clamped.

/// `1 - (1 - p)^4`: fast start decelerating into the endpoint
pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(4)
}
