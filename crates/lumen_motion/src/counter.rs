//! Count-up animation for numeric displays
//!
//! A stat element's initial text is both the target value and the display
//! template: `"1,234"` counts up as grouped integers, `"98.5%"` as one-decimal
//! percentages. Once the element becomes visible the value interpolates from
//! zero and every frame re-renders the text in the same format.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use lumen_animation::{animate, AnimationSpec, InterpolationFrame};
use lumen_core::{ElementId, Margin};

use crate::tracker::MotionPhase;
use crate::visibility::{Detector, VisibilityPredicate};
use crate::MotionContext;

/// How the numeric part of a stat is rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberStyle {
    /// Floored, with `,` thousands separators
    #[default]
    Integer,
    /// Exactly one fractional digit
    Decimal,
}

/// Display template derived from a stat's initial text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumberFormat {
    pub style: NumberStyle,
    pub percent: bool,
}

impl NumberFormat {
    /// Infer the template: `.` anywhere means decimal, `%` anywhere means percent
    pub fn infer(text: &str) -> Self {
        Self {
            style: if text.contains('.') {
                NumberStyle::Decimal
            } else {
                NumberStyle::Integer
            },
            percent: text.contains('%'),
        }
    }

    /// Render a value for display
    ///
    /// Non-finite values render as zero.
    pub fn format(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let mut out = match self.style {
            NumberStyle::Integer => group_thousands(value.floor()),
            NumberStyle::Decimal => one_decimal(value),
        };
        if self.percent {
            out.push('%');
        }
        out
    }
}

/// One fractional digit, with exact ties (`x.25`, `x.75`) rounded away from zero
fn one_decimal(value: f64) -> String {
    let tie = (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    if tie {
        format!("{:.1}", value + 0.05f64.copysign(value))
    } else {
        format!("{:.1}", value)
    }
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("literal pattern"));

/// Longest leading `digits[.digits]` (or `.digits`) prefix
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)").expect("literal pattern"));

/// Parse the leading number of `text` once everything but digits and `.` is gone
///
/// `"1.2.3"` yields 1.2; text with no leading number yields `None`.
fn extract_number(text: &str) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(text, "");
    LEADING_NUMBER
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Everything needed to animate one stat, parsed once from its initial text
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterSpec {
    pub end: f64,
    pub format: NumberFormat,
    pub duration_ms: f64,
    valid: bool,
}

impl CounterSpec {
    /// Parse a stat's text
    ///
    /// Every character other than digits and `.` is discarded before
    /// parsing, so `"1,234"` is 1234 and `"150+"` is 150. Text with no
    /// usable number produces an invalid spec whose end value is 0.
    pub fn parse(text: &str, duration_ms: f64) -> Self {
        let format = NumberFormat::infer(text);
        match extract_number(text) {
            Some(end) => Self {
                end,
                format,
                duration_ms,
                valid: true,
            },
            None => Self {
                end: 0.0,
                format,
                duration_ms,
                valid: false,
            },
        }
    }

    /// Whether the text contained a usable number
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Interpolation from zero to the target, with the default quartic ease-out
    pub fn animation(&self) -> AnimationSpec {
        AnimationSpec::new(0.0, self.end, self.duration_ms)
    }

    pub fn render(&self, frame: &InterpolationFrame) -> String {
        self.format.format(frame.value)
    }
}

/// Counter settings, the `[counters]` section of the page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub selector: String,
    pub threshold: f32,
    pub margin_bottom: f32,
    pub duration_ms: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: ".stat-number".to_string(),
            threshold: 0.7,
            margin_bottom: -100.0,
            duration_ms: 2000.0,
        }
    }
}

impl CounterConfig {
    pub fn predicate(&self) -> VisibilityPredicate {
        VisibilityPredicate::new(self.threshold, Margin::bottom(self.margin_bottom))
    }
}

/// Wires stat elements to the detector and the interpolator
pub struct CounterController;

impl CounterController {
    /// Register every matching stat element
    ///
    /// Returns the registered elements in document order.
    pub fn install<D>(
        ctx: &MotionContext,
        detector: &mut D,
        config: &CounterConfig,
    ) -> lumen_core::Result<Vec<ElementId>>
    where
        D: Detector<ElementId> + ?Sized,
    {
        let stats: Vec<(ElementId, CounterSpec)> = {
            let doc = ctx.document.borrow();
            doc.query_all(&config.selector)?
                .into_iter()
                .map(|id| {
                    let text = doc.text_content(id).unwrap_or_default();
                    (id, CounterSpec::parse(&text, config.duration_ms))
                })
                .collect()
        };

        let predicate = config.predicate();
        for (id, spec) in &stats {
            let spec = *spec;
            if !spec.is_valid() {
                tracing::warn!(
                    "counter {:?}: no number in text, will render {}",
                    id,
                    spec.format.format(0.0)
                );
            }
            ctx.tracker.register(*id);
            let ctx = ctx.clone();
            detector.observe(*id, predicate, Box::new(move |id: ElementId| Self::start(&ctx, id, spec)));
        }

        tracing::debug!("CounterController: {} stats registered", stats.len());
        Ok(stats.into_iter().map(|(id, _)| id).collect())
    }

    fn start(ctx: &MotionContext, id: ElementId, spec: CounterSpec) {
        let now = ctx.scheduler.now_ms();
        ctx.tracker.transition(id, MotionPhase::Animating, now);

        if !spec.is_valid() {
            ctx.document.borrow_mut().set_text(id, spec.format.format(0.0));
            ctx.tracker.transition(id, MotionPhase::Settled, now);
            return;
        }

        tracing::debug!("counter {:?}: counting to {} over {}ms", id, spec.end, spec.duration_ms);
        let document = ctx.document.clone();
        let tracker = ctx.tracker.clone();
        let started = animate(&ctx.scheduler, spec.animation(), move |frame| {
            document.borrow_mut().set_text(id, spec.render(frame));
            if frame.is_final() {
                tracker.transition(id, MotionPhase::Settled, frame.timestamp_ms);
            }
        });
        if !started {
            tracing::warn!("counter {:?}: scheduler gone, animation not started", id);
        }
    }
}
