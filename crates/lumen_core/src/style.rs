//! Inline style model
//!
//! Only the properties the behaviour layer writes are modelled. Each field is
//! `None` until something sets it, mirroring an element's `style` attribute
//! where unset properties fall back to the stylesheet.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::Color;
use crate::css;
use crate::error::{CoreError, Result};

/// Single-axis translate transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Translate {
    X(f32),
    Y(f32),
}

impl Translate {
    /// The translate that puts an element back at its layout position
    pub fn identity(&self) -> Translate {
        match self {
            Translate::X(_) => Translate::X(0.0),
            Translate::Y(_) => Translate::Y(0.0),
        }
    }

    pub fn is_identity(&self) -> bool {
        match *self {
            Translate::X(v) | Translate::Y(v) => v == 0.0,
        }
    }
}

impl fmt::Display for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (axis, value) = match *self {
            Translate::X(v) => ("X", v),
            Translate::Y(v) => ("Y", v),
        };
        if value == 0.0 {
            write!(f, "translate{}(0)", axis)
        } else {
            write!(f, "translate{}({}px)", axis, value)
        }
    }
}

/// Properties a transition can target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionProperty {
    Opacity,
    Transform,
}

impl fmt::Display for TransitionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionProperty::Opacity => f.write_str("opacity"),
            TransitionProperty::Transform => f.write_str("transform"),
        }
    }
}

/// `ease` transition declaration shared by a set of properties
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub properties: SmallVec<[TransitionProperty; 2]>,
    pub duration_ms: u32,
    pub delay_ms: u32,
}

impl Transition {
    /// `opacity` and `transform` with the same duration and `ease` timing
    pub fn fade_and_move(duration_ms: u32) -> Self {
        Self {
            properties: SmallVec::from_slice(&[
                TransitionProperty::Opacity,
                TransitionProperty::Transform,
            ]),
            duration_ms,
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.duration_ms as f32 / 1000.0;
        let delay = self.delay_ms as f32 / 1000.0;
        for (i, property) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}s ease", property, duration)?;
            if self.delay_ms > 0 {
                write!(f, " {}s", delay)?;
            }
        }
        Ok(())
    }
}

/// Box shadow value
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Shadow {
    None,
    Drop {
        offset_x: f32,
        offset_y: f32,
        blur: f32,
        color: Color,
    },
}

impl Shadow {
    /// Parse `none` or `<x> <y> <blur> <color>` with optional `px` units
    pub fn parse_css(input: &str) -> Result<Self> {
        css::parse_all(css::shadow, input).ok_or_else(|| CoreError::InvalidColor(input.to_string()))
    }
}

impl fmt::Display for Shadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shadow::None => f.write_str("none"),
            Shadow::Drop {
                offset_x,
                offset_y,
                blur,
                color,
            } => {
                let length = |v: f32| {
                    if v == 0.0 {
                        "0".to_string()
                    } else {
                        format!("{}px", v)
                    }
                };
                write!(
                    f,
                    "{} {} {} {}",
                    length(*offset_x),
                    length(*offset_y),
                    length(*blur),
                    color
                )
            }
        }
    }
}

impl TryFrom<String> for Shadow {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_css(&value)
    }
}

impl From<Shadow> for String {
    fn from(shadow: Shadow) -> Self {
        shadow.to_string()
    }
}

/// Pointer cursor shown over an element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Auto,
    Pointer,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Auto => f.write_str("auto"),
            Cursor::Pointer => f.write_str("pointer"),
        }
    }
}

/// Inline style attribute of an element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InlineStyle {
    pub opacity: Option<f32>,
    pub transform: Option<Translate>,
    pub transition: Option<Transition>,
    pub background: Option<Color>,
    pub color: Option<Color>,
    pub box_shadow: Option<Shadow>,
    pub cursor: Option<Cursor>,
}

impl InlineStyle {
    pub fn is_empty(&self) -> bool {
        *self == InlineStyle::default()
    }

    /// Effective opacity (unset means fully opaque)
    pub fn effective_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut declarations: Vec<String> = Vec::new();
        if let Some(opacity) = self.opacity {
            declarations.push(format!("opacity: {}", opacity));
        }
        if let Some(transform) = &self.transform {
            declarations.push(format!("transform: {}", transform));
        }
        if let Some(transition) = &self.transition {
            declarations.push(format!("transition: {}", transition));
        }
        if let Some(background) = &self.background {
            declarations.push(format!("background: {}", background));
        }
        if let Some(color) = &self.color {
            declarations.push(format!("color: {}", color));
        }
        if let Some(shadow) = &self.box_shadow {
            declarations.push(format!("box-shadow: {}", shadow));
        }
        if let Some(cursor) = &self.cursor {
            declarations.push(format!("cursor: {}", cursor));
        }
        f.write_str(&declarations.join("; "))
    }
}
