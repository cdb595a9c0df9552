//! Page configuration
//!
//! Every section and field is optional; anything omitted falls back to the
//! stock landing-page behaviour.
//!
//! ```toml
//! [counters]
//! duration_ms = 1500
//!
//! [cards]
//! stagger_ms = 80
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use lumen_motion::{CounterConfig, LineRevealConfig, SequenceConfig, StaggerConfig};

use crate::copy::CopyConfig;
use crate::error::Result;
use crate::header::HeaderConfig;
use crate::nav::NavConfig;

/// Configuration for one page session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub header: HeaderConfig,
    pub navigation: NavConfig,
    pub counters: CounterConfig,
    pub cards: StaggerConfig,
    pub quote: SequenceConfig,
    pub hero_code: LineRevealConfig,
    pub copy: CopyConfig,
}

impl PageConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        tracing::debug!("loading page config from {}", path.display());
        Self::from_toml_str(&text)
    }
}
