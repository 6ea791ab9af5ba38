//! Controller configuration
//!
//! The overlay id set is the controller's only required input. It can be
//! built in code or loaded from TOML:
//!
//! ```toml
//! overlays = ["modal-germinator", "modal-time"]
//!
//! [resolver]
//! margin = 20.0
//! trigger_tag = "button"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::resolver::ResolverConfig;

/// Configuration options for an [`crate::OverlayController`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ControllerConfig {
    /// Every overlay id the page declares
    #[serde(default)]
    pub overlays: Vec<String>,

    /// Positioning options
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl ControllerConfig {
    /// Create a configuration declaring `overlays`
    pub fn new<I, S>(overlays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            overlays: overlays.into_iter().map(Into::into).collect(),
            resolver: ResolverConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the positioning options
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the clamping margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.resolver.margin = margin;
        self
    }
}
