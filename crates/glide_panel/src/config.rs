//! Panel configuration
//!
//! Hand-off thresholds are feel-tuning values, not invariants, so they live
//! here next to the behavior tunables and can be loaded from TOML:
//!
//! ```toml
//! scroll_bounce_threshold = -30.0
//! removal_interaction_enabled = true
//!
//! [behavior]
//! spring_response_time = 0.3
//! ```

use serde::{Deserialize, Serialize};

use glide_layout::{BehaviorConfig, ConfigError, ConfiguredBehavior};

/// Panel-level tunables
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PanelConfig {
    /// Scroll offset past the pinned edge, in points, beyond which the tracked
    /// scroll view keeps its pan gesture instead of yielding to the panel
    #[serde(default = "default_scroll_bounce_threshold")]
    pub scroll_bounce_threshold: f32,

    /// Length of the grabber area along the panel's leading edge
    #[serde(default = "default_grabber_area_length")]
    pub grabber_area_length: f32,

    /// Allow removing the panel by flinging it toward `hidden`
    #[serde(default)]
    pub removal_interaction_enabled: bool,

    /// Disable scrolling at the start of an attraction to a state that does
    /// not scroll
    #[serde(default = "default_true")]
    pub attraction_lock_scroll: bool,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_scroll_bounce_threshold() -> f32 {
    -30.0
}

fn default_grabber_area_length() -> f32 {
    36.0
}

fn default_true() -> bool {
    true
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            scroll_bounce_threshold: default_scroll_bounce_threshold(),
            grabber_area_length: default_grabber_area_length(),
            removal_interaction_enabled: false,
            attraction_lock_scroll: true,
            behavior: BehaviorConfig::default(),
        }
    }
}

impl PanelConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PanelConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grabber_area_length >= 0.0 && self.grabber_area_length.is_finite()) {
            return Err(ConfigError::OutOfRange {
                field: "grabber_area_length",
                value: self.grabber_area_length,
            });
        }
        if !self.scroll_bounce_threshold.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "scroll_bounce_threshold",
                value: self.scroll_bounce_threshold,
            });
        }
        self.behavior.validate()
    }

    pub fn with_removal_interaction(mut self, enabled: bool) -> Self {
        self.removal_interaction_enabled = enabled;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// The behavior described by the `behavior` table
    pub fn configured_behavior(&self) -> ConfiguredBehavior {
        ConfiguredBehavior::new(self.behavior.clone())
    }
}
