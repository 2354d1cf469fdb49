//! Behavior policy
//!
//! Tunables read by the interaction controller whenever it needs them. The
//! [`Behavior`] trait has no optional methods: hosts either use
//! [`DefaultBehavior`], load a [`BehaviorConfig`], or implement the trait and
//! delegate what they do not change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use glide_animation::{DecelerationRate, SpringConfig};
use glide_core::{PanelState, RectEdge};

/// Policy supplying the tunables of a panel's motion
pub trait Behavior {
    /// Deceleration rate the attraction spring derives its damping from
    fn spring_deceleration_rate(&self) -> f32;

    /// Response time of the attraction spring in seconds
    fn spring_response_time(&self) -> f32;

    /// Deceleration rate used to project a release velocity into travel
    fn momentum_projection_rate(&self) -> f32;

    /// Whether a release may project past the neighbouring anchor toward `to`
    fn should_project_momentum(&self, to: &PanelState) -> bool;

    /// Progress between two anchors required to commit to `to` (0..=1)
    fn redirectional_progress(&self, from: &PanelState, to: &PanelState) -> f32;

    /// Whether dragging past the extreme anchor on `edge` rubber-bands
    fn allows_rubber_banding(&self, edge: RectEdge) -> bool;

    /// Removal speed, in travel-distances-to-hidden per second
    fn removal_interaction_velocity_threshold(&self) -> f32;

    /// Fraction of the way from the least expanded anchor to hidden that removes
    fn removal_interaction_progress_threshold(&self) -> f32;
}

/// Attraction spring parameters for a behavior on a display
pub fn spring_config(behavior: &dyn Behavior, display_scale: f32) -> SpringConfig {
    SpringConfig::new(
        behavior.spring_deceleration_rate(),
        behavior.spring_response_time(),
        display_scale,
    )
}

/// The stock behavior
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBehavior;

impl Behavior for DefaultBehavior {
    fn spring_deceleration_rate(&self) -> f32 {
        DecelerationRate::FAST + 0.001
    }

    fn spring_response_time(&self) -> f32 {
        0.4
    }

    fn momentum_projection_rate(&self) -> f32 {
        DecelerationRate::NORMAL
    }

    fn should_project_momentum(&self, _to: &PanelState) -> bool {
        true
    }

    fn redirectional_progress(&self, _from: &PanelState, _to: &PanelState) -> f32 {
        0.5
    }

    fn allows_rubber_banding(&self, _edge: RectEdge) -> bool {
        false
    }

    fn removal_interaction_velocity_threshold(&self) -> f32 {
        5.5
    }

    fn removal_interaction_progress_threshold(&self) -> f32 {
        1.0
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its valid range
    #[error("Invalid config value for {field}: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Behavior tunables as data
///
/// Every field has a default, so a partial TOML table is valid:
///
/// ```toml
/// spring_response_time = 0.3
/// rubber_band_edges = ["top", "bottom"]
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BehaviorConfig {
    #[serde(default = "default_spring_deceleration_rate")]
    pub spring_deceleration_rate: f32,
    #[serde(default = "default_spring_response_time")]
    pub spring_response_time: f32,
    #[serde(default = "default_momentum_projection_rate")]
    pub momentum_projection_rate: f32,
    #[serde(default = "default_true")]
    pub project_momentum: bool,
    #[serde(default = "default_redirectional_progress")]
    pub redirectional_progress: f32,
    #[serde(default)]
    pub rubber_band_edges: Vec<RectEdge>,
    #[serde(default = "default_removal_velocity_threshold")]
    pub removal_velocity_threshold: f32,
    #[serde(default = "default_removal_progress_threshold")]
    pub removal_progress_threshold: f32,
}

fn default_spring_deceleration_rate() -> f32 {
    DecelerationRate::FAST + 0.001
}

fn default_spring_response_time() -> f32 {
    0.4
}

fn default_momentum_projection_rate() -> f32 {
    DecelerationRate::NORMAL
}

fn default_true() -> bool {
    true
}

fn default_redirectional_progress() -> f32 {
    0.5
}

fn default_removal_velocity_threshold() -> f32 {
    5.5
}

fn default_removal_progress_threshold() -> f32 {
    1.0
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            spring_deceleration_rate: default_spring_deceleration_rate(),
            spring_response_time: default_spring_response_time(),
            momentum_projection_rate: default_momentum_projection_rate(),
            project_momentum: true,
            redirectional_progress: default_redirectional_progress(),
            rubber_band_edges: Vec::new(),
            removal_velocity_threshold: default_removal_velocity_threshold(),
            removal_progress_threshold: default_removal_progress_threshold(),
        }
    }
}

impl BehaviorConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: BehaviorConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every rate and time is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_rate = |field: &'static str, value: f32| {
            if value > 0.0 && value < 1.0 {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange { field, value })
            }
        };
        unit_rate("spring_deceleration_rate", self.spring_deceleration_rate)?;
        unit_rate("momentum_projection_rate", self.momentum_projection_rate)?;
        if !(self.spring_response_time > 0.0 && self.spring_response_time.is_finite()) {
            return Err(ConfigError::OutOfRange {
                field: "spring_response_time",
                value: self.spring_response_time,
            });
        }
        if !self.removal_velocity_threshold.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "removal_velocity_threshold",
                value: self.removal_velocity_threshold,
            });
        }
        Ok(())
    }

    /// Rubber-band at the given edges
    pub fn with_rubber_banding(mut self, edges: &[RectEdge]) -> Self {
        self.rubber_band_edges = edges.to_vec();
        self
    }
}

/// A [`Behavior`] backed by a [`BehaviorConfig`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfiguredBehavior {
    config: BehaviorConfig,
}

impl ConfiguredBehavior {
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }
}

impl From<BehaviorConfig> for ConfiguredBehavior {
    fn from(config: BehaviorConfig) -> Self {
        Self::new(config)
    }
}

impl Behavior for ConfiguredBehavior {
    fn spring_deceleration_rate(&self) -> f32 {
        self.config.spring_deceleration_rate
    }

    fn spring_response_time(&self) -> f32 {
        self.config.spring_response_time
    }

    fn momentum_projection_rate(&self) -> f32 {
        self.config.momentum_projection_rate
    }

    fn should_project_momentum(&self, _to: &PanelState) -> bool {
        self.config.project_momentum
    }

    fn redirectional_progress(&self, _from: &PanelState, _to: &PanelState) -> f32 {
        self.config.redirectional_progress
    }

    fn allows_rubber_banding(&self, edge: RectEdge) -> bool {
        self.config.rubber_band_edges.contains(&edge)
    }

    fn removal_interaction_velocity_threshold(&self) -> f32 {
        self.config.removal_velocity_threshold
    }

    fn removal_interaction_progress_threshold(&self) -> f32 {
        self.config.removal_progress_threshold
    }
}
