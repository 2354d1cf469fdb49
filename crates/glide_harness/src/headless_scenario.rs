//! Scenario definition for headless panel runs.
//!
//! A scenario describes the host region, the panel's layout and tunables, an
//! optional tracked scroll view, and a list of steps:
//!
//! ```json
//! {
//!   "host": { "width": 375, "height": 667 },
//!   "layout": { "kind": "bottom" },
//!   "steps": [
//!     { "type": "show" },
//!     { "type": "pan_begin", "x": 100, "y": 10 },
//!     { "type": "pan_change", "dy": -200, "vy": -800 },
//!     { "type": "pan_end", "dy": -200, "vy": -800 },
//!     { "type": "settle" },
//!     { "type": "assert_state", "state": "full" }
//!   ]
//! }
//! ```

use anyhow::{anyhow, bail, Result};
use glide_core::{
    EdgeInsets, PanelState, Position, Rect, ReferenceEdge, ReferenceGuide, Size,
};
use glide_layout::{
    BottomLayout, FixedAnchor, IntrinsicAnchor, Layout, LayoutEnvironment, StaticLayout, TopLayout,
};
use glide_panel::PanelConfig;
use serde::Deserialize;
use std::path::Path;

/// A scripted panel session.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    #[serde(default)]
    pub host: HostSpec,
    #[serde(default)]
    pub layout: LayoutSpec,
    /// States beyond the built-in four, referenced by name in anchors and steps
    #[serde(default)]
    pub states: Vec<StateSpec>,
    #[serde(default)]
    pub config: Option<PanelConfig>,
    #[serde(default)]
    pub scroll_view: Option<ScrollViewSpec>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Resolve a state name against the built-in and declared states.
    pub fn resolve_state(&self, name: &str) -> Result<PanelState> {
        if let Some(state) = PanelState::builtin(name) {
            return Ok(state);
        }
        self.states
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| PanelState::new(spec.name.clone(), spec.order))
            .ok_or_else(|| anyhow!("unknown panel state '{name}'"))
    }

    /// Host measurements at the start of the run.
    pub fn environment(&self) -> LayoutEnvironment {
        let mut env = LayoutEnvironment::new(Size::new(self.host.width, self.host.height))
            .with_safe_area(self.host.safe_area)
            .with_display_scale(self.host.display_scale);
        if let Some(size) = self.host.intrinsic_size {
            env = env.with_intrinsic_size(size);
        }
        env
    }

    /// Build the layout described by the scenario.
    pub fn build_layout(&self) -> Result<Box<dyn Layout>> {
        match &self.layout {
            LayoutSpec::Bottom => Ok(Box::new(BottomLayout)),
            LayoutSpec::Top => Ok(Box::new(TopLayout)),
            LayoutSpec::Anchors {
                position,
                initial_state,
                anchors,
                backdrop,
            } => {
                let mut layout = StaticLayout::new(*position, self.resolve_state(initial_state)?);
                for spec in anchors {
                    let state = self.resolve_state(&spec.state)?;
                    layout = match spec.anchor {
                        AnchorKind::Fixed {
                            inset,
                            edge,
                            guide,
                            fractional,
                        } => {
                            let anchor = if fractional {
                                FixedAnchor::fractional(inset, edge, guide)
                            } else {
                                FixedAnchor::absolute(inset, edge, guide)
                            };
                            layout.anchor(state, anchor)
                        }
                        AnchorKind::Intrinsic {
                            offset,
                            guide,
                            fractional,
                        } => {
                            let anchor = if fractional {
                                IntrinsicAnchor::fractional(offset, guide)
                            } else {
                                IntrinsicAnchor::absolute(offset, guide)
                            };
                            layout.anchor(state, anchor)
                        }
                        AnchorKind::Hidden => layout.anchor(state, FixedAnchor::hidden(*position)),
                    };
                }
                for entry in backdrop {
                    layout = layout.backdrop(self.resolve_state(&entry.state)?, entry.alpha);
                }
                Ok(Box::new(layout))
            }
        }
    }

    /// Reject scenarios whose steps cannot run.
    pub fn validate(&self) -> Result<()> {
        if !(self.host.width > 0.0 && self.host.height > 0.0) {
            bail!("host dimensions must be positive");
        }
        for spec in &self.states {
            if PanelState::builtin(&spec.name).is_some() {
                bail!("state '{}' shadows a built-in state", spec.name);
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            let name = match step {
                ScenarioStep::MoveTo { state, .. } | ScenarioStep::AssertState { state } => {
                    Some(state)
                }
                ScenarioStep::AssertLocation { state, value, .. } => {
                    if state.is_none() == value.is_none() {
                        bail!("step {index}: assert_location needs exactly one of 'state' or 'value'");
                    }
                    state.as_ref()
                }
                ScenarioStep::ScrollTo { .. }
                | ScenarioStep::ScrollPan { .. }
                | ScenarioStep::AssertScrollLocked { .. }
                    if self.scroll_view.is_none() =>
                {
                    bail!("step {index}: scenario has no scroll view");
                }
                _ => None,
            };
            if let Some(name) = name {
                self.resolve_state(name)?;
            }
        }
        Ok(())
    }
}

/// Host region the panel moves in.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HostSpec {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_display_scale")]
    pub display_scale: f32,
    #[serde(default)]
    pub safe_area: EdgeInsets,
    /// Natural size of the panel's content, for intrinsic anchors
    #[serde(default)]
    pub intrinsic_size: Option<Size>,
}

fn default_width() -> f32 {
    375.0
}

fn default_height() -> f32 {
    667.0
}

fn default_display_scale() -> f32 {
    1.0
}

impl Default for HostSpec {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            display_scale: default_display_scale(),
            safe_area: EdgeInsets::ZERO,
            intrinsic_size: None,
        }
    }
}

/// A custom state declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct StateSpec {
    pub name: String,
    pub order: i32,
}

/// Which layout the panel starts with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutSpec {
    #[default]
    Bottom,
    Top,
    Anchors {
        position: Position,
        initial_state: String,
        anchors: Vec<AnchorSpec>,
        #[serde(default)]
        backdrop: Vec<BackdropSpec>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnchorSpec {
    pub state: String,
    #[serde(flatten)]
    pub anchor: AnchorKind,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "anchor", rename_all = "snake_case")]
pub enum AnchorKind {
    Fixed {
        inset: f32,
        edge: ReferenceEdge,
        #[serde(default)]
        guide: ReferenceGuide,
        #[serde(default)]
        fractional: bool,
    },
    Intrinsic {
        #[serde(default)]
        offset: f32,
        #[serde(default)]
        guide: ReferenceGuide,
        #[serde(default)]
        fractional: bool,
    },
    Hidden,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackdropSpec {
    pub state: String,
    pub alpha: f32,
}

/// Tracked scroll view frame and content size.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScrollViewSpec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub content_width: f32,
    pub content_height: f32,
}

impl ScrollViewSpec {
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn content_size(&self) -> Size {
        Size::new(self.content_width, self.content_height)
    }
}

/// One scripted action or check.
///
/// Pan translations are cumulative from `pan_begin`; the pointer location of a
/// pan sample is the begin location moved by the translation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Show {
        #[serde(default)]
        animated: bool,
    },
    Hide {
        #[serde(default)]
        animated: bool,
    },
    MoveTo {
        state: String,
        #[serde(default)]
        animated: bool,
    },
    PanBegin {
        x: f32,
        y: f32,
    },
    PanChange {
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
        #[serde(default)]
        vx: f32,
        #[serde(default)]
        vy: f32,
    },
    PanEnd {
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
        #[serde(default)]
        vx: f32,
        #[serde(default)]
        vy: f32,
    },
    ScrollTo {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    ScrollPan {
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
        #[serde(default)]
        vx: f32,
        #[serde(default)]
        vy: f32,
    },
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },
    /// Run frames until the panel stops animating
    Settle {
        #[serde(default = "default_settle_frames")]
        max_frames: u32,
    },
    AssertState {
        state: String,
    },
    AssertLocation {
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        value: Option<f32>,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertPhase {
        phase: String,
    },
    AssertScrollLocked {
        locked: bool,
    },
    AssertBackdrop {
        alpha: f32,
        #[serde(default = "default_alpha_tolerance")]
        tolerance: f32,
    },
}

fn default_settle_frames() -> u32 {
    600
}

fn default_tolerance() -> f32 {
    0.5
}

fn default_alpha_tolerance() -> f32 {
    0.01
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let scenario = HeadlessScenario::from_json(r#"{ "steps": [] }"#).unwrap();
        assert_eq!(scenario.host.width, 375.0);
        assert_eq!(scenario.host.height, 667.0);
        assert!(matches!(scenario.layout, LayoutSpec::Bottom));
        assert!(scenario.config.is_none());
    }

    #[test]
    fn test_custom_states_resolve() {
        let scenario = HeadlessScenario::from_json(
            r#"{ "states": [{ "name": "peek", "order": 300 }], "steps": [] }"#,
        )
        .unwrap();
        assert_eq!(scenario.resolve_state("full").unwrap(), PanelState::FULL);
        assert_eq!(scenario.resolve_state("peek").unwrap().order(), 300);
        assert!(scenario.resolve_state("nope").is_err());
    }

    #[test]
    fn test_anchor_layout() {
        let scenario = HeadlessScenario::from_json(
            r#"{
                "layout": {
                    "kind": "anchors",
                    "position": "bottom",
                    "initial_state": "half",
                    "anchors": [
                        { "state": "full", "anchor": "fixed", "inset": 20, "edge": "top" },
                        { "state": "half", "anchor": "fixed", "inset": 0.5, "edge": "bottom", "fractional": true }
                    ],
                    "backdrop": [{ "state": "full", "alpha": 0.3 }]
                },
                "steps": []
            }"#,
        )
        .unwrap();
        let layout = scenario.build_layout().unwrap();
        assert_eq!(layout.position(), Position::Bottom);
        assert_eq!(layout.initial_state(), PanelState::HALF);
        assert_eq!(layout.anchors().len(), 2);
    }

    #[test]
    fn test_validate_rejects_ambiguous_location() {
        let scenario = HeadlessScenario::from_json(
            r#"{ "steps": [{ "type": "assert_location", "state": "full", "value": 20 }] }"#,
        )
        .unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_validate_requires_scroll_view() {
        let scenario =
            HeadlessScenario::from_json(r#"{ "steps": [{ "type": "scroll_to", "y": 10 }] }"#)
                .unwrap();
        assert!(scenario.validate().is_err());
    }
}
