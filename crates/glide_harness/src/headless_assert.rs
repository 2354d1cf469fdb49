//! Assertion helpers for headless panel scenarios.

use glide_core::PanelState;
use glide_panel::{FloatingPanel, InteractionPhase, TrackedScrollView};

/// Snapshot of panel-observable state used for headless assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelProbe {
    pub state: PanelState,
    pub location: f32,
    pub phase: InteractionPhase,
    pub backdrop_alpha: f32,
    /// None when no scroll view is tracked
    pub scroll_locked: Option<bool>,
}

impl PanelProbe {
    pub fn capture(panel: &FloatingPanel) -> Self {
        Self {
            state: panel.state(),
            location: panel.surface_location(),
            phase: panel.phase(),
            backdrop_alpha: panel.backdrop_alpha(),
            scroll_locked: panel.scroll_view().map(|view| view.is_locked()),
        }
    }
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_assert_state(expected: &PanelState, probe: &PanelProbe) -> AssertionResult {
    if &probe.state == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "state_mismatch",
            format!("expected state '{expected}', got '{}'", probe.state),
        )
    }
}

pub fn evaluate_assert_location(expected: f32, tolerance: f32, probe: &PanelProbe) -> AssertionResult {
    if (probe.location - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "location_mismatch",
            format!(
                "expected location {expected} (±{tolerance}), got {}",
                probe.location
            ),
        )
    }
}

pub fn evaluate_assert_phase(expected: &str, probe: &PanelProbe) -> AssertionResult {
    let Some(phase) = parse_phase(expected) else {
        return AssertionResult::failed("unknown_phase", format!("'{expected}' is not a phase"));
    };
    if probe.phase == phase {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "phase_mismatch",
            format!("expected phase {phase:?}, got {:?}", probe.phase),
        )
    }
}

pub fn evaluate_assert_scroll_locked(expected: bool, probe: &PanelProbe) -> AssertionResult {
    match probe.scroll_locked {
        None => AssertionResult::failed("missing_scroll_view", "no scroll view is tracked".to_string()),
        Some(locked) if locked == expected => AssertionResult::Passed,
        Some(locked) => AssertionResult::failed(
            "scroll_lock_mismatch",
            format!("expected locked={expected}, got locked={locked}"),
        ),
    }
}

pub fn evaluate_assert_backdrop(expected: f32, tolerance: f32, probe: &PanelProbe) -> AssertionResult {
    if (probe.backdrop_alpha - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "backdrop_mismatch",
            format!(
                "expected backdrop alpha {expected} (±{tolerance}), got {}",
                probe.backdrop_alpha
            ),
        )
    }
}

fn parse_phase(name: &str) -> Option<InteractionPhase> {
    match name {
        "idle" => Some(InteractionPhase::Idle),
        "dragging" => Some(InteractionPhase::Dragging),
        "attracting" => Some(InteractionPhase::Attracting),
        "removing" => Some(InteractionPhase::Removing),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> PanelProbe {
        PanelProbe {
            state: PanelState::HALF,
            location: 333.5,
            phase: InteractionPhase::Idle,
            backdrop_alpha: 0.0,
            scroll_locked: None,
        }
    }

    #[test]
    fn test_location_tolerance() {
        assert_eq!(evaluate_assert_location(333.0, 0.5, &probe()), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_location(330.0, 0.5, &probe()),
            AssertionResult::Failed { ref code, .. } if code == "location_mismatch"
        ));
    }

    #[test]
    fn test_unknown_phase() {
        assert!(matches!(
            evaluate_assert_phase("flying", &probe()),
            AssertionResult::Failed { ref code, .. } if code == "unknown_phase"
        ));
        assert_eq!(evaluate_assert_phase("idle", &probe()), AssertionResult::Passed);
    }

    #[test]
    fn test_scroll_lock_without_view() {
        assert!(matches!(
            evaluate_assert_scroll_locked(true, &probe()),
            AssertionResult::Failed { ref code, .. } if code == "missing_scroll_view"
        ));
    }
}
