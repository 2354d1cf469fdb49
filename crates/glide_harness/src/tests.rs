//! Scenario tests for glide_harness
//!
//! Scenarios use the default bottom layout in a 375x667 host: full at 18,
//! half at 333.5, tip at 598 and hidden at 767.

use crate::headless_report::ReportStatus;
use crate::headless_runner::{run_scenario, RunOutcome};

fn passed(input: &str) -> crate::HeadlessReport {
    match run_scenario(input).unwrap() {
        RunOutcome::Passed { report } => report,
        RunOutcome::Failed { report } => panic!("scenario failed: {:?}", report),
    }
}

fn failed(input: &str) -> crate::HeadlessReport {
    match run_scenario(input).unwrap() {
        RunOutcome::Failed { report } => report,
        RunOutcome::Passed { report } => panic!("scenario passed: {:?}", report),
    }
}

#[test]
fn test_show_and_programmatic_move() {
    let report = passed(
        r#"{
            "steps": [
                { "type": "show" },
                { "type": "assert_state", "state": "half" },
                { "type": "assert_location", "value": 333.5 },
                { "type": "move_to", "state": "full", "animated": true },
                { "type": "assert_phase", "phase": "idle" },
                { "type": "settle" },
                { "type": "assert_location", "state": "full" },
                { "type": "assert_backdrop", "alpha": 0.3 }
            ]
        }"#,
    );
    assert_eq!(report.status, ReportStatus::Passed);
    assert_eq!(report.final_state, "full");
    assert_eq!(report.state_changes, vec!["half", "full"]);
    assert!(report.elapsed_frames > 0);
    assert_eq!(report.elapsed_ms, report.elapsed_frames * 16);
}

#[test]
fn test_drag_release_attracts_to_full() {
    let report = passed(
        r#"{
            "steps": [
                { "type": "show" },
                { "type": "pan_begin", "x": 100, "y": 10 },
                { "type": "pan_change", "dy": 1 },
                { "type": "pan_change", "dy": -289 },
                { "type": "assert_phase", "phase": "dragging" },
                { "type": "assert_location", "value": 43.5 },
                { "type": "pan_end", "dy": -289 },
                { "type": "assert_phase", "phase": "attracting" },
                { "type": "assert_state", "state": "half" },
                { "type": "settle" },
                { "type": "assert_phase", "phase": "idle" },
                { "type": "assert_state", "state": "full" },
                { "type": "assert_location", "state": "full" }
            ]
        }"#,
    );
    assert_eq!(report.state_changes, vec!["half", "full"]);
}

#[test]
fn test_fling_down_goes_to_tip() {
    let report = passed(
        r#"{
            "steps": [
                { "type": "show" },
                { "type": "pan_begin", "x": 100, "y": 10 },
                { "type": "pan_change", "dy": 1 },
                { "type": "pan_change", "dy": 21 },
                { "type": "pan_end", "dy": 21, "vy": 1000 },
                { "type": "settle" },
                { "type": "assert_state", "state": "tip" },
                { "type": "assert_location", "value": 598 }
            ]
        }"#,
    );
    assert_eq!(report.final_location, 598.0);
}

#[test]
fn test_fling_removes_panel() {
    passed(
        r#"{
            "config": { "removal_interaction_enabled": true },
            "steps": [
                { "type": "move_to", "state": "tip" },
                { "type": "pan_begin", "x": 100, "y": 10 },
                { "type": "pan_change", "dy": 1 },
                { "type": "pan_change", "dy": 101 },
                { "type": "assert_location", "value": 698 },
                { "type": "pan_end", "dy": 101, "vy": 1000 },
                { "type": "assert_phase", "phase": "removing" },
                { "type": "settle" },
                { "type": "assert_state", "state": "hidden" },
                { "type": "assert_location", "value": 767 }
            ]
        }"#,
    );
}

#[test]
fn test_failed_assertion_reports_step() {
    let report = failed(
        r#"{
            "steps": [
                { "type": "show" },
                { "type": "assert_state", "state": "full" },
                { "type": "move_to", "state": "full" }
            ]
        }"#,
    );
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.failed_step_index, Some(1));
    assert_eq!(report.assertion.as_deref(), Some("assert_state"));
    assert_eq!(report.code.as_deref(), Some("state_mismatch"));
    assert_eq!(report.final_state, "half");
}

#[test]
fn test_settle_budget_exhausted() {
    let report = failed(
        r#"{
            "steps": [
                { "type": "show" },
                { "type": "move_to", "state": "full", "animated": true },
                { "type": "settle", "max_frames": 1 }
            ]
        }"#,
    );
    assert_eq!(report.assertion.as_deref(), Some("settle"));
    assert_eq!(report.code.as_deref(), Some("not_settled"));
    assert_eq!(report.elapsed_frames, 1);
}

#[test]
fn test_wait_advances_logical_clock() {
    let report = passed(
        r#"{
            "steps": [
                { "type": "show" },
                { "type": "move_to", "state": "full", "animated": true },
                { "type": "wait", "ms": 40 }
            ]
        }"#,
    );
    assert_eq!(report.elapsed_frames, 3);
    assert_eq!(report.elapsed_ms, 48);
    assert!(report.final_location < 333.5);
}

#[test]
fn test_custom_state_layout() {
    passed(
        r#"{
            "states": [{ "name": "peek", "order": 300 }],
            "layout": {
                "kind": "anchors",
                "position": "bottom",
                "initial_state": "peek",
                "anchors": [
                    { "state": "full", "anchor": "fixed", "inset": 20, "edge": "top" },
                    { "state": "peek", "anchor": "fixed", "inset": 300, "edge": "bottom" },
                    { "state": "tip", "anchor": "fixed", "inset": 60, "edge": "bottom" }
                ]
            },
            "steps": [
                { "type": "show" },
                { "type": "assert_state", "state": "peek" },
                { "type": "assert_location", "value": 367 },
                { "type": "move_to", "state": "tip" },
                { "type": "assert_location", "value": 607 }
            ]
        }"#,
    );
}

#[test]
fn test_scroll_view_locks_below_full() {
    passed(
        r#"{
            "scroll_view": { "y": 36, "width": 375, "height": 611, "content_width": 375, "content_height": 2000 },
            "steps": [
                { "type": "show" },
                { "type": "assert_scroll_locked", "locked": true },
                { "type": "move_to", "state": "full" },
                { "type": "assert_scroll_locked", "locked": false }
            ]
        }"#,
    );
}

#[test]
fn test_unknown_state_is_a_scenario_error() {
    let result = run_scenario(r#"{ "steps": [{ "type": "move_to", "state": "peek" }] }"#);
    assert!(result.is_err());
}

#[test]
fn test_invalid_layout_is_a_scenario_error() {
    let result = run_scenario(
        r#"{
            "layout": { "kind": "anchors", "position": "bottom", "initial_state": "half", "anchors": [] },
            "steps": []
        }"#,
    );
    assert!(result.is_err());
}
