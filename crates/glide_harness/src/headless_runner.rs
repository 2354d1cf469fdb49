//! Scenario runner that drives a floating panel through scripted steps.

use crate::headless_assert::{
    evaluate_assert_backdrop, evaluate_assert_location, evaluate_assert_phase,
    evaluate_assert_scroll_locked, evaluate_assert_state, AssertionResult, PanelProbe,
};
use crate::headless_report::HeadlessReport;
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use anyhow::{bail, Result};
use glide_core::{PanGesture, Point, Vector};
use glide_panel::testing::{MockScrollView, RecordingObserver};
use glide_panel::FloatingPanel;
use tracing::{debug, info};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON with the default frame clock.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, HeadlessRunConfig::default())
}

/// Execute a pre-loaded scenario.
///
/// Errors are scenario errors (unknown states, missing scroll view, invalid
/// layout); failed assertions produce a failed outcome instead.
pub fn run_loaded_scenario(
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
) -> Result<RunOutcome> {
    scenario.validate()?;
    if runtime_cfg.tick_ms == 0 {
        bail!("headless tick_ms must be > 0");
    }
    let mut session = Session::new(scenario, runtime_cfg)?;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        debug!("step {}: {:?}", step_index, step);
        if let Some((assertion, code, message)) = session.run_step(scenario, step)? {
            info!("step {} failed: {}", step_index, message);
            let report = HeadlessReport::failed(
                assertion,
                step_index,
                code,
                message,
                &PanelProbe::capture(&session.panel),
                session.elapsed_frames,
                session.elapsed_ms,
            )
            .with_state_changes(session.state_changes());
            return Ok(RunOutcome::Failed { report });
        }
    }

    let report = HeadlessReport::passed(
        &PanelProbe::capture(&session.panel),
        session.elapsed_frames,
        session.elapsed_ms,
    )
    .with_state_changes(session.state_changes());
    Ok(RunOutcome::Passed { report })
}

/// (assertion, code, message)
type StepFailure = (&'static str, String, String);

struct Session {
    panel: FloatingPanel,
    observer: RecordingObserver,
    scroll_view: Option<MockScrollView>,
    pan_origin: Point,
    runtime_cfg: HeadlessRunConfig,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

impl Session {
    fn new(scenario: &HeadlessScenario, runtime_cfg: HeadlessRunConfig) -> Result<Self> {
        let observer = RecordingObserver::new();
        let mut panel = FloatingPanel::from_boxed(
            scenario.build_layout()?,
            Box::new(scenario.environment()),
        )?;
        if let Some(config) = &scenario.config {
            config.validate()?;
            panel = panel.with_config(config.clone());
        }
        let mut panel = panel.with_observer(observer.clone());

        let scroll_view = scenario.scroll_view.map(|spec| {
            let view = MockScrollView::new(spec.frame(), spec.content_size());
            panel.track_scroll_view(view.boxed());
            view
        });

        Ok(Self {
            panel,
            observer,
            scroll_view,
            pan_origin: Point::ZERO,
            runtime_cfg,
            elapsed_frames: 0,
            elapsed_ms: 0,
        })
    }

    fn state_changes(&self) -> Vec<String> {
        self.observer
            .state_changes()
            .iter()
            .map(|state| state.name().to_string())
            .collect()
    }

    fn pan_gesture(&self, dx: f32, dy: f32, vx: f32, vy: f32, ended: bool) -> PanGesture {
        let translation = Vector::new(dx, dy);
        let velocity = Vector::new(vx, vy);
        let location = Point::new(self.pan_origin.x + dx, self.pan_origin.y + dy);
        if ended {
            PanGesture::ended(translation, velocity, location)
        } else {
            PanGesture::changed(translation, velocity, location)
        }
    }

    fn run_step(
        &mut self,
        scenario: &HeadlessScenario,
        step: &ScenarioStep,
    ) -> Result<Option<StepFailure>> {
        match step {
            ScenarioStep::Show { animated } => self.panel.show(*animated)?,
            ScenarioStep::Hide { animated } => self.panel.hide(*animated)?,
            ScenarioStep::MoveTo { state, animated } => {
                self.panel.move_to(scenario.resolve_state(state)?, *animated)?
            }
            ScenarioStep::PanBegin { x, y } => {
                self.pan_origin = Point::new(*x, *y);
                self.panel.touches_began(self.pan_origin);
                self.panel.handle_pan(PanGesture::began(self.pan_origin));
            }
            ScenarioStep::PanChange { dx, dy, vx, vy } => {
                let gesture = self.pan_gesture(*dx, *dy, *vx, *vy, false);
                self.panel.handle_pan(gesture);
            }
            ScenarioStep::PanEnd { dx, dy, vx, vy } => {
                let gesture = self.pan_gesture(*dx, *dy, *vx, *vy, true);
                self.panel.handle_pan(gesture);
            }
            ScenarioStep::ScrollTo { x, y } => {
                if let Some(view) = &self.scroll_view {
                    view.scroll_to(Point::new(*x, *y));
                }
            }
            ScenarioStep::ScrollPan { dx, dy, vx, vy } => {
                let gesture = self.pan_gesture(*dx, *dy, *vx, *vy, false);
                self.panel.handle_scroll_pan(gesture);
            }
            ScenarioStep::Wait { ms } => {
                let frames = wait_frames(*ms, self.runtime_cfg.tick_ms);
                self.run_frames(frames, false)?;
            }
            ScenarioStep::Tick { frames } => self.run_frames(*frames, false)?,
            ScenarioStep::Settle { max_frames } => {
                if self.panel.is_animating() {
                    self.run_frames(*max_frames, true)?;
                }
                if self.panel.is_animating() {
                    return Ok(Some((
                        "settle",
                        "not_settled".to_string(),
                        format!("still animating after {max_frames} frames"),
                    )));
                }
            }
            ScenarioStep::AssertState { state } => {
                let expected = scenario.resolve_state(state)?;
                return Ok(self.check("assert_state", |probe| {
                    evaluate_assert_state(&expected, probe)
                }));
            }
            ScenarioStep::AssertLocation {
                state,
                value,
                tolerance,
            } => {
                let expected = match (state, value) {
                    (Some(state), _) => self
                        .panel
                        .surface_location_for(&scenario.resolve_state(state)?),
                    (None, Some(value)) => *value,
                    (None, None) => bail!("assert_location needs 'state' or 'value'"),
                };
                return Ok(self.check("assert_location", |probe| {
                    evaluate_assert_location(expected, *tolerance, probe)
                }));
            }
            ScenarioStep::AssertPhase { phase } => {
                return Ok(self.check("assert_phase", |probe| evaluate_assert_phase(phase, probe)));
            }
            ScenarioStep::AssertScrollLocked { locked } => {
                return Ok(self.check("assert_scroll_locked", |probe| {
                    evaluate_assert_scroll_locked(*locked, probe)
                }));
            }
            ScenarioStep::AssertBackdrop { alpha, tolerance } => {
                return Ok(self.check("assert_backdrop", |probe| {
                    evaluate_assert_backdrop(*alpha, *tolerance, probe)
                }));
            }
        }
        Ok(None)
    }

    fn check<F>(&self, assertion: &'static str, evaluate: F) -> Option<StepFailure>
    where
        F: FnOnce(&PanelProbe) -> AssertionResult,
    {
        match evaluate(&PanelProbe::capture(&self.panel)) {
            AssertionResult::Passed => None,
            AssertionResult::Failed { code, message } => Some((assertion, code, message)),
        }
    }

    /// Run up to `frames` display frames, stopping once idle when `until_idle`.
    fn run_frames(&mut self, frames: u32, until_idle: bool) -> Result<()> {
        if frames == 0 {
            return Ok(());
        }
        let cfg = HeadlessRunConfig {
            max_frames: frames,
            ..self.runtime_cfg
        };
        let panel = &mut self.panel;
        let ran = HeadlessRuntime::run(cfg, self.elapsed_ms, |ctx| {
            let animating = panel.on_frame(ctx.frame());
            !until_idle || animating
        })?;
        self.elapsed_frames = self.elapsed_frames.saturating_add(ran as u64);
        self.elapsed_ms = self
            .elapsed_ms
            .saturating_add(self.runtime_cfg.tick_ms.saturating_mul(ran as u64));
        Ok(())
    }
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    if wait_ms == 0 {
        return 0;
    }
    let tick = tick_ms.max(1);
    let frames = wait_ms.saturating_add(tick.saturating_sub(1)) / tick;
    frames.min(u32::MAX as u64) as u32
}
