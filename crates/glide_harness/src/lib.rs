//! Glide Headless Harness
//!
//! Runs scripted floating-panel sessions without a host platform and reports
//! the outcome as JSON.
//!
//! - **Scenarios**: host size, layout, tunables, tracked scroll view and steps
//! - **Runner**: drives the panel on a deterministic frame clock
//! - **Report**: pass/fail with the failing step, final state and state history
//!
//! # Example
//!
//! ```rust
//! use glide_harness::run_scenario;
//!
//! let outcome = run_scenario(r#"{
//!     "steps": [
//!         { "type": "show" },
//!         { "type": "move_to", "state": "full", "animated": true },
//!         { "type": "settle" },
//!         { "type": "assert_state", "state": "full" },
//!         { "type": "assert_location", "state": "full" }
//!     ]
//! }"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod logging;

#[cfg(test)]
mod tests;

pub use headless_assert::{AssertionResult, PanelProbe};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use headless_runtime::{HeadlessContext, HeadlessRunConfig, HeadlessRuntime};
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use logging::init_logging;
