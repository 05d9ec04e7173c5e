//! Scripted operator sessions.
//!
//! A script is a list of intents replayed against a [`Console`] in order,
//! with virtual time advanced explicitly. Refused intents are recorded, not
//! treated as errors.
//!
//! ```yaml
//! steps:
//!   - do: transfer
//!     direction: right
//!   - do: advance
//!     ms: 500
//!   - do: toggle_valve
//!     tank: 2
//!   - do: trigger
//!   - do: resolve
//! ```

use std::path::Path;
use std::time::Duration;

use cf_core::{RandomSource, TankId};
use cf_sim::{FlowDirection, FlowSession, TickOutcome};
use serde::{Deserialize, Serialize};

use crate::console::Console;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum Step {
    Transfer {
        direction: FlowDirection,
    },
    Equalize,
    Stop,
    ToggleValve {
        tank: TankId,
    },
    SetValve {
        tank: TankId,
        open: bool,
    },
    Trigger,
    Resolve,
    /// Let virtual time pass; scheduled ticks fire along the way.
    Advance {
        ms: u64,
    },
    /// Apply loop steps directly, outside the schedule.
    Tick {
        #[serde(default = "one")]
        count: usize,
    },
    RunUntilIdle {
        max_ticks: usize,
    },
}

fn one() -> usize {
    1
}

/// What happened when one step was replayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    /// `false` when the console ignored the intent.
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub levels: (f64, f64),
    pub session: FlowSession,
    /// Id of the emergency active after the step.
    pub emergency: Option<String>,
}

pub fn parse_script(content: &str) -> AppResult<Script> {
    serde_yaml::from_str(content).map_err(|e| AppError::Parse {
        what: "script",
        message: e.to_string(),
    })
}

pub fn load_script(path: &Path) -> AppResult<Script> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_script(&content)
}

/// Replay `script` step by step.
pub fn run_script<R: RandomSource>(console: &mut Console<R>, script: &Script) -> Vec<StepRecord> {
    script
        .steps
        .iter()
        .map(|step| {
            let (accepted, note) = apply(console, step);
            StepRecord {
                step: step.clone(),
                accepted,
                note,
                levels: console.plant().levels(),
                session: console.flow().session(),
                emergency: console.active_emergency().map(|e| e.id().to_string()),
            }
        })
        .collect()
}

fn apply<R: RandomSource>(console: &mut Console<R>, step: &Step) -> (bool, Option<String>) {
    match *step {
        Step::Transfer { direction } => (console.begin_transfer(direction), None),
        Step::Equalize => (console.begin_equalize(), None),
        Step::Stop => {
            let was_active = console.flow().is_active();
            console.stop();
            (was_active, None)
        }
        Step::ToggleValve { tank } => {
            let open = console.toggle_valve(tank);
            (true, Some(format!("{tank} valve {}", open_label(open))))
        }
        Step::SetValve { tank, open } => {
            let changed = console.plant().valve_open(tank) != open;
            console.set_valve(tank, open);
            (changed, None)
        }
        Step::Trigger => match console.trigger_next() {
            Some(emergency) => {
                let note = match &emergency.system_response {
                    Some(response) => format!("{} ({:?})", emergency.id(), response.status),
                    None => emergency.id().to_string(),
                };
                (true, Some(note))
            }
            None => (false, None),
        },
        Step::Resolve => match console.resolve() {
            Some(resolution) => (
                true,
                Some(format!(
                    "{} resolved by {:?}",
                    resolution.emergency.id(),
                    resolution.emergency.scenario.action
                )),
            ),
            None => (false, None),
        },
        Step::Advance { ms } => {
            let fired = console.advance(Duration::from_millis(ms));
            (true, Some(format!("{fired} ticks")))
        }
        Step::Tick { count } => {
            let mut stepped = 0;
            for _ in 0..count {
                match console.tick() {
                    TickOutcome::Idle | TickOutcome::ValveClosed => break,
                    outcome => {
                        stepped += 1;
                        if !outcome.keeps_running() {
                            break;
                        }
                    }
                }
            }
            (stepped > 0, Some(format!("{stepped} ticks")))
        }
        Step::RunUntilIdle { max_ticks } => {
            let fired = console.run_until_idle(max_ticks);
            (fired > 0, Some(format!("{fired} ticks")))
        }
    }
}

fn open_label(open: bool) -> &'static str {
    if open { "opened" } else { "closed" }
}
