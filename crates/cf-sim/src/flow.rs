//! Transfer / equalization session stepped one tick at a time.
//!
//! A session is either a directional transfer or an equalization, never
//! both. Every tick re-checks the valve gate before touching the levels, so
//! a closed valve can never leak one more step through.

use cf_core::{
    LEVEL_MAX, LEVEL_MIN, Pressure, RandomSource, TankId, VolumeRate, m3ps, psi, step_toward,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::params::FlowParams;
use crate::plant::Plant;

/// Direction of a transfer, as seen on the site diagram (tank 1 on the left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Tank 2 drains into tank 1.
    Left,
    /// Tank 1 drains into tank 2.
    Right,
}

impl FlowDirection {
    /// Tank that drains.
    pub fn source(self) -> TankId {
        match self {
            FlowDirection::Right => TankId::Tank1,
            FlowDirection::Left => TankId::Tank2,
        }
    }

    /// Tank that fills.
    pub fn destination(self) -> TankId {
        self.source().other()
    }
}

/// What the pipeline is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FlowSession {
    #[default]
    Idle,
    Transfer {
        direction: FlowDirection,
    },
    Equalize,
}

/// Pressure and flow-rate gauges. Both read zero while idle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowReadings {
    pub pressure_psi: f64,
    pub flow_rate_m3ps: f64,
}

impl FlowReadings {
    pub const IDLE: FlowReadings = FlowReadings {
        pressure_psi: 0.0,
        flow_rate_m3ps: 0.0,
    };

    pub fn pressure(&self) -> Pressure {
        psi(self.pressure_psi)
    }

    pub fn flow_rate(&self) -> VolumeRate {
        m3ps(self.flow_rate_m3ps)
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing was running; readings were zeroed.
    Idle,
    /// One transfer step was applied.
    Transferred { direction: FlowDirection },
    /// One equalization step was applied toward `target`.
    Equalized { target: f64 },
    /// Both tanks had already settled on `target`; the session ended.
    Converged { target: f64 },
    /// A valve was found closed; the session ended without a step.
    ValveClosed,
}

impl TickOutcome {
    /// `true` when the session is still running after this tick.
    pub fn keeps_running(&self) -> bool {
        matches!(
            self,
            TickOutcome::Transferred { .. } | TickOutcome::Equalized { .. }
        )
    }
}

/// The transfer / equalization state machine.
#[derive(Debug, Clone, Default)]
pub struct FlowLoop {
    params: FlowParams,
    session: FlowSession,
    readings: FlowReadings,
}

impl FlowLoop {
    pub fn new(params: FlowParams) -> Self {
        Self {
            params,
            session: FlowSession::Idle,
            readings: FlowReadings::IDLE,
        }
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    pub fn session(&self) -> FlowSession {
        self.session
    }

    pub fn readings(&self) -> FlowReadings {
        self.readings
    }

    pub fn is_flowing(&self) -> bool {
        matches!(self.session, FlowSession::Transfer { .. })
    }

    pub fn is_equalizing(&self) -> bool {
        self.session == FlowSession::Equalize
    }

    /// Flowing or equalizing.
    pub fn is_active(&self) -> bool {
        self.session != FlowSession::Idle
    }

    pub fn direction(&self) -> Option<FlowDirection> {
        match self.session {
            FlowSession::Transfer { direction } => Some(direction),
            _ => None,
        }
    }

    /// Whether a transfer in `direction` may start: valves open, the source
    /// tank is not empty and the destination tank is not full.
    pub fn can_transfer(plant: &Plant, direction: FlowDirection) -> bool {
        plant.valves_open()
            && plant.level(direction.source()) > LEVEL_MIN
            && plant.level(direction.destination()) < LEVEL_MAX
    }

    /// Start (or redirect) a transfer. Returns `false` and leaves the session
    /// untouched when the preconditions fail.
    pub fn begin_transfer(&mut self, plant: &Plant, direction: FlowDirection) -> bool {
        if !Self::can_transfer(plant, direction) {
            debug!(?direction, levels = ?plant.levels(), valves_open = plant.valves_open(), "transfer refused");
            return false;
        }
        self.session = FlowSession::Transfer { direction };
        info!(?direction, "transfer started");
        true
    }

    /// Start equalizing. Only needs both valves open.
    pub fn begin_equalize(&mut self, plant: &Plant) -> bool {
        if !plant.valves_open() {
            debug!("equalize refused: valve closed");
            return false;
        }
        self.session = FlowSession::Equalize;
        info!(levels = ?plant.levels(), "equalization started");
        true
    }

    /// End whatever is running and zero the gauges.
    pub fn stop(&mut self) {
        if self.is_active() {
            info!(session = ?self.session, "flow stopped");
        }
        self.session = FlowSession::Idle;
        self.readings = FlowReadings::IDLE;
    }

    /// Re-check the valve gate after a valve changed. Returns `true` when a
    /// running session was halted.
    pub fn on_valve_change(&mut self, plant: &Plant) -> bool {
        if self.is_active() && !plant.valves_open() {
            info!(session = ?self.session, "valve closed, halting flow");
            self.stop();
            return true;
        }
        false
    }

    /// Apply one step of the current session to `plant`.
    pub fn tick<R: RandomSource>(&mut self, plant: &mut Plant, rng: &mut R) -> TickOutcome {
        match self.session {
            FlowSession::Idle => {
                self.readings = FlowReadings::IDLE;
                TickOutcome::Idle
            }
            _ if !plant.valves_open() => {
                self.stop();
                TickOutcome::ValveClosed
            }
            FlowSession::Transfer { direction } => self.transfer_step(plant, direction, rng),
            FlowSession::Equalize => self.equalize_step(plant, rng),
        }
    }

    fn transfer_step<R: RandomSource>(
        &mut self,
        plant: &mut Plant,
        direction: FlowDirection,
        rng: &mut R,
    ) -> TickOutcome {
        let profile = self.params.transfer;
        let (src, dst) = (direction.source(), direction.destination());

        plant.set_level(src, plant.level(src) - profile.step);
        plant.set_level(dst, plant.level(dst) + profile.step);

        self.readings = FlowReadings {
            pressure_psi: rng.uniform(profile.pressure_min_psi, profile.pressure_max_psi),
            flow_rate_m3ps: profile.flow_rate_m3ps,
        };
        trace!(?direction, levels = ?plant.levels(), "transfer tick");
        TickOutcome::Transferred { direction }
    }

    fn equalize_step<R: RandomSource>(&mut self, plant: &mut Plant, rng: &mut R) -> TickOutcome {
        let profile = self.params.equalize;
        let (t1, t2) = plant.levels();
        let target = (t1 + t2) / 2.0;

        // Settling is judged on the levels as they were before this step,
        // so the session ends one tick after the tanks reach the target.
        let settled = (t1 - target).abs() < profile.step && (t2 - target).abs() < profile.step;

        plant.set_level(TankId::Tank1, step_toward(t1, target, profile.step));
        plant.set_level(TankId::Tank2, step_toward(t2, target, profile.step));

        self.readings = FlowReadings {
            pressure_psi: rng.uniform(profile.pressure_min_psi, profile.pressure_max_psi),
            flow_rate_m3ps: profile.flow_rate_m3ps,
        };

        if settled {
            info!(target, "equalization converged");
            self.stop();
            return TickOutcome::Converged { target };
        }
        trace!(target, levels = ?plant.levels(), "equalize tick");
        TickOutcome::Equalized { target }
    }
}
