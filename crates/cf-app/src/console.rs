//! The site console: canonical state plus intent routing.
//!
//! `Console` owns the tank state (`Plant`), the flow loop, its tick schedule
//! and the emergency engine. Renderers read snapshots and send intents; all
//! intents re-check their own preconditions and are silently ignored when
//! those fail.

use std::time::Duration;

use cf_core::{RandomSource, TankGeometry, TankId, TankTemperature};
use cf_emergency::{ActiveEmergency, Catalog, EmergencyEngine, PlantControl, Resolution};
use cf_sim::{FlowDirection, FlowLoop, Plant, TickOutcome, TickSchedule};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::{ConsoleConfig, validate_config};
use crate::error::AppResult;
use crate::snapshot::{ConsoleSnapshot, Controls, TankDetails, tank_view};

/// Mutator handle the engine uses to reach the console's state.
struct PlantHandle<'a> {
    plant: &'a mut Plant,
    flow: &'a mut FlowLoop,
    schedule: &'a mut TickSchedule,
}

impl PlantControl for PlantHandle<'_> {
    fn level(&self, tank: TankId) -> f64 {
        self.plant.level(tank)
    }

    fn set_level(&mut self, tank: TankId, level: f64) {
        self.plant.set_level(tank, level);
    }

    fn set_temperature(&mut self, tank: TankId, temperature: TankTemperature) {
        self.plant.set_temperature(tank, temperature);
    }

    fn halt_flow(&mut self) {
        self.flow.stop();
        self.schedule.disarm();
    }
}

#[derive(Debug, Clone)]
pub struct Console<R = ChaCha8Rng> {
    plant: Plant,
    flow: FlowLoop,
    schedule: TickSchedule,
    engine: EmergencyEngine<R>,
    flow_rng: R,
    geometry: TankGeometry,
    now: Duration,
    ticks: u64,
}

impl Console<ChaCha8Rng> {
    /// Build from a config, seeding from `config.seed` or from entropy.
    pub fn from_config(config: &ConsoleConfig) -> AppResult<Self> {
        let (engine_rng, flow_rng) = match config.seed {
            Some(seed) => (
                ChaCha8Rng::seed_from_u64(seed),
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (ChaCha8Rng::from_entropy(), ChaCha8Rng::from_entropy()),
        };
        Self::with_sources(config, engine_rng, flow_rng)
    }

    /// Reference site with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::assemble(
            Plant::default(),
            FlowLoop::default(),
            TickSchedule::default(),
            EmergencyEngine::new(Catalog::builtin(), ChaCha8Rng::seed_from_u64(seed)),
            ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        )
    }
}

impl<R: RandomSource> Console<R> {
    /// Build from a config with explicit random sources for the emergency
    /// engine and the flow loop.
    pub fn with_sources(config: &ConsoleConfig, engine_rng: R, flow_rng: R) -> AppResult<Self> {
        validate_config(config)?;

        let init = &config.initial;
        let plant = Plant::new(init.tank1_level, init.tank2_level)
            .with_valves(init.valve1_open, init.valve2_open);
        let engine = EmergencyEngine::new(config.catalog()?, engine_rng)
            .with_baseline(TankTemperature::uniform(config.baseline_temperature_c));
        let schedule = TickSchedule::new(config.tick_period())?;

        let mut console =
            Self::assemble(plant, FlowLoop::new(config.flow), schedule, engine, flow_rng);
        let baseline = console.engine.baseline();
        for tank in TankId::ALL {
            console.plant.set_temperature(tank, baseline);
        }
        Ok(console)
    }

    fn assemble(
        plant: Plant,
        flow: FlowLoop,
        schedule: TickSchedule,
        engine: EmergencyEngine<R>,
        flow_rng: R,
    ) -> Self {
        Self {
            plant,
            flow,
            schedule,
            engine,
            flow_rng,
            geometry: TankGeometry::STANDARD,
            now: Duration::ZERO,
            ticks: 0,
        }
    }

    // ---- observables ----

    pub fn plant(&self) -> &Plant {
        &self.plant
    }

    pub fn flow(&self) -> &FlowLoop {
        &self.flow
    }

    pub fn engine(&self) -> &EmergencyEngine<R> {
        &self.engine
    }

    pub fn active_emergency(&self) -> Option<&ActiveEmergency> {
        self.engine.active()
    }

    pub fn is_emergency_active(&self) -> bool {
        self.engine.is_active()
    }

    /// Virtual time since the console was built.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of loop steps applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the periodic tick is currently armed.
    pub fn is_ticking(&self) -> bool {
        self.schedule.is_armed()
    }

    /// Virtual time of the next scheduled tick, if armed.
    pub fn next_tick_at(&self) -> Option<Duration> {
        self.schedule.next_fire()
    }

    pub fn controls(&self) -> Controls {
        Controls::evaluate(&self.plant, &self.flow, self.engine.is_active())
    }

    pub fn tank_details(&self, tank: TankId) -> TankDetails {
        TankDetails::new(tank, &self.plant, &self.geometry)
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        let emergency = self.engine.active();
        ConsoleSnapshot {
            time_ms: u64::try_from(self.now.as_millis()).unwrap_or(u64::MAX),
            ticks: self.ticks,
            tanks: TankId::ALL.map(|tank| tank_view(tank, &self.plant, emergency)),
            session: self.flow.session(),
            readings: self.flow.readings(),
            total_volume: self.plant.total_level(),
            emergency: emergency.cloned(),
            emergency_active: emergency.is_some(),
            controls: self.controls(),
        }
    }

    // ---- flow intents ----

    /// Start a transfer. Refused while an emergency is active or when the
    /// loop's own preconditions fail.
    pub fn begin_transfer(&mut self, direction: FlowDirection) -> bool {
        if self.engine.is_active() {
            debug!(?direction, "transfer refused: emergency active");
            return false;
        }
        if !self.flow.begin_transfer(&self.plant, direction) {
            return false;
        }
        self.schedule.arm(self.now);
        true
    }

    /// Start equalizing. Refused while an emergency is active or a valve is
    /// closed.
    pub fn begin_equalize(&mut self) -> bool {
        if self.engine.is_active() {
            debug!("equalize refused: emergency active");
            return false;
        }
        if !self.flow.begin_equalize(&self.plant) {
            return false;
        }
        self.schedule.arm(self.now);
        true
    }

    pub fn stop(&mut self) {
        self.flow.stop();
        self.schedule.disarm();
    }

    /// Open or close one valve. Closing either valve halts a running session
    /// immediately, without waiting for the next tick.
    pub fn set_valve(&mut self, tank: TankId, open: bool) {
        if !self.plant.set_valve(tank, open) {
            return;
        }
        debug!(%tank, open, "valve changed");
        if self.flow.on_valve_change(&self.plant) {
            self.schedule.disarm();
        }
    }

    /// Flip one valve; returns its new state.
    pub fn toggle_valve(&mut self, tank: TankId) -> bool {
        let open = !self.plant.valve_open(tank);
        self.set_valve(tank, open);
        open
    }

    // ---- emergency intents ----

    /// Raise the next drill. `None` when one is already active.
    pub fn trigger_next(&mut self) -> Option<ActiveEmergency> {
        let mut handle = PlantHandle {
            plant: &mut self.plant,
            flow: &mut self.flow,
            schedule: &mut self.schedule,
        };
        self.engine.trigger_next(&mut handle).cloned()
    }

    /// Respond to the active drill. `None` when nothing is active.
    pub fn resolve(&mut self) -> Option<Resolution> {
        let mut handle = PlantHandle {
            plant: &mut self.plant,
            flow: &mut self.flow,
            schedule: &mut self.schedule,
        };
        self.engine.resolve(&mut handle)
    }

    // ---- time ----

    /// Apply one loop step right now, outside the schedule.
    ///
    /// Time does not move, but the timer's phase does: the next scheduled
    /// tick falls one full period after this step.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.fire();
        self.schedule.rephase(self.now);
        outcome
    }

    /// Let `elapsed` of virtual time pass, firing every tick that falls due.
    /// Returns the number of ticks fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let until = self.now + elapsed;
        let mut fired = 0;
        while let Some(at) = self.schedule.poll(until) {
            self.now = at;
            self.fire();
            fired += 1;
        }
        self.now = until;
        fired
    }

    /// Jump from one scheduled tick to the next until the session ends or
    /// `max_ticks` ticks fired. Transfers never end by themselves, so they
    /// run to the limit.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut fired = 0;
        while fired < max_ticks {
            let Some(due) = self.schedule.next_fire() else {
                break;
            };
            if self.schedule.poll(due).is_none() {
                break;
            }
            self.now = self.now.max(due);
            self.fire();
            fired += 1;
        }
        fired
    }

    fn fire(&mut self) -> TickOutcome {
        let outcome = self.flow.tick(&mut self.plant, &mut self.flow_rng);
        if !matches!(outcome, TickOutcome::Idle | TickOutcome::ValveClosed) {
            self.ticks += 1;
        }
        // Re-arm only while the step left a session running.
        if !outcome.keeps_running() && self.schedule.is_armed() {
            debug!(?outcome, "session ended, disarming tick");
            self.schedule.disarm();
        }
        outcome
    }
}
