//! Read-only views handed to renderers.

use cf_core::{TankGeometry, TankId, TankTemperature};
use cf_emergency::ActiveEmergency;
use cf_sim::{FlowDirection, FlowLoop, FlowReadings, FlowSession, Plant};
use serde::Serialize;

/// One tank as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankView {
    pub tank: TankId,
    pub level: f64,
    pub temperature: TankTemperature,
    pub valve_open: bool,
    /// The active emergency affects this tank.
    pub alarm: bool,
    /// The active emergency is a fire at this tank.
    pub on_fire: bool,
}

/// Which operator affordances are currently usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub transfer_left: bool,
    pub transfer_right: bool,
    pub equalize: bool,
    pub stop: bool,
    pub trigger: bool,
}

impl Controls {
    pub fn evaluate(plant: &Plant, flow: &FlowLoop, emergency_active: bool) -> Self {
        let startable = !flow.is_active() && !emergency_active;
        Self {
            transfer_left: startable && FlowLoop::can_transfer(plant, FlowDirection::Left),
            transfer_right: startable && FlowLoop::can_transfer(plant, FlowDirection::Right),
            equalize: startable && plant.valves_open(),
            stop: flow.is_active(),
            trigger: !emergency_active,
        }
    }
}

/// Everything the display shell renders in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleSnapshot {
    pub time_ms: u64,
    pub ticks: u64,
    pub tanks: [TankView; 2],
    pub session: FlowSession,
    pub readings: FlowReadings,
    /// Sum of both levels.
    pub total_volume: f64,
    pub emergency: Option<ActiveEmergency>,
    pub emergency_active: bool,
    pub controls: Controls,
}

impl ConsoleSnapshot {
    pub fn tank(&self, tank: TankId) -> &TankView {
        &self.tanks[tank.index()]
    }
}

/// Detail card for a single tank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankDetails {
    pub tank: TankId,
    pub height_m: f64,
    pub diameter_m: f64,
    pub capacity_bbl: f64,
    pub current_bbl: f64,
    pub level: f64,
    pub temperature: TankTemperature,
}

impl TankDetails {
    pub fn new(tank: TankId, plant: &Plant, geometry: &TankGeometry) -> Self {
        let level = plant.level(tank);
        Self {
            tank,
            height_m: geometry.height_m,
            diameter_m: geometry.diameter_m,
            capacity_bbl: geometry.capacity_bbl,
            current_bbl: geometry.barrels_at(level),
            level,
            temperature: plant.temperature(tank),
        }
    }
}

pub(crate) fn tank_view(tank: TankId, plant: &Plant, emergency: Option<&ActiveEmergency>) -> TankView {
    TankView {
        tank,
        level: plant.level(tank),
        temperature: plant.temperature(tank),
        valve_open: plant.valve_open(tank),
        alarm: emergency.is_some_and(|e| e.affects(tank)),
        on_fire: emergency.is_some_and(|e| e.is_fire_at(tank)),
    }
}
