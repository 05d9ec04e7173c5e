//! Emergency engine: trigger the next drill, resolve the active one.

use cf_core::{RandomSource, TankId, TankTemperature, clamp_level};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::plant::PlantControl;
use crate::scenario::{
    ActiveEmergency, EmergencyType, ResponseAction, ResponseStatus, Scenario, SystemResponse,
};

/// Fire suppression succeeds when the outcome draw exceeds this (p = 0.7).
const FIRE_SUCCESS_ABOVE: f64 = 0.3;
/// Structural faults get a partial response when the draw exceeds this (p = 0.5).
const STRUCTURAL_PARTIAL_ABOVE: f64 = 0.5;

/// Fire heats the tank interior to a whole number in `[2000, 5000)` °C.
const FIRE_TEMP_MIN_C: f64 = 2000.0;
const FIRE_TEMP_SPAN_C: f64 = 3000.0;
const FIRE_EXTERNAL_RATIO: f64 = 0.7;

/// Explosion risk heats the tank interior to a whole number in `[3000, 8000)` °C.
const EXPLOSION_TEMP_MIN_C: f64 = 3000.0;
const EXPLOSION_TEMP_SPAN_C: f64 = 5000.0;
const EXPLOSION_EXTERNAL_RATIO: f64 = 0.8;

/// What resolving an emergency did to the plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub emergency: ActiveEmergency,
    /// The flow session was halted.
    pub flow_halted: bool,
    /// This tank was cooled back to baseline.
    pub temperature_reset: Option<TankId>,
    /// Tank 1 and tank 2 levels after a transfer remediation.
    pub levels_after: Option<(f64, f64)>,
}

/// Cycles through a [`Catalog`] and tracks the single active emergency.
///
/// Randomness (response odds, temperature spikes) comes from the `R` source
/// handed in at construction.
#[derive(Debug, Clone)]
pub struct EmergencyEngine<R> {
    catalog: Catalog,
    cursor: usize,
    active: Option<ActiveEmergency>,
    baseline: TankTemperature,
    rng: R,
}

impl<R: RandomSource> EmergencyEngine<R> {
    pub fn new(catalog: Catalog, rng: R) -> Self {
        Self {
            catalog,
            cursor: 0,
            active: None,
            baseline: TankTemperature::default(),
            rng,
        }
    }

    /// Temperature tanks are reset to on resolution (25/25 by default).
    pub fn with_baseline(mut self, baseline: TankTemperature) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Index of the scenario the next trigger will use.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn peek_next(&self) -> Option<&Scenario> {
        self.catalog.get(self.cursor)
    }

    pub fn active(&self) -> Option<&ActiveEmergency> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn baseline(&self) -> TankTemperature {
        self.baseline
    }

    /// Raise the next scenario in the catalog.
    ///
    /// Returns `None` without touching anything when an emergency is already
    /// active.
    pub fn trigger_next<P: PlantControl + ?Sized>(
        &mut self,
        plant: &mut P,
    ) -> Option<&ActiveEmergency> {
        if let Some(active) = &self.active {
            debug!(active = %active.id(), "trigger ignored: emergency already active");
            return None;
        }

        let scenario = self.catalog.get(self.cursor)?.clone();
        let tank = scenario.affected_tank;

        let system_response = match scenario.kind {
            EmergencyType::Fire => {
                let status = if self.rng.next_unit() > FIRE_SUCCESS_ABOVE {
                    ResponseStatus::Success
                } else {
                    ResponseStatus::Failure
                };
                let internal = self.rng.whole_in(FIRE_TEMP_MIN_C, FIRE_TEMP_SPAN_C);
                plant.set_temperature(
                    tank,
                    TankTemperature::new(internal, internal * FIRE_EXTERNAL_RATIO),
                );
                Some(SystemResponse::canned(status))
            }
            EmergencyType::Structural => {
                let status = if self.rng.next_unit() > STRUCTURAL_PARTIAL_ABOVE {
                    ResponseStatus::Partial
                } else {
                    ResponseStatus::Failure
                };
                Some(SystemResponse::canned(status))
            }
            EmergencyType::Explosion => {
                let internal = self
                    .rng
                    .whole_in(EXPLOSION_TEMP_MIN_C, EXPLOSION_TEMP_SPAN_C);
                plant.set_temperature(
                    tank,
                    TankTemperature::new(internal, internal * EXPLOSION_EXTERNAL_RATIO),
                );
                Some(SystemResponse::canned(ResponseStatus::Critical))
            }
            EmergencyType::Operational => None,
        };

        info!(
            id = %scenario.id,
            kind = ?scenario.kind,
            severity = %scenario.severity,
            %tank,
            "emergency triggered"
        );
        if let Some(response) = &system_response {
            if matches!(
                response.status,
                ResponseStatus::Failure | ResponseStatus::Critical
            ) {
                warn!(id = %scenario.id, status = ?response.status, "{}", response.message);
            }
        }

        self.cursor = (self.cursor + 1) % self.catalog.len();
        self.active = Some(ActiveEmergency {
            scenario,
            system_response,
        });
        self.active.as_ref()
    }

    /// Apply the active emergency's remediation and clear it.
    ///
    /// Returns `None` when nothing is active.
    pub fn resolve<P: PlantControl + ?Sized>(&mut self, plant: &mut P) -> Option<Resolution> {
        let Some(emergency) = self.active.take() else {
            debug!("resolve ignored: no active emergency");
            return None;
        };

        let tank = emergency.scenario.affected_tank;
        let mut resolution = Resolution {
            emergency,
            flow_halted: false,
            temperature_reset: None,
            levels_after: None,
        };

        match resolution.emergency.scenario.action {
            ResponseAction::Shutdown => {
                plant.halt_flow();
                plant.set_temperature(tank, self.baseline);
                resolution.flow_halted = true;
                resolution.temperature_reset = Some(tank);
            }
            ResponseAction::FireResponse => {
                plant.set_temperature(tank, self.baseline);
                resolution.temperature_reset = Some(tank);
            }
            ResponseAction::Transfer => {
                if let Some(target) = resolution.emergency.scenario.target_level {
                    let other = tank.other();
                    let difference = plant.level(tank) - target;
                    let other_level = clamp_level((plant.level(other) + difference).min(100.0));
                    plant.set_level(tank, clamp_level(target));
                    plant.set_level(other, other_level);
                    resolution.levels_after =
                        Some((plant.level(TankId::Tank1), plant.level(TankId::Tank2)));
                }
            }
            ResponseAction::StructuralResponse => {
                plant.halt_flow();
                resolution.flow_halted = true;
            }
        }

        info!(id = %resolution.emergency.id(), action = ?resolution.emergency.scenario.action, "emergency resolved");
        Some(resolution)
    }
}
