//! Canonical tank state shared by the flow loop and the emergency engine.

use cf_core::{BASELINE_TEMPERATURE_C, TankId, TankTemperature, clamp_level};

/// Tank levels, wall temperatures and valve flags for both tanks.
///
/// Levels are kept in `[0, 100]` by every mutator.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    levels: [f64; 2],
    temperatures: [TankTemperature; 2],
    valves: [bool; 2],
}

impl Default for Plant {
    fn default() -> Self {
        Self::new(80.0, 20.0)
    }
}

impl Plant {
    /// Both valves open, both tanks at the baseline temperature.
    pub fn new(tank1_level: f64, tank2_level: f64) -> Self {
        Self {
            levels: [clamp_level(tank1_level), clamp_level(tank2_level)],
            temperatures: [TankTemperature::uniform(BASELINE_TEMPERATURE_C); 2],
            valves: [true, true],
        }
    }

    pub fn with_valves(mut self, valve1_open: bool, valve2_open: bool) -> Self {
        self.valves = [valve1_open, valve2_open];
        self
    }

    pub fn level(&self, tank: TankId) -> f64 {
        self.levels[tank.index()]
    }

    pub fn levels(&self) -> (f64, f64) {
        (self.levels[0], self.levels[1])
    }

    /// Set a level, clamped into `[0, 100]`.
    pub fn set_level(&mut self, tank: TankId, level: f64) {
        self.levels[tank.index()] = clamp_level(level);
    }

    /// Sum of both levels; the "total volume" metric.
    pub fn total_level(&self) -> f64 {
        self.levels[0] + self.levels[1]
    }

    pub fn temperature(&self, tank: TankId) -> TankTemperature {
        self.temperatures[tank.index()]
    }

    pub fn set_temperature(&mut self, tank: TankId, temperature: TankTemperature) {
        self.temperatures[tank.index()] = temperature;
    }

    pub fn valve_open(&self, tank: TankId) -> bool {
        self.valves[tank.index()]
    }

    /// Returns `true` when the flag actually changed.
    pub fn set_valve(&mut self, tank: TankId, open: bool) -> bool {
        let slot = &mut self.valves[tank.index()];
        let changed = *slot != open;
        *slot = open;
        changed
    }

    /// Flow gate: both valves must be open.
    pub fn valves_open(&self) -> bool {
        self.valves[0] && self.valves[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_site() {
        let plant = Plant::default();
        assert_eq!(plant.levels(), (80.0, 20.0));
        assert!(plant.valves_open());
        assert_eq!(plant.temperature(TankId::Tank2), TankTemperature::uniform(25.0));
        assert_eq!(plant.total_level(), 100.0);
    }

    #[test]
    fn levels_are_clamped() {
        let mut plant = Plant::new(-5.0, 140.0);
        assert_eq!(plant.levels(), (0.0, 100.0));
        plant.set_level(TankId::Tank1, 101.0);
        assert_eq!(plant.level(TankId::Tank1), 100.0);
    }

    #[test]
    fn valve_gate_needs_both() {
        let mut plant = Plant::default();
        assert!(plant.set_valve(TankId::Tank1, false));
        assert!(!plant.valves_open());
        assert!(!plant.set_valve(TankId::Tank1, false));
        assert!(plant.set_valve(TankId::Tank1, true));
        assert!(plant.valves_open());
    }
}
