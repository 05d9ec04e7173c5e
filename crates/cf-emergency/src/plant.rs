//! The seam through which the engine touches tank state.

use cf_core::{TankId, TankTemperature};

/// Mutator handle lent to the engine by the owner of the tank state.
pub trait PlantControl {
    /// Current fill level of `tank`, in percent.
    fn level(&self, tank: TankId) -> f64;

    /// Overwrite the fill level of `tank`.
    fn set_level(&mut self, tank: TankId, level: f64);

    /// Overwrite both wall temperatures of `tank`.
    fn set_temperature(&mut self, tank: TankId, temperature: TankTemperature);

    /// End any transfer or equalization session.
    fn halt_flow(&mut self);
}
