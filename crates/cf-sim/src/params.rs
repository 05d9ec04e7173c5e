//! Per-mode flow parameters.
//!
//! Defaults reproduce the reference site: transfer moves one percent per
//! tick at 120-150 PSI and 2.5 m³/s, equalization moves half a percent per
//! tick at 100-130 PSI and 1.8 m³/s.

use cf_core::{Pressure, VolumeRate, ensure_finite, m3ps, psi};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Step size and synthesized readings for one flow mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowProfile {
    /// Level change per tick, in percent.
    pub step: f64,
    /// Lower bound of the pressure band (PSI, inclusive).
    pub pressure_min_psi: f64,
    /// Upper bound of the pressure band (PSI, exclusive).
    pub pressure_max_psi: f64,
    /// Flow rate reported while this mode runs (m³/s).
    pub flow_rate_m3ps: f64,
}

impl FlowProfile {
    pub const TRANSFER: FlowProfile = FlowProfile {
        step: 1.0,
        pressure_min_psi: 120.0,
        pressure_max_psi: 150.0,
        flow_rate_m3ps: 2.5,
    };

    pub const EQUALIZE: FlowProfile = FlowProfile {
        step: 0.5,
        pressure_min_psi: 100.0,
        pressure_max_psi: 130.0,
        flow_rate_m3ps: 1.8,
    };

    pub fn pressure_band(&self) -> (Pressure, Pressure) {
        (psi(self.pressure_min_psi), psi(self.pressure_max_psi))
    }

    pub fn flow_rate(&self) -> VolumeRate {
        m3ps(self.flow_rate_m3ps)
    }

    /// Check that all values are finite, the step is positive and the
    /// pressure band is ordered.
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.step, "step")?;
        ensure_finite(self.pressure_min_psi, "pressure_min_psi")?;
        ensure_finite(self.pressure_max_psi, "pressure_max_psi")?;
        ensure_finite(self.flow_rate_m3ps, "flow_rate_m3ps")?;

        if self.step <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "step must be positive",
            });
        }
        if self.pressure_min_psi < 0.0 {
            return Err(SimError::InvalidArg {
                what: "pressure_min_psi must be non-negative",
            });
        }
        if self.pressure_min_psi >= self.pressure_max_psi {
            return Err(SimError::InvalidArg {
                what: "pressure_min_psi must be less than pressure_max_psi",
            });
        }
        if self.flow_rate_m3ps < 0.0 {
            return Err(SimError::InvalidArg {
                what: "flow_rate_m3ps must be non-negative",
            });
        }
        Ok(())
    }
}

/// Profiles for both flow modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    #[serde(default = "default_transfer")]
    pub transfer: FlowProfile,
    #[serde(default = "default_equalize")]
    pub equalize: FlowProfile,
}

fn default_transfer() -> FlowProfile {
    FlowProfile::TRANSFER
}

fn default_equalize() -> FlowProfile {
    FlowProfile::EQUALIZE
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            transfer: FlowProfile::TRANSFER,
            equalize: FlowProfile::EQUALIZE,
        }
    }
}

impl FlowParams {
    pub fn validate(&self) -> SimResult<()> {
        self.transfer.validate()?;
        self.equalize.validate()
    }
}
