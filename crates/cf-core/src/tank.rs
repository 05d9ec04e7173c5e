//! Tank identifiers, fill-level bounds and temperatures.

use core::fmt;

use crate::CfError;
use crate::numeric::Real;
use crate::units::{Length, Temperature, degc, m};

/// Lowest fill level, in percent.
pub const LEVEL_MIN: Real = 0.0;
/// Highest fill level, in percent.
pub const LEVEL_MAX: Real = 100.0;

/// Ambient temperature both tank walls rest at, in degrees Celsius.
pub const BASELINE_TEMPERATURE_C: Real = 25.0;

/// Clamp a fill level into `[LEVEL_MIN, LEVEL_MAX]`.
#[inline]
pub fn clamp_level(level: Real) -> Real {
    level.clamp(LEVEL_MIN, LEVEL_MAX)
}

/// One of the two storage tanks.
///
/// Serialized as the plain tank number (`1` or `2`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum TankId {
    Tank1,
    Tank2,
}

impl TankId {
    pub const ALL: [TankId; 2] = [TankId::Tank1, TankId::Tank2];

    /// 0-based slot for per-tank arrays.
    pub fn index(self) -> usize {
        match self {
            TankId::Tank1 => 0,
            TankId::Tank2 => 1,
        }
    }

    /// 1-based number, as printed on the tank.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// The tank on the other end of the pipeline.
    pub fn other(self) -> TankId {
        match self {
            TankId::Tank1 => TankId::Tank2,
            TankId::Tank2 => TankId::Tank1,
        }
    }
}

impl TryFrom<u8> for TankId {
    type Error = CfError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(TankId::Tank1),
            2 => Ok(TankId::Tank2),
            _ => Err(CfError::InvalidArg {
                what: "tank number must be 1 or 2",
            }),
        }
    }
}

impl From<TankId> for u8 {
    fn from(tank: TankId) -> Self {
        tank.number()
    }
}

impl fmt::Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tank {}", self.number())
    }
}

/// Internal and external wall temperature of a tank, degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TankTemperature {
    pub internal_c: Real,
    pub external_c: Real,
}

impl TankTemperature {
    pub fn new(internal_c: Real, external_c: Real) -> Self {
        Self {
            internal_c,
            external_c,
        }
    }

    /// Both sides at the same temperature.
    pub fn uniform(c: Real) -> Self {
        Self::new(c, c)
    }

    pub fn internal(&self) -> Temperature {
        degc(self.internal_c)
    }

    pub fn external(&self) -> Temperature {
        degc(self.external_c)
    }
}

impl Default for TankTemperature {
    fn default() -> Self {
        Self::uniform(BASELINE_TEMPERATURE_C)
    }
}

/// Fixed physical dimensions of a storage tank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TankGeometry {
    pub height_m: Real,
    pub diameter_m: Real,
    pub capacity_bbl: Real,
}

impl TankGeometry {
    /// Both tanks on the site share the same build: 12 m tall, 20 m wide,
    /// 15 000 barrels.
    pub const STANDARD: TankGeometry = TankGeometry {
        height_m: 12.0,
        diameter_m: 20.0,
        capacity_bbl: 15_000.0,
    };

    pub fn height(&self) -> Length {
        m(self.height_m)
    }

    pub fn diameter(&self) -> Length {
        m(self.diameter_m)
    }

    /// Barrels held at `level` percent, rounded to the nearest barrel.
    pub fn barrels_at(&self, level: Real) -> Real {
        (self.capacity_bbl * (clamp_level(level) / LEVEL_MAX)).round()
    }
}

impl Default for TankGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tank_numbers_round_trip() {
        for tank in TankId::ALL {
            assert_eq!(TankId::try_from(tank.number()).unwrap(), tank);
        }
        assert!(TankId::try_from(0).is_err());
        assert!(TankId::try_from(3).is_err());
    }

    #[test]
    fn other_tank_is_involutive() {
        assert_eq!(TankId::Tank1.other(), TankId::Tank2);
        assert_eq!(TankId::Tank2.other().other(), TankId::Tank2);
        assert_eq!(TankId::Tank2.to_string(), "tank 2");
    }

    #[test]
    fn clamp_level_bounds() {
        assert_eq!(clamp_level(-3.0), 0.0);
        assert_eq!(clamp_level(42.5), 42.5);
        assert_eq!(clamp_level(130.0), 100.0);
    }

    #[test]
    fn default_temperature_is_baseline() {
        let t = TankTemperature::default();
        assert_eq!(t.internal_c, 25.0);
        assert_eq!(t.external_c, 25.0);
    }

    #[test]
    fn barrels_follow_level() {
        let g = TankGeometry::STANDARD;
        assert_eq!(g.barrels_at(80.0), 12_000.0);
        assert_eq!(g.barrels_at(33.3), 4_995.0);
        assert_eq!(g.barrels_at(0.0), 0.0);
        assert_eq!(g.barrels_at(120.0), 15_000.0);
    }

    #[test]
    fn typed_accessors_use_si() {
        use uom::si::length::meter;
        use uom::si::thermodynamic_temperature::kelvin;

        let g = TankGeometry::STANDARD;
        assert_eq!(g.height().get::<meter>(), 12.0);
        assert_eq!(g.diameter().get::<meter>(), 20.0);

        let t = TankTemperature::new(2000.0, 1400.0);
        assert!((t.internal().get::<kelvin>() - 2273.15).abs() < 1e-9);
        assert!(t.external() < t.internal());
    }
}
