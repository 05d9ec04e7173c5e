//! Ordered scenario catalog.
//!
//! Order is the drill sequence, not a ranking: the engine walks it front to
//! back and wraps around.

use std::collections::HashSet;

use cf_core::{LEVEL_MAX, LEVEL_MIN, TankId};

use crate::error::{CatalogError, CatalogResult};
use crate::scenario::{EmergencyType, ResponseAction, Scenario, Severity};

/// A validated, non-empty sequence of scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
}

impl Catalog {
    /// Build a catalog, checking that it is non-empty, ids are unique and
    /// every transfer scenario has a target level in `[0, 100]`.
    pub fn new(scenarios: Vec<Scenario>) -> CatalogResult<Self> {
        if scenarios.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        for scenario in &scenarios {
            if scenario.id.trim().is_empty() {
                return Err(CatalogError::InvalidScenario {
                    id: scenario.id.clone(),
                    what: "id must not be blank".to_string(),
                });
            }
            if !ids.insert(scenario.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: scenario.id.clone(),
                });
            }
            validate_target(scenario)?;
        }

        Ok(Self { scenarios })
    }

    /// The site's standard eight-drill sequence.
    pub fn builtin() -> Self {
        Self {
            scenarios: builtin_scenarios(),
        }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_target(scenario: &Scenario) -> CatalogResult<()> {
    match (scenario.action, scenario.target_level) {
        (ResponseAction::Transfer, None) => Err(CatalogError::InvalidScenario {
            id: scenario.id.clone(),
            what: "transfer scenarios need a target_level".to_string(),
        }),
        (_, Some(level)) if !level.is_finite() || !(LEVEL_MIN..=LEVEL_MAX).contains(&level) => {
            Err(CatalogError::InvalidScenario {
                id: scenario.id.clone(),
                what: format!("target_level {level} outside 0..=100"),
            })
        }
        _ => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn scenario(
    id: &str,
    title: &str,
    description: &str,
    affected_tank: TankId,
    action: ResponseAction,
    target_level: Option<f64>,
    kind: EmergencyType,
    severity: Severity,
) -> Scenario {
    Scenario {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        affected_tank,
        action,
        target_level,
        kind,
        severity,
    }
}

fn builtin_scenarios() -> Vec<Scenario> {
    use EmergencyType::*;
    use ResponseAction::*;
    use TankId::*;

    vec![
        // Structural
        scenario(
            "pipe-rupture-1",
            "Pipe Rupture!",
            "Rupture detected in the main line of Tank 1. Critical pressure loss.",
            Tank1,
            StructuralResponse,
            None,
            Structural,
            Severity::High,
        ),
        scenario(
            "pipe-rupture-2",
            "Structural Failure!",
            "Multiple leak points detected in the Tank 2 connections.",
            Tank2,
            StructuralResponse,
            None,
            Structural,
            Severity::Critical,
        ),
        // Operational
        scenario(
            "pressure-loss-1",
            "Pressure Loss!",
            "Sudden pressure drop in Tank 1. Critical level reached.",
            Tank1,
            Transfer,
            Some(50.0),
            Operational,
            Severity::Medium,
        ),
        scenario(
            "overflow-risk-2",
            "Overflow Risk!",
            "Tank 2 level exceeds safe limits. Immediate transfer required.",
            Tank2,
            Transfer,
            Some(70.0),
            Operational,
            Severity::High,
        ),
        // Fire
        scenario(
            "fire-1",
            "FIRE ALERT!",
            "Critical temperature in Tank 1. Fire suppression system engaged.",
            Tank1,
            FireResponse,
            None,
            Fire,
            Severity::Critical,
        ),
        scenario(
            "fire-2",
            "VALVE FIRE!",
            "Fire detected in the Tank 2 valve assembly.",
            Tank2,
            FireResponse,
            None,
            Fire,
            Severity::High,
        ),
        // Explosion
        scenario(
            "explosion-risk-1",
            "EXPLOSION RISK!",
            "Critical pressure and temperature in Tank 1. Evacuate immediately!",
            Tank1,
            Shutdown,
            None,
            Explosion,
            Severity::Critical,
        ),
        scenario(
            "explosion-risk-2",
            "EXPLOSION HAZARD!",
            "Chemical reaction detected in Tank 2. Explosion imminent.",
            Tank2,
            Shutdown,
            None,
            Explosion,
            Severity::Critical,
        ),
    ]
}
