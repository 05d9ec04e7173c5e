//! Scenario definitions and the live emergency built from them.

use core::fmt;

use cf_core::TankId;
use serde::{Deserialize, Serialize};

/// Broad class of fault; decides the system response rolled on trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyType {
    Operational,
    Fire,
    Structural,
    Explosion,
}

/// Remediation applied when the operator responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseAction {
    /// Move oil so the affected tank lands on the target level.
    Transfer,
    /// Halt flow and cool the affected tank back to baseline.
    Shutdown,
    /// Cool the affected tank back to baseline.
    FireResponse,
    /// Halt flow.
    StructuralResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Badge text shown on the alert.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog entry. Immutable once in a catalog; triggers work on clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub affected_tank: TankId,
    pub action: ResponseAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_level: Option<f64>,
    #[serde(rename = "type")]
    pub kind: EmergencyType,
    pub severity: Severity,
}

/// Outcome of the automated mitigation, decided at trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failure,
    Partial,
    /// No automated recovery is possible.
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl SystemResponse {
    /// The canned response for `status`.
    pub fn canned(status: ResponseStatus) -> Self {
        let message = match status {
            ResponseStatus::Success => "System activated successfully",
            ResponseStatus::Failure => "Activation failed - starting secondary system",
            ResponseStatus::Partial => "Partial response - manual intervention required",
            ResponseStatus::Critical => "Critical condition - automatic recovery unavailable",
        };
        Self {
            status,
            message: message.to_string(),
        }
    }
}

/// The single emergency currently demanding a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEmergency {
    #[serde(flatten)]
    pub scenario: Scenario,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_response: Option<SystemResponse>,
}

impl ActiveEmergency {
    pub fn id(&self) -> &str {
        &self.scenario.id
    }

    pub fn affects(&self, tank: TankId) -> bool {
        self.scenario.affected_tank == tank
    }

    /// The affected tank is burning (fire-type emergencies only).
    pub fn is_fire_at(&self, tank: TankId) -> bool {
        self.scenario.kind == EmergencyType::Fire && self.affects(tank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_gravity() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn canned_messages_match_status() {
        for status in [
            ResponseStatus::Success,
            ResponseStatus::Failure,
            ResponseStatus::Partial,
            ResponseStatus::Critical,
        ] {
            let response = SystemResponse::canned(status);
            assert_eq!(response.status, status);
            assert!(!response.message.is_empty());
        }
    }

    #[test]
    fn scenario_yaml_uses_wire_names() {
        let yaml = r#"
id: valve-fire
title: Valve fire
description: Flames at the tank 2 manifold.
affected_tank: 2
action: fire-response
type: fire
severity: high
"#;
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.affected_tank, TankId::Tank2);
        assert_eq!(scenario.action, ResponseAction::FireResponse);
        assert_eq!(scenario.kind, EmergencyType::Fire);
        assert_eq!(scenario.target_level, None);

        let back = serde_yaml::to_string(&scenario).unwrap();
        assert!(back.contains("affected_tank: 2"));
        assert!(back.contains("type: fire"));
        assert!(!back.contains("target_level"));
    }

    #[test]
    fn bad_tank_number_rejected() {
        let yaml = r#"
id: x
title: x
description: x
affected_tank: 3
action: shutdown
type: explosion
severity: critical
"#;
        assert!(serde_yaml::from_str::<Scenario>(yaml).is_err());
    }

    #[test]
    fn fire_flag_needs_fire_type() {
        let scenario = Scenario {
            id: "leak".into(),
            title: "Leak".into(),
            description: String::new(),
            affected_tank: TankId::Tank1,
            action: ResponseAction::StructuralResponse,
            target_level: None,
            kind: EmergencyType::Structural,
            severity: Severity::High,
        };
        let active = ActiveEmergency {
            scenario,
            system_response: None,
        };
        assert!(active.affects(TankId::Tank1));
        assert!(!active.is_fire_at(TankId::Tank1));
    }
}
