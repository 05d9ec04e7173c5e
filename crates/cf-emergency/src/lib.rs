//! Scripted emergency drills for the two-tank site.
//!
//! # Architecture
//!
//! - A [`Catalog`] is an ordered, validated list of [`Scenario`]s.
//! - The [`EmergencyEngine`] walks the catalog with a wrapping cursor. Each
//!   trigger clones the next scenario, rolls a randomized system response and
//!   may heat the affected tank. Resolving applies the scenario's prescribed
//!   remediation to the plant.
//! - The engine never owns tank state. It reaches the levels, temperatures
//!   and the flow session through the [`PlantControl`] seam, implemented by
//!   whoever owns that state.
//!
//! Precondition failures (triggering twice, resolving nothing) are inert
//! no-ops.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod plant;
pub mod scenario;

pub use catalog::Catalog;
pub use engine::{EmergencyEngine, Resolution};
pub use error::{CatalogError, CatalogResult};
pub use plant::PlantControl;
pub use scenario::{
    ActiveEmergency, EmergencyType, ResponseAction, ResponseStatus, Scenario, Severity,
    SystemResponse,
};
