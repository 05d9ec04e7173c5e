//! Tick-driven transfer and equalization loop for the two-tank site.
//!
//! Provides:
//! - `Plant`: canonical tank levels, wall temperatures and valve flags
//! - `FlowLoop`: directional transfer / level equalization session, stepped
//!   one tick at a time, with synthesized pressure and flow-rate readings
//! - `TickSchedule`: the re-armable fixed-period timer that drives the loop
//! - `FlowParams`: per-mode step sizes, pressure bands and flow rates

pub mod error;
pub mod flow;
pub mod params;
pub mod plant;
pub mod schedule;

pub use error::{SimError, SimResult};
pub use flow::{FlowDirection, FlowLoop, FlowReadings, FlowSession, TickOutcome};
pub use params::{FlowParams, FlowProfile};
pub use plant::Plant;
pub use schedule::{DEFAULT_TICK_PERIOD, TickSchedule};
