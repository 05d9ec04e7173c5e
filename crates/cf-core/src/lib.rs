//! cf-core: stable foundation for crudeflow.
//!
//! Contains:
//! - units (uom types for the readings the console reports)
//! - numeric (Real + tolerances + float helpers)
//! - tank (tank identifiers, level bounds, temperatures)
//! - random (injectable uniform random source)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod random;
pub mod tank;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CfError, CfResult};
pub use numeric::*;
pub use random::{RandomSource, ScriptedRandom};
pub use tank::*;
pub use units::*;
