//! Shared application service layer for crudeflow.
//!
//! This crate owns the canonical site state and routes operator intents to
//! the flow loop and the emergency engine, so that every frontend (the CLI
//! today, a graphical shell tomorrow) drives the same logic.

pub mod config;
pub mod console;
pub mod error;
pub mod script;
pub mod snapshot;

// Re-export key types for convenience
pub use config::{
    ConsoleConfig, InitialState, LATEST_CONFIG_VERSION, load_config, parse_config, save_config,
    validate_config,
};
pub use console::Console;
pub use error::{AppError, AppResult};
pub use script::{Script, Step, StepRecord, load_script, parse_script, run_script};
pub use snapshot::{ConsoleSnapshot, Controls, TankDetails, TankView};
