//! Console configuration: loading, saving and validation.
//!
//! Every field is optional; an empty file reproduces the reference site
//! (tanks at 80 % and 20 %, both valves open, 50 ms ticks, 25 °C baseline,
//! the built-in drill catalog).

use std::path::Path;
use std::time::Duration;

use cf_core::{BASELINE_TEMPERATURE_C, LEVEL_MAX, LEVEL_MIN, ensure_finite, ensure_in_range};
use cf_emergency::{Catalog, Scenario};
use cf_sim::{DEFAULT_TICK_PERIOD, FlowParams};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const LATEST_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub initial: InitialState,
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Fixed seed for reproducible runs; entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub flow: FlowParams,
    #[serde(default = "default_baseline_temperature")]
    pub baseline_temperature_c: f64,
    /// Replaces the built-in drill catalog when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<Scenario>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    #[serde(default = "default_tank1_level")]
    pub tank1_level: f64,
    #[serde(default = "default_tank2_level")]
    pub tank2_level: f64,
    #[serde(default = "default_open")]
    pub valve1_open: bool,
    #[serde(default = "default_open")]
    pub valve2_open: bool,
}

fn default_version() -> u32 {
    LATEST_CONFIG_VERSION
}

fn default_tick_period_ms() -> u64 {
    DEFAULT_TICK_PERIOD.as_millis() as u64
}

fn default_baseline_temperature() -> f64 {
    BASELINE_TEMPERATURE_C
}

fn default_tank1_level() -> f64 {
    80.0
}

fn default_tank2_level() -> f64 {
    20.0
}

fn default_open() -> bool {
    true
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            tank1_level: default_tank1_level(),
            tank2_level: default_tank2_level(),
            valve1_open: true,
            valve2_open: true,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: LATEST_CONFIG_VERSION,
            initial: InitialState::default(),
            tick_period_ms: default_tick_period_ms(),
            seed: None,
            flow: FlowParams::default(),
            baseline_temperature_c: BASELINE_TEMPERATURE_C,
            scenarios: None,
        }
    }
}

impl ConsoleConfig {
    /// Defaults with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> AppResult<Catalog> {
        match &self.scenarios {
            Some(scenarios) => Ok(Catalog::new(scenarios.clone())?),
            None => Ok(Catalog::builtin()),
        }
    }
}

/// Check every value the console will rely on.
pub fn validate_config(config: &ConsoleConfig) -> AppResult<()> {
    if config.version == 0 || config.version > LATEST_CONFIG_VERSION {
        return Err(AppError::UnsupportedVersion {
            version: config.version,
        });
    }

    ensure_in_range(config.initial.tank1_level, LEVEL_MIN, LEVEL_MAX, "initial.tank1_level")?;
    ensure_in_range(config.initial.tank2_level, LEVEL_MIN, LEVEL_MAX, "initial.tank2_level")?;
    ensure_finite(config.baseline_temperature_c, "baseline_temperature_c")?;

    if config.tick_period_ms == 0 {
        return Err(AppError::Validation(
            "tick_period_ms must be positive".to_string(),
        ));
    }

    config.flow.validate()?;
    config.catalog()?;
    Ok(())
}

/// Parse a config from YAML text (JSON is valid YAML and parses too).
pub fn parse_config(content: &str) -> AppResult<ConsoleConfig> {
    let config: ConsoleConfig = serde_yaml::from_str(content).map_err(|e| AppError::Parse {
        what: "config",
        message: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Load and validate a config file. `.json` files go through serde_json,
/// everything else through serde_yaml.
pub fn load_config(path: &Path) -> AppResult<ConsoleConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if is_json(path) {
        let config: ConsoleConfig =
            serde_json::from_str(&content).map_err(|e| AppError::Parse {
                what: "config",
                message: e.to_string(),
            })?;
        validate_config(&config)?;
        Ok(config)
    } else {
        parse_config(&content)
    }
}

/// Save a config, in the format implied by the file extension.
pub fn save_config(path: &Path, config: &ConsoleConfig) -> AppResult<()> {
    validate_config(config)?;

    let content = if is_json(path) {
        serde_json::to_string_pretty(config).map_err(|e| AppError::Parse {
            what: "config",
            message: e.to_string(),
        })?
    } else {
        serde_yaml::to_string(config).map_err(|e| AppError::Parse {
            what: "config",
            message: e.to_string(),
        })?
    };

    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
