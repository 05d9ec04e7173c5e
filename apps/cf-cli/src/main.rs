use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use cf_app::{
    AppError, AppResult, Console, ConsoleConfig, ConsoleSnapshot, load_config, load_script,
    run_script,
};
use cf_core::TankId;
use cf_emergency::{Catalog, Resolution};
use cf_sim::FlowDirection;

#[derive(Parser)]
#[command(name = "crudeflow")]
#[command(about = "CrudeFlow - two-tank transfer console and emergency drill simulator", long_about = None)]
struct Cli {
    #[command(flatten)]
    site: SiteArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SiteArgs {
    /// Site config (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Fixed seed; overrides the config
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the drill catalog in trigger order
    Catalog,
    /// Run a transfer for a number of ticks
    Transfer {
        #[arg(long, value_enum)]
        direction: Direction,
        /// Ticks to run (50 ms each by default)
        #[arg(long, default_value_t = 10)]
        ticks: u32,
    },
    /// Equalize both tanks until they settle
    Equalize {
        /// Give up after this many ticks
        #[arg(long, default_value_t = 1_000)]
        max_ticks: usize,
    },
    /// Trigger and resolve drills from the catalog
    Drill {
        /// Number of drills to run
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Replay a scripted operator session
    Script {
        /// Path to the script YAML file
        script_path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    /// Tank 2 into tank 1
    Left,
    /// Tank 1 into tank 2
    Right,
}

impl From<Direction> for FlowDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => FlowDirection::Left,
            Direction::Right => FlowDirection::Right,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = site_config(&cli.site)?;

    match cli.command {
        Commands::Catalog => cmd_catalog(&config.catalog()?, cli.site.json),
        Commands::Transfer { direction, ticks } => {
            cmd_transfer(&config, direction.into(), ticks, cli.site.json)
        }
        Commands::Equalize { max_ticks } => cmd_equalize(&config, max_ticks, cli.site.json),
        Commands::Drill { count } => cmd_drill(&config, count, cli.site.json),
        Commands::Script { script_path } => cmd_script(&config, &script_path, cli.site.json),
    }
}

fn site_config(site: &SiteArgs) -> AppResult<ConsoleConfig> {
    let mut config = match &site.config {
        Some(path) => load_config(path)?,
        None => ConsoleConfig::default(),
    };
    if site.seed.is_some() {
        config.seed = site.seed;
    }
    tracing::debug!(seed = ?config.seed, custom_catalog = config.scenarios.is_some(), "site config ready");
    Ok(config)
}

fn cmd_catalog(catalog: &Catalog, json: bool) -> AppResult<()> {
    if json {
        return print_json(&catalog.scenarios());
    }

    println!("Drill catalog ({} scenarios):", catalog.len());
    for (i, scenario) in catalog.iter().enumerate() {
        let target = scenario
            .target_level
            .map(|t| format!(" -> {t}%"))
            .unwrap_or_default();
        println!(
            "  {:>2}. {:<18} {:<9} {:<8} {} {:?}{}",
            i + 1,
            scenario.id,
            scenario.severity.label(),
            format!("{:?}", scenario.kind).to_lowercase(),
            scenario.affected_tank,
            scenario.action,
            target
        );
    }
    Ok(())
}

fn cmd_transfer(
    config: &ConsoleConfig,
    direction: FlowDirection,
    ticks: u32,
    json: bool,
) -> AppResult<()> {
    let mut console = Console::from_config(config)?;
    if !console.begin_transfer(direction) {
        return Err(AppError::InvalidInput(format!(
            "transfer {direction:?} refused: check valves and levels"
        )));
    }

    let fired = console.advance(config.tick_period() * ticks);
    console.stop();

    if json {
        return print_json(&console.snapshot());
    }
    println!("✓ Transfer {direction:?}: {fired} ticks");
    print_snapshot(&console.snapshot());
    print_details(&console);
    Ok(())
}

fn cmd_equalize(config: &ConsoleConfig, max_ticks: usize, json: bool) -> AppResult<()> {
    let mut console = Console::from_config(config)?;
    if !console.begin_equalize() {
        return Err(AppError::InvalidInput(
            "equalize refused: both valves must be open".to_string(),
        ));
    }

    let fired = console.run_until_idle(max_ticks);
    let settled = !console.flow().is_active();
    console.stop();

    if json {
        return print_json(&console.snapshot());
    }
    if settled {
        println!("✓ Equalized after {fired} ticks");
    } else {
        println!("✗ Not settled after {fired} ticks");
    }
    print_snapshot(&console.snapshot());
    print_details(&console);
    Ok(())
}

#[derive(Serialize)]
struct DrillReport {
    resolutions: Vec<Resolution>,
    snapshot: ConsoleSnapshot,
}

fn cmd_drill(config: &ConsoleConfig, count: usize, json: bool) -> AppResult<()> {
    let mut console = Console::from_config(config)?;
    let mut resolutions = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(emergency) = console.trigger_next() else {
            break;
        };
        if !json {
            println!(
                "⚠ {} [{}] {}: {}",
                emergency.scenario.title,
                emergency.scenario.severity,
                emergency.scenario.affected_tank,
                emergency.scenario.description
            );
            if let Some(response) = &emergency.system_response {
                println!("    system: {:?} - {}", response.status, response.message);
            }
            for tank in TankId::ALL {
                let temp = console.plant().temperature(tank);
                if temp.internal_c != console.engine().baseline().internal_c {
                    println!(
                        "    {tank}: {:.0} °C internal, {:.0} °C external",
                        temp.internal_c, temp.external_c
                    );
                }
            }
        }
        if let Some(resolution) = console.resolve() {
            if !json {
                println!("  ✓ resolved by {:?}", resolution.emergency.scenario.action);
            }
            resolutions.push(resolution);
        }
    }

    if json {
        return print_json(&DrillReport {
            resolutions,
            snapshot: console.snapshot(),
        });
    }
    print_snapshot(&console.snapshot());
    Ok(())
}

fn cmd_script(config: &ConsoleConfig, script_path: &Path, json: bool) -> AppResult<()> {
    let script = load_script(script_path)?;
    let mut console = Console::from_config(config)?;
    let records = run_script(&mut console, &script);

    if json {
        return print_json(&records);
    }
    for (i, record) in records.iter().enumerate() {
        let mark = if record.accepted { "✓" } else { "·" };
        let note = record.note.as_deref().unwrap_or("");
        println!(
            "{mark} {:>3} {:<40} levels {:>5.1} / {:>5.1} {}",
            i + 1,
            format!("{:?}", record.step),
            record.levels.0,
            record.levels.1,
            note
        );
    }
    print_snapshot(&console.snapshot());
    Ok(())
}

fn print_snapshot(snapshot: &ConsoleSnapshot) {
    println!("t = {} ms, {} ticks", snapshot.time_ms, snapshot.ticks);
    for view in &snapshot.tanks {
        let valve = if view.valve_open { "open" } else { "closed" };
        let flag = if view.on_fire {
            " FIRE"
        } else if view.alarm {
            " ALARM"
        } else {
            ""
        };
        println!(
            "  {}: {:>5.1} %  {:>6.0} °C  valve {valve}{flag}",
            view.tank, view.level, view.temperature.internal_c
        );
    }
    println!(
        "  pressure {:.1} psi, flow {:.1} m³/s, total {:.1}",
        snapshot.readings.pressure_psi, snapshot.readings.flow_rate_m3ps, snapshot.total_volume
    );
    if let Some(emergency) = &snapshot.emergency {
        println!("  active emergency: {}", emergency.id());
    }
}

fn print_details(console: &Console) {
    for tank in TankId::ALL {
        let details = console.tank_details(tank);
        println!(
            "  {}: {:.0} / {:.0} bbl ({} m x {} m)",
            details.tank,
            details.current_bbl,
            details.capacity_bbl,
            details.height_m,
            details.diameter_m
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| AppError::Parse {
        what: "output",
        message: e.to_string(),
    })?;
    println!("{text}");
    Ok(())
}
