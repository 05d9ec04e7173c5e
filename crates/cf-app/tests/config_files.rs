//! Integration test: config and script files on disk.

use std::path::PathBuf;

use cf_app::{
    AppError, Console, ConsoleConfig, Step, load_config, load_script, parse_config, run_script,
    save_config,
};
use cf_core::TankId;
use cf_sim::{FlowDirection, FlowSession};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("crudeflow-{}-{name}", std::process::id()))
}

#[test]
fn yaml_and_json_configs_survive_disk() {
    let mut config = ConsoleConfig::seeded(11);
    config.initial.tank1_level = 65.0;
    config.initial.valve2_open = false;

    for name in ["site.yaml", "site.json"] {
        let path = temp_path(name);
        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config, "{name}");
    }
}

#[test]
fn missing_config_reports_path() {
    let path = temp_path("missing.yaml");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, AppError::FileRead { path: p, .. } if p == path));
}

#[test]
fn config_drives_initial_state() {
    let config = parse_config(
        "seed: 3\ninitial:\n  tank1_level: 40\n  tank2_level: 60\n  valve1_open: false\n",
    )
    .unwrap();
    let console = Console::from_config(&config).unwrap();

    assert_eq!(console.plant().levels(), (40.0, 60.0));
    assert!(!console.plant().valve_open(TankId::Tank1));
    assert!(!console.controls().equalize);
}

#[test]
fn custom_catalog_replaces_builtin() {
    let config = parse_config(
        r#"
seed: 5
scenarios:
  - id: drain-2
    title: Drain
    description: Tank 2 must drop to 10.
    affected_tank: 2
    action: transfer
    target_level: 10
    type: operational
    severity: low
"#,
    )
    .unwrap();
    let mut console = Console::from_config(&config).unwrap();

    assert_eq!(console.trigger_next().unwrap().id(), "drain-2");
    let resolution = console.resolve().unwrap();
    assert_eq!(resolution.levels_after, Some((90.0, 10.0)));
    assert_eq!(console.trigger_next().unwrap().id(), "drain-2");
}

#[test]
fn invalid_catalog_is_rejected() {
    let err = parse_config("scenarios: []\n").unwrap_err();
    assert!(matches!(err, AppError::Catalog(_)));
}

#[test]
fn script_file_replays() {
    let path = temp_path("drill.yaml");
    std::fs::write(
        &path,
        "steps:\n  - do: transfer\n    direction: right\n  - do: advance\n    ms: 200\n  - do: trigger\n  - do: transfer\n    direction: left\n  - do: resolve\n  - do: stop\n",
    )
    .unwrap();
    let script = load_script(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut console = Console::seeded(1);
    let records = run_script(&mut console, &script);

    assert_eq!(records.len(), 6);
    assert_eq!(
        records[0].session,
        FlowSession::Transfer {
            direction: FlowDirection::Right
        }
    );
    assert_eq!(records[1].levels, (76.0, 24.0));
    assert_eq!(records[2].emergency.as_deref(), Some("pipe-rupture-1"));
    // Locked out while the drill is active.
    assert!(!records[3].accepted);
    assert_eq!(records[3].step, Step::Transfer { direction: FlowDirection::Left });
    // Structural response halts the transfer.
    assert_eq!(records[4].session, FlowSession::Idle);
    assert!(records[4].emergency.is_none());
    assert!(!records[5].accepted);
}

#[test]
fn bundled_demos_load() {
    let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let config = load_config(&demos.join("site.yaml")).unwrap();
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.flow.transfer.step, 0.5);

    let script = load_script(&demos.join("shift_drill.yaml")).unwrap();
    let mut console = Console::from_config(&config).unwrap();
    let records = run_script(&mut console, &script);

    let last = records.last().unwrap();
    assert_eq!(last.session, FlowSession::Idle);
    assert_eq!(last.levels.0, last.levels.1);
    assert!(last.emergency.is_none());
}
