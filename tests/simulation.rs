use sylva_data::LiveEvent;
use sylva_lib::Simulation;

const CONFIG: &str = r#"
[world]
width = 120
height = 120
sectors_per_axis = 4
seed = 7
initial_organisms = 3

[cells]
offspring_type = "Seed"
"#;

#[test]
fn test_simulation_from_toml_runs() {
    let mut sim = Simulation::from_toml(CONFIG).unwrap();
    assert_eq!(sim.world.cells.len(), 21);

    let events = sim.run(50).unwrap();
    let founders = events
        .iter()
        .filter(|e| matches!(e, LiveEvent::Birth { tick: 0, .. }))
        .count();
    assert_eq!(founders, 21);
    assert_eq!(sim.world.tick, 50);
    assert_eq!(sim.world.metrics.tick_count(), 50);
}

#[test]
fn test_invalid_toml_is_rejected() {
    assert!(Simulation::from_toml("[world]\nwidth = 0\n").is_err());
    assert!(Simulation::from_toml("[world\n").is_err());
}

#[test]
fn test_snapshot_is_json_array_of_cells() {
    let sim = Simulation::from_toml(CONFIG).unwrap();
    let json = sim.snapshot_json().unwrap();
    let parsed: Vec<sylva_data::CellInfo> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), sim.world.cells.len());
    assert_eq!(parsed, sim.cells());
}
