use std::fs;

use csv::Reader;
use kepler_drift::config::load_scenario;
use kepler_drift::export::trajectory::TrajectoryWriter;
use kepler_drift::kepler::SolverMethod;
use kepler_drift::scenario::{ScenarioError, from_config, load_simulation};
use kepler_drift::FailurePolicy;

const SCENARIO: &str = r#"
name = "inner-system"
dt = 0.05
t0 = 2.0

[[particles]]
position = [0.0, 0.0, 0.0]
velocity = [0.0, 0.0, 0.0]
mass = 1.0

[[particles]]
position = [1.0, 0.0, 0.0]
velocity = [0.0, 1.0, 0.0]
mass = 3.0e-6

[[particles]]
position = [0.0, 1.5, 0.2]
velocity = [-0.8, 0.0, 0.05]
mass = 1.0e-7

[integrator]
solver = "householder"
on_failure = "skip"
"#;

#[test]
fn scenario_file_builds_a_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inner.toml");
    fs::write(&path, SCENARIO).unwrap();

    let (config, mut sim) = load_simulation(&path).expect("scenario");
    assert_eq!(config.name, "inner-system");
    assert_eq!(sim.particles().len(), 3);
    assert_eq!(sim.central_mass(), 1.0);
    assert_eq!(sim.time(), 2.0);
    assert_eq!(sim.dt(), 0.05);
    assert_eq!(sim.settings().solver.method, SolverMethod::Householder);
    assert_eq!(sim.settings().solver.max_iterations, 100);
    assert_eq!(sim.settings().on_failure, FailurePolicy::Skip);

    sim.integrate(20).unwrap();
    assert!((sim.time() - 3.0).abs() < 1e-12);
}

#[test]
fn invalid_scenario_is_rejected_before_building() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, SCENARIO.replace("dt = 0.05", "dt = 0.0")).unwrap();
    assert!(matches!(
        load_simulation(&path),
        Err(ScenarioError::Config(_))
    ));

    let good = dir.path().join("good.toml");
    fs::write(&good, SCENARIO).unwrap();
    let mut config = load_scenario(&good).unwrap();
    config.particles.clear();
    assert!(from_config(&config).is_err());
}

#[test]
fn trajectory_export_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inner.toml");
    fs::write(&path, SCENARIO).unwrap();
    let (_, mut sim) = load_simulation(&path).unwrap();

    let out = dir.path().join("runs").join("inner.csv");
    let mut writer = TrajectoryWriter::create(&out).unwrap();
    writer.write_snapshot(0, sim.time(), sim.particles()).unwrap();
    for step in 1..=4 {
        sim.step().unwrap();
        writer.write_snapshot(step, sim.time(), sim.particles()).unwrap();
    }
    assert_eq!(writer.rows(), 15);
    writer.flush().unwrap();
    drop(writer);

    let mut reader = Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 15);
    let last = rows.last().unwrap();
    assert_eq!(&last[0], "4");
    assert_eq!(&last[2], "2");
    let x: f64 = last[3].parse().unwrap();
    assert_eq!(x, sim.particles()[2].position[0]);
}
