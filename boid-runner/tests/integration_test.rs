use anyhow::Result;
use boid_core::{Boid, SimConfig, Simulation, Vector2D, Weights, PALETTE};
use boid_runner::{load_settings, snapshot, RunOptions, Runner};
use boid_shared::{FoodDrop, FrameSnapshot, Position, SimulationSettings};

/// Parses the JSON-lines output of a run
fn read_snapshots(output: &[u8]) -> Result<Vec<FrameSnapshot>> {
    let text = std::str::from_utf8(output)?;
    text.lines()
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}

/// A single boid cruising right along y = 300 with no steering at all
fn lone_cruiser(food: Vec<FoodDrop>) -> Result<Runner> {
    let boid = Boid::new(
        Vector2D::new(300.0, 300.0),
        Vector2D::new(4.0, 0.0),
        PALETTE[2],
    );
    let sim = Simulation::with_boids(SimConfig::default(), vec![boid])?;
    Ok(Runner::from_simulation(sim, Weights::zero(), food))
}

#[test]
fn test_snapshots_written_at_interval() -> Result<()> {
    let settings = SimulationSettings {
        boid_count: 30,
        ..SimulationSettings::default()
    };
    let mut runner = Runner::new(&settings)?;
    let mut output = Vec::new();

    let summary = runner.run(
        &RunOptions {
            frames: 10,
            snapshot_every: 5,
        },
        &mut output,
    )?;

    let snapshots = read_snapshots(&output)?;
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].frame, 5);
    assert_eq!(snapshots[1].frame, 10);
    for boid in &snapshots[1].boids {
        assert!((0.0..=1280.0).contains(&boid.position.x));
        assert!((0.0..=720.0).contains(&boid.position.y));
        assert!(PALETTE
            .iter()
            .any(|c| [c.r, c.g, c.b] == boid.color));
    }
    assert_eq!(snapshots[1].boids.len(), 30);
    assert_eq!(summary.frames, 10);
    assert_eq!(summary.boid_count, 30);
    assert!(summary.mean_speed <= 4.0 + 1e-4);
    Ok(())
}

#[test]
fn test_no_snapshots_when_disabled() -> Result<()> {
    let mut runner = lone_cruiser(Vec::new())?;
    let mut output = Vec::new();

    runner.run(
        &RunOptions {
            frames: 20,
            snapshot_every: 0,
        },
        &mut output,
    )?;

    assert!(output.is_empty());
    assert_eq!(runner.simulation().frame(), 20);
    Ok(())
}

#[test]
fn test_scheduled_food_is_eaten() -> Result<()> {
    // the boid reaches x = 312 on frame 3, one unit short of the first drop
    let mut runner = lone_cruiser(vec![
        FoodDrop {
            frame: 2,
            position: Position::new(313.0, 300.0),
        },
        FoodDrop {
            frame: 0,
            position: Position::new(900.0, 500.0),
        },
    ])?;
    let mut output = Vec::new();

    let summary = runner.run(
        &RunOptions {
            frames: 5,
            snapshot_every: 1,
        },
        &mut output,
    )?;

    let snapshots = read_snapshots(&output)?;
    assert_eq!(snapshots[0].food, vec![Position::new(900.0, 500.0)]);
    assert_eq!(snapshots[1].food.len(), 1);
    assert_eq!(snapshots[2].food, vec![Position::new(900.0, 500.0)]);
    assert_eq!(summary.food_consumed, 1);
    assert_eq!(summary.food_remaining, 1);
    Ok(())
}

#[test]
fn test_food_outside_arena_ignored() -> Result<()> {
    let mut runner = lone_cruiser(vec![FoodDrop {
        frame: 0,
        position: Position::new(640.0, 760.0),
    }])?;

    let summary = runner.run(
        &RunOptions {
            frames: 1,
            snapshot_every: 0,
        },
        &mut Vec::new(),
    )?;

    assert_eq!(summary.food_remaining, 0);
    assert_eq!(summary.food_consumed, 0);
    Ok(())
}

#[test]
fn test_snapshot_matches_simulation() -> Result<()> {
    let mut runner = lone_cruiser(Vec::new())?;
    runner.run(
        &RunOptions {
            frames: 1,
            snapshot_every: 0,
        },
        &mut Vec::new(),
    )?;

    let frame = snapshot(runner.simulation());

    assert_eq!(frame.frame, 1);
    assert_eq!(frame.boids[0].position, Position::new(304.0, 300.0));
    assert_eq!(frame.boids[0].heading, 0.0);
    assert_eq!(frame.boids[0].color, [255, 255, 102]);
    Ok(())
}

#[test]
fn test_invalid_settings_rejected() {
    let settings = SimulationSettings {
        cell_size: 10.0,
        width: -5.0,
        ..SimulationSettings::default()
    };

    let error = Runner::new(&settings).err().expect("settings should be rejected");
    let message = format!("{:#}", error);

    assert!(message.contains("Failed to set up the simulation"));
    assert!(message.contains("grid cell size 10"));
    assert!(message.contains("arena must have a positive size"));
}

#[test]
fn test_oversized_arena_rejected() {
    let settings = SimulationSettings {
        width: 1e12,
        height: 1e12,
        ..SimulationSettings::default()
    };

    let error = Runner::new(&settings).err().expect("settings should be rejected");

    assert!(format!("{:#}", error).contains("exceeds the limit of 1048576 cells"));
}

#[test]
fn test_load_settings_from_file() -> Result<()> {
    let path = std::env::temp_dir().join(format!("boid-runner-settings-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "boid_count": 12,
            "weights": { "current": 1.0 },
            "food": [ { "frame": 4, "position": { "x": 10.0, "y": 20.0 } } ]
        }"#,
    )?;

    let settings = load_settings(&path);
    std::fs::remove_file(&path)?;
    let settings = settings?;

    assert_eq!(settings.boid_count, 12);
    assert_eq!(settings.weights.current, 1.0);
    assert_eq!(settings.weights.boundary_avoidance, 3.0);
    assert_eq!(settings.food[0].frame, 4);
    assert_eq!(settings.cell_size, 120.0);
    Ok(())
}

#[test]
fn test_load_settings_reports_missing_file() {
    let path = std::env::temp_dir().join("boid-runner-does-not-exist.json");

    let error = load_settings(&path).unwrap_err();

    assert!(error.to_string().contains("Failed to read settings file"));
}
