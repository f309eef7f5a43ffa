use std::collections::BTreeMap;
use std::fs;
use std::process::Command;

use anyhow::{Context, Result};
use serde::Deserialize;
use tempfile::tempdir;

#[derive(Debug, Deserialize)]
struct TrajectorySample {
    frame: u32,
    actor: String,
    position: [f32; 3],
    heading: f32,
}

#[derive(Debug, Deserialize)]
struct ActorStatus {
    is_executing: bool,
    remaining_actions: usize,
}

const SCENE: &str = r#"{
    "actors": [
        {"id": "actor_1", "position": [-8.0, 0.25, 3.0]}
    ],
    "obstacles": []
}"#;

const SCRIPT: &str = r#"{
    "actor_1": [
        {"action": "walk_to", "position": "C", "speed": "fast"},
        {"action": "turn", "direction": "audience"}
    ]
}"#;

#[test]
fn headless_run_reaches_the_scripted_mark() -> Result<()> {
    let temp = tempdir().context("creating scratch directory")?;
    let scene_path = temp.path().join("scene.json");
    let script_path = temp.path().join("script.json");
    let trajectory_path = temp.path().join("trajectory.json");
    let status_path = temp.path().join("status.json");
    fs::write(&scene_path, SCENE).context("writing scene fixture")?;
    fs::write(&script_path, SCRIPT).context("writing script fixture")?;

    let status = Command::new(env!("CARGO_BIN_EXE_stage_engine"))
        .args([
            "--script",
            script_path.to_str().context("script path is not UTF-8")?,
            "--scene",
            scene_path.to_str().context("scene path is not UTF-8")?,
            "--trajectory-json",
            trajectory_path.to_str().context("trajectory path is not UTF-8")?,
            "--status-json",
            status_path.to_str().context("status path is not UTF-8")?,
        ])
        .status()
        .context("running the stage_engine host")?;
    assert!(status.success(), "host exited with {status:?}");

    let samples: Vec<TrajectorySample> = serde_json::from_str(
        &fs::read_to_string(&trajectory_path).context("reading trajectory log")?,
    )
    .context("parsing trajectory log")?;
    assert!(!samples.is_empty(), "host produced no trajectory samples");

    let last = samples
        .iter()
        .filter(|sample| sample.actor == "actor_1")
        .last()
        .context("no samples for actor_1")?;
    assert!(
        last.position[0].abs() < 0.15 && last.position[2].abs() < 0.15,
        "final position {:?} is off the mark",
        last.position
    );
    assert_eq!(last.position[1], 0.25, "vertical axis must be untouched");
    assert!(
        last.heading.abs() < 0.02,
        "final heading {} is not toward the audience",
        last.heading
    );

    let frames: Vec<u32> = samples.iter().map(|sample| sample.frame).collect();
    let mut sorted = frames.clone();
    sorted.sort_unstable();
    assert_eq!(frames, sorted, "samples must be in frame order");

    let report: BTreeMap<String, ActorStatus> = serde_json::from_str(
        &fs::read_to_string(&status_path).context("reading status report")?,
    )
    .context("parsing status report")?;
    let actor_status = report.get("actor_1").context("actor_1 missing from report")?;
    assert!(!actor_status.is_executing);
    assert_eq!(actor_status.remaining_actions, 0);

    Ok(())
}
