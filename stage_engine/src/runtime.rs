//! Headless run loop for the host binary.
//!
//! Reads the scene and script, drives the engine to completion on a
//! simulated clock at a fixed timestep, and writes the requested reports.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;
use stage_formats::{SceneFile, Script};

use crate::cli::Args;
use crate::clock::ManualClock;
use crate::engine::{ChoreographyEngine, StageActor};
use crate::marks::StageMarkRegistry;
use crate::motion::ActorTransform;
use crate::planner::PathPlanner;
use crate::types::{Vec2, Vec3};

#[derive(Debug, Serialize)]
struct TrajectorySample {
    frame: u32,
    actor: String,
    position: [f32; 3],
    heading: f32,
}

pub fn execute(args: Args) -> Result<()> {
    let scene_text = fs::read_to_string(&args.scene)
        .with_context(|| format!("reading scene from {}", args.scene.display()))?;
    let scene = SceneFile::parse(&scene_text)
        .with_context(|| format!("parsing scene JSON from {}", args.scene.display()))?;
    let script_text = fs::read_to_string(&args.script)
        .with_context(|| format!("reading script from {}", args.script.display()))?;
    let script = Script::parse(&script_text)
        .with_context(|| format!("parsing script JSON from {}", args.script.display()))?;

    let actors: Vec<StageActor> = scene
        .actors
        .iter()
        .map(|actor| StageActor {
            id: actor.id.clone(),
            transform: Rc::new(RefCell::new(ActorTransform {
                position: Vec3::new(actor.position[0], actor.position[1], actor.position[2]),
                heading: actor.heading,
            })),
        })
        .collect();
    let obstacles: Vec<Vec2> = scene
        .obstacles
        .iter()
        .map(|obstacle| Vec2::new(obstacle.x, obstacle.z))
        .collect();

    let clock = Rc::new(ManualClock::new());
    let mut engine = ChoreographyEngine::new(
        StageMarkRegistry::default(),
        PathPlanner::default(),
        clock.clone(),
    );
    if !engine.load_script(&script, &actors, &obstacles) {
        warn!("no script cues applied to this scene");
    }
    engine.start();

    let step = Duration::from_secs_f32(1.0 / args.fps as f32);
    let frame_cap = (args.max_seconds * args.fps as f32).ceil() as u32;
    let mut samples: Vec<TrajectorySample> = Vec::new();
    let mut frame: u32 = 0;
    while engine.is_executing() {
        if frame >= frame_cap {
            warn!(
                "run cap of {}s reached with actions still pending",
                args.max_seconds
            );
            break;
        }
        frame += 1;
        clock.advance(step);
        engine.update();

        if args.trajectory_json.is_some() {
            for actor in &actors {
                let transform = actor.transform.borrow();
                samples.push(TrajectorySample {
                    frame,
                    actor: actor.id.clone(),
                    position: [
                        transform.position.x,
                        transform.position.y,
                        transform.position.z,
                    ],
                    heading: transform.heading,
                });
            }
        }
    }

    println!(
        "Simulated {frame} frame(s) at {} fps across {} actor(s)",
        args.fps,
        actors.len()
    );
    for (id, status) in engine.get_status() {
        println!(
            "  {id}: {} action(s) remaining{}",
            status.remaining_actions,
            if status.is_executing { " (incomplete)" } else { "" }
        );
    }

    if let Some(path) = args.trajectory_json.as_ref() {
        let json = serde_json::to_string_pretty(&samples)
            .context("serializing trajectory log to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing trajectory log to {}", path.display()))?;
        println!("Saved trajectory log to {}", path.display());
    }

    if let Some(path) = args.status_json.as_ref() {
        let json = serde_json::to_string_pretty(&engine.get_status())
            .context("serializing status report to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing status report to {}", path.display()))?;
        println!("Saved status report to {}", path.display());
    }

    Ok(())
}
