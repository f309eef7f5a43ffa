//! Script loading and the per-frame drive loop.
//!
//! The engine owns one motion controller and one action queue per actor
//! (a lane), translates script entries into executable actions against the
//! mark registry, and ticks every lane once per external frame. Anything
//! malformed in a script is skipped with a warning; a bad cue never halts
//! the rest of the performance.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use serde::Serialize;
use stage_formats::{ActionCommand, ActionEntry, PositionRef, Script};

use crate::actions::{Action, ActionContext};
use crate::clock::Clock;
use crate::marks::StageMarkRegistry;
use crate::motion::{ActorHandle, MotionController};
use crate::planner::PathPlanner;
use crate::queue::ActionQueue;
use crate::types::Vec2;

/// A named actor handle supplied by the embedding scene. The engine never
/// creates or destroys actors; it only steers the ones it is given.
#[derive(Clone)]
pub struct StageActor {
    pub id: String,
    pub transform: ActorHandle,
}

struct Lane {
    controller: MotionController,
    queue: ActionQueue,
}

impl Lane {
    fn new(transform: ActorHandle) -> Self {
        Self {
            controller: MotionController::new(transform),
            queue: ActionQueue::new(),
        }
    }
}

/// Per-actor snapshot returned by [`ChoreographyEngine::get_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorStatus {
    pub is_executing: bool,
    pub remaining_actions: usize,
    pub current_action: Option<&'static str>,
}

pub struct ChoreographyEngine {
    marks: StageMarkRegistry,
    planner: PathPlanner,
    clock: Rc<dyn Clock>,
    lanes: BTreeMap<String, Lane>,
    obstacles: Vec<Vec2>,
    running: bool,
    last_tick: Option<Duration>,
}

impl ChoreographyEngine {
    pub fn new(marks: StageMarkRegistry, planner: PathPlanner, clock: Rc<dyn Clock>) -> Self {
        Self {
            marks,
            planner,
            clock,
            lanes: BTreeMap::new(),
            obstacles: Vec::new(),
            running: false,
            last_tick: None,
        }
    }

    /// Load a script against the given actors and obstacle snapshot.
    ///
    /// Performs a full reset first; nothing survives from a previous script.
    /// Returns whether at least one actor was registered. Configuration
    /// errors (unknown actions or marks, prop targets, actors missing from
    /// the scene) skip the offending unit and keep loading.
    pub fn load_script(
        &mut self,
        script: &Script,
        actors: &[StageActor],
        obstacles: &[Vec2],
    ) -> bool {
        self.stop_all();
        self.lanes.clear();
        self.obstacles = obstacles.to_vec();

        let mut registered = false;
        for (actor_id, entries) in &script.actors {
            let Some(actor) = actors.iter().find(|actor| actor.id == *actor_id) else {
                warn!("script actor '{actor_id}' is not in the scene; skipping its cues");
                continue;
            };

            let mut actions = Vec::new();
            for (index, entry) in entries.iter().enumerate() {
                match self.build_action(entry) {
                    Ok(action) => actions.push(action),
                    Err(err) => {
                        warn!("skipping cue {index} for '{actor_id}': {err}");
                    }
                }
            }

            let lane = self
                .lanes
                .entry(actor_id.clone())
                .or_insert_with(|| Lane::new(actor.transform.clone()));
            debug!("queueing {} cue(s) for '{actor_id}'", actions.len());
            for action in actions {
                lane.queue.push(action);
            }
            registered = true;
        }
        registered
    }

    fn build_action(&self, entry: &ActionEntry) -> Result<Action> {
        let command = entry.to_command()?;
        Ok(match command {
            ActionCommand::Walk { position, speed } => {
                // Resolved now for validation; the waypoint plan is computed
                // when the action starts running.
                let target = self.resolve_position(&position)?;
                Action::walk(target, speed)
            }
            ActionCommand::Turn { facing } => Action::turn(facing),
            ActionCommand::Wait { seconds } => Action::wait(seconds),
            ActionCommand::Animate { kind, seconds } => Action::animate(kind, seconds),
        })
    }

    fn resolve_position(&self, position: &PositionRef) -> Result<Vec2> {
        match position {
            PositionRef::Coords { x, z } => Ok(Vec2::new(*x, *z)),
            PositionRef::Mark(name) => self
                .marks
                .resolve(name)
                .ok_or_else(|| anyhow!("unknown stage mark '{name}'")),
        }
    }

    /// Begin ticking. Every registered queue starts; the first action of
    /// each executes immediately.
    pub fn start(&mut self) {
        if self.lanes.is_empty() {
            warn!("start requested before any script was loaded");
            return;
        }
        let now = self.clock.now();
        self.last_tick = Some(now);
        self.running = true;

        let planner = &self.planner;
        let obstacles = self.obstacles.as_slice();
        for lane in self.lanes.values_mut() {
            let mut ctx = ActionContext {
                controller: &mut lane.controller,
                planner,
                obstacles,
                now,
            };
            lane.queue.start(&mut ctx);
        }
    }

    /// Immediate, non-graceful reset of every queue and controller.
    pub fn stop_all(&mut self) {
        for lane in self.lanes.values_mut() {
            lane.queue.clear();
            lane.controller.stop();
        }
        self.running = false;
        self.last_tick = None;
    }

    /// Advance the whole choreography by one frame. `dt` is derived from
    /// the injected clock, so call cadence only changes simulation speed,
    /// never correctness.
    pub fn update(&mut self) {
        let now = self.clock.now();
        let dt = match self.last_tick {
            Some(previous) => now.saturating_sub(previous).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);

        let planner = &self.planner;
        let obstacles = self.obstacles.as_slice();
        let mut any_executing = false;
        for lane in self.lanes.values_mut() {
            lane.controller.update(dt);
            let mut ctx = ActionContext {
                controller: &mut lane.controller,
                planner,
                obstacles,
                now,
            };
            lane.queue.update(&mut ctx);
            any_executing |= lane.queue.is_executing();
        }

        if self.running && !any_executing {
            self.running = false;
            info!("choreography complete; every action queue has drained");
        }
    }

    /// True while any actor still has actions to run.
    pub fn is_executing(&self) -> bool {
        self.lanes.values().any(|lane| lane.queue.is_executing())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pure read of per-actor progress; no side effects.
    pub fn get_status(&self) -> BTreeMap<String, ActorStatus> {
        self.lanes
            .iter()
            .map(|(id, lane)| {
                (
                    id.clone(),
                    ActorStatus {
                        is_executing: lane.queue.is_executing(),
                        remaining_actions: lane.queue.remaining(),
                        current_action: lane.queue.current_kind(),
                    },
                )
            })
            .collect()
    }
}
