//! Executable script actions.
//!
//! Every action obeys the same two-part contract: `execute` runs exactly
//! once, at the instant the action becomes current in its queue, and
//! `is_complete` is polled every frame afterwards. Completion is pull-based
//! throughout — polled flags on the action or controller, never callbacks.

use std::time::Duration;

use stage_formats::{AnimateKind, Facing, SpeedTier};

use crate::motion::MotionController;
use crate::planner::PathPlanner;
use crate::types::Vec2;

/// Everything an action may touch while running.
pub struct ActionContext<'a> {
    pub controller: &'a mut MotionController,
    pub planner: &'a PathPlanner,
    pub obstacles: &'a [Vec2],
    pub now: Duration,
}

/// One executable unit of an actor's script.
#[derive(Debug)]
pub enum Action {
    Walk(WalkAction),
    Turn(TurnAction),
    Wait(WaitAction),
    Animate(AnimateAction),
}

/// Walk to a pre-resolved stage target.
///
/// The target was resolved when the script loaded, for validation; the
/// waypoint plan is computed here, from wherever the actor actually stands
/// when the action starts running.
#[derive(Debug)]
pub struct WalkAction {
    target: Vec2,
    speed: SpeedTier,
}

#[derive(Debug)]
pub struct TurnAction {
    facing: Facing,
}

#[derive(Debug)]
pub struct WaitAction {
    seconds: f32,
    started_at: Option<Duration>,
}

/// Placeholder for gesture/sit/stand: blocks the queue for its duration
/// without touching the transform.
#[derive(Debug)]
pub struct AnimateAction {
    kind: AnimateKind,
    seconds: f32,
    started_at: Option<Duration>,
}

impl Action {
    pub fn walk(target: Vec2, speed: SpeedTier) -> Self {
        Action::Walk(WalkAction { target, speed })
    }

    pub fn turn(facing: Facing) -> Self {
        Action::Turn(TurnAction { facing })
    }

    pub fn wait(seconds: f32) -> Self {
        Action::Wait(WaitAction {
            seconds,
            started_at: None,
        })
    }

    pub fn animate(kind: AnimateKind, seconds: f32) -> Self {
        Action::Animate(AnimateAction {
            kind,
            seconds,
            started_at: None,
        })
    }

    /// Stable kind label used in status reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Walk(_) => "walk_to",
            Action::Turn(_) => "turn",
            Action::Wait(_) => "wait",
            Action::Animate(animate) => animate.kind.token(),
        }
    }

    pub fn execute(&mut self, ctx: &mut ActionContext<'_>) {
        match self {
            Action::Walk(walk) => {
                let start = ctx.controller.position().plane();
                let waypoints = ctx.planner.plan(start, walk.target, ctx.obstacles);
                ctx.controller.set_waypoints(waypoints, walk.speed);
            }
            Action::Turn(turn) => ctx.controller.turn_to(turn.facing),
            Action::Wait(wait) => {
                debug_assert!(wait.started_at.is_none(), "execute must run exactly once");
                wait.started_at = Some(ctx.now);
            }
            Action::Animate(animate) => {
                debug_assert!(animate.started_at.is_none(), "execute must run exactly once");
                animate.started_at = Some(ctx.now);
            }
        }
    }

    pub fn is_complete(&self, ctx: &ActionContext<'_>) -> bool {
        match self {
            Action::Walk(_) => !ctx.controller.is_moving(),
            Action::Turn(_) => ctx.controller.turn_complete(),
            Action::Wait(wait) => elapsed(wait.started_at, ctx.now) >= wait.seconds,
            Action::Animate(animate) => elapsed(animate.started_at, ctx.now) >= animate.seconds,
        }
    }
}

fn elapsed(started_at: Option<Duration>, now: Duration) -> f32 {
    match started_at {
        Some(start) => now.saturating_sub(start).as_secs_f32(),
        // Not yet executed; never complete.
        None => f32::NEG_INFINITY,
    }
}
