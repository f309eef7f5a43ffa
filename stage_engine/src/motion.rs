//! Per-actor kinematic state machine.
//!
//! A controller owns one actor transform exclusively while choreography is
//! running and walks it through a waypoint list: rotation and translation
//! may both be active in a frame, and an actively translating actor always
//! faces its direction of travel, overriding any pending explicit turn.

use std::cell::RefCell;
use std::rc::Rc;

use stage_formats::{Facing, SpeedTier};

use crate::types::{normalize_angle, Vec2, Vec3};

/// Fixed rotation rate, radians per second.
pub const ROTATION_SPEED: f32 = 3.0;
/// Snap distance for waypoint arrival, stage units.
pub const ARRIVAL_EPSILON: f32 = 0.1;

const HEADING_EPSILON: f32 = 0.01;

/// Mutable transform for one actor. The embedding renderer must treat this
/// as read-only while the engine is running; `position.y` is preserved from
/// the scene and never written here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorTransform {
    pub position: Vec3,
    pub heading: f32,
}

pub type ActorHandle = Rc<RefCell<ActorTransform>>;

#[derive(Debug)]
pub struct MotionController {
    actor: ActorHandle,
    waypoints: Vec<Vec2>,
    cursor: usize,
    target: Option<Vec2>,
    speed: f32,
    target_heading: Option<f32>,
    turn_complete: bool,
}

impl MotionController {
    pub fn new(actor: ActorHandle) -> Self {
        Self {
            actor,
            waypoints: Vec::new(),
            cursor: 0,
            target: None,
            speed: SpeedTier::default().units_per_second(),
            target_heading: None,
            turn_complete: true,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.actor.borrow().position
    }

    pub fn heading(&self) -> f32 {
        self.actor.borrow().heading
    }

    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    pub fn turn_complete(&self) -> bool {
        self.turn_complete
    }

    /// Walk straight at `point` at the given tier.
    pub fn set_target(&mut self, point: Vec2, tier: SpeedTier) {
        self.speed = tier.units_per_second();
        self.target = Some(point);
    }

    /// Follow `waypoints` in order at the given tier. The list must come
    /// from the planner and is never empty.
    pub fn set_waypoints(&mut self, waypoints: Vec<Vec2>, tier: SpeedTier) {
        debug_assert!(!waypoints.is_empty(), "planner always yields a waypoint");
        if waypoints.is_empty() {
            return;
        }
        self.waypoints = waypoints;
        self.cursor = 0;
        let first = self.waypoints[0];
        self.set_target(first, tier);
    }

    /// Rotate toward a fixed facing; completion is reported through the
    /// polled [`MotionController::turn_complete`] flag.
    pub fn turn_to(&mut self, facing: Facing) {
        self.target_heading = Some(facing.heading_radians());
        self.turn_complete = false;
    }

    /// Drop all motion and rotation state immediately, no easing.
    pub fn stop(&mut self) {
        self.waypoints.clear();
        self.cursor = 0;
        self.target = None;
        self.target_heading = None;
        self.turn_complete = true;
    }

    /// Advance the state machine by `dt` seconds. Returns whether a walk
    /// sequence or turn finished this frame.
    pub fn update(&mut self, dt: f32) -> bool {
        let mut completed = false;
        let mut actor = self.actor.borrow_mut();

        if let Some(goal) = self.target_heading {
            let diff = normalize_angle(goal - actor.heading);
            if diff.abs() < HEADING_EPSILON {
                actor.heading = normalize_angle(goal);
                self.target_heading = None;
                self.turn_complete = true;
                completed = true;
            } else {
                let step = diff.abs().min(ROTATION_SPEED * dt);
                actor.heading = normalize_angle(actor.heading + step.copysign(diff));
            }
        }

        if let Some(target) = self.target {
            let dx = target.x - actor.position.x;
            let dz = target.z - actor.position.z;
            let remaining = (dx * dx + dz * dz).sqrt();
            if remaining < ARRIVAL_EPSILON {
                actor.position.x = target.x;
                actor.position.z = target.z;
                self.cursor += 1;
                match self.waypoints.get(self.cursor).copied() {
                    Some(next) => self.target = Some(next),
                    None => {
                        self.waypoints.clear();
                        self.cursor = 0;
                        self.target = None;
                        completed = true;
                    }
                }
            } else {
                let step = (self.speed * dt).min(remaining);
                actor.position.x += dx / remaining * step;
                actor.position.z += dz / remaining * step;
                // Translation owns the visible heading while active.
                actor.heading = normalize_angle(dx.atan2(dz));
            }
        }

        completed
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    fn spawn(x: f32, y: f32, z: f32, heading: f32) -> ActorHandle {
        Rc::new(RefCell::new(ActorTransform {
            position: Vec3::new(x, y, z),
            heading,
        }))
    }

    fn step_until_idle(controller: &mut MotionController, dt: f32) -> u32 {
        let mut frames = 0;
        while controller.is_moving() || !controller.turn_complete() {
            frames += 1;
            assert!(frames < 10_000, "controller failed to converge");
            controller.update(dt);
        }
        frames
    }

    #[test]
    fn walk_snaps_onto_the_target() {
        let actor = spawn(-8.0, 0.25, 3.0, 0.0);
        let mut controller = MotionController::new(actor.clone());
        controller.set_waypoints(vec![Vec2::new(0.0, 0.0)], SpeedTier::Normal);
        step_until_idle(&mut controller, 1.0 / 60.0);

        let transform = actor.borrow();
        assert!(transform.position.x.abs() < 1e-4);
        assert!(transform.position.z.abs() < 1e-4);
        assert_eq!(transform.position.y, 0.25, "vertical axis must be untouched");
    }

    #[test]
    fn waypoints_are_followed_in_order() {
        let actor = spawn(0.0, 0.0, 0.0, 0.0);
        let mut controller = MotionController::new(actor.clone());
        controller.set_waypoints(
            vec![Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0)],
            SpeedTier::Run,
        );

        let mut saw_first_corner = false;
        let mut frames = 0;
        while controller.is_moving() {
            frames += 1;
            assert!(frames < 10_000);
            controller.update(1.0 / 60.0);
            let transform = actor.borrow();
            if transform.position.plane().distance(Vec2::new(2.0, 0.0)) < ARRIVAL_EPSILON {
                saw_first_corner = true;
            }
        }
        assert!(saw_first_corner, "actor skipped the intermediate waypoint");
        let transform = actor.borrow();
        assert!(transform.position.plane().distance(Vec2::new(2.0, 2.0)) < 1e-4);
    }

    #[test]
    fn translation_overrides_heading_toward_travel() {
        let actor = spawn(0.0, 0.0, 0.0, PI);
        let mut controller = MotionController::new(actor.clone());
        controller.set_waypoints(vec![Vec2::new(5.0, 0.0)], SpeedTier::Normal);
        controller.update(1.0 / 60.0);
        // Moving along +x: atan2(dx, dz) = pi/2, regardless of the old heading.
        assert!((actor.borrow().heading - FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn turn_converges_and_raises_the_polled_flag() {
        let actor = spawn(0.0, 0.0, 0.0, -3.0);
        let mut controller = MotionController::new(actor.clone());
        controller.turn_to(Facing::Audience);
        assert!(!controller.turn_complete());
        let frames = step_until_idle(&mut controller, 1.0 / 60.0);
        assert!(frames > 1, "a three-radian turn cannot finish in one frame");
        assert_eq!(actor.borrow().heading, 0.0);
        assert!(controller.turn_complete());
    }

    #[test]
    fn turns_take_the_short_way_around() {
        let actor = spawn(0.0, 0.0, 0.0, 3.0);
        let mut controller = MotionController::new(actor.clone());
        controller.turn_to(Facing::Upstage);
        controller.update(0.01);
        // From +3.0 rad the short way to pi is counter-clockwise through
        // increasing angles, wrapping at the branch cut.
        let heading = actor.borrow().heading;
        assert!(heading > 3.0 || heading <= -3.0, "went the long way: {heading}");
    }

    #[test]
    fn heading_stays_in_range_across_updates() {
        let actor = spawn(0.0, 0.0, 0.0, 0.0);
        let mut controller = MotionController::new(actor.clone());
        controller.set_waypoints(vec![Vec2::new(-3.0, -3.0)], SpeedTier::Fast);
        controller.turn_to(Facing::StageRight);
        for _ in 0..600 {
            controller.update(1.0 / 60.0);
            let heading = actor.borrow().heading;
            assert!(heading > -PI && heading <= PI, "heading {heading} escaped range");
        }
    }

    #[test]
    fn stop_clears_all_motion_state() {
        let actor = spawn(0.0, 0.0, 0.0, 0.0);
        let mut controller = MotionController::new(actor);
        controller.set_waypoints(vec![Vec2::new(4.0, 4.0)], SpeedTier::Slow);
        controller.turn_to(Facing::Upstage);
        controller.stop();
        assert!(!controller.is_moving());
        assert!(controller.turn_complete());
        assert!(!controller.update(1.0), "no residual motion after stop");
    }
}
