//! Local obstacle avoidance.
//!
//! Not a search: a bounded-cost heuristic. The straight segment is sampled
//! against every obstacle; when blocked, eight fixed offsets around the
//! segment midpoint are tried in priority order and the first candidate with
//! two clear legs becomes the single detour waypoint. When nothing clears,
//! the direct path is returned anyway — the engine never refuses to move an
//! actor.

use crate::types::Vec2;

/// Collision radius shared by every obstacle. A planner constant, not
/// per-obstacle data.
pub const OBSTACLE_RADIUS: f32 = 1.0;

const ARRIVAL_EPSILON: f32 = 0.1;
const SEGMENT_SAMPLES: u32 = 11;

/// Midpoint offsets tried in order; the order is fixed so identical inputs
/// always plan identical paths.
const DETOUR_OFFSETS: [Vec2; 8] = [
    Vec2::new(2.0, 0.0),
    Vec2::new(-2.0, 0.0),
    Vec2::new(0.0, 2.0),
    Vec2::new(0.0, -2.0),
    Vec2::new(2.0, 2.0),
    Vec2::new(2.0, -2.0),
    Vec2::new(-2.0, 2.0),
    Vec2::new(-2.0, -2.0),
];

#[derive(Debug, Clone)]
pub struct PathPlanner {
    clearance: f32,
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self {
            clearance: OBSTACLE_RADIUS,
        }
    }
}

impl PathPlanner {
    /// Plan a short waypoint list from `start` to `goal`. The result always
    /// has at least one entry and always ends at `goal`.
    pub fn plan(&self, start: Vec2, goal: Vec2, obstacles: &[Vec2]) -> Vec<Vec2> {
        if start.distance(goal) < ARRIVAL_EPSILON {
            return vec![goal];
        }
        if self.segment_is_clear(start, goal, obstacles) {
            return vec![goal];
        }

        let midpoint = Vec2::new((start.x + goal.x) / 2.0, (start.z + goal.z) / 2.0);
        for offset in DETOUR_OFFSETS {
            let candidate = Vec2::new(midpoint.x + offset.x, midpoint.z + offset.z);
            if self.segment_is_clear(start, candidate, obstacles)
                && self.segment_is_clear(candidate, goal, obstacles)
            {
                return vec![candidate, goal];
            }
        }

        // No clear detour: accept possible penetration over refusing to move.
        vec![goal]
    }

    fn segment_is_clear(&self, from: Vec2, to: Vec2, obstacles: &[Vec2]) -> bool {
        for step in 0..SEGMENT_SAMPLES {
            let t = step as f32 / (SEGMENT_SAMPLES - 1) as f32;
            let sample = Vec2::new(from.x + (to.x - from.x) * t, from.z + (to.z - from.z) * t);
            if obstacles
                .iter()
                .any(|obstacle| obstacle.distance(sample) < self.clearance)
            {
                return false;
            }
        }
        true
    }
}
