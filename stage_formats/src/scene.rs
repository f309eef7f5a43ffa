//! Headless scene description consumed by the `stage_engine` host binary.
//!
//! The live application hands the engine actor and obstacle handles straight
//! from its scene graph; the headless host reads the same information from a
//! small JSON file instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub actors: Vec<SceneActor>,
    #[serde(default)]
    pub obstacles: Vec<ObstaclePoint>,
}

impl SceneFile {
    pub fn parse(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

/// Spawn transform for one actor. `position` is `[x, y, z]`; `heading` is in
/// radians and defaults to facing the audience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneActor {
    pub id: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub heading: f32,
}

/// Stage-plane center of one obstacle. The collision radius is a planner
/// constant, not scene data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePoint {
    pub x: f32,
    pub z: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "actors": [
            {"id": "actor_1", "position": [-8.0, 0.0, 3.0]},
            {"id": "actor_2", "position": [4.0, 0.0, -2.0], "heading": 1.57}
        ],
        "obstacles": [
            {"x": -4.0, "z": 1.5}
        ]
    }"#;

    #[test]
    fn parses_actors_and_obstacles() {
        let scene = SceneFile::parse(SAMPLE).expect("parse");
        assert_eq!(scene.actors.len(), 2);
        assert_eq!(scene.actors[0].id, "actor_1");
        assert_eq!(scene.actors[0].position, [-8.0, 0.0, 3.0]);
        assert!((scene.actors[0].heading).abs() < f32::EPSILON);
        assert_eq!(scene.obstacles, vec![ObstaclePoint { x: -4.0, z: 1.5 }]);
    }

    #[test]
    fn sections_default_to_empty() {
        let scene = SceneFile::parse("{}").expect("parse");
        assert!(scene.actors.is_empty());
        assert!(scene.obstacles.is_empty());
    }
}
