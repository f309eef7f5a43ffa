//! Named stage marks.
//!
//! Nine fixed reference points on the performance surface, laid out as a
//! 3x3 grid: upstage/center/downstage rows crossed with stage-right/center/
//! stage-left columns. Center stage sits at the origin, stage-left is +x and
//! downstage (toward the audience) is +z, matching the facing-token
//! headings. Baked configuration, not user data.

use std::collections::BTreeMap;

use crate::types::Vec2;

const STANDARD_MARKS: [(&str, Vec2); 9] = [
    ("USR", Vec2::new(-4.0, -3.0)),
    ("USC", Vec2::new(0.0, -3.0)),
    ("USL", Vec2::new(4.0, -3.0)),
    ("SR", Vec2::new(-4.0, 0.0)),
    ("C", Vec2::new(0.0, 0.0)),
    ("SL", Vec2::new(4.0, 0.0)),
    ("DSR", Vec2::new(-4.0, 3.0)),
    ("DSC", Vec2::new(0.0, 3.0)),
    ("DSL", Vec2::new(4.0, 3.0)),
];

#[derive(Debug, Clone)]
pub struct StageMarkRegistry {
    marks: BTreeMap<String, Vec2>,
}

impl Default for StageMarkRegistry {
    fn default() -> Self {
        let marks = STANDARD_MARKS
            .iter()
            .map(|(name, point)| (name.to_ascii_lowercase(), *point))
            .collect();
        Self { marks }
    }
}

impl StageMarkRegistry {
    /// Look up a mark by name, case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<Vec2> {
        self.marks.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
