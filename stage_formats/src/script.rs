//! Choreography script format shared between director tooling and the engine.
//!
//! A script is a JSON object keyed by actor id; each value is the ordered
//! list of action entries for that actor. Entries stay loosely typed at the
//! serde layer so one malformed entry can be skipped without rejecting the
//! whole document.

use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions that make a single entry unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("action '{action}' is missing required field '{field}'")]
    MissingField { action: String, field: &'static str },
    #[error("unknown facing direction '{0}'")]
    UnknownDirection(String),
    #[error("prop-relative target '{0}' is not supported")]
    UnsupportedPropTarget(String),
    #[error("duration {0} is not a non-negative number of seconds")]
    InvalidDuration(f32),
}

/// A whole script document: actor id -> ordered action entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub actors: BTreeMap<String, Vec<ActionEntry>>,
}

impl Script {
    pub fn parse(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn actor_ids(&self) -> impl Iterator<Item = &str> {
        self.actors.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// One raw script entry. Only `action` is required; the remaining fields are
/// validated per action kind by [`ActionEntry::to_command`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
}

/// Where a walk action should end up: a named stage mark or literal
/// stage-plane coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionRef {
    Mark(String),
    Coords { x: f32, z: f32 },
}

impl PositionRef {
    /// Prop-relative references (`prop_<id>`) come from the director layer
    /// but have no resolvable geometry here; the loader rejects them.
    pub fn is_prop_reference(&self) -> bool {
        match self {
            PositionRef::Mark(name) => name.to_ascii_lowercase().starts_with("prop_"),
            PositionRef::Coords { .. } => false,
        }
    }
}

/// Named translation speed presets, in stage units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Slow,
    #[default]
    Normal,
    Fast,
    Run,
}

impl SpeedTier {
    pub fn from_token(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "slow" => Some(SpeedTier::Slow),
            "normal" => Some(SpeedTier::Normal),
            "fast" => Some(SpeedTier::Fast),
            "run" => Some(SpeedTier::Run),
            _ => None,
        }
    }

    pub fn units_per_second(self) -> f32 {
        match self {
            SpeedTier::Slow => 1.0,
            SpeedTier::Normal => 2.0,
            SpeedTier::Fast => 3.5,
            SpeedTier::Run => 5.0,
        }
    }
}

/// Fixed facing tokens and their stage headings.
///
/// Heading 0 faces the audience (+z under `atan2(dx, dz)`), stage-left is
/// +x at pi/2, stage-right is -x at -pi/2 and upstage is pi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Facing {
    Audience,
    Upstage,
    StageLeft,
    StageRight,
}

impl Facing {
    pub fn from_token(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "audience" | "front" => Some(Facing::Audience),
            "upstage" | "back" => Some(Facing::Upstage),
            "stage-left" | "left" => Some(Facing::StageLeft),
            "stage-right" | "right" => Some(Facing::StageRight),
            _ => None,
        }
    }

    pub fn heading_radians(self) -> f32 {
        match self {
            Facing::Audience => 0.0,
            Facing::Upstage => PI,
            Facing::StageLeft => FRAC_PI_2,
            Facing::StageRight => -FRAC_PI_2,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Facing::Audience => "audience",
            Facing::Upstage => "upstage",
            Facing::StageLeft => "stage-left",
            Facing::StageRight => "stage-right",
        }
    }
}

/// Placeholder animation kinds; they block the queue for their duration
/// without touching the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimateKind {
    Gesture,
    Sit,
    Stand,
}

impl AnimateKind {
    pub fn from_token(raw: &str) -> Option<Self> {
        match raw {
            "gesture" => Some(AnimateKind::Gesture),
            "sit" => Some(AnimateKind::Sit),
            "stand" => Some(AnimateKind::Stand),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            AnimateKind::Gesture => "gesture",
            AnimateKind::Sit => "sit",
            AnimateKind::Stand => "stand",
        }
    }
}

/// A validated, typed script command ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionCommand {
    Walk {
        position: PositionRef,
        speed: SpeedTier,
    },
    Turn {
        facing: Facing,
    },
    Wait {
        seconds: f32,
    },
    Animate {
        kind: AnimateKind,
        seconds: f32,
    },
}

impl ActionCommand {
    /// Stable kind label used in status reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionCommand::Walk { .. } => "walk_to",
            ActionCommand::Turn { .. } => "turn",
            ActionCommand::Wait { .. } => "wait",
            ActionCommand::Animate { kind, .. } => kind.token(),
        }
    }
}

impl ActionEntry {
    /// Validate this entry into a typed command.
    ///
    /// Unrecognized speed tiers degrade to [`SpeedTier::Normal`]; every other
    /// inconsistency is a [`ScriptError`] so the loader can skip the entry
    /// and keep the rest of the actor's script.
    pub fn to_command(&self) -> Result<ActionCommand, ScriptError> {
        match self.action.as_str() {
            "walk_to" => {
                let position = self.position.clone().ok_or_else(|| self.missing("position"))?;
                if let PositionRef::Mark(name) = &position {
                    if position.is_prop_reference() {
                        return Err(ScriptError::UnsupportedPropTarget(name.clone()));
                    }
                }
                let speed = self
                    .speed
                    .as_deref()
                    .and_then(SpeedTier::from_token)
                    .unwrap_or_default();
                Ok(ActionCommand::Walk { position, speed })
            }
            "turn" | "face" => {
                let raw = self.direction.as_deref().ok_or_else(|| self.missing("direction"))?;
                let facing = Facing::from_token(raw)
                    .ok_or_else(|| ScriptError::UnknownDirection(raw.to_string()))?;
                Ok(ActionCommand::Turn { facing })
            }
            "wait" => Ok(ActionCommand::Wait {
                seconds: self.duration_seconds()?,
            }),
            other => match AnimateKind::from_token(other) {
                Some(kind) => Ok(ActionCommand::Animate {
                    kind,
                    seconds: self.duration_seconds()?,
                }),
                None => Err(ScriptError::UnknownAction(other.to_string())),
            },
        }
    }

    fn duration_seconds(&self) -> Result<f32, ScriptError> {
        let seconds = self.duration.ok_or_else(|| self.missing("duration"))?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ScriptError::InvalidDuration(seconds));
        }
        Ok(seconds)
    }

    fn missing(&self, field: &'static str) -> ScriptError {
        ScriptError::MissingField {
            action: self.action.clone(),
            field,
        }
    }
}
