//! Strongly-typed level records.
//!
//! Level data arrives as declarative JSON: a list of bridge records, each
//! with a nested switch record. Everything is validated up front so a
//! malformed level aborts construction instead of misbehaving mid-level.
//!
//! Conventions
//! - Units are meters, angles are radians.
//! - `start_x`/`start_y` name the art body's center.
//! - Bounds must satisfy `min_bound <= max_bound` and lie strictly inside
//!   `(-PI, PI)`, because the gear angle is read back from a unit-complex
//!   rotation which only represents that range.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use thiserror::Error;

use crate::constants::{DEFAULT_ART_HEIGHT_M, DEFAULT_ART_WIDTH_M};

/// Errors raised while loading or validating level data.
///
/// All of these are configuration errors: they abort level construction.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("bridge `{key}`: min_bound {min} is greater than max_bound {max}")]
    InvertedBounds { key: String, min: f32, max: f32 },

    #[error("bridge `{key}`: bounds [{min}, {max}] must lie within (-PI, PI)")]
    BoundsOutOfRange { key: String, min: f32, max: f32 },

    #[error("bridge `{key}`: field `{field}` is not finite")]
    NonFinite { key: String, field: &'static str },

    #[error("switch `{key}`: half extents must be positive")]
    BadSwitchRegion { key: String },
}

/// Which way the gear spins when rotating the bridge toward its "up" rest
/// state. The world is y-up, so clockwise means a negative angular velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Horizontal sign of the gear offset: the gear sits on the side the
    /// bridge swings around.
    pub fn gear_side(self) -> f32 {
        match self {
            RotationDirection::Clockwise => 1.0,
            RotationDirection::CounterClockwise => -1.0,
        }
    }
}

/// Trigger zone definition nested inside a bridge record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwitchRecord {
    /// Identity of the switch (stable, unique within the level).
    pub key: String,
    /// Center of the trigger region (meters).
    pub start_x: f32,
    pub start_y: f32,
    /// Half extents of the trigger region (meters).
    pub half_width: f32,
    pub half_height: f32,
}

/// One bridge, as declared by level data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BridgeRecord {
    /// Identity of the bridge (stable, unique within the level).
    pub key: String,
    /// Center of the art body at load time (meters).
    pub start_x: f32,
    pub start_y: f32,
    /// Whether the leveling pass should leave this bridge in its "up"
    /// orientation.
    pub up_at_start: bool,
    /// Smallest angle the gear may reach (radians).
    pub min_bound: f32,
    /// Largest angle the gear may reach (radians).
    pub max_bound: f32,
    pub direction: RotationDirection,
    /// Width/height of the art body (meters). Sprites are not part of this
    /// crate, so extents that would otherwise come from the art asset are
    /// declared here.
    #[serde(default = "default_art_width")]
    pub art_width: f32,
    #[serde(default = "default_art_height")]
    pub art_height: f32,
    /// Every bridge has exactly one switch; a record without one fails to
    /// deserialize.
    pub switch: SwitchRecord,
}

fn default_art_width() -> f32 {
    DEFAULT_ART_WIDTH_M
}

fn default_art_height() -> f32 {
    DEFAULT_ART_HEIGHT_M
}

impl BridgeRecord {
    /// Fail-fast validation of one record. Called both at parse time and by
    /// the registry so hand-built records get the same checks.
    pub fn validate(&self) -> Result<(), LevelError> {
        let finite_fields = [
            (self.start_x, "start_x"),
            (self.start_y, "start_y"),
            (self.min_bound, "min_bound"),
            (self.max_bound, "max_bound"),
            (self.art_width, "art_width"),
            (self.art_height, "art_height"),
        ];
        for (value, field) in finite_fields {
            if !value.is_finite() {
                return Err(LevelError::NonFinite {
                    key: self.key.clone(),
                    field,
                });
            }
        }

        if self.min_bound > self.max_bound {
            return Err(LevelError::InvertedBounds {
                key: self.key.clone(),
                min: self.min_bound,
                max: self.max_bound,
            });
        }

        if self.min_bound <= -PI || self.max_bound >= PI {
            return Err(LevelError::BoundsOutOfRange {
                key: self.key.clone(),
                min: self.min_bound,
                max: self.max_bound,
            });
        }

        if self.switch.half_width <= 0.0 || self.switch.half_height <= 0.0 {
            return Err(LevelError::BadSwitchRegion {
                key: self.switch.key.clone(),
            });
        }

        Ok(())
    }
}

/// Top-level level document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelData {
    pub bridges: Vec<BridgeRecord>,
}

impl LevelData {
    /// Parse and validate a JSON level document.
    ///
    /// Validation is all-or-nothing: the first bad record aborts the load.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let data: LevelData = serde_json::from_str(json)?;
        for bridge in &data.bridges {
            bridge.validate()?;
        }
        Ok(data)
    }
}
