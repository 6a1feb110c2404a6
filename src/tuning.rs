//! Physics and input tuning
//!
//! All values are per fixed frame (units/frame, units/frame²), not per second.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Data-driven movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration added to `dy` every frame
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_power: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Frames a jump request stays buffered (10 frames ≈ 167ms at 60 Hz)
    pub jump_buffer_frames: u32,
    /// Frames after walking off a ledge during which a jump still registers
    pub coyote_frames: u32,
    /// Upward nudge per frame while the jump input is held
    pub hold_assist: f32,
    /// Upward speed the hold assist never pushes past
    pub hold_assist_cap: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.7,
            jump_power: -13.0,
            move_speed: 5.0,
            jump_buffer_frames: 10,
            coyote_frames: 5,
            hold_assist: 0.5,
            hold_assist_cap: 10.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), TuningError> {
        if self.gravity <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "gravity",
                value: self.gravity,
            });
        }
        if self.jump_power >= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "jump_power",
                value: self.jump_power,
            });
        }
        if self.move_speed < 0.0 {
            return Err(TuningError::OutOfRange {
                field: "move_speed",
                value: self.move_speed,
            });
        }
        if self.hold_assist_cap <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "hold_assist_cap",
                value: self.hold_assist_cap,
            });
        }
        Ok(())
    }
}
