//! Ledgefall - a 2D platformer level engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, physics, collisions, level mechanics)
//! - `runner`: Level loading, fixed-step frame gating, stop/restart
//! - `progress`: Unlocked-level progress model
//! - `tuning`: Data-driven physics and input tuning

pub mod error;
pub mod progress;
pub mod runner;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, TuningError};
pub use progress::{Progress, WinOutcome};
pub use runner::{FrameOutcome, FrameScheduler, Simulation, load_level};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const FPS: u32 = 60;
    /// Minimum wall time between two ticks, in milliseconds
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / FPS as f64;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 450.0;

    /// Actor defaults
    pub const ACTOR_WIDTH: f32 = 25.0;
    pub const ACTOR_HEIGHT: f32 = 25.0;

    /// Number of levels in the built-in catalog
    pub const LEVEL_COUNT: u32 = 5;

    /// How far a rise block jumps up when touched
    pub const RISE_DISTANCE: f32 = 250.0;
    /// Pendulum ball edge length (square hazard centred on the bob)
    pub const PENDULUM_BALL_SIZE: f32 = 20.0;
}
