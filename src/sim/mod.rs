//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (all rates are per frame)
//! - Stable volume iteration order
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod geometry;
pub mod input;
pub mod level;
pub mod mechanics;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, Volume, VolumeKind, gather_volumes, resolve_collisions};
pub use geometry::Rect;
pub use input::{InputSnapshot, resolve_input};
pub use level::{Block, BlockDef, BlockKind, Level, LevelDef, PendulumDef, PendulumSpec, RiseBlockSpec};
pub use mechanics::{check_crush, update_pendulum};
pub use physics::integrate;
pub use state::{
    Actor, DeathCause, GameEvent, MechanicsState, PendulumState, Phase, RiseBlockState, SimState,
};
pub use tick::{TickResult, tick};
