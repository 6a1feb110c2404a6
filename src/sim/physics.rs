//! Physics integration
//!
//! Explicit Euler at a fixed step: velocity first, then position.

use glam::Vec2;

use super::state::{Actor, DeathCause};
use crate::tuning::Tuning;

/// Advance the actor one frame. Returns a death cause if it fell out of the world.
pub fn integrate(actor: &mut Actor, tuning: &Tuning, bounds: Vec2) -> Option<DeathCause> {
    actor.vel.y += tuning.gravity;
    actor.pos += actor.vel;

    actor.pos.x = actor.pos.x.clamp(0.0, bounds.x - actor.size.x);

    (actor.pos.y > bounds.y).then_some(DeathCause::FellOut)
}
