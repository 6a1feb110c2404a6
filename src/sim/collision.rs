//! Collision detection and response for the actor
//!
//! Every solid or hazard rectangle in play this frame is gathered into a flat
//! list of [`Volume`]s and tested against the actor once, in order. Solids are
//! resolved along the axis of least penetration; hazards end the attempt.
//!
//! There is no sub-stepping: a volume thinner than one frame of travel can be
//! skipped entirely at high speed. At the default tuning (max fall speed well
//! under the thinnest platform plus the actor height) this does not occur in
//! the built-in levels.

use super::geometry::Rect;
use super::level::Level;
use super::state::{Actor, DeathCause, MechanicsState};

/// What touching a volume does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    /// Blocks movement
    Solid,
    /// Blocks movement and triggers the rise block on touch
    RiseBlock,
    /// Kills on touch
    Hazard(DeathCause),
}

/// A rectangle participating in this frame's collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub rect: Rect,
    pub kind: VolumeKind,
}

/// Result of resolving the actor against all volumes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Actor is standing on a solid this frame
    pub on_ground: bool,
    /// Actor landed this frame after being airborne
    pub landed: bool,
    /// Actor touched the rise block
    pub touched_rise_block: bool,
    /// First hazard touched, if any
    pub hazard: Option<DeathCause>,
}

/// Build this frame's volume list from static geometry and current hazard state
pub fn gather_volumes(level: &Level, mechanics: &MechanicsState, out: &mut Vec<Volume>) {
    out.clear();

    out.extend(level.platforms.iter().map(|b| Volume {
        rect: b.rect,
        kind: VolumeKind::Solid,
    }));

    if let (Some(spec), Some(rise)) = (&level.rise_block, &mechanics.rise_block) {
        out.push(Volume {
            rect: rise.rect(spec),
            kind: VolumeKind::RiseBlock,
        });
    }

    out.extend(level.traps.iter().map(|b| Volume {
        rect: b.rect,
        kind: VolumeKind::Hazard(DeathCause::Trap),
    }));

    if let Some(ball) = mechanics.pendulum.as_ref().and_then(|p| p.ball_rect()) {
        out.push(Volume {
            rect: ball,
            kind: VolumeKind::Hazard(DeathCause::Pendulum),
        });
    }
}

/// Resolve the actor against every volume and update its grounded state and
/// coyote window
pub fn resolve_collisions(
    actor: &mut Actor,
    volumes: &[Volume],
    coyote_frames: u32,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    for volume in volumes {
        let block = volume.rect;
        let player = actor.rect();
        if !player.overlaps(&block) {
            continue;
        }

        match volume.kind {
            VolumeKind::Hazard(cause) => {
                // No correction; the attempt is over
                report.hazard.get_or_insert(cause);
                continue;
            }
            VolumeKind::RiseBlock => report.touched_rise_block = true,
            VolumeKind::Solid => {}
        }

        let x_overlap = player.overlap_x(&block);
        let y_overlap = player.overlap_y(&block);

        if x_overlap < y_overlap {
            // Wall hit
            actor.pos.x = if player.left() < block.left() {
                block.left() - actor.size.x
            } else {
                block.right()
            };
            actor.vel.x = 0.0;
        } else if player.top() < block.top() {
            // Landing
            actor.pos.y = block.top() - actor.size.y;
            actor.vel.y = 0.0;
            report.on_ground = true;
        } else {
            // Head bump
            actor.pos.y = block.bottom();
            actor.vel.y = 0.0;
        }
    }

    if actor.on_ground && !report.on_ground {
        actor.coyote_frames = coyote_frames;
    }
    report.landed = report.on_ground && !actor.on_ground;
    actor.on_ground = report.on_ground;

    report
}
