//! Fixed timestep simulation tick
//!
//! One tick runs the full pipeline in order:
//! input -> physics -> collision -> mechanics -> win check.
//! Any stage may end the attempt; later stages are then skipped.

use super::collision::{gather_volumes, resolve_collisions};
use super::input::{InputSnapshot, resolve_input};
use super::level::Level;
use super::mechanics::{check_crush, update_pendulum};
use super::physics::integrate;
use super::state::{Actor, DeathCause, GameEvent, MechanicsState, Phase, SimState};
use crate::tuning::Tuning;

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickResult {
    /// Still running; the updated state for presentation
    Continue {
        actor: Actor,
        mechanics: MechanicsState,
    },
    Dead(DeathCause),
    Won,
}

/// Advance the attempt by one fixed frame
pub fn tick(
    state: &mut SimState,
    level: &Level,
    tuning: &Tuning,
    input: &InputSnapshot,
) -> TickResult {
    match state.phase {
        Phase::Dead(cause) => return TickResult::Dead(cause),
        Phase::Won => return TickResult::Won,
        Phase::Running => {}
    }

    state.frame += 1;
    log::trace!(
        "tick {}: pos=({:.1}, {:.1}) vel=({:.1}, {:.1})",
        state.frame,
        state.actor.pos.x,
        state.actor.pos.y,
        state.actor.vel.x,
        state.actor.vel.y
    );

    if resolve_input(&mut state.actor, input, tuning) {
        state.events.push(GameEvent::Jumped);
    }

    if let Some(cause) = integrate(&mut state.actor, tuning, level.bounds) {
        state.die(cause);
        return TickResult::Dead(cause);
    }

    let mut volumes = std::mem::take(&mut state.volumes);
    gather_volumes(level, &state.mechanics, &mut volumes);
    let report = resolve_collisions(&mut state.actor, &volumes, tuning.coyote_frames);
    state.volumes = volumes;

    if report.landed {
        state.events.push(GameEvent::Landed);
    }
    if report.touched_rise_block {
        if let (Some(spec), Some(rise)) = (&level.rise_block, &mut state.mechanics.rise_block) {
            if rise.trigger(spec) {
                log::debug!(
                    "Rise block '{}' triggered, top now {}",
                    spec.id,
                    rise.current_top
                );
                state.events.push(GameEvent::RiseBlockTriggered {
                    top: rise.current_top,
                });
            }
        }
    }
    if let Some(cause) = report.hazard {
        state.die(cause);
        return TickResult::Dead(cause);
    }

    if let Some(rise) = &state.mechanics.rise_block {
        if let Some(cause) = check_crush(&state.actor, level, rise) {
            state.die(cause);
            return TickResult::Dead(cause);
        }
    }
    if let (Some(spec), Some(pendulum)) = (&level.pendulum, &mut state.mechanics.pendulum) {
        if update_pendulum(&state.actor, spec, pendulum) {
            state.events.push(GameEvent::PendulumActivated);
        }
    }

    if state.actor.rect().overlaps(&level.exit) {
        state.win();
        return TickResult::Won;
    }

    TickResult::Continue {
        actor: state.actor.clone(),
        mechanics: state.mechanics.clone(),
    }
}
