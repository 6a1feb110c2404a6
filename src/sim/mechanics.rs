//! Level mechanics: the rise-block crusher and the pendulum

use super::level::{Level, PendulumSpec};
use super::state::{Actor, DeathCause, PendulumState, RiseBlockState, bob_position};

/// Crush check for a triggered rise block.
///
/// The actor dies if its vertical extent overlaps the band between the rise
/// block's current top and the bottom of the crush hazard.
pub fn check_crush(actor: &Actor, level: &Level, rise: &RiseBlockState) -> Option<DeathCause> {
    if !rise.triggered {
        return None;
    }
    let hazard = level.crush_hazard()?;
    actor
        .rect()
        .overlaps_band(rise.current_top, hazard.bottom())
        .then_some(DeathCause::Crushed)
}

/// Advance the pendulum one frame. Returns true on the activation frame.
///
/// The pendulum wakes the first frame the actor passes `hidden_until_x`, with
/// phase and angle at zero. Every later frame advances the phase by
/// `angular_speed`; the angle is `amplitude * sin(time)`.
pub fn update_pendulum(actor: &Actor, spec: &PendulumSpec, state: &mut PendulumState) -> bool {
    if !state.active {
        if actor.pos.x <= spec.hidden_until_x {
            return false;
        }
        state.active = true;
        state.time = 0.0;
        state.angle = 0.0;
        state.ball = bob_position(spec, 0.0);
        log::debug!("Pendulum activated at actor x={:.1}", actor.pos.x);
        return true;
    }

    state.time += spec.angular_speed;
    state.angle = spec.amplitude * state.time.sin();
    state.ball = bob_position(spec, state.angle);
    false
}
