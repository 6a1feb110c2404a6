//! Input resolution
//!
//! Turns a per-frame input snapshot into horizontal velocity and, through the
//! jump buffer and coyote window, into jumps.

use serde::{Deserialize, Serialize};

use super::state::Actor;
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    /// One-shot jump request (key press / tap) for this frame only
    pub jump_pressed: bool,
    /// Jump input held down (drives the hold assist)
    pub jump_held: bool,
}

impl InputSnapshot {
    pub fn right() -> Self {
        Self {
            right: true,
            ..Default::default()
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Default::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    /// Map a touch at `touch_x` on a screen `width` wide: the left half moves
    /// left, the right half moves right, and holding keeps the jump assist on.
    /// A touch only requests a jump when the actor could take it this frame.
    pub fn from_touch(touch_x: f32, width: f32, actor: &Actor) -> Self {
        let on_left = touch_x < width / 2.0;
        Self {
            left: on_left,
            right: !on_left,
            jump_pressed: actor.on_ground || actor.coyote_frames > 0,
            jump_held: true,
        }
    }
}

/// Apply one frame of input to the actor. Returns true if a jump fired.
pub fn resolve_input(actor: &mut Actor, input: &InputSnapshot, tuning: &Tuning) -> bool {
    // Right overrides left when both are held
    actor.vel.x = if input.right {
        tuning.move_speed
    } else if input.left {
        -tuning.move_speed
    } else {
        0.0
    };

    if input.jump_pressed {
        actor.jump_buffer_frames = tuning.jump_buffer_frames;
    }

    let mut jumped = false;
    if actor.jump_buffer_frames > 0 && (actor.on_ground || actor.coyote_frames > 0) {
        actor.vel.y = tuning.jump_power;
        actor.on_ground = false;
        actor.coyote_frames = 0;
        actor.jump_buffer_frames = 0;
        jumped = true;
    }

    if input.jump_held && actor.vel.y > -tuning.hold_assist_cap {
        actor.vel.y = (actor.vel.y - tuning.hold_assist).max(-tuning.hold_assist_cap);
    }

    actor.jump_buffer_frames = actor.jump_buffer_frames.saturating_sub(1);
    actor.coyote_frames = actor.coyote_frames.saturating_sub(1);

    jumped
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn grounded() -> Actor {
        let mut actor = Actor::new(Vec2::new(100.0, 100.0));
        actor.on_ground = true;
        actor
    }

    #[test]
    fn test_horizontal_direction() {
        let tuning = Tuning::default();
        let mut actor = grounded();

        resolve_input(&mut actor, &InputSnapshot::left(), &tuning);
        assert_eq!(actor.vel.x, -5.0);

        resolve_input(&mut actor, &InputSnapshot::right(), &tuning);
        assert_eq!(actor.vel.x, 5.0);

        resolve_input(&mut actor, &InputSnapshot::default(), &tuning);
        assert_eq!(actor.vel.x, 0.0);
    }

    #[test]
    fn test_right_wins_when_both_held() {
        let tuning = Tuning::default();
        let mut actor = grounded();
        let input = InputSnapshot {
            left: true,
            right: true,
            ..Default::default()
        };
        resolve_input(&mut actor, &input, &tuning);
        assert_eq!(actor.vel.x, 5.0);
    }

    #[test]
    fn test_grounded_jump_fires_and_clears_counters() {
        let tuning = Tuning::default();
        let mut actor = grounded();
        actor.coyote_frames = 3;

        let jumped = resolve_input(&mut actor, &InputSnapshot::default().with_jump(), &tuning);
        assert!(jumped);
        assert_eq!(actor.vel.y, -13.0);
        assert!(!actor.on_ground);
        assert_eq!(actor.jump_buffer_frames, 0);
        assert_eq!(actor.coyote_frames, 0);
    }

    #[test]
    fn test_airborne_jump_is_buffered() {
        let tuning = Tuning::default();
        let mut actor = Actor::new(Vec2::ZERO);
        actor.vel.y = 3.0;

        let jumped = resolve_input(&mut actor, &InputSnapshot::default().with_jump(), &tuning);
        assert!(!jumped);
        assert_eq!(actor.vel.y, 3.0);
        // Set to 10, then decremented after the failed check
        assert_eq!(actor.jump_buffer_frames, 9);

        actor.on_ground = true;
        assert!(resolve_input(&mut actor, &InputSnapshot::default(), &tuning));
        assert_eq!(actor.vel.y, -13.0);
    }

    #[test]
    fn test_buffer_expires() {
        let tuning = Tuning::default();
        let mut actor = Actor::new(Vec2::ZERO);
        resolve_input(&mut actor, &InputSnapshot::default().with_jump(), &tuning);
        for _ in 0..9 {
            resolve_input(&mut actor, &InputSnapshot::default(), &tuning);
        }
        assert_eq!(actor.jump_buffer_frames, 0);

        actor.on_ground = true;
        assert!(!resolve_input(&mut actor, &InputSnapshot::default(), &tuning));
    }

    #[test]
    fn test_coyote_jump() {
        let tuning = Tuning::default();
        let mut actor = Actor::new(Vec2::ZERO);
        actor.coyote_frames = 1;
        assert!(resolve_input(&mut actor, &InputSnapshot::default().with_jump(), &tuning));
        assert_eq!(actor.vel.y, -13.0);
    }

    #[test]
    fn test_hold_assist_is_capped() {
        let tuning = Tuning::default();
        let mut actor = Actor::new(Vec2::ZERO);
        actor.vel.y = -9.8;
        let hold = InputSnapshot {
            jump_held: true,
            ..Default::default()
        };

        resolve_input(&mut actor, &hold, &tuning);
        assert_eq!(actor.vel.y, -10.0);

        // Already at the cap: no further assist
        resolve_input(&mut actor, &hold, &tuning);
        assert_eq!(actor.vel.y, -10.0);

        // A fresh jump is faster than the cap and is left alone
        actor.on_ground = true;
        resolve_input(&mut actor, &InputSnapshot { jump_pressed: true, ..hold }, &tuning);
        assert_eq!(actor.vel.y, -13.0);
    }

    #[test]
    fn test_touch_mapping() {
        let mut actor = Actor::new(Vec2::ZERO);
        let touch = InputSnapshot::from_touch(100.0, 800.0, &actor);
        assert!(touch.left && !touch.right);
        assert!(!touch.jump_pressed);
        assert!(touch.jump_held);

        actor.on_ground = true;
        let touch = InputSnapshot::from_touch(600.0, 800.0, &actor);
        assert!(touch.right && !touch.left);
        assert!(touch.jump_pressed);
    }
}
