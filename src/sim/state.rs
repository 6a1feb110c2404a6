//! Simulation state
//!
//! Everything mutated during an attempt lives in [`SimState`]. It is rebuilt
//! from the immutable [`Level`] on every (re)start and discarded on death or
//! completion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Volume;
use super::geometry::Rect;
use super::level::{Level, PendulumSpec, RiseBlockSpec};
use crate::consts::*;

/// Attempt lifecycle. `Dead` and `Won` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    Dead(DeathCause),
    Won,
}

/// Why an attempt ended in death
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Fell below the bottom of the world
    FellOut,
    /// Touched a trap block
    Trap,
    /// Touched the pendulum ball
    Pendulum,
    /// Squeezed between the risen block and its overhead hazard
    Crushed,
}

/// State changes the presentation layer may react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    RiseBlockTriggered { top: f32 },
    PendulumActivated,
    Died(DeathCause),
    Won,
}

/// The controllable actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    /// Per-frame velocity (`vel.y < 0` is upward)
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    pub jump_buffer_frames: u32,
    pub coyote_frames: u32,
    pub is_dead: bool,
}

impl Actor {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            size: Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT),
            on_ground: false,
            jump_buffer_frames: 0,
            coyote_frames: 0,
            is_dead: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Squash/stretch scale for presentation: stretched while rising,
    /// squashed while falling, slightly squashed while running
    pub fn squash(&self) -> Vec2 {
        if !self.on_ground {
            if self.vel.y < 0.0 {
                Vec2::new(1.2, 0.8)
            } else {
                Vec2::new(0.8, 1.2)
            }
        } else if self.vel.x != 0.0 {
            Vec2::new(1.05, 0.95)
        } else {
            Vec2::ONE
        }
    }
}

/// Rise block progress for the current attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiseBlockState {
    pub triggered: bool,
    pub current_top: f32,
}

impl RiseBlockState {
    pub fn new(spec: &RiseBlockSpec) -> Self {
        Self {
            triggered: false,
            current_top: spec.rect.top(),
        }
    }

    /// Current rectangle (moves up once triggered)
    pub fn rect(&self, spec: &RiseBlockSpec) -> Rect {
        Rect::new(spec.rect.x, self.current_top, spec.rect.w, spec.rect.h)
    }

    /// Fire the one-shot rise. Returns false if it had already fired.
    pub fn trigger(&mut self, spec: &RiseBlockSpec) -> bool {
        if self.triggered {
            return false;
        }
        self.triggered = true;
        self.current_top = spec.rect.top() - spec.distance;
        true
    }
}

/// Pendulum progress for the current attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendulumState {
    pub active: bool,
    /// Phase accumulator; advances only while active
    pub time: f32,
    /// Swing angle about the vertical (radians)
    pub angle: f32,
    /// Bob centre
    pub ball: Vec2,
}

impl PendulumState {
    pub fn new(spec: &PendulumSpec) -> Self {
        Self {
            active: false,
            time: 0.0,
            angle: 0.0,
            ball: bob_position(spec, 0.0),
        }
    }

    /// Hazard rectangle, present only once the pendulum is active
    pub fn ball_rect(&self) -> Option<Rect> {
        self.active
            .then(|| Rect::centered(self.ball, PENDULUM_BALL_SIZE))
    }
}

/// Bob centre for a swing angle: anchor + length·(sin θ, cos θ)
pub fn bob_position(spec: &PendulumSpec, angle: f32) -> Vec2 {
    spec.anchor + spec.length * Vec2::new(angle.sin(), angle.cos())
}

/// Hazard state exposed to the presentation layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MechanicsState {
    pub rise_block: Option<RiseBlockState>,
    pub pendulum: Option<PendulumState>,
}

/// Complete per-attempt simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub actor: Actor,
    pub mechanics: MechanicsState,
    pub phase: Phase,
    /// Ticks run in this attempt
    pub frame: u64,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Per-frame collision volume buffer, reused between ticks
    #[serde(skip)]
    pub(crate) volumes: Vec<Volume>,
}

impl SimState {
    /// Fresh attempt at the level's spawn point
    pub fn new(level: &Level) -> Self {
        Self {
            actor: Actor::new(level.spawn),
            mechanics: MechanicsState {
                rise_block: level.rise_block.as_ref().map(RiseBlockState::new),
                pendulum: level.pendulum.as_ref().map(PendulumState::new),
            },
            phase: Phase::Running,
            frame: 0,
            events: Vec::new(),
            volumes: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// End the attempt in death. Only the first cause is recorded.
    pub fn die(&mut self, cause: DeathCause) {
        if self.phase != Phase::Running {
            return;
        }
        log::debug!("Actor died at frame {}: {:?}", self.frame, cause);
        self.actor.is_dead = true;
        self.phase = Phase::Dead(cause);
        self.events.push(GameEvent::Died(cause));
    }

    pub fn win(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Won;
        self.events.push(GameEvent::Won);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
