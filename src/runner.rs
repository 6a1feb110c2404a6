//! Level attempts and fixed-step frame gating
//!
//! A [`Simulation`] owns one attempt at one level. A [`FrameScheduler`] sits
//! between it and an external frame clock (e.g. requestAnimationFrame) and
//! decides whether a given clock callback runs a tick and whether another
//! callback should be requested.

use std::sync::Arc;

use crate::consts::FRAME_INTERVAL_MS;
use crate::error::LevelError;
use crate::sim::{GameEvent, InputSnapshot, Level, Phase, SimState, TickResult, tick};
use crate::tuning::Tuning;

/// Load a built-in level with default tuning
pub fn load_level(level_id: u32) -> Result<Simulation, LevelError> {
    let level = Level::builtin(level_id)?;
    Ok(Simulation::new(Arc::new(level), Tuning::default()))
}

/// One attempt at a level
#[derive(Debug, Clone)]
pub struct Simulation {
    level: Arc<Level>,
    tuning: Tuning,
    state: SimState,
    running: bool,
}

impl Simulation {
    pub fn new(level: Arc<Level>, tuning: Tuning) -> Self {
        log::info!(
            "Loaded level {}: {} platforms, {} traps{}{}",
            level.id,
            level.platforms.len(),
            level.traps.len(),
            if level.rise_block.is_some() { ", rise block" } else { "" },
            if level.pendulum.is_some() { ", pendulum" } else { "" },
        );
        let state = SimState::new(&level);
        Self {
            level,
            tuning,
            state,
            running: true,
        }
    }

    /// Advance one frame. Returns `None` once the loop has been halted by
    /// death, win or [`Simulation::stop`].
    pub fn tick(&mut self, input: &InputSnapshot) -> Option<TickResult> {
        if !self.running {
            return None;
        }
        let result = tick(&mut self.state, &self.level, &self.tuning, input);
        match &result {
            TickResult::Continue { .. } => {}
            TickResult::Dead(cause) => {
                log::info!(
                    "Level {} attempt ended at frame {}: {:?}",
                    self.level.id,
                    self.state.frame,
                    cause
                );
                self.running = false;
            }
            TickResult::Won => {
                log::info!(
                    "Level {} complete in {} frames",
                    self.level.id,
                    self.state.frame
                );
                self.running = false;
            }
        }
        Some(result)
    }

    /// Halt the loop; no further ticks run until [`Simulation::restart`]
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Level {} stopped at frame {}", self.level.id, self.state.frame);
        }
        self.running = false;
    }

    /// Throw away the attempt and start again from the spawn point
    pub fn restart(&mut self) {
        log::info!("Restarting level {}", self.level.id);
        self.state = SimState::new(&self.level);
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

/// What a clock callback did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Too early; nothing ran
    Skipped,
    /// A full tick ran
    Ticked(TickResult),
    /// The simulation is not running; no tick and no further frames
    Halted,
}

/// Fixed-interval gate between a wall clock and the simulation.
///
/// A tick runs only when at least `interval_ms` has passed since the previous
/// tick. Early callbacks are skipped outright; there is no catch-up and no
/// partial tick. A jump press seen on a skipped callback is held and handed to
/// the next tick that runs.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval_ms: f64,
    last_tick_ms: Option<f64>,
    pending_jump: bool,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL_MS)
    }
}

impl FrameScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_tick_ms: None,
            pending_jump: false,
        }
    }

    /// Handle one clock callback at monotonic time `now_ms`.
    ///
    /// The first callback after construction or [`FrameScheduler::reset`] only
    /// sets the time base.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        sim: &mut Simulation,
        input: &InputSnapshot,
    ) -> FrameOutcome {
        if !sim.is_running() {
            return FrameOutcome::Halted;
        }
        let Some(last) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            self.pending_jump |= input.jump_pressed;
            return FrameOutcome::Skipped;
        };
        if now_ms - last < self.interval_ms {
            self.pending_jump |= input.jump_pressed;
            return FrameOutcome::Skipped;
        }
        self.last_tick_ms = Some(now_ms);
        let held_jump = std::mem::take(&mut self.pending_jump);
        let input = InputSnapshot {
            jump_pressed: input.jump_pressed || held_jump,
            ..*input
        };
        match sim.tick(&input) {
            Some(result) => FrameOutcome::Ticked(result),
            None => FrameOutcome::Halted,
        }
    }

    /// Whether the caller should request another clock callback
    pub fn wants_next_frame(&self, sim: &Simulation) -> bool {
        sim.is_running()
    }

    /// Forget the time base and any held jump (use after a restart or a long
    /// pause)
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
        self.pending_jump = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DeathCause;

    #[test]
    fn test_load_unknown_level() {
        assert!(matches!(
            load_level(42),
            Err(LevelError::UnknownLevel { id: 42, .. })
        ));
    }

    #[test]
    fn test_stop_halts_ticks() {
        let mut sim = load_level(2).unwrap();
        assert!(sim.tick(&InputSnapshot::default()).is_some());
        sim.stop();
        assert!(!sim.is_running());
        assert_eq!(sim.tick(&InputSnapshot::default()), None);
        assert_eq!(sim.phase(), Phase::Running);
    }

    #[test]
    fn test_restart_rebuilds_attempt() {
        let mut sim = load_level(1).unwrap();
        let spawn = sim.level().spawn;
        for _ in 0..20 {
            sim.tick(&InputSnapshot::right());
        }
        assert_ne!(sim.state().actor.pos, spawn);

        sim.restart();
        assert!(sim.is_running());
        assert_eq!(sim.state().actor.pos, spawn);
        assert_eq!(sim.state().frame, 0);
        let rise = sim.state().mechanics.rise_block.as_ref().unwrap();
        assert!(!rise.triggered);
    }

    #[test]
    fn test_walking_into_rise_block_is_fatal() {
        // The rise block is taller than the start platform; touching its side
        // fires it and the crush check fires in the same frame
        let mut sim = load_level(1).unwrap();
        let mut last = None;
        for _ in 0..200 {
            match sim.tick(&InputSnapshot::right()) {
                Some(result) => last = Some(result),
                None => break,
            }
        }
        assert_eq!(last, Some(TickResult::Dead(DeathCause::Crushed)));
        let events = sim.drain_events();
        let trigger = events
            .iter()
            .position(|e| matches!(e, GameEvent::RiseBlockTriggered { .. }));
        let death = events
            .iter()
            .position(|e| *e == GameEvent::Died(DeathCause::Crushed));
        assert!(trigger.is_some() && death.is_some() && trigger < death);
    }

    /// Hold right, jump on first touching ground, and let go of right once
    /// airborne past the rise block so the jump does not carry into the pit
    fn level_one_autopilot(sim: &Simulation, jumped: &mut bool) -> InputSnapshot {
        let actor = &sim.state().actor;
        if actor.on_ground && !*jumped {
            *jumped = true;
            return InputSnapshot::right().with_jump();
        }
        if *jumped && !actor.on_ground && actor.pos.x >= 200.0 {
            return InputSnapshot::default();
        }
        InputSnapshot::right()
    }

    #[test]
    fn test_level_one_jump_over_rise_block_lands_on_block_low() {
        let mut sim = load_level(1).unwrap();
        let block_low = sim
            .level()
            .platforms
            .iter()
            .find(|b| b.id == "block-low")
            .map(|b| b.rect)
            .unwrap();

        let mut jumped = false;
        let mut landed_on_block_low = false;
        for _ in 0..120 {
            let input = level_one_autopilot(&sim, &mut jumped);
            let result = sim.tick(&input);
            assert!(
                matches!(result, Some(TickResult::Continue { .. })),
                "unexpected {result:?}"
            );
            let actor = &sim.state().actor;
            assert!(actor.pos.y < crate::consts::WORLD_HEIGHT);
            if jumped && actor.on_ground {
                let rect = actor.rect();
                assert!(rect.right() > block_low.left() && rect.left() < block_low.right());
                assert_eq!(rect.bottom(), block_low.top());
                landed_on_block_low = true;
                break;
            }
        }
        assert!(landed_on_block_low);
        let rise = sim.state().mechanics.rise_block.as_ref().unwrap();
        assert!(!rise.triggered);
    }

    #[test]
    fn test_level_one_completes() {
        let mut sim = load_level(1).unwrap();
        let mut jumped = false;
        let mut result = None;
        for _ in 0..600 {
            let input = level_one_autopilot(&sim, &mut jumped);
            result = sim.tick(&input);
            if !sim.is_running() {
                break;
            }
        }
        assert_eq!(result, Some(TickResult::Won));
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::PendulumActivated));
        assert_eq!(events.last(), Some(&GameEvent::Won));
    }

    #[test]
    fn test_scheduler_skips_early_frames() {
        let mut sim = load_level(2).unwrap();
        let mut scheduler = FrameScheduler::new(16.0);
        let input = InputSnapshot::default();

        assert_eq!(scheduler.on_frame(0.0, &mut sim, &input), FrameOutcome::Skipped);
        assert_eq!(scheduler.on_frame(10.0, &mut sim, &input), FrameOutcome::Skipped);
        assert!(matches!(
            scheduler.on_frame(16.0, &mut sim, &input),
            FrameOutcome::Ticked(_)
        ));
        assert_eq!(sim.state().frame, 1);

        // A long stall still runs a single tick
        assert!(matches!(
            scheduler.on_frame(500.0, &mut sim, &input),
            FrameOutcome::Ticked(_)
        ));
        assert_eq!(sim.state().frame, 2);
        assert_eq!(scheduler.on_frame(510.0, &mut sim, &input), FrameOutcome::Skipped);
        assert_eq!(sim.state().frame, 2);
    }

    #[test]
    fn test_scheduler_keeps_jump_from_skipped_frame() {
        let mut sim = load_level(2).unwrap();
        let mut scheduler = FrameScheduler::new(16.0);
        let idle = InputSnapshot::default();

        let mut now = 0.0;
        scheduler.on_frame(now, &mut sim, &idle);
        while !sim.state().actor.on_ground {
            now += 16.0;
            scheduler.on_frame(now, &mut sim, &idle);
            assert!(now < 10_000.0);
        }
        sim.drain_events();

        // Pressed between ticks
        assert_eq!(
            scheduler.on_frame(now + 8.0, &mut sim, &idle.with_jump()),
            FrameOutcome::Skipped
        );
        assert!(matches!(
            scheduler.on_frame(now + 16.0, &mut sim, &idle),
            FrameOutcome::Ticked(_)
        ));
        assert!(sim.state().actor.vel.y < 0.0);
        assert_eq!(sim.drain_events(), vec![GameEvent::Jumped]);

        // Consumed: the following tick does not jump again
        scheduler.on_frame(now + 32.0, &mut sim, &idle);
        assert!(!sim.drain_events().contains(&GameEvent::Jumped));
        assert_eq!(sim.state().actor.jump_buffer_frames, 0);
    }

    #[test]
    fn test_scheduler_held_jump_cleared_when_tick_also_jumps() {
        // No floor: the actor stays airborne, so the press only fills the buffer
        let level = Level::from_json(
            9,
            r#"{ "spawn": [50, 400], "blocks": [], "exit": [750, 50, 20, 40] }"#,
        )
        .unwrap();
        let mut sim = Simulation::new(Arc::new(level), Tuning::default());
        let mut scheduler = FrameScheduler::new(16.0);
        let jump = InputSnapshot::default().with_jump();

        scheduler.on_frame(0.0, &mut sim, &InputSnapshot::default());
        scheduler.on_frame(8.0, &mut sim, &jump);
        scheduler.on_frame(16.0, &mut sim, &jump);
        assert_eq!(sim.state().actor.jump_buffer_frames, 9);

        // Nothing held over into the next tick
        scheduler.on_frame(32.0, &mut sim, &InputSnapshot::default());
        assert_eq!(sim.state().actor.jump_buffer_frames, 8);
    }

    #[test]
    fn test_scheduler_reset_drops_held_jump() {
        let mut sim = load_level(2).unwrap();
        let mut scheduler = FrameScheduler::new(16.0);
        scheduler.on_frame(0.0, &mut sim, &InputSnapshot::default().with_jump());
        scheduler.reset();
        scheduler.on_frame(100.0, &mut sim, &InputSnapshot::default());
        scheduler.on_frame(116.0, &mut sim, &InputSnapshot::default());
        assert_eq!(sim.state().actor.jump_buffer_frames, 0);
    }

    #[test]
    fn test_scheduler_stops_requesting_after_terminal_tick() {
        let mut sim = load_level(2).unwrap();
        let mut scheduler = FrameScheduler::default();
        let input = InputSnapshot::right();

        let mut now = 0.0;
        let mut ticks: u64 = 0;
        while scheduler.wants_next_frame(&sim) {
            if let FrameOutcome::Ticked(_) = scheduler.on_frame(now, &mut sim, &input) {
                ticks += 1;
            }
            now += 8.0;
            assert!(ticks < 1000);
        }
        assert_eq!(sim.phase(), Phase::Won);
        assert_eq!(scheduler.on_frame(now + 100.0, &mut sim, &input), FrameOutcome::Halted);
        assert_eq!(sim.state().frame, ticks);
    }
}
