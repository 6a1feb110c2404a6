//! Ledgefall headless runner
//!
//! Plays a built-in level with a scripted autopilot against a simulated
//! clock and logs what happens.
//!
//! Usage: `ledgefall [LEVEL] [TUNING_JSON]`
//!
//! Progress is read from and written back to the file named by
//! `LEDGEFALL_PROGRESS`; without it every run starts from fresh progress, so
//! only level 1 is playable.

use std::error::Error;
use std::sync::Arc;

use ledgefall::consts::LEVEL_COUNT;
use ledgefall::sim::{GameEvent, InputSnapshot, Level, TickResult};
use ledgefall::{FrameOutcome, FrameScheduler, Progress, Simulation, Tuning};

/// Simulated clock callback spacing, in milliseconds
const CLOCK_STEP_MS: f64 = 8.0;
/// Give up on an attempt after this much simulated time
const ATTEMPT_LIMIT_MS: f64 = 60_000.0;
const MAX_ATTEMPTS: u32 = 3;
/// Jump when the rise block is this close ahead
const JUMP_LEAD: f32 = 30.0;
const PROGRESS_ENV: &str = "LEDGEFALL_PROGRESS";

/// Hold right, hop the rise block, and stop pushing once past it so the
/// landing is not carried into the next gap
#[derive(Debug, Default)]
struct Autopilot {
    jumped: bool,
}

impl Autopilot {
    fn input(&self, sim: &Simulation) -> InputSnapshot {
        let actor = &sim.state().actor;
        let Some(rise) = sim.level().rise_block.as_ref() else {
            return InputSnapshot::right();
        };
        let gap = rise.rect.left() - actor.rect().right();
        if actor.on_ground && !self.jumped && (0.0..=JUMP_LEAD).contains(&gap) {
            return InputSnapshot::right().with_jump();
        }
        if self.jumped && !actor.on_ground && actor.pos.x >= rise.rect.right() {
            return InputSnapshot::default();
        }
        InputSnapshot::right()
    }

    /// Only a jump the sim actually took counts
    fn observe(&mut self, event: &GameEvent) {
        if *event == GameEvent::Jumped {
            self.jumped = true;
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let level_id = match args.next() {
        Some(arg) => arg.parse::<u32>()?,
        None => 1,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let progress_path = std::env::var(PROGRESS_ENV).ok();
    let stored = progress_path
        .as_ref()
        .and_then(|path| std::fs::read_to_string(path).ok());
    let mut progress = Progress::load(stored.as_deref());
    ensure_unlocked(&progress, level_id)?;

    log::info!("Ledgefall (native) starting level {}/{}", level_id, LEVEL_COUNT);
    let level = Arc::new(Level::builtin(level_id)?);
    let mut sim = Simulation::new(level, tuning);

    for attempt in 1..=MAX_ATTEMPTS {
        if attempt > 1 {
            sim.restart();
        }
        match play_attempt(&mut sim) {
            Some(TickResult::Won) => {
                let outcome = progress.record_win(level_id);
                log::info!("Attempt {} won: {:?}", attempt, outcome);
                let json = progress.to_json()?;
                log::info!("Progress: {}", json);
                if let Some(path) = &progress_path {
                    std::fs::write(path, json)?;
                }
                return Ok(());
            }
            Some(TickResult::Dead(cause)) => {
                log::warn!("Attempt {} died: {:?}", attempt, cause);
            }
            _ => log::warn!("Attempt {} timed out", attempt),
        }
    }

    Err(format!("level {} not completed in {} attempts", level_id, MAX_ATTEMPTS).into())
}

fn ensure_unlocked(progress: &Progress, level_id: u32) -> Result<(), String> {
    if progress.is_unlocked(level_id) {
        Ok(())
    } else {
        Err(format!(
            "level {} is locked ({} of {} unlocked)",
            level_id, progress.unlocked, LEVEL_COUNT
        ))
    }
}

/// Drive one attempt until the scheduler stops asking for frames
fn play_attempt(sim: &mut Simulation) -> Option<TickResult> {
    let mut scheduler = FrameScheduler::default();
    let mut autopilot = Autopilot::default();
    let mut last = None;
    let mut now = 0.0;

    while scheduler.wants_next_frame(sim) && now < ATTEMPT_LIMIT_MS {
        let input = autopilot.input(sim);
        if let FrameOutcome::Ticked(result) = scheduler.on_frame(now, sim, &input) {
            for event in sim.drain_events() {
                log::debug!("frame {}: {:?}", sim.state().frame, event);
                autopilot.observe(&event);
            }
            last = Some(result);
        }
        now += CLOCK_STEP_MS;
    }

    if sim.is_running() {
        sim.stop();
    }
    last
}
