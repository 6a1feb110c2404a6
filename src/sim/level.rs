//! Level geometry
//!
//! Levels are authored in the bottom-up convention `[x, y_bottom, w, h]`
//! (distance from the world floor to a block's bottom edge) and compiled once
//! into an immutable top-down [`Level`]. A compiled level is shared read-only
//! by every attempt.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::error::LevelError;

/// Authored role of a block
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Solid ground/wall
    #[default]
    Platform,
    /// Instant death on touch
    Trap,
    /// Solid block that jumps up by `distance` the first time it is touched
    Rise {
        #[serde(default = "default_rise_distance")]
        distance: f32,
    },
}

fn default_rise_distance() -> f32 {
    RISE_DISTANCE
}

/// One authored block: `rect` is `[x, y_bottom, w, h]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    pub id: String,
    pub rect: [f32; 4],
    #[serde(default)]
    pub kind: BlockKind,
}

/// Authored pendulum; `anchor` is `[x, y_bottom]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendulumDef {
    pub anchor: [f32; 2],
    pub length: f32,
    /// Maximum swing either side of vertical (radians)
    pub swing_angle: f32,
    /// Phase advance per frame (radians)
    pub speed: f32,
    /// The pendulum stays hidden and inert until the actor passes this x
    pub hidden_until_x: f32,
}

/// A level as authored (bottom-up convention)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    /// `[x, y_bottom]` of the actor's bottom-left corner
    pub spawn: [f32; 2],
    pub blocks: Vec<BlockDef>,
    /// `[x, y_bottom, w, h]`
    pub exit: [f32; 4],
    #[serde(default)]
    pub pendulum: Option<PendulumDef>,
    /// Id of the trap the rise block crushes the actor against
    #[serde(default)]
    pub crush_hazard: Option<String>,
}

/// A named rectangle in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub rect: Rect,
}

/// Compiled rise block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiseBlockSpec {
    pub id: String,
    /// Rectangle before triggering
    pub rect: Rect,
    pub distance: f32,
    /// Index into `Level::traps` of the overhead crush hazard
    pub crush_hazard: Option<usize>,
}

/// Compiled pendulum (top-down)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendulumSpec {
    pub anchor: Vec2,
    pub length: f32,
    pub amplitude: f32,
    pub angular_speed: f32,
    pub hidden_until_x: f32,
}

/// Immutable level geometry in the top-down convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    /// World size; x is clamped to it and falling below it is death
    pub bounds: Vec2,
    /// Actor top-left corner at (re)start
    pub spawn: Vec2,
    pub platforms: Vec<Block>,
    pub traps: Vec<Block>,
    pub rise_block: Option<RiseBlockSpec>,
    pub pendulum: Option<PendulumSpec>,
    pub exit: Rect,
}

impl LevelDef {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert into a top-down [`Level`] for a world of `bounds`
    pub fn compile(&self, id: u32, bounds: Vec2) -> Result<Level, LevelError> {
        // NaN fails both comparisons
        let fits_actor = bounds.x >= ACTOR_WIDTH && bounds.y >= ACTOR_HEIGHT;
        if !fits_actor {
            return Err(LevelError::invalid(format!(
                "world {}x{} is smaller than the actor",
                bounds.x, bounds.y
            )));
        }
        let to_rect = |r: [f32; 4]| Rect::from_bottom_up(r[0], r[1], r[2], r[3], bounds.y);

        let mut platforms = Vec::new();
        let mut traps = Vec::new();
        let mut rise: Option<(Block, f32)> = None;

        for def in &self.blocks {
            if def.rect[2] <= 0.0 || def.rect[3] <= 0.0 {
                return Err(LevelError::invalid(format!(
                    "block '{}' has non-positive size",
                    def.id
                )));
            }
            let block = Block {
                id: def.id.clone(),
                rect: to_rect(def.rect),
            };
            match def.kind {
                BlockKind::Platform => platforms.push(block),
                BlockKind::Trap => traps.push(block),
                BlockKind::Rise { distance } => {
                    if rise.is_some() {
                        return Err(LevelError::invalid("more than one rise block"));
                    }
                    rise = Some((block, distance));
                }
            }
        }

        let crush_hazard = match &self.crush_hazard {
            Some(name) => {
                if rise.is_none() {
                    return Err(LevelError::invalid(format!(
                        "crush hazard '{name}' without a rise block"
                    )));
                }
                let index = traps.iter().position(|t| &t.id == name).ok_or_else(|| {
                    LevelError::invalid(format!("crush hazard '{name}' is not a trap"))
                })?;
                Some(index)
            }
            None => None,
        };

        let rise_block = rise.map(|(block, distance)| RiseBlockSpec {
            id: block.id,
            rect: block.rect,
            distance,
            crush_hazard,
        });

        let pendulum = match &self.pendulum {
            Some(p) if p.length <= 0.0 => {
                return Err(LevelError::invalid("pendulum length must be positive"));
            }
            Some(p) => Some(PendulumSpec {
                anchor: Vec2::new(p.anchor[0], bounds.y - p.anchor[1]),
                length: p.length,
                amplitude: p.swing_angle.abs(),
                angular_speed: p.speed,
                hidden_until_x: p.hidden_until_x,
            }),
            None => None,
        };

        if self.exit[2] <= 0.0 || self.exit[3] <= 0.0 {
            return Err(LevelError::invalid("exit has non-positive size"));
        }

        Ok(Level {
            id,
            bounds,
            spawn: Vec2::new(self.spawn[0], bounds.y - self.spawn[1] - ACTOR_HEIGHT),
            platforms,
            traps,
            rise_block,
            pendulum,
            exit: to_rect(self.exit),
        })
    }
}

impl Level {
    /// Compile a level from the built-in catalog
    pub fn builtin(id: u32) -> Result<Self, LevelError> {
        let def = builtin_def(id).ok_or(LevelError::UnknownLevel {
            id,
            count: LEVEL_COUNT,
        })?;
        def.compile(id, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT))
    }

    /// Compile a level from authored JSON in the default world size
    pub fn from_json(id: u32, json: &str) -> Result<Self, LevelError> {
        LevelDef::from_json(json)?.compile(id, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT))
    }

    /// The overhead hazard the rise block crushes against, if any
    pub fn crush_hazard(&self) -> Option<&Rect> {
        let index = self.rise_block.as_ref()?.crush_hazard?;
        self.traps.get(index).map(|t| &t.rect)
    }
}

fn block(id: &str, rect: [f32; 4], kind: BlockKind) -> BlockDef {
    BlockDef {
        id: id.to_string(),
        rect,
        kind,
    }
}

fn flat_level() -> LevelDef {
    LevelDef {
        spawn: [50.0, 50.0],
        blocks: vec![block("ground", [0.0, 0.0, 800.0, 50.0], BlockKind::Platform)],
        exit: [750.0, 50.0, 20.0, 40.0],
        pendulum: None,
        crush_hazard: None,
    }
}

/// Authored definition of a built-in level (1-based)
pub fn builtin_def(id: u32) -> Option<LevelDef> {
    match id {
        1 => Some(LevelDef {
            spawn: [20.0, 420.0],
            blocks: vec![
                block("block-start", [0.0, 300.0, 150.0, 20.0], BlockKind::Platform),
                block(
                    "rise-1",
                    [150.0, 300.0, 50.0, 50.0],
                    BlockKind::Rise {
                        distance: RISE_DISTANCE,
                    },
                ),
                block("block-low", [200.0, 300.0, 100.0, 20.0], BlockKind::Platform),
                block("block-after-pit", [320.0, 300.0, 150.0, 20.0], BlockKind::Platform),
                block(
                    "block-pendulum-base",
                    [480.0, 300.0, 200.0, 20.0],
                    BlockKind::Platform,
                ),
                block("trap-left-ceiling", [150.0, 50.0, 150.0, 20.0], BlockKind::Trap),
            ],
            exit: [700.0, 300.0, 20.0, 40.0],
            pendulum: Some(PendulumDef {
                anchor: [580.0, 350.0],
                length: 200.0,
                swing_angle: std::f32::consts::FRAC_PI_4,
                speed: 0.04,
                hidden_until_x: 500.0,
            }),
            crush_hazard: Some("trap-left-ceiling".to_string()),
        }),
        2..=LEVEL_COUNT => Some(flat_level()),
        _ => None,
    }
}
