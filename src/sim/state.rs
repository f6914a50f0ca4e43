//! Game state and core simulation types
//!
//! Everything an undo snapshot or a serialized attempt must capture lives
//! here.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::LevelConfig;
use crate::consts::*;

/// Balloon entity id. Identity is by id, never by kind/level value; two
/// balloons may share both.
pub type BalloonId = u32;

/// Current phase of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting selections
    Playing,
    /// Board pool and tray both cleared
    Won,
    /// A selection was attempted with the tray at capacity
    Lost,
}

impl GamePhase {
    /// Terminal phases halt further input until a reset
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// A balloon entity
///
/// `kind` is the color index and the only field match resolution looks at.
/// `level` is carried for display rings but deliberately ignored when
/// matching. Position and float fields are fixed at generation time and
/// only read by presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    pub id: BalloonId,
    pub kind: u8,
    pub level: u8,
    pub pos: Vec3,
    pub base_y: f32,
    pub float_speed: f32,
    pub float_amplitude: f32,
}

impl Balloon {
    /// Vertical bob offset for a presentation clock
    pub fn float_offset(&self, time_secs: f32) -> f32 {
        (time_secs * self.float_speed).sin() * self.float_amplitude
    }

    /// Palette color for this balloon's kind
    pub fn color(&self) -> u32 {
        KIND_COLORS[self.kind as usize % KIND_COLORS.len()]
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete state of one level attempt (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed for reproducible board generation
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Level being played (1-based)
    pub level: u32,
    /// Difficulty knobs derived from `level`
    pub config: LevelConfig,
    /// Score accumulated this attempt (10 per resolved triple)
    pub stars: u32,
    /// Selections made this attempt
    pub moves: u32,
    /// Balloons still floating, available for selection
    pub pool: Vec<Balloon>,
    /// Ordered holding area, bounded by `config.tray_capacity`
    pub tray: Vec<Balloon>,
    /// Current phase
    pub phase: GamePhase,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an empty state for the given level; the board generator
    /// fills the pool.
    pub fn new(level: u32, seed: u64) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            level,
            config: LevelConfig::for_level(level),
            stars: 0,
            moves: 0,
            pool: Vec::new(),
            tray: Vec::new(),
            phase: GamePhase::Playing,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> BalloonId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Another insert would overflow the tray
    pub fn tray_is_full(&self) -> bool {
        self.tray.len() >= self.config.tray_capacity as usize
    }

    /// Win condition: nothing floating, nothing held
    pub fn is_cleared(&self) -> bool {
        self.pool.is_empty() && self.tray.is_empty()
    }

    /// Star rating for the attempt: 3/2/1 by move count on a cleared
    /// board, 0 otherwise
    pub fn stars_earned(&self) -> u8 {
        if !self.is_cleared() {
            return 0;
        }
        if self.moves < THREE_STAR_MOVES {
            3
        } else if self.moves < TWO_STAR_MOVES {
            2
        } else {
            1
        }
    }
}
