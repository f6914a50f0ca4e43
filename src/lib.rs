//! Balloon Emerge - a balloon match-3 tray puzzle
//!
//! Core modules:
//! - `sim`: Deterministic game rules (board generation, tray, match resolution)
//! - `progress`: Persisted level progression (unlocks, best stars per level)
//! - `session`: Menu-to-game lifecycle around the match engine
//!
//! Rendering and input handling live outside this crate. The sim exposes
//! balloon positions plus a drained event stream that a presentation layer
//! consumes at its own pace; it never calls back into the rules.

pub mod progress;
pub mod session;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use progress::LevelProgress;
pub use session::Session;
pub use sim::{Game, GameEvent, GamePhase, GameState, LevelConfig, SelectOutcome};

/// Game configuration constants
pub mod consts {
    /// Total number of levels on the map
    pub const TOTAL_LEVELS: u32 = 100;

    /// Balloons required to resolve a match
    pub const MATCH_SIZE: usize = 3;
    /// Score awarded per resolved triple
    pub const TRIPLE_BONUS: u32 = 10;

    /// Move thresholds for the star rating on a cleared board
    pub const THREE_STAR_MOVES: u32 = 20;
    pub const TWO_STAR_MOVES: u32 = 30;

    /// Difficulty curve bases and caps
    pub const BASE_BALLOON_COUNT: u32 = 15;
    pub const MAX_BALLOON_COUNT: u32 = 50;
    pub const BASE_TRAY_CAPACITY: u32 = 7;
    pub const MAX_TRAY_CAPACITY: u32 = 10;
    pub const BASE_KIND_COUNT: u8 = 3;
    pub const MAX_KIND_COUNT: u8 = 6;

    /// Floating cluster above the gift box
    pub const CLUSTER_CENTER_Y: f32 = 4.5;
    pub const CLUSTER_RADIUS: f32 = 2.0;
    pub const CLUSTER_HEIGHT: f32 = 1.5;
    pub const MIN_BALLOON_SPACING: f32 = 1.0;
    pub const PLACEMENT_ATTEMPTS: u32 = 100;

    /// Undo snapshots kept per level attempt
    pub const UNDO_HISTORY_LIMIT: usize = 10;

    /// Balloon palette (0xRRGGBB), indexed by kind
    pub const KIND_COLORS: [u32; 6] = [
        0xe74c3c, // red
        0x00d2d3, // cyan
        0x3498db, // blue
        0xff6b35, // orange
        0x2ecc71, // green
        0xf1c40f, // yellow
    ];
    pub const KIND_NAMES: [&str; 6] = ["Red", "Cyan", "Blue", "Orange", "Green", "Yellow"];
}
