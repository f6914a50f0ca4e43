//! Level progression: unlocks and per-level best stars
//!
//! Persisted to LocalStorage on wasm; native builds keep it in memory.
//! Storage failures are logged and ignored, leaving the in-memory copy
//! authoritative for the session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::TOTAL_LEVELS;

/// Persisted progression record. Monotonic: `unlocked_level` only
/// advances, per-level stars only improve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Highest level the player may start (1-based)
    pub unlocked_level: u32,
    /// Best stars earned per completed level
    pub level_stars: BTreeMap<u32, u8>,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self {
            unlocked_level: 1,
            level_stars: BTreeMap::new(),
        }
    }
}

impl LevelProgress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "balloon_emerge_progress";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        (1..=self.unlocked_level).contains(&level)
    }

    pub fn stars_for(&self, level: u32) -> u8 {
        self.level_stars.get(&level).copied().unwrap_or(0)
    }

    /// Sum of best stars across all levels (map header display)
    pub fn total_stars(&self) -> u32 {
        self.level_stars.values().map(|&s| u32::from(s)).sum()
    }

    /// Record a completed level. Stars are best-of; completing the
    /// frontier level unlocks the next one (bounded by the level count).
    /// Returns true if anything changed, meaning the caller should persist.
    pub fn record_completion(&mut self, level: u32, stars: u8) -> bool {
        let mut changed = false;
        if stars > self.stars_for(level) {
            self.level_stars.insert(level, stars);
            changed = true;
        }
        if level == self.unlocked_level && level < TOTAL_LEVELS {
            self.unlocked_level = level + 1;
            log::info!("Unlocked level {}", self.unlocked_level);
            changed = true;
        }
        changed
    }

    /// Parse a persisted blob; corrupt data falls back to defaults, an
    /// out-of-range frontier is clamped.
    #[allow(dead_code)]
    fn from_json(json: &str) -> Self {
        match serde_json::from_str::<LevelProgress>(json) {
            Ok(mut progress) => {
                progress.unlocked_level = progress.unlocked_level.clamp(1, TOTAL_LEVELS);
                progress
            }
            Err(err) => {
                log::warn!("Corrupt progress data, starting fresh: {err}");
                Self::default()
            }
        }
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let progress = Self::from_json(&json);
                log::info!(
                    "Loaded progress: {} unlocked, {} total stars",
                    progress.unlocked_level,
                    progress.total_stars()
                );
                return progress;
            }
        }

        log::info!("No saved progress, starting fresh");
        Self::default()
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, progress not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write progress to LocalStorage");
                } else {
                    log::info!("Progress saved ({} unlocked)", self.unlocked_level);
                }
            }
            Err(err) => log::warn!("Failed to encode progress: {err}"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
