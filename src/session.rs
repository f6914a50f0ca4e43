//! Menu-to-game lifecycle
//!
//! The session owns the persisted progress and at most one running level.
//! A presentation layer drives it from the level map and the win/lose
//! modal buttons; the session decides what those buttons are allowed to do.

use crate::consts::TOTAL_LEVELS;
use crate::progress::LevelProgress;
use crate::sim::{Game, GamePhase};

pub struct Session {
    progress: LevelProgress,
    game: Option<Game>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session with persisted progress (or defaults where storage is
    /// absent or unreadable)
    pub fn new() -> Self {
        Self {
            progress: LevelProgress::load(),
            game: None,
        }
    }

    pub fn with_progress(progress: LevelProgress) -> Self {
        Self {
            progress,
            game: None,
        }
    }

    pub fn progress(&self) -> &LevelProgress {
        &self.progress
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }

    /// Start a level from the map. Locked levels are refused.
    pub fn start_level(&mut self, level: u32, seed: u64) -> bool {
        if !self.progress.is_unlocked(level) {
            log::warn!("Level {level} is locked");
            return false;
        }
        log::info!("Starting level {level}");
        self.game = Some(Game::new(level, seed));
        true
    }

    /// Apply a won level to the progression and persist if anything moved.
    /// Returns the stars recorded, or None when the current game is not a
    /// win.
    pub fn finish_level(&mut self) -> Option<u8> {
        let game = self.game.as_ref()?;
        if game.phase() != GamePhase::Won {
            return None;
        }
        let level = game.state().level;
        let stars = game.state().stars_earned();
        if self.progress.record_completion(level, stars) {
            self.progress.save();
        }
        Some(stars)
    }

    /// Restart the current level with a fresh board
    pub fn retry(&mut self, seed: u64) -> bool {
        let Some(game) = &self.game else {
            return false;
        };
        let level = game.state().level;
        log::info!("Retrying level {level}");
        self.game = Some(Game::new(level, seed));
        true
    }

    /// Advance after a win: record progression, then start the following
    /// level. Returns false past the last level (the player goes back to
    /// the map instead).
    pub fn next_level(&mut self, seed: u64) -> bool {
        let Some(game) = &self.game else {
            return false;
        };
        if game.phase() != GamePhase::Won {
            return false;
        }
        let level = game.state().level;
        self.finish_level();
        if level >= TOTAL_LEVELS {
            self.game = None;
            return false;
        }
        self.game = Some(Game::new(level + 1, seed));
        true
    }

    /// Abandon the current level and return to the map
    pub fn back_to_menu(&mut self) {
        self.game = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BalloonId, SelectOutcome};

    /// Greedy self-play to a win: clear one kind at a time
    fn play_to_win(game: &mut Game) {
        while game.phase() == GamePhase::Playing {
            let kind = game.state().pool[0].kind;
            let ids: Vec<BalloonId> = game
                .state()
                .pool
                .iter()
                .filter(|b| b.kind == kind)
                .take(3)
                .map(|b| b.id)
                .collect();
            for id in ids {
                assert_ne!(game.select_balloon(id), SelectOutcome::Ignored);
            }
        }
        assert_eq!(game.phase(), GamePhase::Won);
    }

    #[test]
    fn test_locked_level_refused() {
        let mut session = Session::with_progress(LevelProgress::new());
        assert!(!session.start_level(2, 1));
        assert!(session.game().is_none());
        assert!(session.start_level(1, 1));
        assert!(session.game().is_some());
    }

    #[test]
    fn test_win_records_and_unlocks() {
        let mut session = Session::with_progress(LevelProgress::new());
        session.start_level(1, 42);
        play_to_win(session.game_mut().unwrap());
        let stars = session.finish_level().unwrap();
        assert!(stars >= 1);
        assert_eq!(session.progress().stars_for(1), stars);
        assert_eq!(session.progress().unlocked_level, 2);
    }

    #[test]
    fn test_finish_requires_win() {
        let mut session = Session::with_progress(LevelProgress::new());
        assert_eq!(session.finish_level(), None);
        session.start_level(1, 42);
        assert_eq!(session.finish_level(), None);
        assert_eq!(session.progress().unlocked_level, 1);
    }

    #[test]
    fn test_next_level_advances() {
        let mut session = Session::with_progress(LevelProgress::new());
        session.start_level(1, 42);
        play_to_win(session.game_mut().unwrap());
        assert!(session.next_level(43));
        let game = session.game().unwrap();
        assert_eq!(game.state().level, 2);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(session.progress().unlocked_level, 2);
    }

    #[test]
    fn test_next_level_requires_win() {
        let mut session = Session::with_progress(LevelProgress::new());
        session.start_level(1, 42);
        assert!(!session.next_level(43));
        assert_eq!(session.game().unwrap().state().level, 1);
    }

    #[test]
    fn test_retry_regenerates_same_level() {
        let mut session = Session::with_progress(LevelProgress::new());
        session.start_level(1, 42);
        let id = session.game().unwrap().state().pool[0].id;
        session.game_mut().unwrap().select_balloon(id);
        assert!(session.retry(99));
        let game = session.game().unwrap();
        assert_eq!(game.state().level, 1);
        assert_eq!(game.state().moves, 0);
        assert!(game.state().tray.is_empty());
    }

    #[test]
    fn test_back_to_menu_drops_game() {
        let mut session = Session::with_progress(LevelProgress::new());
        session.start_level(1, 42);
        session.back_to_menu();
        assert!(session.game().is_none());
        // Abandoning a win without finishing records nothing
        assert_eq!(session.progress().unlocked_level, 1);
    }

    #[test]
    fn test_frontier_never_regresses() {
        let mut progress = LevelProgress::new();
        progress.record_completion(1, 3);
        progress.record_completion(2, 3);
        let mut session = Session::with_progress(progress);
        // Replay level 1 and win: frontier stays at 3
        session.start_level(1, 7);
        play_to_win(session.game_mut().unwrap());
        session.finish_level();
        assert_eq!(session.progress().unlocked_level, 3);
    }
}
