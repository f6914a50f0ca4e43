//! JS-facing surface (wasm32 only)
//!
//! A thin handle around [`Session`] for the DOM/WebGL presentation layer:
//! JSON state snapshots out, balloon ids in. The presentation never
//! mutates game state directly.

use wasm_bindgen::prelude::*;

use crate::session::Session;
use crate::sim::SelectOutcome;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Balloon Emerge core initialized");
}

/// Seed from the wall clock; determinism only matters within a level
fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[wasm_bindgen]
pub struct GameHandle {
    session: Session,
}

#[wasm_bindgen]
impl GameHandle {
    /// Create a handle, loading persisted progress
    #[wasm_bindgen(constructor)]
    pub fn new() -> GameHandle {
        GameHandle {
            session: Session::new(),
        }
    }

    /// Start a level from the map. Returns false when the level is locked.
    pub fn start_level(&mut self, level: u32) -> bool {
        self.session.start_level(level, clock_seed())
    }

    /// Select a floating balloon. Returns "placed", "tray_full" or
    /// "ignored".
    pub fn select_balloon(&mut self, id: u32) -> String {
        let Some(game) = self.session.game_mut() else {
            return "ignored".into();
        };
        match game.select_balloon(id) {
            SelectOutcome::Placed { .. } => "placed".into(),
            SelectOutcome::TrayFull => "tray_full".into(),
            SelectOutcome::Ignored => "ignored".into(),
        }
    }

    pub fn undo(&mut self) -> bool {
        self.session.game_mut().map(|g| g.undo()).unwrap_or(false)
    }

    pub fn shuffle(&mut self) {
        if let Some(game) = self.session.game_mut() {
            game.shuffle();
        }
    }

    /// Kind index with a pair in the tray, or -1
    pub fn hint(&self) -> i32 {
        self.session
            .game()
            .and_then(|g| g.hint())
            .map(i32::from)
            .unwrap_or(-1)
    }

    pub fn retry(&mut self) -> bool {
        self.session.retry(clock_seed())
    }

    pub fn next_level(&mut self) -> bool {
        self.session.next_level(clock_seed())
    }

    /// Record a win without leaving the modal (stars recorded, or -1)
    pub fn finish_level(&mut self) -> i32 {
        self.session
            .finish_level()
            .map(i32::from)
            .unwrap_or(-1)
    }

    pub fn back_to_menu(&mut self) {
        self.session.back_to_menu();
    }

    /// Current level state as JSON ("null" on the menu)
    pub fn state_json(&self) -> String {
        match self.session.game() {
            Some(game) => {
                serde_json::to_string(game.state()).unwrap_or_else(|_| "null".into())
            }
            None => "null".into(),
        }
    }

    /// Drain queued presentation events as a JSON array
    pub fn events_json(&mut self) -> String {
        let events = self
            .session
            .game_mut()
            .map(|g| g.drain_events())
            .unwrap_or_default();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".into())
    }

    /// Progress snapshot for the level map
    pub fn progress_json(&self) -> String {
        serde_json::to_string(self.session.progress()).unwrap_or_else(|_| "{}".into())
    }
}
