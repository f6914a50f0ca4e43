//! Balloon Emerge entry points
//!
//! The web build drives the game through `web::GameHandle`; the native
//! binary runs a headless self-play demo across a run of levels, which
//! doubles as a smoke test for board generation and the match engine.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let levels: u32 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(10)
        .min(balloon_emerge::consts::TOTAL_LEVELS);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    log::info!("Self-play demo: {levels} levels, seed {seed}");
    demo::run(levels, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::init; this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use balloon_emerge::consts::MATCH_SIZE;
    use balloon_emerge::progress::LevelProgress;
    use balloon_emerge::session::Session;
    use balloon_emerge::sim::{BalloonId, Game, GamePhase};

    /// Play one level greedily: finish one kind at a time so the tray
    /// never accumulates more than three balloons.
    fn play_level(game: &mut Game) {
        while game.phase() == GamePhase::Playing {
            let kind = game.state().pool[0].kind;
            let ids: Vec<BalloonId> = game
                .state()
                .pool
                .iter()
                .filter(|b| b.kind == kind)
                .take(MATCH_SIZE)
                .map(|b| b.id)
                .collect();
            for id in ids {
                game.select_balloon(id);
            }
        }
    }

    pub fn run(levels: u32, seed: u64) {
        let mut session = Session::with_progress(LevelProgress::new());

        for level in 1..=levels {
            if !session.start_level(level, seed.wrapping_add(u64::from(level))) {
                log::error!("Level {level} locked; progression did not advance");
                break;
            }
            let Some(game) = session.game_mut() else {
                break;
            };
            play_level(game);

            let state = game.state();
            println!(
                "level {:3}: {} moves, score {}, {} stars",
                level,
                state.moves,
                state.stars,
                state.stars_earned()
            );
            let events = game.drain_events().len();
            log::debug!("level {level}: {events} presentation events");

            if session.finish_level().is_none() {
                log::error!("Level {level} did not finish in a win");
                break;
            }
        }

        println!(
            "total stars: {} / {} unlocked",
            session.progress().total_stars(),
            session.progress().unlocked_level
        );
    }
}
