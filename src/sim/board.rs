//! Level configuration and board generation
//!
//! Per-kind balloon counts are truncated down to multiples of 3 so every
//! board is solvable. Kinds that land below 3 are dropped entirely, which
//! can leave fewer balloons than the nominal count; that is accepted, not
//! corrected.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Balloon, GameState};
use crate::consts::*;

/// Float animation tuning (presentation only)
const FLOAT_SPEED_MIN: f32 = 0.3;
const FLOAT_SPEED_VAR: f32 = 0.2;
const FLOAT_AMPLITUDE: f32 = 0.15;

/// Difficulty knobs derived from the level number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Nominal balloon count before multiple-of-3 truncation
    pub balloon_count: u32,
    /// Tray slots for this level
    pub tray_capacity: u32,
    /// Distinct balloon kinds in play
    pub kind_count: u8,
}

impl LevelConfig {
    pub fn for_level(level: u32) -> Self {
        let per_level = level / 5 + 1;
        Self {
            balloon_count: (BASE_BALLOON_COUNT + per_level * 3).min(MAX_BALLOON_COUNT),
            tray_capacity: (BASE_TRAY_CAPACITY + level / 10).min(MAX_TRAY_CAPACITY),
            kind_count: (BASE_KIND_COUNT + (level / 15) as u8).min(MAX_KIND_COUNT),
        }
    }
}

/// Fill the pool for the state's level. Any existing balloons are dropped.
pub fn generate_pool(state: &mut GameState, rng: &mut Pcg32) {
    state.pool.clear();

    // Draw kinds uniformly, then truncate each kind to a multiple of 3
    let mut counts = [0u32; MAX_KIND_COUNT as usize];
    for _ in 0..state.config.balloon_count {
        let kind = rng.random_range(0..state.config.kind_count as usize);
        counts[kind] += 1;
    }
    for count in counts.iter_mut() {
        *count -= *count % MATCH_SIZE as u32;
    }

    let mut placed: Vec<Vec3> = Vec::new();
    for (kind, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            let pos = place_in_cluster(&placed, rng);
            placed.push(pos);
            let id = state.next_entity_id();
            state.pool.push(Balloon {
                id,
                kind: kind as u8,
                level: 1,
                pos,
                base_y: pos.y,
                float_speed: FLOAT_SPEED_MIN + rng.random::<f32>() * FLOAT_SPEED_VAR,
                float_amplitude: FLOAT_AMPLITUDE,
            });
        }
    }

    log::info!(
        "Generated level {} board: {} balloons, {} kinds, tray {}",
        state.level,
        state.pool.len(),
        state.config.kind_count,
        state.config.tray_capacity
    );
}

/// Reposition every pool balloon (shuffle button). Rules state untouched.
pub fn reshuffle_pool(state: &mut GameState, rng: &mut Pcg32) {
    let mut placed: Vec<Vec3> = Vec::new();
    for balloon in &mut state.pool {
        let pos = place_in_cluster(&placed, rng);
        placed.push(pos);
        balloon.pos = pos;
        balloon.base_y = pos.y;
        balloon.float_speed = FLOAT_SPEED_MIN + rng.random::<f32>() * FLOAT_SPEED_VAR;
        balloon.float_amplitude = FLOAT_AMPLITUDE;
    }
}

/// Rejection-sample a cluster position at least `MIN_BALLOON_SPACING` from
/// the balloons already placed. Gives up after `PLACEMENT_ATTEMPTS` and
/// keeps the last candidate.
fn place_in_cluster(placed: &[Vec3], rng: &mut Pcg32) -> Vec3 {
    let mut pos = sample_cluster_point(rng);
    for _ in 0..PLACEMENT_ATTEMPTS {
        if placed
            .iter()
            .all(|p| p.distance(pos) >= MIN_BALLOON_SPACING)
        {
            break;
        }
        pos = sample_cluster_point(rng);
    }
    pos
}

/// Point inside the floating cluster: spherical draw plus a vertical lift
/// so balloons sit above the gift box
fn sample_cluster_point(rng: &mut Pcg32) -> Vec3 {
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let radius = rng.random::<f32>() * CLUSTER_RADIUS;
    let height = rng.random::<f32>() * CLUSTER_HEIGHT;
    Vec3::new(
        phi.sin() * theta.cos() * radius,
        CLUSTER_CENTER_Y + height + phi.cos() * radius,
        phi.sin() * theta.sin() * radius,
    )
}
