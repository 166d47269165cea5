//! Simulation context
//!
//! `World` is the one object every simulation step receives by `&mut`. It
//! holds the registries, the row buffer, the RNG and the run counters, and
//! nothing else. Collaborators read from it and drain its events.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::autotile::texture_ready_rows;
use super::events::{EventQueue, GameEvent};
use super::registry::BodyRegistry;
use super::rows::RowBuffer;
use super::section::{SectionLibrary, decode};
use super::spawner::spawn_pending;
use crate::config::SimConfig;
use crate::consts::SCORE_DIVISOR;

/// Where the player appears at the start of a run
pub const PLAYER_START: (i32, i32) = (35, 50);

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GamePhase {
    Playing,
    /// Player died; ticks are ignored
    GameOver,
}

pub struct World {
    pub config: SimConfig,
    pub rng: Pcg32,
    pub library: SectionLibrary,
    pub rows: RowBuffer,
    pub registry: BodyRegistry,
    pub events: EventQueue<GameEvent>,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Total pixels scrolled; the only source of score
    pub scroll_distance: u64,
    /// Butterflies caught. Lowers spike odds, raises butterfly odds.
    pub luck: u32,
    /// Bomb charges, fractional while regenerating
    pub bombs: f32,
    pub max_bombs: u32,
    /// Rows below this index may carry spikes. Keeps the start section safe.
    pub safe_rows: u64,
}

impl World {
    /// Start a run: decode the start section, spawn it and texture every
    /// row that already has a row below it.
    pub fn new(config: SimConfig, library: SectionLibrary) -> Self {
        let mut world = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            library,
            rows: RowBuffer::new(),
            registry: BodyRegistry::new(PLAYER_START.0, PLAYER_START.1),
            events: EventQueue::new(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            scroll_distance: 0,
            luck: 0,
            bombs: config.max_bombs as f32,
            max_bombs: config.max_bombs,
            safe_rows: 0,
            config,
        };

        let start = decode(&world.library.start);
        world.safe_rows = start.len() as u64;
        world.rows.append(start);
        let spawned = spawn_pending(&mut world);
        let textured = texture_ready_rows(&mut world);
        log::info!(
            "New run (seed {}): {} start rows spawned, {} textured",
            world.config.seed,
            spawned,
            textured
        );
        world
    }

    /// Score shown to the player: whole hundreds of pixels scrolled
    pub fn score(&self) -> u64 {
        self.scroll_distance / SCORE_DIVISOR
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn rows_retired(&self) -> u64 {
        self.rows.rows_retired()
    }
}
