//! Catfall headless runner
//!
//! Plays one run with a simple autopilot at a fixed tick rate, logs what
//! happened and updates the best score on disk.
//!
//! Usage: `catfall [config.json]`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use catfall::consts::{TICKS_PER_SECOND, TILE};
use catfall::sim::{GameEvent, SectionLibrary, TickInput, World, tick};
use catfall::{HighScore, SimConfig};

/// Stop after this many simulated minutes even if the autopilot survives
const MAX_MINUTES: u64 = 10;

const HIGHSCORE_FILE: &str = "highscore.json";

/// Walks until blocked, then turns around. Bombs spikes that are close.
struct Autopilot {
    going_left: bool,
    last_x: i32,
    stuck_ticks: u32,
}

impl Autopilot {
    fn new() -> Self {
        Self {
            going_left: false,
            last_x: i32::MIN,
            stuck_ticks: 0,
        }
    }

    fn input(&mut self, world: &World) -> TickInput {
        let player = &world.registry.player;
        if player.grounded && player.hitbox.x == self.last_x {
            self.stuck_ticks += 1;
        } else {
            self.stuck_ticks = 0;
        }
        if self.stuck_ticks > 2 {
            self.going_left = !self.going_left;
            self.stuck_ticks = 0;
        }
        self.last_x = player.hitbox.x;

        let danger = player.hitbox.inflate(2 * TILE);
        let spike_near = world.registry.spikes.iter().any(|s| s.rect.intersects(&danger));

        TickInput {
            left: self.going_left,
            right: !self.going_left,
            up: false,
            down: !player.grounded,
            bomb: spike_near && world.registry.bombs.is_empty(),
        }
    }
}

struct RunSummary {
    ticks: u64,
    score: u64,
    jumps: u32,
    blasts: u32,
    sections: u32,
    died: bool,
}

fn play(world: &mut World) -> RunSummary {
    let mut pilot = Autopilot::new();
    let mut summary = RunSummary {
        ticks: 0,
        score: 0,
        jumps: 0,
        blasts: 0,
        sections: 0,
        died: false,
    };
    let max_ticks = MAX_MINUTES * 60 * TICKS_PER_SECOND as u64;

    while !world.is_over() && world.time_ticks < max_ticks {
        let input = pilot.input(world);
        tick(world, &input);

        for event in world.events.drain() {
            match event {
                GameEvent::Jumped => summary.jumps += 1,
                GameEvent::BombExploded { .. } => summary.blasts += 1,
                GameEvent::SectionStreamed { name, rows } => {
                    summary.sections += 1;
                    log::debug!("Section '{name}' streamed ({rows} rows)");
                }
                GameEvent::PlayerDied { by } => {
                    summary.died = true;
                    log::info!("Killed by spike {by}");
                }
                GameEvent::Spawned { .. } | GameEvent::Removed { .. } => {}
            }
        }

        if world.time_ticks % (10 * TICKS_PER_SECOND as u64) == 0 {
            log::info!(
                "t={}s score={} bodies={} rows={}",
                world.time_ticks / TICKS_PER_SECOND as u64,
                world.score(),
                world.registry.body_count(),
                world.rows.len()
            );
        }
    }

    summary.ticks = world.time_ticks;
    summary.score = world.score();
    summary
}

fn load_config(path: Option<&Path>) -> Result<SimConfig, catfall::ConfigError> {
    match path {
        Some(path) => SimConfig::load(path),
        None => Ok(SimConfig::default()),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    let library = SectionLibrary::builtin()?;

    log::info!("Catfall (headless) starting with seed {}", config.seed);
    let mut world = World::new(config, library);
    let summary = play(&mut world);

    log::info!(
        "Run over after {} ticks: score {}, {} jumps, {} blasts, {} sections, {} rows retired{}",
        summary.ticks,
        summary.score,
        summary.jumps,
        summary.blasts,
        summary.sections,
        world.rows_retired(),
        if summary.died { "" } else { " (time limit)" }
    );

    let path = Path::new(HIGHSCORE_FILE);
    let mut scores = HighScore::load(path)?;
    let outcome = scores.submit(summary.score);
    println!("Score: {}", summary.score);
    println!("{}", outcome.message());
    if outcome.new_best {
        scores.save(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
