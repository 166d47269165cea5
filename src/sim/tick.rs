//! Fixed timestep simulation tick
//!
//! Advances the world by one logical step. Order within a tick:
//! blasts, collision resolution, contacts, scroll and retirement,
//! section streaming, spawning, autotiling.

use super::autotile::texture_ready_rows;
use super::bodies::{BodyKind, BombPhase, PickupKind};
use super::events::{GameEvent, RemovalCause};
use super::rect::Rect;
use super::rows::stream_if_low;
use super::scroll;
use super::spawner::spawn_pending;
use super::state::{GamePhase, World};
use crate::consts::BOMB_SIZE;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump, or hold to jump higher
    pub up: bool,
    /// Fall faster
    pub down: bool,
    /// Drop a bomb if a charge is ready
    pub bomb: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    if world.phase == GamePhase::GameOver {
        return;
    }
    world.time_ticks += 1;

    world.bombs = (world.bombs + world.config.bomb_regen).min(world.max_bombs as f32);

    let obstacles = world.registry.obstacles(world.config.field_width());

    // Bombs first, so a blast clears spikes before the player can touch them
    step_bombs(world, &obstacles);

    let step = world
        .registry
        .player
        .step(input, &world.config, &obstacles);
    if step.jumped {
        world.events.send(GameEvent::Jumped);
    }

    if input.bomb && world.bombs >= 1.0 {
        world.bombs -= 1.0;
        let (cx, _) = world.registry.player.hitbox.center();
        let y = world.registry.player.hitbox.bottom() - BOMB_SIZE;
        world
            .registry
            .add_bomb(cx - BOMB_SIZE / 2, y, world.config.bomb_fuse_ticks, &mut world.events);
    }

    let field_width = world.config.field_width();
    for butterfly in &mut world.registry.butterflies {
        butterfly.step(field_width);
    }

    resolve_contacts(world);
    if world.phase == GamePhase::GameOver {
        return;
    }

    scroll::advance(world);

    if let Some((name, rows)) = stream_if_low(
        &mut world.rows,
        &world.library,
        world.config.low_water_rows,
        &mut world.rng,
    ) {
        world.events.send(GameEvent::SectionStreamed { name, rows });
    }
    spawn_pending(world);
    texture_ready_rows(world);
}

fn step_bombs(world: &mut World, obstacles: &[Rect]) {
    let mut exploded = Vec::new();
    let mut blasts = Vec::new();
    let mut expired = Vec::new();
    for bomb in &mut world.registry.bombs {
        if bomb.step(&world.config, obstacles) {
            exploded.push(bomb.id);
        }
        if bomb.is_exploding() {
            blasts.push(bomb.blast_rect(world.config.blast_radius));
        } else if !matches!(bomb.phase, BombPhase::Arming { .. }) {
            expired.push(bomb.id);
        }
    }

    for id in exploded {
        log::debug!("Bomb {id} exploded");
        world.events.send(GameEvent::BombExploded { id });
    }
    for area in blasts {
        world.registry.clear_spikes_in(area, &mut world.events);
    }
    for id in expired {
        world
            .registry
            .remove(BodyKind::Bomb, id, RemovalCause::Expired, &mut world.events);
    }
}

/// Player against hazards, pickups and butterflies
fn resolve_contacts(world: &mut World) {
    let player = &world.registry.player;
    let hitbox = player.hitbox;
    let motion = player.last_motion;

    let killer = world
        .registry
        .spikes
        .iter()
        .find(|s| s.triggered_by(hitbox, motion))
        .map(|s| s.id);
    if let Some(id) = killer {
        world
            .registry
            .remove(BodyKind::Spike, id, RemovalCause::Triggered, &mut world.events);
        world.events.send(GameEvent::PlayerDied { by: id });
        world.phase = GamePhase::GameOver;
        log::info!("Player died at score {}", world.score());
        return;
    }

    let collected: Vec<_> = world
        .registry
        .pickups
        .iter()
        .filter(|p| p.rect.intersects(&hitbox))
        .map(|p| (p.id, p.kind))
        .collect();
    for (id, kind) in collected {
        match kind {
            PickupKind::BombUpgrade => {
                world.max_bombs += 1;
                world.bombs = (world.bombs + 1.0).min(world.max_bombs as f32);
            }
        }
        world
            .registry
            .remove(BodyKind::Pickup, id, RemovalCause::Collected, &mut world.events);
    }

    let caught: Vec<_> = world
        .registry
        .butterflies
        .iter()
        .filter(|b| b.hitbox.intersects(&hitbox))
        .map(|b| b.id)
        .collect();
    for id in caught {
        world.luck += 1;
        world
            .registry
            .remove(BodyKind::Butterfly, id, RemovalCause::Collected, &mut world.events);
    }
}
