//! Row spawner
//!
//! Turns decoded rows into platforms, strictly in row order. A row's top
//! edge is the bottom edge of the row before it, so the buffer head's
//! position is the only cursor needed.

use rand::Rng;

use super::bodies::{PickupKind, TileCoord};
use super::rect::Rect;
use super::state::World;
use crate::consts::{BUTTERFLY_SIZE, PICKUP_SIZE, TILE};

/// Spawn the oldest unspawned row. Returns its index, or None when every
/// buffered row already exists.
pub fn spawn_next_row(world: &mut World) -> Option<u64> {
    let index = world.rows.first_unspawned()?;
    let y = world.rows.row_top(index)?;
    let columns = world.rows.get(index)?.columns.clone();
    let last_column = world.config.last_column();

    for &column in &columns {
        let column = column as i32;
        if column > last_column {
            log::warn!("Row {index}: column {column} is outside the playfield, skipped");
            continue;
        }
        world
            .registry
            .add_platform(TileCoord::new(column, index), y, &mut world.events);
    }
    if let Some(row) = world.rows.get_mut(index) {
        row.spawned = true;
    }

    if y > world.config.mover_spawn_depth {
        spawn_extras(world, index, y, &columns);
    }
    Some(index)
}

/// Spawn every pending row. Returns how many were spawned.
pub fn spawn_pending(world: &mut World) -> usize {
    let mut spawned = 0;
    while spawn_next_row(world).is_some() {
        spawned += 1;
    }
    spawned
}

/// Deep rows may get a butterfly, and a pickup resting on one of its tiles
fn spawn_extras(world: &mut World, index: u64, y: i32, columns: &[u16]) {
    let roll = world.rng.random_range(1..=1000) as f32;
    let butterfly_odds = world.config.butterfly_base_per_mille + world.luck as f32;
    if roll > 1000.0 - butterfly_odds {
        let max_x = (world.config.field_width() - BUTTERFLY_SIZE).max(0);
        let x = world.rng.random_range(0..=max_x);
        let phase = world.rng.random::<f32>() * std::f32::consts::TAU;
        world.registry.add_butterfly(x, y, phase, &mut world.events);
    }

    if columns.is_empty() {
        return;
    }
    let roll = world.rng.random_range(1..=1000) as f32;
    if roll > 1000.0 - world.config.pickup_per_mille {
        let column = columns[world.rng.random_range(0..columns.len())] as i32;
        let above = TileCoord::new(column, index.wrapping_sub(1));
        if index == 0 || column > world.config.last_column() || world.registry.has_tile(above) {
            return;
        }
        let x = crate::column_to_x(column) + (TILE - PICKUP_SIZE) / 2;
        let rect = Rect::new(x, y - PICKUP_SIZE, PICKUP_SIZE, PICKUP_SIZE);
        world
            .registry
            .add_pickup(PickupKind::BombUpgrade, rect, &mut world.events);
    }
}
