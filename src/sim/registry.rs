//! Body registry
//!
//! Single owner of every body in the run. Platforms stay in spawn order and
//! are also indexed by grid coordinate, so neighbor queries never scan.
//! Removal is immediate: once a body is gone nothing later in the tick can
//! see it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::bodies::{
    BodyId, BodyKind, Bomb, Butterfly, Direction, Pickup, PickupKind, Platform, Player, Scrolls,
    Spike, TileCoord,
};
use super::events::{EventQueue, GameEvent, RemovalCause};
use super::rect::Rect;
use crate::consts::TILE;

/// Half-height of the side walls; far beyond any reachable y
const WALL_SPAN: i32 = 1 << 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyRegistry {
    next_id: BodyId,
    pub player: Player,
    /// Spawn order
    platforms: Vec<Platform>,
    tiles: HashSet<TileCoord>,
    pub spikes: Vec<Spike>,
    pub bombs: Vec<Bomb>,
    pub butterflies: Vec<Butterfly>,
    pub pickups: Vec<Pickup>,
}

impl BodyRegistry {
    /// Registry holding only the player
    pub fn new(player_x: i32, player_y: i32) -> Self {
        Self {
            next_id: 2,
            player: Player::new(1, player_x, player_y),
            platforms: Vec::new(),
            tiles: HashSet::new(),
            spikes: Vec::new(),
            bombs: Vec::new(),
            butterflies: Vec::new(),
            pickups: Vec::new(),
        }
    }

    /// Allocate a new body ID
    pub fn next_body_id(&mut self) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn platform(&self, id: BodyId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn platform_mut(&mut self, id: BodyId) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    /// Platforms of one grid row, left to right
    pub fn platforms_in_row(&self, row: u64) -> impl Iterator<Item = &Platform> {
        self.platforms.iter().filter(move |p| p.coord.row == row)
    }

    /// Is there a live platform at this grid coordinate?
    #[inline]
    pub fn has_tile(&self, coord: TileCoord) -> bool {
        self.tiles.contains(&coord)
    }

    pub fn add_platform(
        &mut self,
        coord: TileCoord,
        y: i32,
        events: &mut EventQueue<GameEvent>,
    ) -> BodyId {
        let id = self.next_body_id();
        self.platforms.push(Platform::new(id, coord, y));
        self.tiles.insert(coord);
        events.send(GameEvent::Spawned {
            id,
            kind: BodyKind::Platform,
        });
        id
    }

    pub fn add_spike(
        &mut self,
        tile: Rect,
        direction: Direction,
        events: &mut EventQueue<GameEvent>,
    ) -> BodyId {
        let id = self.next_body_id();
        self.spikes.push(Spike::on_face(id, tile, direction));
        events.send(GameEvent::Spawned {
            id,
            kind: BodyKind::Spike,
        });
        id
    }

    pub fn add_bomb(
        &mut self,
        x: i32,
        y: i32,
        fuse_ticks: u32,
        events: &mut EventQueue<GameEvent>,
    ) -> BodyId {
        let id = self.next_body_id();
        self.bombs.push(Bomb::new(id, x, y, fuse_ticks));
        events.send(GameEvent::Spawned {
            id,
            kind: BodyKind::Bomb,
        });
        id
    }

    pub fn add_butterfly(
        &mut self,
        x: i32,
        y: i32,
        phase: f32,
        events: &mut EventQueue<GameEvent>,
    ) -> BodyId {
        let id = self.next_body_id();
        self.butterflies.push(Butterfly::new(id, x, y, phase));
        events.send(GameEvent::Spawned {
            id,
            kind: BodyKind::Butterfly,
        });
        id
    }

    pub fn add_pickup(
        &mut self,
        kind: PickupKind,
        rect: Rect,
        events: &mut EventQueue<GameEvent>,
    ) -> BodyId {
        let id = self.next_body_id();
        self.pickups.push(Pickup { id, kind, rect });
        events.send(GameEvent::Spawned {
            id,
            kind: BodyKind::Pickup,
        });
        id
    }

    /// Static rectangles dynamic bodies collide with: every platform plus a
    /// wall on each side of the playfield
    pub fn obstacles(&self, field_width: i32) -> Vec<Rect> {
        let mut rects: Vec<Rect> = self.platforms.iter().map(|p| p.rect).collect();
        rects.push(Rect::new(-TILE, -WALL_SPAN, TILE, 2 * WALL_SPAN));
        rects.push(Rect::new(field_width, -WALL_SPAN, TILE, 2 * WALL_SPAN));
        rects
    }

    /// Move every body except the player up by `overflow`
    pub fn scroll_all(&mut self, overflow: i32) {
        self.platforms.iter_mut().for_each(|b| b.scroll(overflow));
        self.spikes.iter_mut().for_each(|b| b.scroll(overflow));
        self.bombs.iter_mut().for_each(|b| b.scroll(overflow));
        self.butterflies.iter_mut().for_each(|b| b.scroll(overflow));
        self.pickups.iter_mut().for_each(|b| b.scroll(overflow));
    }

    /// Drop every non-player body that is fully above the visible origin.
    /// Returns how many were removed.
    pub fn retire_scrolled(&mut self, events: &mut EventQueue<GameEvent>) -> usize {
        let before = self.platforms.len();
        let tiles = &mut self.tiles;
        self.platforms.retain(|p| {
            let keep = !p.scrolled_off();
            if !keep {
                tiles.remove(&p.coord);
                events.send(GameEvent::Removed {
                    id: p.id,
                    kind: BodyKind::Platform,
                    cause: RemovalCause::ScrolledOff,
                });
            }
            keep
        });
        let mut removed = before - self.platforms.len();

        removed += retain_logged(&mut self.spikes, BodyKind::Spike, events, |s| {
            (!s.scrolled_off(), s.id)
        });
        removed += retain_logged(&mut self.bombs, BodyKind::Bomb, events, |b| {
            (!b.scrolled_off(), b.id)
        });
        removed += retain_logged(&mut self.butterflies, BodyKind::Butterfly, events, |b| {
            (!b.scrolled_off(), b.id)
        });
        removed += retain_logged(&mut self.pickups, BodyKind::Pickup, events, |p| {
            (!p.scrolled_off(), p.id)
        });
        removed
    }

    /// Remove every spike touching `area`, returning their ids
    pub fn clear_spikes_in(
        &mut self,
        area: Rect,
        events: &mut EventQueue<GameEvent>,
    ) -> Vec<BodyId> {
        let mut cleared = Vec::new();
        self.spikes.retain(|s| {
            if s.rect.intersects(&area) {
                cleared.push(s.id);
                events.send(GameEvent::Removed {
                    id: s.id,
                    kind: BodyKind::Spike,
                    cause: RemovalCause::Blasted,
                });
                false
            } else {
                true
            }
        });
        cleared
    }

    /// Remove one body of the given kind by id
    pub fn remove(
        &mut self,
        kind: BodyKind,
        id: BodyId,
        cause: RemovalCause,
        events: &mut EventQueue<GameEvent>,
    ) -> bool {
        let removed = match kind {
            BodyKind::Spike => remove_by_id(&mut self.spikes, |s| s.id == id),
            BodyKind::Bomb => remove_by_id(&mut self.bombs, |b| b.id == id),
            BodyKind::Butterfly => remove_by_id(&mut self.butterflies, |b| b.id == id),
            BodyKind::Pickup => remove_by_id(&mut self.pickups, |p| p.id == id),
            BodyKind::Platform => match self.platforms.iter().position(|p| p.id == id) {
                Some(i) => {
                    let platform = self.platforms.remove(i);
                    self.tiles.remove(&platform.coord);
                    true
                }
                None => false,
            },
            // The player is never removed here; death is reported instead
            BodyKind::Player => false,
        };
        if removed {
            events.send(GameEvent::Removed { id, kind, cause });
        }
        removed
    }

    /// Count of every live body, the player included
    pub fn body_count(&self) -> usize {
        1 + self.platforms.len()
            + self.spikes.len()
            + self.bombs.len()
            + self.butterflies.len()
            + self.pickups.len()
    }
}

fn retain_logged<T>(
    bodies: &mut Vec<T>,
    kind: BodyKind,
    events: &mut EventQueue<GameEvent>,
    keep: impl Fn(&T) -> (bool, BodyId),
) -> usize {
    let before = bodies.len();
    bodies.retain(|b| {
        let (keep, id) = keep(b);
        if !keep {
            events.send(GameEvent::Removed {
                id,
                kind,
                cause: RemovalCause::ScrolledOff,
            });
        }
        keep
    });
    before - bodies.len()
}

fn remove_by_id<T>(bodies: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    match bodies.iter().position(matches) {
        Some(i) => {
            bodies.remove(i);
            true
        }
        None => false,
    }
}
