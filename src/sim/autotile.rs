//! Autotiling and hazard placement
//!
//! Each platform is classified once by which of its eight neighbors are
//! solid. The cardinal pattern picks the tile texture; open cardinal faces
//! are where spikes can grow. A row is only classified once the row below it
//! exists, since the south neighbors must be known.
//!
//! Neighbor lookups go through the registry's coordinate index, keyed by
//! global row index, so they are unaffected by scrolling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bodies::{Direction, TileCoord};
use super::state::World;

/// Solid/open state of the eight tiles around a platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborMask {
    pub n: bool,
    pub ne: bool,
    pub e: bool,
    pub se: bool,
    pub s: bool,
    pub sw: bool,
    pub w: bool,
    pub nw: bool,
}

impl NeighborMask {
    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::N => self.n,
            Direction::E => self.e,
            Direction::S => self.s,
            Direction::W => self.w,
        }
    }

    /// Cardinal faces with nothing against them
    pub fn open_faces(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| !self.has(*d))
    }

    /// Texture key plus concave-corner decorations
    pub fn texture(&self) -> TileTexture {
        let key: String = Direction::ALL
            .iter()
            .filter(|d| self.has(**d))
            .map(Direction::letter)
            .collect();
        let key = if key.is_empty() { "alone".to_string() } else { key };

        TileTexture {
            key,
            corners: Corners {
                nw: self.n && self.w && !self.nw,
                ne: self.n && self.e && !self.ne,
                sw: self.s && self.w && !self.sw,
                se: self.s && self.e && !self.se,
            },
        }
    }
}

/// Concave corners to decorate: both adjoining sides solid, diagonal open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corners {
    pub nw: bool,
    pub ne: bool,
    pub sw: bool,
    pub se: bool,
}

/// What the renderer needs to draw a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTexture {
    /// Present cardinals in N,E,S,W order ("NS", "NESW"), or "alone"
    pub key: String,
    pub corners: Corners,
}

/// Result of asking for a row to be textured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureOutcome {
    Textured { tiles: usize, spikes: usize },
    /// Already done; nothing changed
    AlreadyTextured,
    /// Row or the row below it not spawned yet
    NotReady,
    /// No such row in the buffer
    Unknown,
}

/// Classify the tile at `coord`.
///
/// `solid` answers whether a platform exists at a coordinate. Column 0 and
/// `last_column` have an implicit wall outside them. The topmost row ever
/// spawned (row 0) sees open sky above; any later row has a real row above
/// it, possibly empty, which is looked up like any other.
pub fn classify(
    solid: impl Fn(TileCoord) -> bool,
    coord: TileCoord,
    last_column: i32,
) -> NeighborMask {
    let TileCoord { column, row } = coord;
    let at = |dc: i32, row: Option<u64>| row.is_some_and(|r| solid(TileCoord::new(column + dc, r)));
    let above = row.checked_sub(1);
    let same = Some(row);
    let below = Some(row + 1);

    let mut mask = NeighborMask {
        n: at(0, above),
        ne: at(1, above),
        e: at(1, same),
        se: at(1, below),
        s: at(0, below),
        sw: at(-1, below),
        w: at(-1, same),
        nw: at(-1, above),
    };

    if column == 0 {
        mask.w = true;
        mask.nw = true;
        mask.sw = true;
    }
    if column == last_column {
        mask.e = true;
        mask.ne = true;
        mask.se = true;
    }
    mask
}

/// Spike odds for one open face, per mille. Rises with scroll distance,
/// falls with luck.
pub fn spike_chance_per_mille(world: &World) -> f32 {
    let difficulty = world.scroll_distance as f32 / world.config.spike_difficulty_divisor;
    (world.config.spike_base_per_mille + difficulty - world.luck as f32).clamp(0.0, 1000.0)
}

fn roll_spike<R: Rng + ?Sized>(rng: &mut R, chance_per_mille: f32) -> bool {
    rng.random_range(1..=1000) as f32 > 1000.0 - chance_per_mille
}

/// Texture every untextured platform of `row` and maybe grow spikes on
/// its open faces. Safe to call again: textured platforms are skipped, so
/// no face ever gets a second spike.
pub fn texture_row(world: &mut World, row: u64) -> TextureOutcome {
    let Some(current) = world.rows.get(row) else {
        return TextureOutcome::Unknown;
    };
    if current.textured {
        return TextureOutcome::AlreadyTextured;
    }
    let below_spawned = world.rows.get(row + 1).is_some_and(|r| r.spawned);
    if !current.spawned || !below_spawned {
        log::debug!("Row {row} not ready for texturing");
        return TextureOutcome::NotReady;
    }

    let last_column = world.config.last_column();
    let pending: Vec<_> = world
        .registry
        .platforms_in_row(row)
        .filter(|p| !p.textured)
        .map(|p| {
            let registry = &world.registry;
            let mask = classify(|c| registry.has_tile(c), p.coord, last_column);
            (p.id, p.rect, mask)
        })
        .collect();

    let hazards_allowed = row >= world.safe_rows;
    let chance = spike_chance_per_mille(world);
    let mut spikes = 0;
    for (id, rect, mask) in &pending {
        if hazards_allowed {
            for face in mask.open_faces() {
                if roll_spike(&mut world.rng, chance) {
                    world.registry.add_spike(*rect, face, &mut world.events);
                    spikes += 1;
                }
            }
        }
        if let Some(platform) = world.registry.platform_mut(*id) {
            platform.neighbors = Some(*mask);
            platform.texture = Some(mask.texture());
            platform.textured = true;
        }
    }

    if let Some(current) = world.rows.get_mut(row) {
        current.textured = true;
    }
    log::debug!("Textured row {row}: {} tiles, {spikes} spikes", pending.len());
    TextureOutcome::Textured {
        tiles: pending.len(),
        spikes,
    }
}

/// Texture every row that has become eligible, oldest first. Returns how
/// many rows were textured.
pub fn texture_ready_rows(world: &mut World) -> usize {
    let ready: Vec<u64> = world
        .rows
        .iter()
        .filter(|r| r.spawned && !r.textured)
        .map(|r| r.index)
        .collect();

    ready
        .into_iter()
        .filter(|&row| matches!(texture_row(world, row), TextureOutcome::Textured { .. }))
        .count()
}
