//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical ticks only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod autotile;
pub mod bodies;
pub mod collision;
pub mod events;
pub mod rect;
pub mod registry;
pub mod rows;
pub mod scroll;
pub mod section;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autotile::{NeighborMask, TextureOutcome, TileTexture, texture_ready_rows, texture_row};
pub use bodies::{
    BodyId, BodyKind, Bomb, BombPhase, Butterfly, Direction, Pickup, PickupKind, Platform, Player,
    PlayerPose, Spike, TileCoord,
};
pub use collision::{Collider, CollisionResult, resolve};
pub use events::{EventQueue, GameEvent, RemovalCause};
pub use rect::Rect;
pub use registry::BodyRegistry;
pub use rows::{Row, RowBuffer};
pub use scroll::ScrollStep;
pub use section::{SectionBitmap, SectionLibrary, decode};
pub use spawner::{spawn_next_row, spawn_pending};
pub use state::{GamePhase, PLAYER_START, World};
pub use tick::{TickInput, tick};
