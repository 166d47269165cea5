//! Catfall - an endless falling platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, streaming, autotiling, scrolling)
//! - `config`: Data-driven tuning values
//! - `highscores`: Best-score bookkeeping
//! - `error`: Error types for fallible constructors

pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

pub use config::SimConfig;
pub use error::{ConfigError, ScoreError, SectionError};
pub use highscores::{HighScore, ScoreOutcome};

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in pixels. Every platform and hazard is
    /// placed on multiples of this.
    pub const TILE: i32 = 20;

    /// Nominal tick rate of the external scheduler
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Logical playfield size (the renderer scales this up)
    pub const VIEW_WIDTH: i32 = 200;
    pub const VIEW_HEIGHT: i32 = 300;

    /// Scroll distance per point of score
    pub const SCORE_DIVISOR: u64 = 100;

    /// Player collision hitbox (narrower than the sprite)
    pub const PLAYER_HITBOX_W: i32 = 12;
    pub const PLAYER_HITBOX_H: i32 = 22;
    /// Player sprite size; drawn at hitbox origin minus `PLAYER_SPRITE_OFFSET`
    pub const PLAYER_SPRITE_W: i32 = 16;
    pub const PLAYER_SPRITE_H: i32 = 24;
    pub const PLAYER_SPRITE_OFFSET: (i32, i32) = (2, 2);

    /// Spike footprint when lying along a horizontal face (N/S)
    pub const SPIKE_LONG: i32 = 16;
    pub const SPIKE_SHORT: i32 = 11;

    pub const BOMB_SIZE: i32 = 10;
    pub const BUTTERFLY_SIZE: i32 = 8;
    pub const PICKUP_SIZE: i32 = 12;
}

use consts::TILE;

/// Pixel x of the left edge of a grid column
#[inline]
pub fn column_to_x(column: i32) -> i32 {
    column * TILE
}

/// Grid column containing pixel x (floors toward negative infinity)
#[inline]
pub fn x_to_column(x: i32) -> i32 {
    x.div_euclid(TILE)
}

/// Pixel offset of row `row` relative to a row at `origin_row`
#[inline]
pub fn row_offset(row: u64, origin_row: u64) -> i32 {
    (row as i64 - origin_row as i64) as i32 * TILE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mapping() {
        assert_eq!(column_to_x(0), 0);
        assert_eq!(column_to_x(9), 180);
        assert_eq!(x_to_column(0), 0);
        assert_eq!(x_to_column(19), 0);
        assert_eq!(x_to_column(20), 1);
        assert_eq!(x_to_column(-1), -1);
    }

    #[test]
    fn test_row_offset() {
        assert_eq!(row_offset(5, 5), 0);
        assert_eq!(row_offset(7, 5), 40);
        assert_eq!(row_offset(3, 5), -40);
    }
}
