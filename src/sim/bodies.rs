//! Body types
//!
//! Collision math is kind-agnostic and lives in `collision`. What differs
//! per kind (player control, spike triggers, bomb timing, mover drift) is
//! implemented here on each struct.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::autotile::{NeighborMask, TileTexture};
use super::collision::{Collider, CollisionResult, ground_beneath, resolve};
use super::rect::Rect;
use super::tick::TickInput;
use crate::config::SimConfig;
use crate::consts::*;

/// Stable id, unique for the lifetime of a run
pub type BodyId = u32;

/// What a body is, for lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Player,
    Platform,
    Spike,
    Bomb,
    Butterfly,
    Pickup,
}

/// Cardinal directions, in texture-key order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub fn letter(&self) -> char {
        match self {
            Direction::N => 'N',
            Direction::E => 'E',
            Direction::S => 'S',
            Direction::W => 'W',
        }
    }

    /// Unit step pointing out of a tile face, in screen space (y down)
    pub fn outward(&self) -> (i32, i32) {
        match self {
            Direction::N => (0, -1),
            Direction::E => (1, 0),
            Direction::S => (0, 1),
            Direction::W => (-1, 0),
        }
    }

    /// Does `vel` carry a component into a face that points this way?
    pub fn is_approached_by(&self, vel: Vec2) -> bool {
        let (ox, oy) = self.outward();
        ox as f32 * vel.x + oy as f32 * vel.y < 0.0
    }
}

/// Grid position of a platform. `row` is the global row index, which never
/// changes when the world scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub column: i32,
    pub row: u64,
}

impl TileCoord {
    pub fn new(column: i32, row: u64) -> Self {
        Self { column, row }
    }
}

/// Bodies that move with the world when it scrolls
pub trait Scrolls {
    /// Move up by `overflow` pixels
    fn scroll(&mut self, overflow: i32);
    /// Bounding box used for retirement
    fn bounds(&self) -> Rect;

    /// Fully above the visible origin
    fn scrolled_off(&self) -> bool {
        self.bounds().bottom() < 0
    }
}

/// A solid tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: BodyId,
    pub coord: TileCoord,
    pub rect: Rect,
    /// Set once by the autotiler; guards against re-texturing
    pub textured: bool,
    pub neighbors: Option<NeighborMask>,
    pub texture: Option<TileTexture>,
}

impl Platform {
    pub fn new(id: BodyId, coord: TileCoord, y: i32) -> Self {
        Self {
            id,
            coord,
            rect: Rect::new(crate::column_to_x(coord.column), y, TILE, TILE),
            textured: false,
            neighbors: None,
            texture: None,
        }
    }
}

impl Scrolls for Platform {
    fn scroll(&mut self, overflow: i32) {
        self.rect.y -= overflow;
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Animation the renderer should show for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerPose {
    #[default]
    Standing,
    Running,
    Jumping,
    Falling,
}

/// Outcome of one player movement step
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerStep {
    pub collision: CollisionResult,
    pub jumped: bool,
}

/// The controllable cat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: BodyId,
    pub pos: Vec2,
    /// Collision box, narrower than the sprite
    pub hitbox: Rect,
    pub vel: Vec2,
    pub grounded: bool,
    pub pose: PlayerPose,
    pub facing_left: bool,
    /// Displacement requested this tick, before clamping. Spikes test
    /// against this, since landing zeroes `vel`.
    pub last_motion: Vec2,
}

impl Player {
    pub fn new(id: BodyId, x: i32, y: i32) -> Self {
        Self {
            id,
            pos: Vec2::new(x as f32, y as f32),
            hitbox: Rect::new(x, y, PLAYER_HITBOX_W, PLAYER_HITBOX_H),
            vel: Vec2::ZERO,
            grounded: false,
            pose: PlayerPose::Falling,
            facing_left: false,
            last_motion: Vec2::ZERO,
        }
    }

    /// Top-left corner of the sprite, offset from the hitbox
    pub fn sprite_origin(&self) -> (i32, i32) {
        (
            self.hitbox.x - PLAYER_SPRITE_OFFSET.0,
            self.hitbox.y - PLAYER_SPRITE_OFFSET.1,
        )
    }

    pub fn sprite_rect(&self) -> Rect {
        let (x, y) = self.sprite_origin();
        Rect::new(x, y, PLAYER_SPRITE_W, PLAYER_SPRITE_H)
    }

    /// Apply one tick of input, gravity and collision
    pub fn step(
        &mut self,
        input: &TickInput,
        config: &SimConfig,
        obstacles: &[Rect],
    ) -> PlayerStep {
        let mut step = PlayerStep::default();

        self.vel.y += config.gravity;
        if input.down {
            self.vel.y += config.drop_accel;
        }
        self.vel.y = self.vel.y.min(config.max_fall_speed);

        self.vel.x = 0.0;
        if input.right {
            self.vel.x += config.run_speed;
        }
        if input.left {
            self.vel.x -= config.run_speed;
        }
        if self.vel.x < 0.0 {
            self.facing_left = true;
        } else if self.vel.x > 0.0 {
            self.facing_left = false;
        }

        if input.up {
            if self.grounded {
                self.grounded = false;
                self.vel.y = -config.jump_speed;
                step.jumped = true;
            } else if self.vel.y < 0.0 {
                // Holding jump while rising goes higher
                self.vel.y -= config.jump_hold_boost;
            }
        }

        self.last_motion = self.vel;
        step.collision = resolve(self, self.vel, obstacles);

        if step.collision.bottom {
            self.grounded = true;
            self.vel.y = 0.0;
        } else {
            self.grounded = false;
        }
        if step.collision.top {
            self.vel.y = 0.0;
        }

        self.pose = self.pick_pose(ground_beneath(self.hitbox, obstacles));
        step
    }

    fn pick_pose(&self, on_ground: bool) -> PlayerPose {
        if on_ground {
            if self.vel.x != 0.0 {
                PlayerPose::Running
            } else {
                PlayerPose::Standing
            }
        } else if self.vel.y < 0.0 {
            PlayerPose::Jumping
        } else {
            PlayerPose::Falling
        }
    }

    /// Clamp vertically to `y`, keeping position and hitbox together
    pub fn pin_y(&mut self, y: i32) {
        self.hitbox.y = y;
        self.pos.y = y as f32;
    }
}

impl Collider for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn hitbox(&self) -> Rect {
        self.hitbox
    }
    fn hitbox_mut(&mut self) -> &mut Rect {
        &mut self.hitbox
    }
}

/// A directional hazard stuck to one face of a tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spike {
    pub id: BodyId,
    /// Face of the tile the spike sits on
    pub direction: Direction,
    pub rect: Rect,
}

impl Spike {
    /// Spike placed just outside `direction`'s face of `tile`
    pub fn on_face(id: BodyId, tile: Rect, direction: Direction) -> Self {
        let rect = match direction {
            Direction::N => Rect::new(
                tile.left() + 2,
                tile.top() - SPIKE_SHORT,
                SPIKE_LONG,
                SPIKE_SHORT,
            ),
            Direction::E => Rect::new(tile.right(), tile.top() + 2, SPIKE_SHORT, SPIKE_LONG),
            Direction::S => Rect::new(tile.left() + 2, tile.bottom(), SPIKE_LONG, SPIKE_SHORT),
            Direction::W => Rect::new(
                tile.left() - SPIKE_SHORT,
                tile.top() + 2,
                SPIKE_SHORT,
                SPIKE_LONG,
            ),
        };
        Self { id, direction, rect }
    }

    /// Lethal only when touched while moving into the face it guards.
    /// Brushing past it, or moving away, is safe.
    pub fn triggered_by(&self, hitbox: Rect, motion: Vec2) -> bool {
        self.rect.intersects(&hitbox) && self.direction.is_approached_by(motion)
    }
}

impl Scrolls for Spike {
    fn scroll(&mut self, overflow: i32) {
        self.rect.y -= overflow;
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Bomb lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombPhase {
    Arming { ticks_left: u32 },
    Exploding { ticks_left: u32 },
    Expired,
}

/// A dropped bomb. Falls and lands like the player, then clears hazards
/// around it while exploding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: BodyId,
    pub pos: Vec2,
    pub hitbox: Rect,
    pub vy: f32,
    pub phase: BombPhase,
}

impl Bomb {
    pub fn new(id: BodyId, x: i32, y: i32, fuse_ticks: u32) -> Self {
        Self {
            id,
            pos: Vec2::new(x as f32, y as f32),
            hitbox: Rect::new(x, y, BOMB_SIZE, BOMB_SIZE),
            vy: 0.0,
            phase: BombPhase::Arming {
                ticks_left: fuse_ticks,
            },
        }
    }

    /// Area cleared while exploding
    pub fn blast_rect(&self, radius: i32) -> Rect {
        let (cx, cy) = self.hitbox.center();
        Rect::new(cx - radius, cy - radius, 2 * radius, 2 * radius)
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.phase, BombPhase::Exploding { .. })
    }

    /// Fall, then advance the fuse. Returns true on the tick the bomb
    /// starts exploding.
    pub fn step(&mut self, config: &SimConfig, obstacles: &[Rect]) -> bool {
        if !matches!(self.phase, BombPhase::Expired) {
            self.vy = (self.vy + config.gravity).min(config.max_fall_speed);
            let hit = resolve(self, Vec2::new(0.0, self.vy), obstacles);
            if hit.bottom || hit.top {
                self.vy = 0.0;
            }
        }

        match self.phase {
            BombPhase::Arming { ticks_left } if ticks_left > 1 => {
                self.phase = BombPhase::Arming {
                    ticks_left: ticks_left - 1,
                };
                false
            }
            BombPhase::Arming { .. } => {
                self.phase = BombPhase::Exploding {
                    ticks_left: config.blast_ticks.max(1),
                };
                true
            }
            BombPhase::Exploding { ticks_left } if ticks_left > 1 => {
                self.phase = BombPhase::Exploding {
                    ticks_left: ticks_left - 1,
                };
                false
            }
            BombPhase::Exploding { .. } | BombPhase::Expired => {
                self.phase = BombPhase::Expired;
                false
            }
        }
    }
}

impl Collider for Bomb {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn hitbox(&self) -> Rect {
        self.hitbox
    }
    fn hitbox_mut(&mut self) -> &mut Rect {
        &mut self.hitbox
    }
}

impl Scrolls for Bomb {
    fn scroll(&mut self, overflow: i32) {
        self.hitbox.y -= overflow;
        self.pos.y -= overflow as f32;
    }

    fn bounds(&self) -> Rect {
        self.hitbox
    }
}

/// Decorative mover. Never collides with terrain; catching one is lucky.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Butterfly {
    pub id: BodyId,
    pub pos: Vec2,
    pub hitbox: Rect,
    pub age: u32,
    /// Sway phase offset so flocks don't move in lockstep
    pub phase: f32,
}

impl Butterfly {
    pub fn new(id: BodyId, x: i32, y: i32, phase: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x as f32, y as f32),
            hitbox: Rect::new(x, y, BUTTERFLY_SIZE, BUTTERFLY_SIZE),
            age: 0,
            phase,
        }
    }

    /// Sway sideways and drift upward, staying inside the field
    pub fn step(&mut self, field_width: i32) {
        self.age += 1;
        let t = self.age as f32 * 0.08 + self.phase;
        self.pos.x += t.sin() * 0.7;
        self.pos.y -= 0.2 + (t * 2.0).cos().max(0.0) * 0.3;

        let max_x = (field_width - BUTTERFLY_SIZE) as f32;
        self.pos.x = self.pos.x.clamp(0.0, max_x.max(0.0));
        self.hitbox.x = self.pos.x as i32;
        self.hitbox.y = self.pos.y.floor() as i32;
    }
}

impl Scrolls for Butterfly {
    fn scroll(&mut self, overflow: i32) {
        self.hitbox.y -= overflow;
        self.pos.y -= overflow as f32;
    }

    fn bounds(&self) -> Rect {
        self.hitbox
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// One more bomb slot
    BombUpgrade,
}

/// A collectible resting on a tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: BodyId,
    pub kind: PickupKind,
    pub rect: Rect,
}

impl Scrolls for Pickup {
    fn scroll(&mut self, overflow: i32) {
        self.rect.y -= overflow;
    }

    fn bounds(&self) -> Rect {
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_under(x: i32, top: i32) -> Vec<Rect> {
        vec![Rect::new(x, top, TILE, TILE)]
    }

    #[test]
    fn test_direction_approach() {
        // Falling onto a north face
        assert!(Direction::N.is_approached_by(Vec2::new(0.0, 3.0)));
        assert!(!Direction::N.is_approached_by(Vec2::new(0.0, -3.0)));
        // Walking left into an east face
        assert!(Direction::E.is_approached_by(Vec2::new(-2.0, 0.0)));
        assert!(!Direction::E.is_approached_by(Vec2::new(2.0, 0.0)));
        assert!(Direction::S.is_approached_by(Vec2::new(0.0, -1.0)));
        assert!(Direction::W.is_approached_by(Vec2::new(1.0, 0.0)));
        // Sliding along a face is not approaching it
        assert!(!Direction::N.is_approached_by(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_spike_placement_outside_faces() {
        let tile = Rect::new(40, 100, TILE, TILE);
        for direction in Direction::ALL {
            let spike = Spike::on_face(1, tile, direction);
            assert!(!spike.rect.intersects(&tile), "{direction:?} spike overlaps its tile");
        }
        let north = Spike::on_face(1, tile, Direction::N);
        assert_eq!(north.rect.bottom(), tile.top());
        let west = Spike::on_face(1, tile, Direction::W);
        assert_eq!(west.rect.right(), tile.left());
    }

    #[test]
    fn test_spike_triggers_only_on_approach() {
        let tile = Rect::new(40, 100, TILE, TILE);
        let spike = Spike::on_face(1, tile, Direction::N);
        let touching = Rect::new(42, 80, PLAYER_HITBOX_W, PLAYER_HITBOX_H);

        assert!(spike.triggered_by(touching, Vec2::new(0.0, 2.0)));
        assert!(!spike.triggered_by(touching, Vec2::new(0.0, -4.0)));
        assert!(!spike.triggered_by(touching.offset(100, 0), Vec2::new(0.0, 2.0)));
    }

    #[test]
    fn test_player_rests_on_platform() {
        let config = SimConfig::default();
        let floor = floor_under(0, 40);
        // Hitbox bottom exactly on the platform top
        let mut player = Player::new(1, 4, 40 - PLAYER_HITBOX_H);
        player.grounded = true;

        let step = player.step(&TickInput::default(), &config, &floor);
        assert!(step.collision.bottom);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.grounded);
        assert_eq!(player.pose, PlayerPose::Standing);
        assert_eq!(player.hitbox.bottom(), 40);
    }

    #[test]
    fn test_player_jump_and_hold() {
        let config = SimConfig::default();
        let floor = floor_under(0, 40);
        let mut player = Player::new(1, 4, 40 - PLAYER_HITBOX_H);
        player.grounded = true;

        let jump = TickInput {
            up: true,
            ..Default::default()
        };
        let step = player.step(&jump, &config, &floor);
        assert!(step.jumped);
        assert!(!player.grounded);
        assert_eq!(player.pose, PlayerPose::Jumping);
        let rising = player.vel.y;
        assert!(rising < 0.0);

        // Holding up keeps pushing while rising
        player.step(&jump, &config, &floor);
        assert!(player.vel.y < rising + config.gravity);
    }

    #[test]
    fn test_player_runs_and_faces() {
        let config = SimConfig::default();
        let floor = vec![Rect::new(0, 40, 200, TILE)];
        let mut player = Player::new(1, 50, 40 - PLAYER_HITBOX_H);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        player.step(&left, &config, &floor);
        assert!(player.facing_left);
        assert_eq!(player.pose, PlayerPose::Running);
        assert_eq!(player.hitbox.x, 48);
    }

    #[test]
    fn test_sprite_offset_from_hitbox() {
        let player = Player::new(1, 30, 50);
        assert_eq!(player.sprite_origin(), (28, 48));
        assert_eq!(player.sprite_rect().w, PLAYER_SPRITE_W);
    }

    #[test]
    fn test_bomb_phases() {
        let config = SimConfig {
            bomb_fuse_ticks: 3,
            blast_ticks: 2,
            ..SimConfig::default()
        };
        let floor = floor_under(0, 40);
        let mut bomb = Bomb::new(1, 5, 30, config.bomb_fuse_ticks);

        assert!(!bomb.step(&config, &floor));
        assert!(!bomb.step(&config, &floor));
        assert!(bomb.step(&config, &floor));
        assert!(bomb.is_exploding());
        assert!(!bomb.step(&config, &floor));
        assert!(bomb.is_exploding());
        bomb.step(&config, &floor);
        assert_eq!(bomb.phase, BombPhase::Expired);
        // Landed on the floor
        assert_eq!(bomb.hitbox.bottom(), 40);
    }

    #[test]
    fn test_blast_rect_centered() {
        let bomb = Bomb::new(1, 100, 100, 60);
        let blast = bomb.blast_rect(30);
        assert_eq!(blast.center(), bomb.hitbox.center());
        assert_eq!(blast.w, 60);
    }

    #[test]
    fn test_butterfly_stays_in_field() {
        let mut butterfly = Butterfly::new(1, 0, 200, 0.0);
        for _ in 0..500 {
            butterfly.step(200);
            assert!(butterfly.hitbox.x >= 0);
            assert!(butterfly.hitbox.right() <= 200);
        }
        assert!(butterfly.pos.y < 200.0);
    }

    #[test]
    fn test_scroll_and_retire_predicate() {
        let mut platform = Platform::new(1, TileCoord::new(2, 0), 10);
        assert_eq!(platform.rect.x, 40);
        platform.scroll(25);
        assert_eq!(platform.rect.y, -15);
        assert!(!platform.scrolled_off());
        platform.scroll(6);
        assert!(platform.scrolled_off());
    }
}
