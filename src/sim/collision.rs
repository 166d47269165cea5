//! Axis-separated collision against static tiles
//!
//! Bodies keep a float position for sub-pixel motion and an integer hitbox
//! derived from it. Movement is resolved one axis at a time, horizontal
//! first, so a body moving diagonally past a ledge corner slides along it
//! instead of snagging.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Which sides registered a blocking contact during one `resolve` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionResult {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

/// Anything with a float position and a hitbox that follows it
///
/// The hitbox origin tracks the position to within one pixel. Implementors
/// keep them in sync; `resolve` writes both.
pub trait Collider {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn hitbox(&self) -> Rect;
    fn hitbox_mut(&mut self) -> &mut Rect;
}

/// Move `body` by `delta`, clamping against `obstacles`
///
/// Per axis: apply the delta, snap the hitbox, collect every obstacle the
/// hitbox now overlaps, and push the hitbox back out against the direction of travel.
/// The float position is re-derived from the hitbox after each clamp. With
/// grid-aligned, non-overlapping obstacles all hits on one axis share the
/// same edge, so the last write wins harmlessly.
pub fn resolve<B: Collider + ?Sized>(
    body: &mut B,
    delta: Vec2,
    obstacles: &[Rect],
) -> CollisionResult {
    let mut result = CollisionResult::default();

    // Horizontal
    let mut pos = body.position();
    pos.x += delta.x;
    let x = snap(pos.x, delta.x, body.hitbox().x);
    body.hitbox_mut().x = x;
    body.set_position(pos);

    for wall in overlapping(body.hitbox(), obstacles) {
        let hitbox = body.hitbox_mut();
        if delta.x > 0.0 {
            hitbox.set_right(wall.left());
            result.right = true;
        } else if delta.x < 0.0 {
            hitbox.set_left(wall.right());
            result.left = true;
        }
        let x = hitbox.x as f32;
        body.set_position(Vec2::new(x, body.position().y));
    }

    // Vertical
    let mut pos = body.position();
    pos.y += delta.y;
    let y = snap(pos.y, delta.y, body.hitbox().y);
    body.hitbox_mut().y = y;
    body.set_position(pos);

    for wall in overlapping(body.hitbox(), obstacles) {
        let hitbox = body.hitbox_mut();
        if delta.y > 0.0 {
            hitbox.set_bottom(wall.top());
            result.bottom = true;
        } else if delta.y < 0.0 {
            hitbox.set_top(wall.bottom());
            result.top = true;
        }
        let y = hitbox.y as f32;
        body.set_position(Vec2::new(body.position().x, y));
    }

    result
}

/// Pixel coordinate for a float position after moving by `delta`
///
/// Rounds toward the direction of travel, so any sub-pixel push into a
/// touching tile registers as contact. A body resting on a floor reports
/// `bottom` every tick instead of every other tick.
#[inline]
fn snap(value: f32, delta: f32, current: i32) -> i32 {
    if delta > 0.0 {
        value.ceil() as i32
    } else if delta < 0.0 {
        value.floor() as i32
    } else {
        current
    }
}

/// Obstacles overlapping `hitbox`, snapshotted before any clamp
fn overlapping(hitbox: Rect, obstacles: &[Rect]) -> Vec<Rect> {
    obstacles
        .iter()
        .filter(|wall| wall.intersects(&hitbox))
        .copied()
        .collect()
}

/// Is there something solid directly under `hitbox`?
///
/// Probes one pixel down without moving anything. Catches the case where a
/// body walked off a ledge this tick and no vertical contact was reported.
pub fn ground_beneath(hitbox: Rect, obstacles: &[Rect]) -> bool {
    let probe = hitbox.offset(0, 1);
    obstacles.iter().any(|wall| wall.intersects(&probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE;
    use proptest::prelude::*;

    /// Minimal body for exercising the resolver
    #[derive(Debug, Clone)]
    struct Probe {
        pos: Vec2,
        hitbox: Rect,
    }

    impl Probe {
        fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
            Self {
                pos: Vec2::new(x as f32, y as f32),
                hitbox: Rect::new(x, y, w, h),
            }
        }
    }

    impl Collider for Probe {
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

    fn tile(column: i32, row: i32) -> Rect {
        Rect::new(column * TILE, row * TILE, TILE, TILE)
    }

    #[test]
    fn test_no_obstacles_moves_freely() {
        let mut body = Probe::new(10, 10, 12, 22);
        let result = resolve(&mut body, Vec2::new(2.5, 3.75), &[]);
        assert!(!result.any());
        assert_eq!(body.pos, Vec2::new(12.5, 13.75));
        // Hitbox rounds toward the direction of travel
        assert_eq!((body.hitbox.x, body.hitbox.y), (13, 14));
    }

    #[test]
    fn test_lands_on_floor() {
        // Resting exactly on top of the tile below
        let mut body = Probe::new(4, 18, 12, 22);
        let floor = [tile(0, 2)];
        let result = resolve(&mut body, Vec2::new(0.0, 0.35), &floor);
        assert!(result.bottom);
        assert!(!result.top && !result.horizontal());
        assert_eq!(body.hitbox.bottom(), 40);
        assert_eq!(body.pos.y, 18.0);
    }

    #[test]
    fn test_wall_clamps_right_and_left() {
        let wall = [tile(2, 0)];
        let mut body = Probe::new(26, 0, 12, 12);
        let result = resolve(&mut body, Vec2::new(4.0, 0.0), &wall);
        assert!(result.right);
        assert_eq!(body.hitbox.right(), 40);
        assert_eq!(body.pos.x, 28.0);

        let mut body = Probe::new(62, 0, 12, 12);
        let result = resolve(&mut body, Vec2::new(-4.0, 0.0), &wall);
        assert!(result.left);
        assert_eq!(body.hitbox.left(), 60);
    }

    #[test]
    fn test_ceiling_flags_top() {
        let ceiling = [tile(0, 0)];
        let mut body = Probe::new(2, 22, 12, 12);
        let result = resolve(&mut body, Vec2::new(0.0, -4.0), &ceiling);
        assert!(result.top);
        assert_eq!(body.hitbox.top(), 20);
    }

    #[test]
    fn test_horizontal_resolves_before_vertical() {
        // Concave corner: wall on the right, floor below.
        // Moving down-right into both, the wall is met on the x pass and the
        // floor on the y pass; each axis reports its own obstacle once.
        let corner = [tile(2, 1), tile(0, 2), tile(1, 2)];
        let mut body = Probe::new(26, 26, 12, 12);
        let result = resolve(&mut body, Vec2::new(4.0, 4.0), &corner);
        assert!(result.right);
        assert!(result.bottom);
        assert_eq!(body.hitbox.right(), 40);
        assert_eq!(body.hitbox.bottom(), 40);

        // Diagonal onto an outside ledge corner. The x pass happens while the
        // body is still above the ledge, so it lands on top rather than
        // catching the ledge's side.
        let ledge = [tile(1, 2)];
        let mut body = Probe::new(6, 26, 12, 12);
        let result = resolve(&mut body, Vec2::new(3.0, 4.0), &ledge);
        assert!(!result.horizontal());
        assert!(result.bottom);
        assert_eq!(body.hitbox.x, 9);
        assert_eq!(body.hitbox.bottom(), 40);
    }

    #[test]
    fn test_ground_beneath() {
        let floor = [tile(0, 2)];
        let standing = Rect::new(4, 18, 12, 22);
        assert!(ground_beneath(standing, &floor));
        assert!(!ground_beneath(standing.offset(0, -1), &floor));
        assert!(!ground_beneath(standing.offset(25, 0), &floor));
    }

    fn arb_cells() -> impl Strategy<Value = Vec<(i32, i32)>> {
        proptest::collection::hash_set((0i32..6, 0i32..6), 0..14)
            .prop_map(|cells| cells.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_resolved_hitbox_never_overlaps(
            cells in arb_cells(),
            x in 0i32..100,
            y in 0i32..100,
            w in 4i32..=20,
            h in 4i32..=20,
            dx in -9.5f32..9.5,
            dy in -9.5f32..9.5,
        ) {
            let obstacles: Vec<Rect> = cells.iter().map(|&(c, r)| tile(c, r)).collect();
            let start = Rect::new(x, y, w, h);
            prop_assume!(!obstacles.iter().any(|o| o.intersects(&start)));

            let mut body = Probe::new(x, y, w, h);
            let result = resolve(&mut body, Vec2::new(dx, dy), &obstacles);

            for o in &obstacles {
                prop_assert!(
                    !o.intersects(&body.hitbox),
                    "overlap {:?} vs {:?} ({:?})",
                    body.hitbox,
                    o,
                    result
                );
            }
            prop_assert!(!(result.left && result.right));
            prop_assert!(!(result.top && result.bottom));
            prop_assert!((body.pos.x - body.hitbox.x as f32).abs() < 1.0);
            prop_assert!((body.pos.y - body.hitbox.y as f32).abs() < 1.0);
        }
    }
}
