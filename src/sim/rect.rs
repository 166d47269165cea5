//! Integer axis-aligned rectangles
//!
//! Hitboxes live on the pixel grid. Edge setters move the rectangle without
//! resizing it, so `set_right(x)` leaves `right() == x`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    #[inline]
    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    #[inline]
    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    #[inline]
    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    /// Center point (rounded toward the origin)
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Strict overlap test. Rectangles that only share an edge do not
    /// intersect, so a body resting on a tile is not "inside" it.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Copy moved by (dx, dy)
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Copy grown by `amount` on every side
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.w + 2 * amount,
            self.h + 2 * amount,
        )
    }
}
