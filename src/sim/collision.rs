//! Axis-aligned collision detection
//!
//! Hitboxes are inset from sprite bounds by fixed margins (see `consts`) so
//! near misses read as misses on screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self {
            pos: self.pos + Vec2::new(dx, dy),
            size: (self.size - Vec2::new(2.0 * dx, 2.0 * dy)).max(Vec2::ZERO),
        }
    }
}

/// Strict overlap test; rectangles that only share an edge do not collide
#[inline]
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// True if `target` overlaps any rectangle in `others`
///
/// Equivalent to OR over the whole set; iteration stops at the first hit.
pub fn collides_any<'a, I>(target: &Rect, others: I) -> bool
where
    I: IntoIterator<Item = &'a Rect>,
{
    others.into_iter().any(|other| collides(target, other))
}
