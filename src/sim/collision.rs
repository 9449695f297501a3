//! Axis-aligned rectangle overlap
//!
//! Every entity in the field is a box, so this is the only collision test the
//! game needs. Touching edges do not count as a hit.

use glam::Vec2;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// True if the two rectangles share a non-zero area
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }
}

/// Check overlap between two rectangles.
///
/// All four comparisons are strict, so rectangles that only share an edge or
/// a corner are reported as not colliding.
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}
