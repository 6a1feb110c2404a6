//! Axis-aligned rectangles in the top-down (screen) convention
//!
//! `y` grows downward: `top()` is the smaller y, `bottom()` the larger.
//! Levels are authored bottom-up and converted exactly once with
//! [`Rect::from_bottom_up`]; nothing downstream converts again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Convert an authored `(x, y_bottom, w, h)` rectangle, where `y_bottom` is
    /// the distance from the floor of the world to the rectangle's bottom edge
    pub fn from_bottom_up(x: f32, y_bottom: f32, w: f32, h: f32, world_height: f32) -> Self {
        Self::new(x, world_height - y_bottom - h, w, h)
    }

    /// Square of edge `size` centred on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test; rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Penetration depth along x (only meaningful when overlapping)
    #[inline]
    pub fn overlap_x(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    /// Penetration depth along y (only meaningful when overlapping)
    #[inline]
    pub fn overlap_y(&self, other: &Rect) -> f32 {
        self.bottom().min(other.bottom()) - self.top().max(other.top())
    }

    /// True if the vertical extents overlap, ignoring x
    pub fn overlaps_band(&self, band_top: f32, band_bottom: f32) -> bool {
        self.top() < band_bottom && self.bottom() > band_top
    }
}
