//! Play-area geometry
//!
//! The presentation layer hands the core an axis-aligned rectangle in its own
//! coordinate space (y may grow downward; nothing here cares). Balls are placed
//! inside it, kept off the edges and away from the HUD at its center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle the balls live in
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayArea {
    /// Top-left corner (minimum x and y)
    pub min: Vec2,
    /// Bottom-right corner (maximum x and y)
    pub max: Vec2,
}

impl PlayArea {
    /// Zero-area rectangle at the origin; spawning is a no-op until bounds are set
    pub const EMPTY: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle from an origin and a size (the usual layout-frame shape)
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// True when there is no room to place anything
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Geometric center (where the score/timer overlay sits)
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Shrink every edge by `margin`. Returns `None` if nothing is left.
    pub fn inset(&self, margin: f32) -> Option<Self> {
        let min = self.min + Vec2::splat(margin);
        let max = self.max - Vec2::splat(margin);
        if min.x > max.x || min.y > max.y || self.is_empty() {
            return None;
        }
        Some(Self { min, max })
    }

    /// Inset vertically only (the HUD bars above and below the field)
    pub fn inset_vertical(&self, margin: f32) -> Self {
        let min = Vec2::new(self.min.x, self.min.y + margin);
        let max = Vec2::new(self.max.x, (self.max.y - margin).max(min.y));
        Self { min, max }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}
