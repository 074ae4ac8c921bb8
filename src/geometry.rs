//! Axis-aligned bounds over primitive vertices

use glam::Vec2;

/// Axis-aligned bounding box in primitive space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// The empty box; expands on the first point
    pub const EMPTY: Bounds = Bounds {
        min: Vec2::splat(f32::MAX),
        max: Vec2::splat(f32::MIN),
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Bounds {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest box containing every point
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut bounds = Bounds::EMPTY;
        for &p in points {
            bounds.expand_point(p);
        }
        bounds
    }

    /// Check if the box is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(self, other: Bounds) -> Bounds {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Closed-interval overlap on both axes, so touching edges count.
    /// Lines share pixels with whatever they touch.
    pub fn intersects(&self, other: &Bounds) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow every side by `amount`; empty boxes stay empty
    pub fn inflate(self, amount: f32) -> Bounds {
        if self.is_empty() {
            return self;
        }
        Bounds {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    pub fn width(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.max.x - self.min.x }
    }

    pub fn height(&self) -> f32 {
        if self.is_empty() { 0.0 } else { self.max.y - self.min.y }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}
