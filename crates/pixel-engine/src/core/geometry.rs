//! Integer pixel-grid geometry.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::Vec2;

/// A point on the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two points.
    pub fn distance(self, other: Self) -> i32 {
        let dx = other.x.saturating_sub(self.x).saturating_abs();
        let dy = other.y.saturating_sub(self.y).saturating_abs();
        dx.saturating_add(dy)
    }

    /// Component-wise add, `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self::new(self.x.checked_add(rhs.x)?, self.y.checked_add(rhs.y)?))
    }

    /// Component-wise scale, `None` on overflow.
    pub fn checked_mul(self, rhs: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_mul(rhs)?, self.y.checked_mul(rhs)?))
    }
}

// Operators saturate: sheet text can carry any i32, and a clamped point is
// still off-screen.

impl Add for PixelPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for PixelPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl Neg for PixelPoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

impl Mul<i32> for PixelPoint {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x.saturating_mul(rhs), self.y.saturating_mul(rhs))
    }
}

impl Mul<PixelPoint> for i32 {
    type Output = PixelPoint;

    fn mul(self, rhs: PixelPoint) -> PixelPoint {
        rhs * self
    }
}

/// Rounds each component to the nearest pixel.
impl From<Vec2> for PixelPoint {
    fn from(v: Vec2) -> Self {
        Self::new(v.x.round() as i32, v.y.round() as i32)
    }
}

impl From<PixelPoint> for Vec2 {
    fn from(p: PixelPoint) -> Self {
        Vec2::new(p.x as f32, p.y as f32)
    }
}

impl fmt::Display for PixelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub const fn new(left: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self { left, bottom, width, height }
    }

    pub fn x_min(&self) -> i32 {
        self.left
    }

    /// Inclusive right edge.
    pub fn x_max(&self) -> i32 {
        self.left.saturating_add(self.width).saturating_sub(1)
    }

    pub fn y_min(&self) -> i32 {
        self.bottom
    }

    /// Inclusive top edge.
    pub fn y_max(&self) -> i32 {
        self.bottom.saturating_add(self.height).saturating_sub(1)
    }

    /// Half-open containment: `[left, left+width) x [bottom, bottom+height)`.
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.left
            && point.x < self.left.saturating_add(self.width)
            && point.y >= self.bottom
            && point.y < self.bottom.saturating_add(self.height)
    }

    /// Inclusive-bound AABB overlap test.
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        other.x_max() >= self.x_min()
            && other.x_min() <= self.x_max()
            && other.y_max() >= self.y_min()
            && other.y_min() <= self.y_max()
    }
}

impl Add<PixelPoint> for PixelRect {
    type Output = Self;

    fn add(self, offset: PixelPoint) -> Self {
        Self::new(
            self.left.saturating_add(offset.x),
            self.bottom.saturating_add(offset.y),
            self.width,
            self.height,
        )
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.left, self.bottom, self.width, self.height)
    }
}
