//! Pixel-space rectangles (prediction areas).

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Check if `other` lies completely inside this rectangle.
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Split into horizontal stripes.
    ///
    /// Returns `min(count, height)` stripes (at least one for a non-empty
    /// rectangle) that cover the rectangle exactly, top to bottom. Heights
    /// differ by at most one row; the extra rows go to the first stripes.
    pub fn split_rows(&self, count: usize) -> Vec<Rectangle> {
        if self.is_empty() {
            return Vec::new();
        }

        let count = count.clamp(1, self.height);
        let base = self.height / count;
        let extra = self.height % count;

        let mut stripes = Vec::with_capacity(count);
        let mut y = self.y;
        for i in 0..count {
            let rows = base + usize::from(i < extra);
            stripes.push(Rectangle::new(self.x, y, self.width, rows));
            y += rows;
        }
        stripes
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}
