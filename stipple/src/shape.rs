//! Mask generators.
use cggeom::prelude::*;
use cgmath::{Point2, Vector2};
use grid2d::Grid;
use std::{fmt, str::FromStr};

use crate::{ab::Symbol, pattern::PATCH_EXTENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Square,
    /// The lower-left half of the square, diagonal included.
    Triangle,
    Circle,
    /// A circle with its middle cut out, leaving a band about one and a half
    /// patch diagonals wide.
    Ring,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Square, Shape::Triangle, Shape::Circle, Shape::Ring];

    /// Generate a `dim × dim` mask. Cells inside the shape are `on`, the rest
    /// are `on.flip()`.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is negative.
    pub fn generate(self, dim: i32, on: Symbol) -> Grid<Symbol> {
        let outer = dim as f64 / 2.0;
        let center = Vector2::new(outer, outer);
        let inner = (outer - 1.5 * PATCH_EXTENT.magnitude_f64()).max(0.0);

        let inside = |p: Point2<i32>| -> bool {
            let distance_sq = || {
                let d = Vector2::new(p.x as f64, p.y as f64) - center;
                d.x * d.x + d.y * d.y
            };
            match self {
                Shape::Square => true,
                Shape::Triangle => p.x <= p.y,
                Shape::Circle => distance_sq() <= outer * outer,
                Shape::Ring => {
                    let d = distance_sq();
                    inner * inner <= d && d <= outer * outer
                }
            }
        };

        Grid::from_fn(Vector2::new(dim, dim), |p| {
            if inside(p) {
                on
            } else {
                on.flip()
            }
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Triangle => "triangle",
            Shape::Circle => "circle",
            Shape::Ring => "ring",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShape(pub String);

impl fmt::Display for UnknownShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shape: '{}'", self.0)
    }
}

impl std::error::Error for UnknownShape {}

impl FromStr for Shape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .cloned()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| UnknownShape(s.to_owned()))
    }
}
