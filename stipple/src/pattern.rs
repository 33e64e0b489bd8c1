//! 8×8 dither patterns.
use cgmath::{Point2, Vector2};
use grid2d::Grid;
use quick_error::quick_error;
use std::fmt;

use crate::ab::Symbol;

/// The size of a patch in pixels.
pub const PATCH_EXTENT: Vector2<i32> = Vector2 { x: 8, y: 8 };

/// The number of cells in a patch.
pub const PATCH_AREA: u32 = 64;

quick_error! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PatternError {
        BadExtent { x: i32, y: i32 } {
            display("a pattern must be 8×8, got {}×{}", x, y)
        }
    }
}

/// An immutable 8×8 grid of [`Symbol`]s.
///
/// Stored as a bit mask; bit `y * 8 + x` is set iff the cell at `(x, y)` is
/// [`Symbol::B`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern {
    bits: u64,
}

#[inline]
fn bit_index(p: Point2<i32>) -> Option<u32> {
    if p.x >= 0 && p.y >= 0 && p.x < PATCH_EXTENT.x && p.y < PATCH_EXTENT.y {
        Some((p.y * PATCH_EXTENT.x + p.x) as u32)
    } else {
        None
    }
}

impl Pattern {
    pub const ALL_A: Self = Self { bits: 0 };
    pub const ALL_B: Self = Self { bits: !0 };

    /// Construct a `Pattern` by calling `f` for every cell in row-major
    /// order.
    pub fn from_fn(mut f: impl FnMut(Point2<i32>) -> Symbol) -> Self {
        let mut bits = 0u64;
        for y in 0..PATCH_EXTENT.y {
            for x in 0..PATCH_EXTENT.x {
                if f(Point2::new(x, y)) == Symbol::B {
                    bits |= 1 << (y * PATCH_EXTENT.x + x);
                }
            }
        }
        Self { bits }
    }

    pub fn from_grid(grid: &Grid<Symbol>) -> Result<Self, PatternError> {
        let extent = grid.extent();
        if extent != PATCH_EXTENT {
            return Err(PatternError::BadExtent {
                x: extent.x,
                y: extent.y,
            });
        }
        Ok(Self::from_fn(|p| grid[p]))
    }

    pub fn to_grid(&self) -> Grid<Symbol> {
        Grid::from_fn(PATCH_EXTENT, |p| self.at(p))
    }

    /// # Panics
    ///
    /// Panics if `p` is outside `[0, 8) × [0, 8)`.
    #[inline]
    pub fn at(&self, p: Point2<i32>) -> Symbol {
        match bit_index(p) {
            Some(i) if self.bits & (1 << i) != 0 => Symbol::B,
            Some(_) => Symbol::A,
            None => panic!("{:?} is outside the pattern", p),
        }
    }

    /// Count the cells equal to `symbol`.
    #[inline]
    pub fn count_of(&self, symbol: Symbol) -> u32 {
        match symbol {
            Symbol::A => self.bits.count_zeros(),
            Symbol::B => self.bits.count_ones(),
        }
    }

    /// The fraction of cells that are [`Symbol::B`].
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.count_of(Symbol::B) as f64 / PATCH_AREA as f64
    }

    /// Swap the two symbols.
    #[inline]
    pub fn inverted(&self) -> Self {
        Self { bits: !self.bits }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pattern(")?;
        for y in 0..PATCH_EXTENT.y {
            f.write_str("    ")?;
            for x in 0..PATCH_EXTENT.x {
                f.write_str(match self.at(Point2::new(x, y)) {
                    Symbol::A => ".",
                    Symbol::B => "X",
                })?;
            }
            writeln!(f)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec2;
    use quickcheck_macros::quickcheck;

    fn point2<T>(x: T, y: T) -> cgmath::Point2<T> {
        cgmath::Point2::new(x, y)
    }

    #[test]
    fn rejects_other_extents() {
        let grid = Grid::filled(vec2(8, 7), Symbol::A);
        assert_eq!(
            Pattern::from_grid(&grid),
            Err(PatternError::BadExtent { x: 8, y: 7 })
        );
    }

    #[test]
    fn lookup() {
        let pattern = Pattern::from_fn(|p| if p == point2(6, 2) { Symbol::B } else { Symbol::A });
        assert_eq!(pattern.at(point2(6, 2)), Symbol::B);
        assert_eq!(pattern.at(point2(2, 6)), Symbol::A);
        assert_eq!(pattern.count_of(Symbol::B), 1);
        assert_eq!(pattern.count_of(Symbol::A), 63);
    }

    #[test]
    #[should_panic]
    fn lookup_outside_panics() {
        Pattern::ALL_A.at(point2(8, 0));
    }

    #[test]
    fn constants() {
        assert_eq!(Pattern::ALL_B.count_of(Symbol::B), 64);
        assert_eq!(Pattern::ALL_A.inverted(), Pattern::ALL_B);
        assert_eq!(Pattern::ALL_B.ratio(), 1.0);
    }

    #[quickcheck]
    fn grid_conversion_preserves_cells(bits: u64) -> bool {
        let pattern = Pattern { bits };
        Pattern::from_grid(&pattern.to_grid()) == Ok(pattern)
            && pattern.count_of(Symbol::A) + pattern.count_of(Symbol::B) == PATCH_AREA
    }
}
