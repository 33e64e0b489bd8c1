use cggeom::Box2;
use cgmath::{Point2, Vector2};

use super::Grid;

/// A [`Grid`] positioned in an outer coordinate space.
///
/// The cell at grid index `i` lives at the outer position `offset + i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OffsetGrid<T> {
    grid: Grid<T>,
    offset: Vector2<i32>,
}

impl<T> OffsetGrid<T> {
    pub fn new(grid: Grid<T>, offset: Vector2<i32>) -> Self {
        Self { grid, offset }
    }

    #[inline]
    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }

    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid<T> {
        &mut self.grid
    }

    pub fn into_grid(self) -> Grid<T> {
        self.grid
    }

    #[inline]
    pub fn offset(&self) -> Vector2<i32> {
        self.offset
    }

    /// The region covered in the outer coordinate space.
    #[inline]
    pub fn bounds(&self) -> Box2<i32> {
        self.grid.bounds().translate(self.offset)
    }

    /// Get the value at an outer position, or `None` if the position isn't
    /// covered by this grid.
    #[inline]
    pub fn get(&self, pos: Point2<i32>) -> Option<&T> {
        self.grid.checked_get(pos - self.offset)
    }

    #[inline]
    pub fn get_mut(&mut self, pos: Point2<i32>) -> Option<&mut T> {
        let index = pos - self.offset;
        if self.grid.bounds().contains_point(&index) {
            Some(self.grid.get_mut(index))
        } else {
            None
        }
    }

    /// Move the grid by `delta` in the outer space.
    pub fn translate(self, delta: Vector2<i32>) -> Self {
        Self {
            offset: self.offset + delta,
            grid: self.grid,
        }
    }

    /// Place the grid at a new offset without consuming it.
    pub fn set_offset(&mut self, offset: Vector2<i32>) {
        self.offset = offset;
    }

    /// Place the grid at a new offset.
    pub fn with_offset(self, offset: Vector2<i32>) -> Self {
        Self {
            offset,
            grid: self.grid,
        }
    }

    /// Write `other`'s values into `self` where the two grids overlap.
    ///
    /// For every outer position covered by both grids, the cell of `self` is
    /// replaced with `combine(old, new)`. Cells outside the overlap are left
    /// untouched. Returns the overlapping region, which is empty (possibly
    /// degenerate) if the grids don't meet.
    pub fn overlay_with<U>(
        &mut self,
        other: &OffsetGrid<U>,
        mut combine: impl FnMut(&T, &U) -> T,
    ) -> Box2<i32> {
        let overlap = self.bounds().intersect(&other.bounds());
        if overlap.is_empty() {
            return overlap;
        }
        debug_assert!(self.bounds().contains_box(&overlap));

        for pos in overlap.positions() {
            let index = pos - self.offset;
            let combined = combine(&self.grid[index], &other.grid[pos - other.offset]);
            self.grid[index] = combined;
        }

        overlap
    }
}
