//! Dense two-dimensional storage.
//!
//! [`Grid`] maps every integral point of `[0, extent.x) × [0, extent.y)` to a
//! value and is strict about its bounds: an out-of-range index is a bug and
//! panics. [`OffsetGrid`] places a grid somewhere in an outer coordinate space
//! and is lenient instead, answering `None` for points it doesn't cover.
use cggeom::Box2;
use cgmath::{Point2, Vector2};
use quick_error::quick_error;
use std::ops::{Index, IndexMut};

mod offset;

pub use self::offset::OffsetGrid;

quick_error! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum GridError {
        /// The rows of a nested array don't have the same length.
        Ragged { row: usize, len: usize, expected: usize } {
            display("row {} has {} cells, expected {}", row, len, expected)
        }
        /// The number of supplied cells doesn't match the extent.
        AreaMismatch { area: usize, len: usize } {
            display("extent covers {} cells, but {} were supplied", area, len)
        }
        /// The extent has a negative component.
        NegativeExtent { x: i32, y: i32 } {
            display("negative extent ({}, {})", x, y)
        }
    }
}

/// A dense row-major grid.
///
/// Invariant: `extent.x * extent.y == cells.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    extent: Vector2<i32>,
    cells: Vec<T>,
}

fn check_extent(extent: Vector2<i32>) -> Result<usize, GridError> {
    if extent.x < 0 || extent.y < 0 {
        Err(GridError::NegativeExtent {
            x: extent.x,
            y: extent.y,
        })
    } else {
        Ok(extent.x as usize * extent.y as usize)
    }
}

impl<T> Grid<T> {
    /// Construct a `Grid` by calling `f` for every index in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `extent` has a negative component.
    pub fn from_fn(extent: Vector2<i32>, f: impl FnMut(Point2<i32>) -> T) -> Self {
        let area = check_extent(extent).unwrap_or_else(|e| panic!("{}", e));
        let mut cells = Vec::with_capacity(area);
        cells.extend(Box2::from_extent(extent).positions().map(f));
        Self { extent, cells }
    }

    /// Construct a `Grid` from cells laid out in row-major order.
    pub fn from_vec(extent: Vector2<i32>, cells: Vec<T>) -> Result<Self, GridError> {
        let area = check_extent(extent)?;
        if area != cells.len() {
            return Err(GridError::AreaMismatch {
                area,
                len: cells.len(),
            });
        }
        Ok(Self { extent, cells })
    }

    /// Construct a `Grid` from a nested array, one inner slice per row.
    ///
    /// Every row must have the same length. An empty `rows` produces an
    /// empty grid.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, GridError>
    where
        T: Clone,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: i,
                    len: row.len(),
                    expected: width,
                });
            }
            cells.extend_from_slice(row);
        }
        Self::from_vec(Vector2::new(width as i32, rows.len() as i32), cells)
    }

    #[inline]
    pub fn extent(&self) -> Vector2<i32> {
        self.extent
    }

    /// The number of cells.
    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// The box of valid indices.
    #[inline]
    pub fn bounds(&self) -> Box2<i32> {
        Box2::from_extent(self.extent)
    }

    #[inline]
    fn linearize(&self, index: Point2<i32>) -> Option<usize> {
        if index.x >= 0 && index.y >= 0 && index.x < self.extent.x && index.y < self.extent.y {
            Some(index.y as usize * self.extent.x as usize + index.x as usize)
        } else {
            None
        }
    }

    #[inline]
    fn linearize_or_panic(&self, index: Point2<i32>) -> usize {
        match self.linearize(index) {
            Some(i) => i,
            None => panic!(
                "index {:?} is out of range for a grid of extent {:?}",
                index, self.extent
            ),
        }
    }

    /// Get a reference to the cell at `index`, or `None` if it's outside the
    /// grid.
    #[inline]
    pub fn checked_get(&self, index: Point2<i32>) -> Option<&T> {
        self.linearize(index).map(|i| &self.cells[i])
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    #[inline]
    pub fn get(&self, index: Point2<i32>) -> &T {
        &self.cells[self.linearize_or_panic(index)]
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    #[inline]
    pub fn get_mut(&mut self, index: Point2<i32>) -> &mut T {
        let i = self.linearize_or_panic(index);
        &mut self.cells[i]
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    #[inline]
    pub fn set(&mut self, index: Point2<i32>, value: T) {
        *self.get_mut(index) = value;
    }

    /// Iterate over `(index, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point2<i32>, &T)> + '_ {
        self.bounds().positions().zip(self.cells.iter())
    }

    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Point2<i32>, &T) -> U) -> Grid<U> {
        Grid {
            extent: self.extent,
            cells: self.iter().map(|(i, x)| f(i, x)).collect(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }
}

impl<T: Clone> Grid<T> {
    /// Construct a `Grid` with every cell set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `extent` has a negative component.
    pub fn filled(extent: Vector2<i32>, value: T) -> Self {
        let area = check_extent(extent).unwrap_or_else(|e| panic!("{}", e));
        Self {
            extent,
            cells: vec![value; area],
        }
    }
}

impl<T> Index<Point2<i32>> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: Point2<i32>) -> &T {
        self.get(index)
    }
}

impl<T> IndexMut<Point2<i32>> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, index: Point2<i32>) -> &mut T {
        self.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec2;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn point2<T>(x: T, y: T) -> cgmath::Point2<T> {
        cgmath::Point2::new(x, y)
    }

    #[test]
    fn from_rows() {
        let grid = Grid::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(grid.extent(), vec2(3, 2));
        assert_eq!(grid[point2(0, 1)], 4);
        assert_eq!(grid[point2(2, 0)], 3);
    }

    #[test]
    fn from_rows_ragged() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 2], vec![3]];
        assert_eq!(
            Grid::from_rows(&rows),
            Err(GridError::Ragged {
                row: 1,
                len: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn from_rows_empty() {
        let rows: Vec<Vec<u8>> = vec![];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.area(), 0);
        assert_eq!(grid.extent(), vec2(0, 0));
    }

    #[test]
    fn from_vec_area_mismatch() {
        assert_eq!(
            Grid::from_vec(vec2(2, 2), vec![0; 3]),
            Err(GridError::AreaMismatch { area: 4, len: 3 })
        );
        assert_eq!(
            Grid::from_vec(vec2(-1, 2), Vec::<u8>::new()),
            Err(GridError::NegativeExtent { x: -1, y: 2 })
        );
    }

    #[test]
    #[should_panic]
    fn index_past_extent_panics() {
        let grid = Grid::filled(vec2(4, 4), 0u8);
        let _ = grid[point2(4, 0)];
    }

    #[test]
    #[should_panic]
    fn negative_index_panics() {
        let mut grid = Grid::filled(vec2(4, 4), 0u8);
        grid.set(point2(0, -1), 1);
    }

    #[test]
    fn checked_get() {
        let grid = Grid::filled(vec2(2, 3), 'x');
        assert_eq!(grid.checked_get(point2(1, 2)), Some(&'x'));
        assert_eq!(grid.checked_get(point2(2, 2)), None);
    }

    #[quickcheck]
    fn from_fn_matches_initializer(w: u8, h: u8) -> TestResult {
        if w > 64 || h > 64 {
            return TestResult::discard();
        }
        let f = |p: Point2<i32>| p.x * 1000 + p.y;
        let grid = Grid::from_fn(vec2(w as i32, h as i32), f);
        if grid.area() != w as usize * h as usize {
            return TestResult::failed();
        }
        let ok = grid.iter().all(|(p, &v)| v == f(p) && grid[p] == v);
        TestResult::from_bool(ok)
    }
}
