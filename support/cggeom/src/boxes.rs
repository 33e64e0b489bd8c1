use cgmath::{num_traits::NumCast, BaseNum, ElementWise, Point2, Vector2};

use super::{BoolArray, ElementWiseOp, ElementWisePartialOrd};

/// Represents an axis-aligned 2D box.
///
/// The box covers the half-open range `[min, min + extent)`. A box whose
/// extent has a negative component is *degenerate*; it's what
/// [`Box2::intersect`] returns for disjoint boxes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Box2<T> {
    /// The minimum coordinate (inclusive).
    pub min: Point2<T>,

    /// The size of the box.
    pub extent: Vector2<T>,
}

impl<T: BaseNum> Box2<T> {
    #[inline]
    pub fn new(min: Point2<T>, extent: Vector2<T>) -> Self {
        Self { min, extent }
    }

    /// Construct a box with the minimum coordinate at the origin.
    #[inline]
    pub fn from_extent(extent: Vector2<T>) -> Self {
        Self::new(Point2::new(T::zero(), T::zero()), extent)
    }

    /// Construct a box from its minimum (inclusive) and maximum (exclusive)
    /// coordinates.
    #[inline]
    pub fn from_min_max(min: Point2<T>, max: Point2<T>) -> Self {
        Self::new(min, max - min)
    }

    #[inline]
    pub fn zero() -> Self {
        Self::from_extent(Vector2::new(T::zero(), T::zero()))
    }

    /// The maximum coordinate (exclusive).
    #[inline]
    pub fn max(&self) -> Point2<T> {
        self.min + self.extent
    }

    #[inline]
    pub fn area(&self) -> T {
        self.extent.x * self.extent.y
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.extent.x < T::zero() || self.extent.y < T::zero()
    }

    /// Returns `true` if the box contains no points (this includes degenerate
    /// boxes).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent.x <= T::zero() || self.extent.y <= T::zero()
    }

    #[inline]
    pub fn contains_point(&self, point: &Point2<T>) -> bool {
        point.element_wise_ge(&self.min).all() && point.element_wise_lt(&self.max()).all()
    }

    /// Returns `true` if every point of `other` is inside `self`. An empty
    /// `other` is contained by anything.
    #[inline]
    pub fn contains_box(&self, other: &Self) -> bool {
        other.is_empty()
            || (other.min.element_wise_ge(&self.min).all()
                && other.max().element_wise_le(&self.max()).all())
    }

    /// Compute the intersection of two boxes.
    ///
    /// The result is degenerate (or empty) if the boxes don't overlap.
    #[inline]
    pub fn intersect(&self, other: &Self) -> Self {
        let min = self.min.element_wise_max(&other.min);
        let max = self.max().element_wise_min(&other.max());
        Self::from_min_max(min, max)
    }

    #[inline]
    pub fn translate(&self, displacement: Vector2<T>) -> Self {
        Self::new(self.min + displacement, self.extent)
    }

    /// Scale both corners of the box component by component. Used to convert
    /// a box measured in cells to one measured in pixels.
    #[inline]
    pub fn scale_element_wise(&self, k: Vector2<T>) -> Self {
        Self::new(
            self.min.mul_element_wise(Point2::new(k.x, k.y)),
            self.extent.mul_element_wise(k),
        )
    }
}

impl Box2<i32> {
    /// Iterate over every integral point in the box in row-major order.
    ///
    /// Yields nothing for an empty or degenerate box.
    pub fn positions(&self) -> Positions {
        Positions {
            min: self.min,
            extent: if self.is_empty() {
                Vector2::new(0, 0)
            } else {
                self.extent
            },
            next: 0,
        }
    }
}

/// The iterator returned by [`Box2::positions`].
#[derive(Debug, Clone)]
pub struct Positions {
    min: Point2<i32>,
    extent: Vector2<i32>,
    next: i32,
}

impl Iterator for Positions {
    type Item = Point2<i32>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.extent.x * self.extent.y {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(Point2::new(
            self.min.x + i % self.extent.x,
            self.min.y + i / self.extent.x,
        ))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.extent.x * self.extent.y - self.next) as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Positions {}

impl<S: NumCast + Copy> Box2<S> {
    /// Component-wise casting to another type
    #[inline]
    pub fn cast<T: NumCast>(&self) -> Option<Box2<T>> {
        let min = match self.min.cast() {
            Some(field) => field,
            None => return None,
        };
        let extent = match self.extent.cast() {
            Some(field) => field,
            None => return None,
        };
        Some(Box2 { min, extent })
    }
}

#[cfg(feature = "quickcheck")]
impl<T: quickcheck::Arbitrary + BaseNum> quickcheck::Arbitrary for Box2<T> {
    fn arbitrary<G: quickcheck::Gen>(g: &mut G) -> Self {
        Box2::new(
            Point2::new(T::arbitrary(g), T::arbitrary(g)),
            Vector2::new(T::arbitrary(g), T::arbitrary(g)),
        )
    }
}
