use cgmath::{num_traits::NumCast, BaseNum, Point2, Vector2};
use std::cmp::Ordering;

pub trait BoolArray {
    fn any(&self) -> bool;
    fn all(&self) -> bool;
}

pub trait ElementWiseOp {
    fn element_wise_min(&self, rhs: &Self) -> Self;
    fn element_wise_max(&self, rhs: &Self) -> Self;
}

pub trait ElementWisePartialOrd {
    type Bool: BoolArray;
    fn element_wise_gt(&self, rhs: &Self) -> Self::Bool;
    fn element_wise_lt(&self, rhs: &Self) -> Self::Bool;
    fn element_wise_ge(&self, rhs: &Self) -> Self::Bool;
    fn element_wise_le(&self, rhs: &Self) -> Self::Bool;
}

/// Combines two values of the same shape component by component.
pub trait ZipWith<T> {
    fn zip_with(self, rhs: Self, f: impl FnMut(T, T) -> T) -> Self;
}

/// Extra operations on [`Vector2`] used when laying out grids.
pub trait VectorExt<T> {
    /// The product of the components, i.e., the number of cells covered by an
    /// extent.
    fn area(&self) -> T;

    /// Returns `true` if every component of `other` is a multiple of the
    /// corresponding component of `self`.
    ///
    /// A zero component in `self` divides nothing.
    fn divides(&self, other: &Self) -> bool;

    /// The Euclidean length, computed in `f64` regardless of `T`.
    fn magnitude_f64(&self) -> f64;
}

#[inline]
fn num_min<T: BaseNum>(x: T, y: T) -> T {
    match x.partial_cmp(&y) {
        None | Some(Ordering::Equal) | Some(Ordering::Less) => x,
        Some(Ordering::Greater) => y,
    }
}

#[inline]
fn num_max<T: BaseNum>(x: T, y: T) -> T {
    match x.partial_cmp(&y) {
        None | Some(Ordering::Equal) | Some(Ordering::Greater) => x,
        Some(Ordering::Less) => y,
    }
}

impl<T: BaseNum> ElementWiseOp for Point2<T> {
    fn element_wise_min(&self, rhs: &Self) -> Self {
        Self::new(num_min(self.x, rhs.x), num_min(self.y, rhs.y))
    }
    fn element_wise_max(&self, rhs: &Self) -> Self {
        Self::new(num_max(self.x, rhs.x), num_max(self.y, rhs.y))
    }
}

impl<T: BaseNum> ElementWiseOp for Vector2<T> {
    fn element_wise_min(&self, rhs: &Self) -> Self {
        Self::new(num_min(self.x, rhs.x), num_min(self.y, rhs.y))
    }
    fn element_wise_max(&self, rhs: &Self) -> Self {
        Self::new(num_max(self.x, rhs.x), num_max(self.y, rhs.y))
    }
}

impl<T: PartialOrd> ElementWisePartialOrd for Point2<T> {
    type Bool = [bool; 2];
    fn element_wise_gt(&self, rhs: &Self) -> Self::Bool {
        [self.x > rhs.x, self.y > rhs.y]
    }
    fn element_wise_lt(&self, rhs: &Self) -> Self::Bool {
        [self.x < rhs.x, self.y < rhs.y]
    }
    fn element_wise_ge(&self, rhs: &Self) -> Self::Bool {
        [self.x >= rhs.x, self.y >= rhs.y]
    }
    fn element_wise_le(&self, rhs: &Self) -> Self::Bool {
        [self.x <= rhs.x, self.y <= rhs.y]
    }
}

impl<T: PartialOrd> ElementWisePartialOrd for Vector2<T> {
    type Bool = [bool; 2];
    fn element_wise_gt(&self, rhs: &Self) -> Self::Bool {
        [self.x > rhs.x, self.y > rhs.y]
    }
    fn element_wise_lt(&self, rhs: &Self) -> Self::Bool {
        [self.x < rhs.x, self.y < rhs.y]
    }
    fn element_wise_ge(&self, rhs: &Self) -> Self::Bool {
        [self.x >= rhs.x, self.y >= rhs.y]
    }
    fn element_wise_le(&self, rhs: &Self) -> Self::Bool {
        [self.x <= rhs.x, self.y <= rhs.y]
    }
}

impl BoolArray for [bool; 2] {
    #[inline]
    fn any(&self) -> bool {
        self[0] || self[1]
    }
    #[inline]
    fn all(&self) -> bool {
        self[0] && self[1]
    }
}

impl<T: Copy> ZipWith<T> for Point2<T> {
    #[inline]
    fn zip_with(self, rhs: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Point2::new(f(self.x, rhs.x), f(self.y, rhs.y))
    }
}

impl<T: Copy> ZipWith<T> for Vector2<T> {
    #[inline]
    fn zip_with(self, rhs: Self, mut f: impl FnMut(T, T) -> T) -> Self {
        Vector2::new(f(self.x, rhs.x), f(self.y, rhs.y))
    }
}

impl<T: BaseNum> VectorExt<T> for Vector2<T> {
    #[inline]
    fn area(&self) -> T {
        self.x * self.y
    }

    #[inline]
    fn divides(&self, other: &Self) -> bool {
        if self.x == T::zero() || self.y == T::zero() {
            return false;
        }
        other.x % self.x == T::zero() && other.y % self.y == T::zero()
    }

    #[inline]
    fn magnitude_f64(&self) -> f64 {
        let x = <f64 as NumCast>::from(self.x).unwrap_or(std::f64::NAN);
        let y = <f64 as NumCast>::from(self.y).unwrap_or(std::f64::NAN);
        (x * x + y * y).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec2;

    #[test]
    fn all_checks_both_lanes() {
        assert!([true, true].all());
        assert!(![false, true].all());
        assert!(![true, false].all());
        assert!([false, true].any());
    }

    #[test]
    fn divides() {
        let patch = vec2(8, 8);
        assert!(patch.divides(&vec2(16, 24)));
        assert!(patch.divides(&vec2(0, -8)));
        assert!(!patch.divides(&vec2(16, 3)));
        assert!(!vec2(0, 8).divides(&vec2(0, 8)));
        assert!(vec2(2.5, 0.5).divides(&vec2(5.0, 1.5)));
    }

    #[test]
    fn zip_and_area() {
        let v = vec2(3, 7).zip_with(vec2(5, 2), i32::max);
        assert_eq!(v, vec2(5, 7));
        assert_eq!(v.area(), 35);
        assert_eq!(vec2(3, 4).magnitude_f64(), 5.0);
    }
}
