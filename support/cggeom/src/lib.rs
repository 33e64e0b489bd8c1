//! A helper library for `cgmath`.
//!
//! Provides the axis-aligned box type and the element-wise helpers used by
//! the patch grids. Absolute locations are [`cgmath::Point2`] and
//! displacements are [`cgmath::Vector2`]; `cgmath` already refuses to add two
//! points, which is exactly the distinction the grids rely on.
pub extern crate cgmath;

mod boxes;
mod elementwise;

pub use self::boxes::*;
pub use self::elementwise::*;

/// The prelude.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{BoolArray, ElementWiseOp, ElementWisePartialOrd, VectorExt, ZipWith};
}
