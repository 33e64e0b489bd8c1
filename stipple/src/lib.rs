//! Two-color ordered dithering on a lattice of 8×8 patches.
//!
//! A shape is described by a [`Grid`](grid2d::Grid) of [`Symbol`](ab::Symbol)s
//! placed at an arbitrary pixel offset. [`tiling::tile_mask`] cuts it into
//! patches aligned to the 8-pixel lattice, each carrying a dither pattern and
//! two color slots. The resulting [`OffsetQuilt`](quilt::OffsetQuilt) is
//! merged over a background quilt and drawn onto a
//! [`PixelSurface`](render::PixelSurface).
//!
//! [`app::Session`] ties the pieces together for an interactive loop.
pub mod ab;
pub mod app;
pub mod background;
pub mod color;
pub mod dither;
pub mod patch;
pub mod pattern;
pub mod quilt;
pub mod render;
pub mod scene;
pub mod shape;
pub mod tiling;
pub mod worker;
