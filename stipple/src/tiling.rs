//! Conversion of symbol masks into quilts.
use cggeom::prelude::*;
use cgmath::{ElementWise, EuclideanSpace, Point2, Vector2};
use grid2d::{Grid, OffsetGrid};
use log::trace;

use crate::{
    ab::Symbol,
    color::ColorSlot,
    patch::Patch,
    pattern::{Pattern, PATCH_EXTENT},
    quilt::{OffsetQuilt, Quilt},
};

/// How a mask at some pixel offset lines up with the patch lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// The offset of the first covering patch, measured in patches.
    pub patch_offset: Vector2<i32>,
    /// The distance from that patch's corner to the mask's corner, in
    /// `[0, 8)` along each axis.
    pub padding: Vector2<i32>,
    /// The number of patches needed to cover the mask.
    pub extent: Vector2<i32>,
}

/// Compute the [`Alignment`] of a mask of `mask_extent` pixels placed at
/// `offset`. An empty mask needs no patches.
pub fn align(offset: Vector2<i32>, mask_extent: Vector2<i32>) -> Alignment {
    let patch_offset = offset.zip_with(PATCH_EXTENT, i32::div_euclid);
    let padding = offset.zip_with(PATCH_EXTENT, i32::rem_euclid);
    let extent = if mask_extent.area() == 0 {
        Vector2::new(0, 0)
    } else {
        (mask_extent + padding).zip_with(PATCH_EXTENT, |x, k| (x + k - 1) / k)
    };
    Alignment {
        patch_offset,
        padding,
        extent,
    }
}

/// Build the quilt covering `mask`.
///
/// Patches are aligned to multiples of 8 in the mask's outer coordinate
/// space. Each patch's pattern is the part of `mask` inside its footprint;
/// pixels the mask doesn't cover count as [`Symbol::A`]. All patches get
/// the slots `color_a` and `color_b`.
pub fn tile_mask(
    mask: &OffsetGrid<Symbol>,
    color_a: ColorSlot,
    color_b: ColorSlot,
) -> OffsetQuilt {
    let alignment = align(mask.offset(), mask.grid().extent());
    trace!(
        "tile_mask: mask {:?} at {:?} -> {:?}",
        mask.grid().extent(),
        mask.offset(),
        alignment
    );

    let grid = Grid::from_fn(alignment.extent, |i| {
        let origin = Point2::from_vec(
            (alignment.patch_offset + i.to_vec()).mul_element_wise(PATCH_EXTENT),
        );
        let pattern = Pattern::from_fn(|local| {
            mask.get(origin + local.to_vec())
                .cloned()
                .unwrap_or_default()
        });
        Patch::from_slots(color_a, color_b, pattern)
    });

    Quilt::new(grid).with_offset(alignment.patch_offset)
}
