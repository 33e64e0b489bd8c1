//! Grids of patches.
use cggeom::Box2;
use cgmath::{ElementWise, EuclideanSpace, Vector2};
use grid2d::{Grid, OffsetGrid};
use log::trace;

use crate::{
    patch::Patch,
    pattern::PATCH_EXTENT,
    render::{Render, RenderContext, Transform},
};

/// A rectangular grid of [`Patch`]es. Cell `(x, y)` covers the pixels
/// `[8x, 8x + 8) × [8y, 8y + 8)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quilt {
    grid: Grid<Patch>,
}

impl Quilt {
    pub fn new(grid: Grid<Patch>) -> Self {
        Self { grid }
    }

    /// Construct a quilt with every patch set to `patch`.
    pub fn filled(extent: Vector2<i32>, patch: Patch) -> Self {
        Self::new(Grid::filled(extent, patch))
    }

    #[inline]
    pub fn grid(&self) -> &Grid<Patch> {
        &self.grid
    }

    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid<Patch> {
        &mut self.grid
    }

    pub fn into_grid(self) -> Grid<Patch> {
        self.grid
    }

    /// The extent measured in patches.
    #[inline]
    pub fn extent(&self) -> Vector2<i32> {
        self.grid.extent()
    }

    /// The extent measured in pixels.
    #[inline]
    pub fn pixel_extent(&self) -> Vector2<i32> {
        self.extent().mul_element_wise(PATCH_EXTENT)
    }

    /// Re-dither every patch with the table pattern nearest to its coverage.
    /// Colors are kept.
    pub fn downscale(&self) -> Quilt {
        Quilt::new(self.grid.map(|_, patch| patch.downscale()))
    }

    pub fn with_offset(self, offset: Vector2<i32>) -> OffsetQuilt {
        OffsetQuilt::new(self, offset)
    }
}

impl Render for Quilt {
    fn render_to(&self, cx: &mut RenderContext<'_>, transform: Transform) {
        for (i, patch) in self.grid.iter() {
            let offset = i.to_vec().mul_element_wise(PATCH_EXTENT);
            patch.render_to(cx, Transform::translate_by(offset).then(transform));
        }
    }
}

/// A [`Quilt`] placed on the canvas. The offset is measured in patches, so
/// the patches always line up with the 8-pixel lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetQuilt {
    grid: OffsetGrid<Patch>,
}

impl OffsetQuilt {
    pub fn new(quilt: Quilt, offset: Vector2<i32>) -> Self {
        Self {
            grid: OffsetGrid::new(quilt.into_grid(), offset),
        }
    }

    #[inline]
    pub fn grid(&self) -> &OffsetGrid<Patch> {
        &self.grid
    }

    /// The offset measured in patches.
    #[inline]
    pub fn offset(&self) -> Vector2<i32> {
        self.grid.offset()
    }

    pub fn set_offset(&mut self, offset: Vector2<i32>) {
        self.grid.set_offset(offset);
    }

    /// The region covered, measured in patches.
    #[inline]
    pub fn bounds(&self) -> Box2<i32> {
        self.grid.bounds()
    }

    /// The region covered, measured in pixels.
    #[inline]
    pub fn pixel_bounds(&self) -> Box2<i32> {
        self.bounds().scale_element_wise(PATCH_EXTENT)
    }

    /// Drop the offset.
    pub fn into_quilt(self) -> Quilt {
        Quilt::new(self.grid.into_grid())
    }

    pub fn downscale(&self) -> OffsetQuilt {
        OffsetQuilt {
            grid: OffsetGrid::new(
                self.grid.grid().map(|_, patch| patch.downscale()),
                self.offset(),
            ),
        }
    }

    /// Merge `other` into `self` where they overlap, patch by patch, using
    /// [`Patch::merge`]. Patches of `other` outside `self` are discarded.
    ///
    /// Returns the overlap, measured in patches.
    pub fn overlay_with(&mut self, other: &OffsetQuilt) -> Box2<i32> {
        let overlap = self.grid.overlay_with(&other.grid, Patch::merge);
        trace!(
            "overlay: {:?} onto {:?}, overlap = {:?}",
            other.bounds(),
            self.bounds(),
            overlap
        );
        overlap
    }
}

impl Render for OffsetQuilt {
    fn render_to(&self, cx: &mut RenderContext<'_>, transform: Transform) {
        let offset = self.offset().mul_element_wise(PATCH_EXTENT);
        let quilt = self.grid.grid();
        for (i, patch) in quilt.iter() {
            let local = i.to_vec().mul_element_wise(PATCH_EXTENT);
            patch.render_to(
                cx,
                Transform::translate_by(local + offset).then(transform),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ab::Symbol,
        color::{colors, Color, ColorSlot, Palette},
        dither::bayer::Density,
        pattern::Pattern,
        render::{PixelSurface, SurfaceConfig},
    };
    use cgmath::vec2;
    use quickcheck_macros::quickcheck;
    use rgb::RGBA8;

    fn point2<T>(x: T, y: T) -> cgmath::Point2<T> {
        cgmath::Point2::new(x, y)
    }

    #[test]
    fn pixel_geometry() {
        let quilt = Quilt::filled(vec2(3, 2), Patch::BLACK).with_offset(vec2(-1, 4));
        assert_eq!(quilt.bounds(), Box2::new(point2(-1, 4), vec2(3, 2)));
        assert_eq!(quilt.pixel_bounds(), Box2::new(point2(-8, 32), vec2(24, 16)));
        assert_eq!(quilt.into_quilt().pixel_extent(), vec2(24, 16));
    }

    fn is_table_density(pattern: Pattern) -> bool {
        Density::from_count(pattern.count_of(Symbol::B)).is_some()
    }

    #[test]
    fn downscale_keeps_colors() {
        // Patch `i` has its first `13 * i.x + 7 * i.y` cells set to B
        let grid = Grid::from_fn(vec2(5, 3), |i| {
            let k = (13 * i.x + 7 * i.y).min(64);
            let pattern = Pattern::from_fn(|p| {
                if p.y * 8 + p.x < k {
                    Symbol::B
                } else {
                    Symbol::A
                }
            });
            Patch::with_pattern(Color::Indexed(i.x as usize), Color::Indexed(7), pattern)
        });
        let quilt = Quilt::new(grid);
        let downscaled = quilt.downscale();

        assert_eq!(downscaled.extent(), quilt.extent());
        for (i, patch) in downscaled.grid().iter() {
            let before = &quilt.grid()[i];
            assert_eq!(patch.color_a, before.color_a, "{:?}", i);
            assert_eq!(patch.color_b, before.color_b, "{:?}", i);
            assert!(is_table_density(patch.pattern()), "{:?}", i);
        }

        // Already at table densities, so nothing moves
        assert_eq!(downscaled.downscale(), downscaled);
    }

    #[quickcheck]
    fn offset_downscale_keeps_colors_and_offset(bits: u64, ox: i8, oy: i8) -> bool {
        let pattern = Pattern::from_fn(|p| {
            if (bits >> (p.y * 8 + p.x)) & 1 != 0 {
                Symbol::B
            } else {
                Symbol::A
            }
        });
        let shape = Patch::from_slots(ColorSlot::Empty, Color::Indexed(1).into(), pattern);
        let mut grid = Grid::filled(vec2(2, 2), shape);
        grid[point2(1, 1)] = Patch::with_pattern(Color::Indexed(2), Color::Indexed(3), pattern);
        let quilt = Quilt::new(grid).with_offset(vec2(ox as i32, oy as i32));
        let downscaled = quilt.downscale();

        let patches_ok = downscaled
            .grid()
            .grid()
            .values()
            .zip(quilt.grid().grid().values())
            .all(|(after, before)| {
                after.color_a == before.color_a
                    && after.color_b == before.color_b
                    && is_table_density(after.pattern())
            });
        patches_ok && downscaled.offset() == quilt.offset()
    }

    #[test]
    fn overlay_only_touches_overlap() {
        let red = Patch::new(Color::Rgb(colors::RED), Color::Rgb(colors::RED));
        let white = Patch::new(Color::Rgb(colors::WHITE), Color::Rgb(colors::WHITE));
        let mut base = Quilt::filled(vec2(4, 4), red).with_offset(vec2(0, 0));
        let top = Quilt::filled(vec2(4, 4), white).with_offset(vec2(3, -2));
        let overlap = base.overlay_with(&top);
        assert_eq!(overlap, Box2::new(point2(3, 0), vec2(1, 2)));
        for (p, patch) in base.grid().grid().iter() {
            let expected = if overlap.contains_point(&p) { white } else { red };
            assert_eq!(*patch, expected, "{:?}", p);
        }
    }

    #[test]
    fn transparent_patches_keep_background() {
        let red = Patch::new(Color::Rgb(colors::RED), Color::Rgb(colors::RED));
        let mut base = Quilt::filled(vec2(2, 2), red).with_offset(vec2(0, 0));
        let shape = Patch::from_slots(
            ColorSlot::Empty,
            Color::Rgb(colors::WHITE).into(),
            Pattern::ALL_A,
        );
        let top = Quilt::filled(vec2(2, 2), shape).with_offset(vec2(0, 0));
        let before = base.clone();
        base.overlay_with(&top);
        assert_eq!(base, before);
    }

    #[test]
    fn render_places_patches() {
        let palette = Palette::standard();
        let mut grid = Grid::filled(vec2(2, 1), Patch::BLACK);
        grid[point2(1, 0)] = Patch::new(Color::Indexed(4), Color::Indexed(4));
        let quilt = Quilt::new(grid).with_offset(vec2(1, 0));

        let mut surface = PixelSurface::new(vec2(24, 8), SurfaceConfig::default());
        surface.draw(&quilt, &palette, Transform::IDENTITY, 0);

        let at = |x| surface.pixel(point2(x, 3));
        assert_eq!(at(7), Some(RGBA8::new(0, 0, 0, 0)));
        assert_eq!(at(8), Some(RGBA8::new(0, 0, 0, 0xff)));
        assert_eq!(at(16), Some(RGBA8::new(0xff, 0xff, 0xff, 0xff)));
        assert_eq!(at(23), Some(RGBA8::new(0xff, 0xff, 0xff, 0xff)));
    }
}
