//! Application state: the layers, the composite, and what gets drawn each
//! tick.
use cggeom::prelude::*;
use cgmath::{ElementWise, EuclideanSpace, Point2, Vector2};
use grid2d::OffsetGrid;
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    ab::Symbol,
    background::{random_quilt, BACKGROUND_EXTENT},
    color::{Color, ColorSlot, Palette, RgbColor},
    patch::Patch,
    pattern::PATCH_EXTENT,
    quilt::{OffsetQuilt, Quilt},
    render::{PixelSurface, SurfaceConfig, Transform},
    scene::SceneNode,
    shape::Shape,
    tiling::tile_mask,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub shape: Shape,
    /// The side length of the shape mask, measured in dots.
    pub side: i32,
    /// Device pixels per dot.
    pub draw_scale: i32,
    /// The size of the canvas, measured in patches.
    pub background_extent: Vector2<i32>,
    pub seed: u64,
    /// Palette indices the background never uses.
    pub blacklist: Vec<usize>,
    /// The palette index the shape is drawn with.
    pub shape_color: usize,
    /// Draw the background and the shape as separate depth-tested layers
    /// instead of drawing the composite quilt.
    pub layered: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Triangle,
            side: 80,
            draw_scale: 3,
            background_extent: BACKGROUND_EXTENT,
            seed: 0,
            blacklist: vec![1],
            shape_color: 1,
            layered: false,
        }
    }
}

/// Layers that are expensive to build and don't change between frames.
#[derive(Debug, Default)]
pub struct LayerCache {
    background: Option<OffsetQuilt>,
    shape: Option<OffsetGrid<Symbol>>,
}

impl LayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the background, generating it on first use.
    pub fn background(&mut self, config: &SessionConfig, palette_len: usize) -> &OffsetQuilt {
        self.background.get_or_insert_with(|| {
            debug!(
                "generating a {:?} background with seed {}",
                config.background_extent, config.seed
            );
            let mut rng = StdRng::seed_from_u64(config.seed);
            random_quilt(
                &mut rng,
                palette_len,
                config.background_extent,
                &config.blacklist,
            )
            .with_offset(Vector2::new(0, 0))
        })
    }

    /// Get the shape mask, generating it on first use. The caller positions
    /// it with [`OffsetGrid::set_offset`].
    pub fn shape_mask(&mut self, config: &SessionConfig) -> &mut OffsetGrid<Symbol> {
        self.shape.get_or_insert_with(|| {
            debug!("generating a {} mask of side {}", config.shape, config.side);
            OffsetGrid::new(
                config.shape.generate(config.side, Symbol::B),
                Vector2::new(0, 0),
            )
        })
    }

    /// Forget everything. The next access regenerates.
    pub fn clear(&mut self) {
        self.background = None;
        self.shape = None;
    }
}

/// Owns everything needed to produce frames.
///
/// Input and rendering are decoupled: [`Session::pointer_moved`] only records
/// where the shape should go, and [`Session::tick`] rebuilds and redraws.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    palette: Palette,
    cache: LayerCache,
    composite: OffsetQuilt,
    preview: OffsetQuilt,
    /// Where the shape mask's top-left corner goes, measured in dots.
    shape_offset: Vector2<i32>,
    surface: PixelSurface,
    preview_surface: PixelSurface,
    frame: u64,
}

impl Session {
    /// # Panics
    ///
    /// Panics if `config.draw_scale` isn't positive or `config.shape_color`
    /// is outside `palette`.
    pub fn new(config: SessionConfig, palette: Palette) -> Self {
        assert!(
            config.shape_color < palette.len(),
            "shape color {} is outside the palette",
            config.shape_color
        );
        let canvas = Quilt::filled(config.background_extent, Patch::BLACK);
        let size = canvas_dots(config.background_extent).mul_element_wise(config.draw_scale);
        let surface_config = SurfaceConfig {
            pixel_scale: config.draw_scale,
            depth_test: config.layered,
        };
        debug!("new session: {:?}, surface size {:?}", config, size);

        Self {
            composite: canvas.clone().with_offset(Vector2::new(0, 0)),
            preview: canvas.with_offset(Vector2::new(0, 0)),
            shape_offset: Vector2::new(0, 0),
            surface: PixelSurface::new(size, surface_config),
            preview_surface: PixelSurface::new(size, surface_config),
            cache: LayerCache::new(),
            frame: 0,
            config,
            palette,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The full-resolution output.
    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    /// The output with the shape re-dithered at table densities.
    pub fn preview_surface(&self) -> &PixelSurface {
        &self.preview_surface
    }

    pub fn composite(&self) -> &OffsetQuilt {
        &self.composite
    }

    pub fn shape_offset(&self) -> Vector2<i32> {
        self.shape_offset
    }

    /// The number of ticks so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Record a pointer position, measured in device pixels relative to the
    /// surface. The shape is centered on the pointer from the next tick on.
    pub fn pointer_moved(&mut self, client: Point2<i32>) {
        let scale = self.config.draw_scale;
        let dot = client.to_vec().zip_with(Vector2::new(scale, scale), i32::div_euclid);
        let half = self.config.side / 2;
        self.shape_offset = dot - Vector2::new(half, half);
    }

    /// Place the shape's top-left corner at `offset`, measured in dots.
    pub fn set_shape_offset(&mut self, offset: Vector2<i32>) {
        self.shape_offset = offset;
    }

    /// Replace a palette entry. Takes effect on the next tick.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the palette.
    pub fn recolor(&mut self, index: usize, color: RgbColor) {
        debug!("recolor: [{}] = {}", index, crate::color::to_hex(color));
        self.palette.set_color(index, color);
    }

    /// Switch to a new background. It's generated on the next tick.
    pub fn reseed(&mut self, seed: u64) {
        debug!("reseed: {}", seed);
        self.config.seed = seed;
        self.cache.clear();
    }

    /// Rebuild the shape layer at the latest offset, merge everything into
    /// the composite, and redraw both surfaces.
    pub fn tick(&mut self) {
        self.frame += 1;

        let mask = self.cache.shape_mask(&self.config);
        mask.set_offset(self.shape_offset);
        let shape = tile_mask(
            mask,
            ColorSlot::Empty,
            ColorSlot::Filled(Color::Indexed(self.config.shape_color)),
        );
        let shape_preview = shape.downscale();

        let background = self.cache.background(&self.config, self.palette.len());

        self.composite.overlay_with(background);
        self.composite.overlay_with(&shape);
        self.preview.overlay_with(background);
        self.preview.overlay_with(&shape_preview);

        trace!(
            "frame {}: shape at {:?} covers patches {:?}",
            self.frame,
            self.shape_offset,
            shape.bounds()
        );

        if self.config.layered {
            // The shape's empty slots leave the background visible dot by
            // dot, unlike in the composite where they adopt a patch color
            self.surface.clear_depth();
            self.preview_surface.clear_depth();
            let scene = SceneNode::new()
                .with_child(SceneNode::new().with_z_index(0).with_object(background))
                .with_child(SceneNode::new().with_z_index(1).with_object(&shape));
            self.surface
                .draw(&scene, &self.palette, Transform::IDENTITY, 0);
            let scene = SceneNode::new()
                .with_child(SceneNode::new().with_z_index(0).with_object(background))
                .with_child(SceneNode::new().with_z_index(1).with_object(&shape_preview));
            self.preview_surface
                .draw(&scene, &self.palette, Transform::IDENTITY, 0);
        } else {
            self.surface
                .draw(&self.composite, &self.palette, Transform::IDENTITY, 0);
            self.preview_surface
                .draw(&self.preview, &self.palette, Transform::IDENTITY, 0);
        }
    }
}

/// The dot-space size of the canvas for a background of `extent` patches.
pub fn canvas_dots(extent: Vector2<i32>) -> Vector2<i32> {
    extent.mul_element_wise(PATCH_EXTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;
    use cgmath::vec2;
    use rgb::RGBA8;

    fn point2<T>(x: T, y: T) -> cgmath::Point2<T> {
        cgmath::Point2::new(x, y)
    }

    fn small_config() -> SessionConfig {
        SessionConfig {
            shape: Shape::Square,
            side: 16,
            draw_scale: 1,
            background_extent: vec2(4, 4),
            ..Default::default()
        }
    }

    fn opaque(c: RgbColor) -> Option<RGBA8> {
        Some(RGBA8::new(c.r, c.g, c.b, 0xff))
    }

    #[test]
    fn pointer_centers_shape() {
        let mut session = Session::new(
            SessionConfig {
                draw_scale: 3,
                ..small_config()
            },
            Palette::standard(),
        );
        session.pointer_moved(point2(30, 31));
        assert_eq!(session.shape_offset(), vec2(2, 2));
        session.pointer_moved(point2(-1, 0));
        assert_eq!(session.shape_offset(), vec2(-9, -8));
    }

    #[test]
    fn pointer_does_not_redraw() {
        let mut session = Session::new(small_config(), Palette::standard());
        session.tick();
        let before = session.surface().data().to_vec();
        session.pointer_moved(point2(20, 20));
        assert_eq!(session.surface().data(), &before[..]);
        assert_eq!(session.frame(), 1);
    }

    #[test]
    fn shape_is_drawn_at_offset() {
        let mut session = Session::new(small_config(), Palette::standard());
        session.set_shape_offset(vec2(8, 8));
        session.tick();

        // Fully covered patches are solid shape color
        for p in cggeom::Box2::new(point2(8, 8), vec2(16, 16)).positions() {
            assert_eq!(session.surface().pixel(p), opaque(colors::RED), "{:?}", p);
        }
        let patch = session.composite().grid().get(point2(0, 0)).unwrap();
        assert_ne!(patch.color_b, ColorSlot::Filled(Color::Indexed(1)));
    }

    #[test]
    fn background_is_cached() {
        let mut session = Session::new(small_config(), Palette::standard());
        session.tick();
        let first = session.cache.background.clone();
        session.set_shape_offset(vec2(100, 100));
        session.tick();
        assert_eq!(session.cache.background, first);
        assert!(first.is_some());

        session.reseed(7);
        assert!(session.cache.background.is_none());
        session.tick();
        assert_ne!(session.cache.background, first);
    }

    #[test]
    fn recolor_is_late_bound() {
        let mut session = Session::new(small_config(), Palette::standard());
        session.set_shape_offset(vec2(0, 0));
        session.recolor(1, colors::CYAN);
        session.tick();
        assert_eq!(session.surface().pixel(point2(3, 3)), opaque(colors::CYAN));
    }

    #[test]
    fn layered_matches_composite_inside_shape() {
        let config = SessionConfig {
            layered: true,
            ..small_config()
        };
        let mut session = Session::new(config, Palette::standard());
        session.set_shape_offset(vec2(4, 4));
        session.tick();
        assert_eq!(session.surface().pixel(point2(10, 10)), opaque(colors::RED));
        assert_eq!(session.surface().pixel(point2(19, 19)), opaque(colors::RED));
        assert_ne!(session.surface().pixel(point2(20, 20)), opaque(colors::RED));
    }

    #[test]
    fn canvas_size() {
        assert_eq!(canvas_dots(BACKGROUND_EXTENT), vec2(192, 192));
    }
}
