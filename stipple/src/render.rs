//! Rasterization of patches into an RGBA pixel buffer.
//!
//! Only translation and positive scaling are supported. There's no
//! rotation or shearing; a dot always maps to an axis-aligned rectangle of
//! whole pixels.
use cggeom::Box2;
use cgmath::{ElementWise, Point2, Vector2};
use rgb::RGBA8;
use std::io::{self, Write};

use crate::color::{Color, Palette, RgbColor};

/// Maps a point `p` to `p * scale + translation` (component by component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform {
    pub translation: Vector2<i32>,
    pub scale: Vector2<i32>,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vector2 { x: 0, y: 0 },
        scale: Vector2 { x: 1, y: 1 },
    };

    pub fn translate_by(translation: Vector2<i32>) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// # Panics
    ///
    /// Panics unless both components of `scale` are positive.
    pub fn scale_by(scale: Vector2<i32>) -> Self {
        assert!(
            scale.x > 0 && scale.y > 0,
            "scale factor must be positive, got {:?}",
            scale
        );
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    pub fn uniform_scale(k: i32) -> Self {
        Self::scale_by(Vector2::new(k, k))
    }

    /// Compose two transforms. The result applies `self` first, then `next`.
    pub fn then(self, next: Transform) -> Self {
        Self {
            translation: self.translation.mul_element_wise(next.scale) + next.translation,
            scale: self.scale.mul_element_wise(next.scale),
        }
    }

    #[inline]
    pub fn apply_to_point(&self, p: Point2<i32>) -> Point2<i32> {
        p.mul_element_wise(Point2::new(self.scale.x, self.scale.y)) + self.translation
    }

    /// The pixel rectangle covered by the unit square at the local origin.
    #[inline]
    pub fn unit_box(&self) -> Box2<i32> {
        Box2::new(self.apply_to_point(Point2::new(0, 0)), self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Something that can be drawn onto a [`PixelSurface`].
pub trait Render {
    /// Draw `self`. `transform` maps the object's local dot coordinates to
    /// surface pixels.
    fn render_to(&self, cx: &mut RenderContext<'_>, transform: Transform);
}

/// The state threaded through [`Render::render_to`].
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub surface: &'a mut PixelSurface,

    /// Resolves [`Color::Indexed`].
    pub palette: &'a Palette,

    /// The layer being drawn. Only meaningful if the surface has depth
    /// testing enabled.
    pub z_index: i8,
}

impl RenderContext<'_> {
    /// Fill the pixels covered by the dot at the local origin of
    /// `transform`.
    #[inline]
    pub fn put_dot(&mut self, color: Color, transform: Transform) {
        let color = color.resolve(self.palette);
        self.surface
            .fill_rect(transform.unit_box(), color, self.z_index);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// The number of device pixels per dot along each axis.
    pub pixel_scale: i32,

    /// Keep a per-pixel z-index and reject writes from lower layers.
    /// Without it, the last write wins.
    pub depth_test: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            pixel_scale: 1,
            depth_test: false,
        }
    }
}

/// An RGBA buffer, 4 bytes per pixel in `R, G, B, A` order, rows top to
/// bottom.
///
/// Every pixel written through this type gets alpha `0xff`. Writes outside
/// the surface are clipped.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    size: Vector2<i32>,
    data: Vec<u8>,
    depth: Option<Vec<i8>>,
    config: SurfaceConfig,
}

impl PixelSurface {
    /// Construct a surface with every pixel transparent black.
    ///
    /// # Panics
    ///
    /// Panics if `size` has a negative component or `config.pixel_scale` is
    /// not positive.
    pub fn new(size: Vector2<i32>, config: SurfaceConfig) -> Self {
        assert!(size.x >= 0 && size.y >= 0, "bad surface size {:?}", size);
        assert!(config.pixel_scale > 0, "pixel scale must be positive");
        let area = size.x as usize * size.y as usize;
        Self {
            size,
            data: vec![0; area * 4],
            depth: if config.depth_test {
                Some(vec![i8::min_value(); area])
            } else {
                None
            },
            config,
        }
    }

    #[inline]
    pub fn size(&self) -> Vector2<i32> {
        self.size
    }

    #[inline]
    pub fn bounds(&self) -> Box2<i32> {
        Box2::from_extent(self.size)
    }

    #[inline]
    pub fn config(&self) -> SurfaceConfig {
        self.config
    }

    /// The raw pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, p: Point2<i32>) -> Option<RGBA8> {
        if !self.bounds().contains_point(&p) {
            return None;
        }
        let i = self.pixel_index(p) * 4;
        let px = &self.data[i..i + 4];
        Some(RGBA8::new(px[0], px[1], px[2], px[3]))
    }

    #[inline]
    fn pixel_index(&self, p: Point2<i32>) -> usize {
        p.y as usize * self.size.x as usize + p.x as usize
    }

    /// Fill the whole surface with an opaque color and reset the depth
    /// buffer.
    pub fn clear(&mut self, color: RgbColor) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
        self.clear_depth();
    }

    /// Forget the z-index of every pixel so the next frame can draw its
    /// layers from scratch.
    pub fn clear_depth(&mut self) {
        if let Some(depth) = &mut self.depth {
            for z in depth.iter_mut() {
                *z = i8::min_value();
            }
        }
    }

    /// Fill a rectangle measured in device pixels.
    pub fn fill_rect(&mut self, rect: Box2<i32>, color: RgbColor, z_index: i8) {
        let rect = rect.intersect(&self.bounds());
        let value = [color.r, color.g, color.b, 0xff];
        for p in rect.positions() {
            let i = self.pixel_index(p);
            if let Some(depth) = &mut self.depth {
                if z_index < depth[i] {
                    continue;
                }
                depth[i] = z_index;
            }
            self.data[i * 4..i * 4 + 4].copy_from_slice(&value);
        }
    }

    /// Draw the one-pixel-wide outline of a rectangle.
    pub fn stroke_rect(&mut self, rect: Box2<i32>, color: RgbColor, z_index: i8) {
        if rect.is_empty() {
            return;
        }
        let (min, max) = (rect.min, rect.max());
        let edges = [
            Box2::from_min_max(min, Point2::new(max.x, min.y + 1)),
            Box2::from_min_max(Point2::new(min.x, max.y - 1), max),
            Box2::from_min_max(min, Point2::new(min.x + 1, max.y)),
            Box2::from_min_max(Point2::new(max.x - 1, min.y), max),
        ];
        for &edge in edges.iter() {
            self.fill_rect(edge, color, z_index);
        }
    }

    /// Draw `object` with one dot per `pixel_scale × pixel_scale` block of
    /// device pixels.
    pub fn draw(
        &mut self,
        object: &dyn Render,
        palette: &Palette,
        transform: Transform,
        z_index: i8,
    ) {
        let transform = transform.then(Transform::uniform_scale(self.config.pixel_scale));
        object.render_to(
            &mut RenderContext {
                surface: self,
                palette,
                z_index,
            },
            transform,
        );
    }

    /// Write the RGB channels in the binary PPM (`P6`) format.
    pub fn write_ppm(&self, mut out: impl Write) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.size.x, self.size.y)?;
        let rgb: Vec<u8> = self
            .data
            .chunks_exact(4)
            .flat_map(|px| px[..3].iter().cloned())
            .collect();
        out.write_all(&rgb)
    }
}
