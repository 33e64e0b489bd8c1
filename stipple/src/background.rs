//! Background quilts.
use cgmath::Vector2;
use grid2d::Grid;
use rand::Rng;

use crate::{
    color::Color,
    dither::bayer::pattern_from_ratio,
    patch::Patch,
    quilt::Quilt,
};

/// The size of the generated background, measured in patches.
pub const BACKGROUND_EXTENT: Vector2<i32> = Vector2 { x: 24, y: 24 };

/// Generate a patch with two distinct palette colors and a random density.
///
/// Palette indices listed in `blacklist` are never picked.
///
/// # Panics
///
/// Panics if fewer than two indices in `0..palette_len` are allowed.
pub fn random_patch(rng: &mut impl Rng, palette_len: usize, blacklist: &[usize]) -> Patch {
    let allowed: Vec<usize> = (0..palette_len)
        .filter(|i| !blacklist.contains(i))
        .collect();
    assert!(
        allowed.len() >= 2,
        "need two usable colors, but only {:?} are allowed",
        allowed
    );

    let a = rng.gen_range(0, allowed.len());
    let mut b = rng.gen_range(0, allowed.len() - 1);
    if b >= a {
        b += 1;
    }

    Patch::with_pattern(
        Color::Indexed(allowed[a]),
        Color::Indexed(allowed[b]),
        pattern_from_ratio(rng.gen_range(0.0, 1.0)),
    )
}

/// Generate a quilt of [`random_patch`]es.
///
/// # Panics
///
/// See [`random_patch`].
pub fn random_quilt(
    rng: &mut impl Rng,
    palette_len: usize,
    extent: Vector2<i32>,
    blacklist: &[usize],
) -> Quilt {
    Quilt::new(Grid::from_fn(extent, |_| {
        random_patch(&mut *rng, palette_len, blacklist)
    }))
}

/// Generate a quilt of solid `color_a` patches that have `color_b` as their
/// second color.
pub fn simple_quilt(extent: Vector2<i32>, color_a: Color, color_b: Color) -> Quilt {
    Quilt::filled(extent, Patch::new(color_a, color_b))
}
