use cgmath::{vec2, Point2};

use crate::{
    ab::Symbol,
    color::{Color, ColorSlot},
    dither::bayer::{pattern_from_density, pattern_from_ratio, Density},
    pattern::{Pattern, PATCH_AREA, PATCH_EXTENT},
    render::{Render, RenderContext, Transform},
};

/// One 8×8 cell: two color slots and a dither pattern choosing between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Patch {
    pub color_a: ColorSlot,
    pub color_b: ColorSlot,
    pattern: Pattern,
}

impl Patch {
    /// A patch with both colors black.
    pub const BLACK: Self = Self {
        color_a: ColorSlot::Filled(Color::BLACK),
        color_b: ColorSlot::Filled(Color::BLACK),
        pattern: Pattern::ALL_A,
    };

    /// Construct a patch of density 0, i.e., solid `color_a`.
    pub fn new(color_a: Color, color_b: Color) -> Self {
        Self::with_pattern(color_a, color_b, pattern_from_density(Density::D0))
    }

    pub fn with_pattern(color_a: Color, color_b: Color, pattern: Pattern) -> Self {
        Self::from_slots(color_a.into(), color_b.into(), pattern)
    }

    /// Construct a patch some of whose slots may be empty (transparent).
    pub fn from_slots(color_a: ColorSlot, color_b: ColorSlot, pattern: Pattern) -> Self {
        Self {
            color_a,
            color_b,
            pattern,
        }
    }

    #[inline]
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Replace the pattern, keeping both colors.
    pub fn update_pattern(&self, pattern: Pattern) -> Self {
        Self { pattern, ..*self }
    }

    /// # Panics
    ///
    /// Panics if `p` is outside `[0, 8) × [0, 8)`.
    #[inline]
    pub fn color_at(&self, p: Point2<i32>) -> ColorSlot {
        match self.pattern.at(p) {
            Symbol::A => self.color_a,
            Symbol::B => self.color_b,
        }
    }

    /// The slot covering the majority of the patch. `B` wins when the two are
    /// tied.
    pub fn most_prominent_color(&self) -> ColorSlot {
        if self.pattern.count_of(Symbol::A) <= PATCH_AREA / 2 {
            self.color_b
        } else {
            self.color_a
        }
    }

    /// Re-dither the patch with the table pattern nearest to its current
    /// coverage.
    pub fn downscale(&self) -> Self {
        self.update_pattern(pattern_from_ratio(self.pattern.ratio()))
    }

    /// Merge `new` on top of `old`.
    ///
    /// If `new` has both colors it replaces `old` outright. If it has only
    /// one, it's a shape drawn over a transparent background: the missing
    /// color is taken from `old`'s most prominent color, unless the shape
    /// doesn't cover any cell of the patch, in which case `old` is kept
    /// as-is.
    pub fn merge(old: &Patch, new: &Patch) -> Patch {
        match (new.color_a.is_filled(), new.color_b.is_filled()) {
            (true, true) => *new,
            (false, false) => *old,
            (false, true) => {
                if new.pattern.count_of(Symbol::B) == 0 {
                    *old
                } else {
                    Patch::from_slots(old.most_prominent_color(), new.color_b, new.pattern)
                }
            }
            (true, false) => {
                if new.pattern.count_of(Symbol::A) == 0 {
                    *old
                } else {
                    Patch::from_slots(new.color_a, old.most_prominent_color(), new.pattern)
                }
            }
        }
    }
}

impl Render for Patch {
    /// Draws one dot per cell. Cells whose slot is empty are left alone.
    fn render_to(&self, cx: &mut RenderContext<'_>, transform: Transform) {
        for y in 0..PATCH_EXTENT.y {
            for x in 0..PATCH_EXTENT.x {
                if let ColorSlot::Filled(color) = self.color_at(Point2::new(x, y)) {
                    let dot = Transform::translate_by(vec2(x, y)).then(transform);
                    cx.put_dot(color, dot);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;

    fn point2<T>(x: T, y: T) -> cgmath::Point2<T> {
        cgmath::Point2::new(x, y)
    }

    fn red() -> Color {
        Color::Rgb(colors::RED)
    }

    fn white() -> Color {
        Color::Rgb(colors::WHITE)
    }

    #[test]
    fn default_pattern_is_solid_a() {
        let patch = Patch::new(red(), white());
        assert_eq!(patch.pattern(), Pattern::ALL_A);
        assert_eq!(patch.color_at(point2(7, 7)), ColorSlot::Filled(red()));
    }

    #[test]
    fn most_prominent() {
        let b_heavy = Patch::with_pattern(red(), white(), pattern_from_density(Density::D32));
        assert_eq!(b_heavy.most_prominent_color(), ColorSlot::Filled(white()));
        let a_heavy = Patch::with_pattern(red(), white(), pattern_from_density(Density::D28));
        assert_eq!(a_heavy.most_prominent_color(), ColorSlot::Filled(red()));
    }

    #[test]
    fn merge_opaque_replaces() {
        let old = Patch::new(red(), red());
        let new = Patch::with_pattern(white(), red(), pattern_from_density(Density::D10));
        assert_eq!(Patch::merge(&old, &new), new);
    }

    #[test]
    fn merge_uncovered_keeps_old() {
        let old = Patch::with_pattern(red(), white(), pattern_from_density(Density::D20));
        let new = Patch::from_slots(ColorSlot::Empty, white().into(), Pattern::ALL_A);
        assert_eq!(Patch::merge(&old, &new), old);

        let new = Patch::from_slots(red().into(), ColorSlot::Empty, Pattern::ALL_B);
        assert_eq!(Patch::merge(&old, &new), old);

        let new = Patch::from_slots(ColorSlot::Empty, ColorSlot::Empty, Pattern::ALL_B);
        assert_eq!(Patch::merge(&old, &new), old);
    }

    #[test]
    fn merge_samples_background() {
        let blue = Color::Rgb(colors::BLUE);
        let old = Patch::with_pattern(red(), blue, pattern_from_density(Density::D4));
        let pattern = pattern_from_density(Density::D16);
        let new = Patch::from_slots(ColorSlot::Empty, white().into(), pattern);
        assert_eq!(
            Patch::merge(&old, &new),
            Patch::with_pattern(red(), white(), pattern)
        );

        let new = Patch::from_slots(white().into(), ColorSlot::Empty, pattern);
        assert_eq!(
            Patch::merge(&old, &new),
            Patch::with_pattern(white(), red(), pattern)
        );
    }

    #[test]
    fn downscale_snaps_to_table() {
        let pattern = Pattern::from_fn(|p| if p.y < 3 { Symbol::B } else { Symbol::A });
        let patch = Patch::with_pattern(red(), white(), pattern);
        let downscaled = patch.downscale();
        assert_eq!(downscaled.pattern(), pattern_from_density(Density::D24));
        assert_eq!(downscaled.color_a, patch.color_a);
    }
}
