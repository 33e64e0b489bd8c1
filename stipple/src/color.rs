//! Colors, palettes, and the color slots of a patch.
use rgb::RGB8;

/// An opaque RGB color.
pub type RgbColor = RGB8;

/// Named colors.
pub mod colors {
    use super::RgbColor;

    pub const BLACK: RgbColor = RgbColor { r: 0x00, g: 0x00, b: 0x00 };
    pub const WHITE: RgbColor = RgbColor { r: 0xff, g: 0xff, b: 0xff };
    pub const GRAY: RgbColor = RgbColor { r: 0x80, g: 0x80, b: 0x80 };
    pub const RED: RgbColor = RgbColor { r: 0xff, g: 0x00, b: 0x00 };
    pub const GREEN: RgbColor = RgbColor { r: 0x00, g: 0xff, b: 0x00 };
    pub const BLUE: RgbColor = RgbColor { r: 0x00, g: 0x00, b: 0xff };
    pub const YELLOW: RgbColor = RgbColor { r: 0xff, g: 0xff, b: 0x00 };
    pub const CYAN: RgbColor = RgbColor { r: 0x00, g: 0xff, b: 0xff };
    pub const MAGENTA: RgbColor = RgbColor { r: 0xff, g: 0x00, b: 0xff };
}

/// Parse a color of the form `#RRGGBB` (case-insensitive).
///
/// Returns `None` for anything else, including the short `#RGB` form and
/// surrounding whitespace.
pub fn parse_hex(hex: &str) -> Option<RgbColor> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(RgbColor {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Format a color as `#rrggbb`.
pub fn to_hex(color: RgbColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Multiply every channel by `k`, rounding down.
pub fn scale(color: RgbColor, k: f64) -> RgbColor {
    let f = |c: u8| (k * c as f64).floor() as u8;
    RgbColor {
        r: f(color.r),
        g: f(color.g),
        b: f(color.b),
    }
}

/// An ordered, editable list of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<RgbColor>,
}

impl Palette {
    /// # Panics
    ///
    /// Panics if `colors` has fewer than two entries.
    pub fn new(colors: Vec<RgbColor>) -> Self {
        assert!(
            colors.len() >= 2,
            "a palette needs at least two colors, got {}",
            colors.len()
        );
        Self { colors }
    }

    /// Construct a palette of `len` black entries.
    pub fn with_len(len: usize) -> Self {
        Self::new(vec![colors::BLACK; len])
    }

    pub fn standard() -> Self {
        use self::colors::*;
        Self::new(vec![BLACK, RED, GREEN, BLUE, WHITE, MAGENTA, YELLOW, CYAN])
    }

    pub fn autumn() -> Self {
        Self::new(vec![
            RgbColor::new(0, 0, 0),
            RgbColor::new(128, 128, 0),
            RgbColor::new(0, 255, 0),
            RgbColor::new(255, 128, 0),
            RgbColor::new(64, 0, 0),
            RgbColor::new(128, 0, 0),
            RgbColor::new(255, 255, 0),
            RgbColor::new(255, 0, 0),
        ])
    }

    pub fn blue_sky() -> Self {
        Self::new(vec![
            RgbColor::new(0, 0, 236),
            RgbColor::new(255, 255, 128),
            RgbColor::new(0, 128, 255),
            RgbColor::new(128, 255, 255),
            RgbColor::new(192, 192, 192),
            RgbColor::new(111, 111, 255),
            RgbColor::new(128, 0, 255),
            RgbColor::new(255, 0, 255),
        ])
    }

    /// Look up one of the built-in palettes.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "autumn" => Some(Self::autumn()),
            "blue-sky" => Some(Self::blue_sky()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn color(&self, index: usize) -> RgbColor {
        match self.colors.get(index) {
            Some(&color) => color,
            None => panic!(
                "palette index {} is out of range (len = {})",
                index,
                self.colors.len()
            ),
        }
    }

    /// Replace the color at `index`. Everything referring to the entry via
    /// [`Color::Indexed`] picks up the change on the next render.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_color(&mut self, index: usize, color: RgbColor) {
        let len = self.colors.len();
        match self.colors.get_mut(index) {
            Some(slot) => *slot = color,
            None => panic!("palette index {} is out of range (len = {})", index, len),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = RgbColor> + '_ {
        self.colors.iter().cloned()
    }
}

/// A color as stored in a patch.
///
/// `Indexed` is late-bound: it's resolved against whatever palette is
/// supplied at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Rgb(RgbColor),
    Indexed(usize),
}

impl Color {
    pub const BLACK: Self = Color::Rgb(colors::BLACK);

    #[inline]
    pub fn resolve(self, palette: &Palette) -> RgbColor {
        match self {
            Color::Rgb(c) => c,
            Color::Indexed(i) => palette.color(i),
        }
    }
}

impl From<RgbColor> for Color {
    fn from(x: RgbColor) -> Self {
        Color::Rgb(x)
    }
}

/// One of the two color slots of a patch. An `Empty` slot is transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Empty,
    Filled(Color),
}

impl ColorSlot {
    #[inline]
    pub fn is_filled(self) -> bool {
        match self {
            ColorSlot::Empty => false,
            ColorSlot::Filled(_) => true,
        }
    }
}

impl From<Color> for ColorSlot {
    fn from(x: Color) -> Self {
        ColorSlot::Filled(x)
    }
}

impl Default for ColorSlot {
    fn default() -> Self {
        ColorSlot::Empty
    }
}
