//! Ordered dithering with a fixed table of 8×8 Bayer patterns.
//!
//! The table has 21 entries, indexed by [`Density`], the number of
//! [`Symbol::B`] cells out of 64.
use grid2d::Grid;
use once_cell::sync::OnceCell;
use quick_error::quick_error;
use std::convert::TryFrom;

use crate::{
    ab::Symbol,
    pattern::{Pattern, PATCH_AREA},
};

quick_error! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DensityError {
        Unsupported(count: u32) {
            display("no pattern has exactly {} cells set", count)
        }
    }
}

/// A supported ink density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Density {
    D0,
    D1,
    D2,
    D4,
    D8,
    D10,
    D16,
    D20,
    D24,
    D28,
    D32,
    D36,
    D40,
    D44,
    D48,
    D54,
    D56,
    D60,
    D62,
    D63,
    D64,
}

const COUNTS: [u32; 21] = [
    0, 1, 2, 4, 8, 10, 16, 20, 24, 28, 32, 36, 40, 44, 48, 54, 56, 60, 62, 63, 64,
];

impl Density {
    /// All densities in ascending order.
    pub const ALL: [Density; 21] = [
        Density::D0,
        Density::D1,
        Density::D2,
        Density::D4,
        Density::D8,
        Density::D10,
        Density::D16,
        Density::D20,
        Density::D24,
        Density::D28,
        Density::D32,
        Density::D36,
        Density::D40,
        Density::D44,
        Density::D48,
        Density::D54,
        Density::D56,
        Density::D60,
        Density::D62,
        Density::D63,
        Density::D64,
    ];

    /// The number of `B` cells.
    #[inline]
    pub fn count(self) -> u32 {
        COUNTS[self as usize]
    }

    #[inline]
    pub fn ratio(self) -> f64 {
        self.count() as f64 / PATCH_AREA as f64
    }

    pub fn from_count(count: u32) -> Option<Self> {
        COUNTS
            .iter()
            .position(|&c| c == count)
            .map(|i| Self::ALL[i])
    }

    /// Find the density nearest to `ratio`. A ratio exactly halfway between
    /// two densities maps to the lower one.
    ///
    /// # Panics
    ///
    /// Panics if `ratio` is outside `[0, 1]` or is NaN.
    pub fn from_ratio(ratio: f64) -> Self {
        assert!(
            ratio >= 0.0 && ratio <= 1.0,
            "ratio {} is outside [0, 1]",
            ratio
        );
        for (i, pair) in Self::ALL.windows(2).enumerate() {
            let (low, high) = (pair[0].ratio(), pair[1].ratio());
            if low <= ratio && ratio <= high {
                return if ratio - low <= high - ratio {
                    Self::ALL[i]
                } else {
                    Self::ALL[i + 1]
                };
            }
        }
        unreachable!()
    }
}

impl TryFrom<u32> for Density {
    type Error = DensityError;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Self::from_count(count).ok_or(DensityError::Unsupported(count))
    }
}

/// Get the pattern of the given density.
#[inline]
pub fn pattern_from_density(density: Density) -> Pattern {
    patterns()[density as usize]
}

/// Get the pattern whose density is nearest to `ratio`.
///
/// # Panics
///
/// Panics if `ratio` is outside `[0, 1]`.
#[inline]
pub fn pattern_from_ratio(ratio: f64) -> Pattern {
    pattern_from_density(Density::from_ratio(ratio))
}

fn patterns() -> &'static [Pattern; 21] {
    static PATTERNS: OnceCell<[Pattern; 21]> = OnceCell::new();
    PATTERNS.get_or_init(|| {
        let mut patterns = [Pattern::ALL_A; 21];
        for (pattern, encoding) in patterns.iter_mut().zip(ENCODINGS.iter()) {
            *pattern = decode(encoding);
        }
        patterns
    })
}

fn decode(encoding: &[&str; 8]) -> Pattern {
    let rows: Vec<Vec<Symbol>> = encoding
        .iter()
        .map(|lane| {
            lane.chars()
                .map(|c| match c {
                    '.' => Symbol::A,
                    'X' => Symbol::B,
                    _ => unreachable!(),
                })
                .collect()
        })
        .collect();
    let grid = Grid::from_rows(&rows).unwrap();
    Pattern::from_grid(&grid).unwrap()
}

#[rustfmt::skip]
static ENCODINGS: [[&str; 8]; 21] = [
    // 0
    [
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
    ],
    // 1
    [
        "........",
        "........",
        "........",
        "........",
        "........",
        ".....X..",
        "........",
        "........",
    ],
    // 2
    [
        "........",
        ".X......",
        "........",
        "........",
        "........",
        ".....X..",
        "........",
        "........",
    ],
    // 4
    [
        "........",
        ".X...X..",
        "........",
        "........",
        "........",
        ".X...X..",
        "........",
        "........",
    ],
    // 8
    [
        "........",
        "X...X...",
        "........",
        "..X...X.",
        "........",
        "X...X...",
        "........",
        "..X...X.",
    ],
    // 10
    [
        "........",
        "X...X.X.",
        "........",
        "..X...X.",
        "........",
        "X.X.X...",
        "........",
        "..X...X.",
    ],
    // 16
    [
        "........",
        "X.X.X.X.",
        "........",
        "X.X.X.X.",
        "........",
        "X.X.X.X.",
        "........",
        "X.X.X.X.",
    ],
    // 20
    [
        "........",
        "X.X.X.X.",
        ".X...X..",
        "X.X.X.X.",
        "........",
        "X.X.X.X.",
        ".X...X..",
        "X.X.X.X.",
    ],
    // 24
    [
        ".X...X..",
        "X.X.X.X.",
        "...X...X",
        "X.X.X.X.",
        ".X...X..",
        "X.X.X.X.",
        "...X...X",
        "X.X.X.X.",
    ],
    // 28
    [
        ".X...X..",
        "X.X.X.X.",
        ".X.X.X.X",
        "X.X.X.X.",
        ".X...X..",
        "X.X.X.X.",
        ".X.X.X.X",
        "X.X.X.X.",
    ],
    // 32
    [
        ".X.X.X.X",
        "X.X.X.X.",
        ".X.X.X.X",
        "X.X.X.X.",
        ".X.X.X.X",
        "X.X.X.X.",
        ".X.X.X.X",
        "X.X.X.X.",
    ],
    // 36
    [
        "XX.XXX.X",
        "X.X.X.X.",
        ".X.X.X.X",
        "X.X.X.X.",
        "XX.XXX.X",
        "X.X.X.X.",
        ".X.X.X.X",
        "X.X.X.X.",
    ],
    // 40
    [
        "XX.XXX.X",
        "X.X.X.X.",
        ".XXX.XXX",
        "X.X.X.X.",
        "XX.XXX.X",
        "X.X.X.X.",
        ".XXX.XXX",
        "X.X.X.X.",
    ],
    // 44
    [
        "XXXXXXXX",
        "X.X.X.X.",
        "XX.XXX.X",
        "X.X.X.X.",
        "XXXXXXXX",
        "X.X.X.X.",
        "XX.XXX.X",
        "X.X.X.X.",
    ],
    // 48
    [
        "XXXXXXXX",
        "X.X.X.X.",
        "XXXXXXXX",
        "X.X.X.X.",
        "XXXXXXXX",
        "X.X.X.X.",
        "XXXXXXXX",
        "X.X.X.X.",
    ],
    // 54
    [
        "XXXXXXXX",
        "X.X.XXX.",
        "XXXXXXXX",
        "X.XXX.XX",
        "XXXXXXXX",
        "XXX.X.X.",
        "XXXXXXXX",
        "X.XXX.XX",
    ],
    // 56
    [
        "XXXXXXXX",
        "XXX.XXX.",
        "XXXXXXXX",
        "X.XXX.XX",
        "XXXXXXXX",
        "XXX.XXX.",
        "XXXXXXXX",
        "X.XXX.XX",
    ],
    // 60
    [
        "XXXXXXXX",
        "XX.XXX.X",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XX.XXX.X",
        "XXXXXXXX",
        "XXXXXXXX",
    ],
    // 62
    [
        "XXXXXXXX",
        "XXXXXX.X",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XX.XXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
    ],
    // 63
    [
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XX.XXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
    ],
    // 64
    [
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
    ],
];
