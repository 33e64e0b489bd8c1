//! Dithering algorithms.
pub mod bayer;
