//! Small ndarray-like containers used throughout the crate.
//!
//! The front-end only needs a row-major 2D container with a handful of
//! convenience methods, so `Array2` is intentionally small and
//! dependency-free rather than pulling a full linear algebra stack into the
//! public API.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
