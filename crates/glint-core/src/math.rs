//! Vector math re-exported from [`glam`].
//!
//! Positions handed to the text renderer are [`Vec2`] in surface pixels,
//! top-left origin, +y down.
//!
//! ```
//! use glint_core::math::Vec2;
//!
//! let origin = Vec2::new(4.0, 2.5);
//! assert_eq!((origin + Vec2::ONE).floor(), Vec2::new(5.0, 3.0));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{IVec2, UVec2, Vec2};
