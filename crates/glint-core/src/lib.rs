//! Glint Core
//!
//! Shared building blocks for the Glint crates: logging setup, profiling
//! scopes, hash collections and integer/float geometry.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
