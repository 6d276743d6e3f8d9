//! Shared value types: color palette.

pub mod color;

pub use color::{Rgba, resolve};
