//! Layer bitmap codecs.
//!
//! This module contains:
//! - `rle`: RATTA_RLE run-length decoding
//! - `embedded`: embedded-image (PNG) layer decoding

pub mod embedded;
pub mod rle;

pub use embedded::{EmbeddedImageDecoder, PngDecoder};

/// Protocol tag for the run-length codec.
pub const PROTOCOL_RATTA_RLE: &str = "RATTA_RLE";
/// Protocol tag for embedded-image layers.
pub const PROTOCOL_PNG: &str = "PNG";
