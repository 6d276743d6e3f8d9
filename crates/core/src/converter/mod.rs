//! Output document serialization.

pub mod pdf;

pub use pdf::{EMIT_DPI, PdfEmitter};
