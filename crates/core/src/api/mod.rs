//! High-level API module for note conversion.
//!
//! # Example
//!
//! ```ignore
//! use manta_core::api::{ConvertOptions, convert_note};
//!
//! let note_bytes = std::fs::read("notebook.note")?;
//! let pdf_bytes = convert_note(&note_bytes, None)?;
//! ```

pub mod high_level;

pub use high_level::{
    ConvertOptions, convert_note, convert_note_with_decoder, load_note, render_note,
    render_note_with_decoder,
};
