//! manta - conversion of Supernote-style .note containers to PDF.
//!
//! Pipeline: parse the container's pointer-chained metadata into a
//! [`document::NoteDocument`], decode and composite each page's layers
//! into a [`image::Raster`], then serialize the rasters into a minimal
//! PDF with [`converter::pdf::PdfEmitter`].

pub mod api;
pub mod codec;
pub mod converter;
pub mod document;
pub mod error;
pub mod image;
pub mod model;
pub mod parser;

pub use api::high_level;
pub use api::{ConvertOptions, convert_note, load_note, render_note};
pub use document::{Layer, NoteDocument, NotePage};
pub use error::{NoteError, Result};
pub use image::Raster;
