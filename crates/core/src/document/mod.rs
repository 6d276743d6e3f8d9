//! Note document structure: footer, pages, layers.

pub mod note;

pub use note::{Layer, NoteDocument, NotePage};
