//! Container parsing: bounds-checked reads and metadata resolution.

pub mod metadata;
pub mod reader;

pub use metadata::{MetadataRecord, check_signature, record_at};
pub use reader::NoteReader;
