//! High-level conversion API.
//!
//! Provides the main public entry points:
//! - `load_note()` - resolve a container buffer into a [`NoteDocument`]
//! - `render_note()` - render pages into RGBA rasters
//! - `convert_note()` - full container-to-PDF conversion

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::debug;

use crate::codec::{EmbeddedImageDecoder, PngDecoder};
use crate::converter::pdf::PdfEmitter;
use crate::document::note::{NoteDocument, NotePage};
use crate::error::Result;
use crate::image::compositor::render_page;
use crate::image::raster::Raster;

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Options for note conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Zero-indexed page numbers (in resolved page order) to convert.
    /// None means all pages.
    pub page_numbers: Option<Vec<usize>>,

    /// Maximum number of pages to convert. 0 means no limit.
    pub maxpages: usize,

    /// Worker threads for page rendering. 0 means one per available core.
    pub thread_count: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            page_numbers: None,
            maxpages: 0,
            thread_count: 0,
        }
    }
}

/// Resolve a note container into its structural description without
/// rendering anything.
pub fn load_note(buf: &[u8]) -> Result<NoteDocument> {
    NoteDocument::parse(buf)
}

/// Render the selected pages of a note container into RGBA rasters,
/// in resolved page order.
pub fn render_note(buf: &[u8], options: Option<ConvertOptions>) -> Result<Vec<Raster>> {
    render_note_with_decoder(buf, &PngDecoder, options)
}

/// [`render_note`] with a caller-supplied embedded-image collaborator.
pub fn render_note_with_decoder(
    buf: &[u8],
    decoder: &dyn EmbeddedImageDecoder,
    options: Option<ConvertOptions>,
) -> Result<Vec<Raster>> {
    let options = options.unwrap_or_default();
    let document = NoteDocument::parse(buf)?;
    let selected = select_pages(&document, &options);
    debug!(
        total = document.pages.len(),
        selected = selected.len(),
        "rendering note pages"
    );

    // Pages are independent: each raster is exclusively owned by the
    // task that composites it and the source buffer is only ever read.
    let threads = if options.thread_count == 0 {
        default_thread_count()
    } else {
        options.thread_count
    };
    let render_all = || -> Vec<Raster> {
        selected
            .par_iter()
            .map(|page| render_page(buf, page, document.width, document.height, decoder))
            .collect()
    };
    let rasters = if rayon::current_thread_index().is_some() {
        // Already on a pool thread; install() on a second pool from
        // here can deadlock, so render on the current pool.
        render_all()
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        pool.install(render_all)
    };
    Ok(rasters)
}

/// Convert a complete note container into a PDF byte stream.
pub fn convert_note(buf: &[u8], options: Option<ConvertOptions>) -> Result<Vec<u8>> {
    convert_note_with_decoder(buf, &PngDecoder, options)
}

/// [`convert_note`] with a caller-supplied embedded-image collaborator.
pub fn convert_note_with_decoder(
    buf: &[u8],
    decoder: &dyn EmbeddedImageDecoder,
    options: Option<ConvertOptions>,
) -> Result<Vec<u8>> {
    let rasters = render_note_with_decoder(buf, decoder, options)?;
    PdfEmitter::new().emit(&rasters)
}

fn select_pages<'a>(document: &'a NoteDocument, options: &ConvertOptions) -> Vec<&'a NotePage> {
    let mut selected: Vec<&NotePage> = match &options.page_numbers {
        Some(numbers) => document
            .pages
            .iter()
            .enumerate()
            .filter(|(i, _)| numbers.contains(i))
            .map(|(_, p)| p)
            .collect(),
        None => document.pages.iter().collect(),
    };
    if options.maxpages > 0 && selected.len() > options.maxpages {
        selected.truncate(options.maxpages);
    }
    selected
}
