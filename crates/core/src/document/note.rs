//! Note document assembly.
//!
//! Walks the container's pointer graph from the footer outward: the last
//! 4 bytes of the file hold the footer address, the footer record names
//! every page address, each page record names its layer addresses. Page
//! order is fixed by the numeric suffix of the footer's `PAGE<n>` keys,
//! not by storage order.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{NoteError, Result};
use crate::parser::metadata::{self, MetadataRecord};
use crate::parser::reader::NoteReader;

/// Footer key pointing at the file-feature header record.
pub const KEY_FILE_FEATURE: &str = "FILE_FEATURE";
/// Header key identifying the device the file was written on.
pub const KEY_EQUIPMENT: &str = "APPLY_EQUIPMENT";
/// Page key naming an explicit layer compositing order.
pub const KEY_LAYER_SEQ: &str = "LAYERSEQ";
/// Layer key naming the bitmap codec.
pub const KEY_LAYER_PROTOCOL: &str = "LAYERPROTOCOL";
/// Layer key holding the bitmap payload address (0 = no content).
pub const KEY_LAYER_BITMAP: &str = "LAYERBITMAP";

/// The one equipment identifier that selects the larger panel.
pub const EQUIPMENT_N5: &str = "N5";

/// Panel resolutions. There is no dynamic resolution in this format:
/// `N5` hardware gets the large panel, everything else the default.
pub const RESOLUTION_DEFAULT: (usize, usize) = (1404, 1872);
pub const RESOLUTION_N5: (usize, usize) = (1920, 2560);

/// Compositing order used when a page record has no `LAYERSEQ` key.
pub const DEFAULT_LAYER_ORDER: [&str; 5] =
    ["BGLAYER", "MAINLAYER", "LAYER1", "LAYER2", "LAYER3"];

static PAGE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^PAGE(\d+)$").unwrap());

/// One independently-encoded raster contributing to a page.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Layer identifier from the page record (e.g. `MAINLAYER`).
    pub name: String,
    /// Codec tag (`RATTA_RLE`, `PNG`, ...). Unrecognized tags are
    /// skipped at render time, never a parse error.
    pub protocol: String,
    /// Absolute address of the bitmap payload; 0 means no content.
    pub bitmap_address: u32,
}

/// One page: its declared number and layers in compositing order.
#[derive(Debug, Clone)]
pub struct NotePage {
    pub number: u32,
    pub layers: Vec<Layer>,
}

/// The resolved top-level structure of a note container.
#[derive(Debug, Clone)]
pub struct NoteDocument {
    pub signature: String,
    /// Device pixel width of every page.
    pub width: usize,
    /// Device pixel height of every page.
    pub height: usize,
    /// Pages in ascending page-number order.
    pub pages: Vec<NotePage>,
}

impl NoteDocument {
    /// Parse the structure of a complete note container buffer.
    ///
    /// Fails fast on anything that makes the buffer uninterpretable:
    /// undersized file, unknown signature, footer or page address outside
    /// the buffer. Optional blocks with bad addresses degrade to empty
    /// records instead.
    pub fn parse(buf: &[u8]) -> Result<NoteDocument> {
        let signature = metadata::check_signature(buf)?;

        let mut reader = NoteReader::new(buf);
        reader.seek_from_end(4)?;
        let footer_address = reader.read_u32()?;
        require_in_bounds(footer_address, buf.len(), "footer")?;
        let footer = metadata::record_at(buf, footer_address);
        if footer.is_empty() {
            return Err(NoteError::InvalidFormat(format!(
                "footer record at address {footer_address} is empty or unreadable"
            )));
        }

        let (width, height) = resolve_resolution(buf, &footer);

        let mut page_addresses: Vec<(u32, u32)> = footer
            .iter()
            .filter_map(|(key, value)| {
                let caps = PAGE_KEY_RE.captures(key)?;
                let number: u32 = caps[1].parse().ok()?;
                let address: u32 = value.trim().parse().ok()?;
                Some((number, address))
            })
            .collect();
        // Output order is the declared page number, not file order.
        page_addresses.sort_unstable_by_key(|&(number, _)| number);

        let mut pages = Vec::with_capacity(page_addresses.len());
        for (number, address) in page_addresses {
            require_in_bounds(address, buf.len(), "page")?;
            let record = metadata::record_at(buf, address);
            pages.push(NotePage {
                number,
                layers: resolve_layers(buf, &record),
            });
        }

        debug!(
            pages = pages.len(),
            width, height, "resolved note document structure"
        );
        Ok(NoteDocument {
            signature,
            width,
            height,
            pages,
        })
    }
}

fn require_in_bounds(address: u32, len: usize, what: &str) -> Result<()> {
    let offset = address as usize;
    // The block needs room for its own 4-byte length prefix.
    if offset == 0 || offset + 4 > len {
        return Err(NoteError::InvalidFormat(format!(
            "{what} address {address} outside buffer of {len} bytes"
        )));
    }
    Ok(())
}

fn resolve_resolution(buf: &[u8], footer: &MetadataRecord) -> (usize, usize) {
    let header = footer
        .get_u32(KEY_FILE_FEATURE)
        .map(|address| metadata::record_at(buf, address))
        .unwrap_or_default();
    match header.get(KEY_EQUIPMENT) {
        Some(EQUIPMENT_N5) => RESOLUTION_N5,
        _ => RESOLUTION_DEFAULT,
    }
}

fn resolve_layers(buf: &[u8], page: &MetadataRecord) -> Vec<Layer> {
    let order: Vec<String> = match page.get(KEY_LAYER_SEQ) {
        Some(seq) => seq.split(',').map(|s| s.trim().to_string()).collect(),
        None => DEFAULT_LAYER_ORDER.iter().map(|s| s.to_string()).collect(),
    };

    let mut layers = Vec::new();
    for name in order {
        // A name missing from the page record is the normal case for
        // unused layers; skip it quietly.
        let Some(address) = page.get_u32(&name) else {
            if page.contains_key(&name) {
                debug!(layer = %name, "layer address unparseable, skipping");
            }
            continue;
        };
        let record = metadata::record_at(buf, address);
        if record.is_empty() && address != 0 {
            warn!(layer = %name, address, "layer record unreadable, skipping");
            continue;
        }
        layers.push(Layer {
            protocol: record.get(KEY_LAYER_PROTOCOL).unwrap_or("").to_string(),
            bitmap_address: record.get_u32(KEY_LAYER_BITMAP).unwrap_or(0),
            name,
        });
    }
    layers
}
