//! Page rendering: decode each layer and composite onto a white canvas.

use tracing::{debug, warn};

use super::raster::Raster;
use crate::codec::{self, EmbeddedImageDecoder, rle};
use crate::document::note::{Layer, NotePage};
use crate::parser::reader::NoteReader;

/// Render one page into a single opaque raster.
///
/// Layers are decoded independently and composited in their resolved
/// order. Nothing at this level is fatal: a layer with a zero bitmap
/// address, an unreadable payload, an unrecognized protocol or a failed
/// embedded-image decode is skipped with a diagnostic and the page keeps
/// whatever the remaining layers produce.
pub fn render_page(
    buf: &[u8],
    page: &NotePage,
    width: usize,
    height: usize,
    decoder: &dyn EmbeddedImageDecoder,
) -> Raster {
    let mut canvas = Raster::white(width, height);
    for layer in &page.layers {
        if let Some(raster) = decode_layer(buf, layer, width, height, decoder) {
            canvas.composite_over(&raster);
        }
    }
    canvas
}

/// Decode one layer's bitmap into a raster, or `None` if the layer
/// contributes nothing.
pub fn decode_layer(
    buf: &[u8],
    layer: &Layer,
    width: usize,
    height: usize,
    decoder: &dyn EmbeddedImageDecoder,
) -> Option<Raster> {
    if layer.bitmap_address == 0 {
        // Documented "no content" sentinel.
        return None;
    }
    let data = match bitmap_payload(buf, layer.bitmap_address) {
        Ok(data) => data,
        Err(err) => {
            warn!(layer = %layer.name, address = layer.bitmap_address, %err,
                "unreadable layer bitmap, skipping");
            return None;
        }
    };

    match layer.protocol.as_str() {
        codec::PROTOCOL_RATTA_RLE => {
            let codes = rle::decode(data, width * height);
            Some(Raster::from_codes(&codes, width, height))
        }
        codec::PROTOCOL_PNG => {
            let pixels = decoder.decode(data, width, height)?;
            Raster::from_rgba(pixels, width, height)
        }
        other => {
            warn!(layer = %layer.name, protocol = %other, "unknown layer protocol, skipping");
            None
        }
    }
}

/// Read the length-prefixed bitmap payload stored at `address`.
fn bitmap_payload(buf: &[u8], address: u32) -> crate::error::Result<&[u8]> {
    let mut reader = NoteReader::new(buf);
    reader.seek(address as usize)?;
    let len = reader.read_u32()? as usize;
    debug!(address, len, "reading layer bitmap payload");
    reader.read_bytes(len)
}
