//! Minimal PDF serialization of page rasters.
//!
//! Writes the output document by hand: catalog, page tree, then one
//! page object, one content stream and one image XObject per page,
//! followed by a cross-reference table and trailer. The xref offsets are
//! load-bearing for any conforming reader, so every object's byte offset
//! is recorded at the moment its `N 0 obj` line is appended.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::error::Result;
use crate::image::raster::Raster;

/// Nominal emit resolution. Output page dimensions are
/// `pixels * 72 / EMIT_DPI` points, rounded to the nearest integer.
/// Fixed by policy: small consistent output beats configurable fidelity
/// for handwriting rasters.
pub const EMIT_DPI: u32 = 150;

fn px_to_pt(px: usize) -> i64 {
    ((px as f64) * 72.0 / EMIT_DPI as f64).round() as i64
}

/// PDF writer with offset bookkeeping for the cross-reference table.
pub struct PdfEmitter {
    buf: Vec<u8>,
    /// Byte offset of object `i + 1`'s declaration.
    offsets: Vec<usize>,
}

impl PdfEmitter {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Serialize `pages` into a complete PDF byte stream.
    ///
    /// Object layout: 1 catalog, 2 page tree, then for page `i`
    /// (0-based) objects `3+3i` page, `4+3i` content stream, `5+3i`
    /// image XObject.
    pub fn emit(mut self, pages: &[Raster]) -> Result<Vec<u8>> {
        self.buf.extend_from_slice(b"%PDF-1.4\n");

        self.begin_obj(1);
        self.write_str("<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        self.begin_obj(2);
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 3 + 3 * i)).collect();
        self.write_str(&format!(
            "<< /Type /Pages /Kids [ {} ] /Count {} >>\nendobj\n",
            kids.join(" "),
            pages.len()
        ));

        for (i, raster) in pages.iter().enumerate() {
            self.emit_page(i, raster)?;
        }

        let xref_offset = self.buf.len();
        let count = self.offsets.len() + 1; // plus the free-list sentinel
        self.write_str(&format!("xref\n0 {count}\n"));
        self.write_str("0000000000 65535 f \n");
        let offsets = std::mem::take(&mut self.offsets);
        for offset in offsets {
            self.write_str(&format!("{offset:010} 00000 n \n"));
        }
        self.write_str(&format!(
            "trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        Ok(self.buf)
    }

    fn emit_page(&mut self, i: usize, raster: &Raster) -> Result<()> {
        let (page_obj, content_obj, image_obj) = (3 + 3 * i, 4 + 3 * i, 5 + 3 * i);
        let (w_pt, h_pt) = (px_to_pt(raster.width()), px_to_pt(raster.height()));

        self.begin_obj(page_obj);
        self.write_str(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {w_pt} {h_pt}] \
             /Contents {content_obj} 0 R \
             /Resources << /XObject << /Im{i} {image_obj} 0 R >> >> >>\nendobj\n"
        ));

        // Four instructions: save state, scale the unit square to the
        // page, paint the image, restore state.
        let content = format!("q\n{w_pt} 0 0 {h_pt} 0 0 cm\n/Im{i} Do\nQ");
        self.begin_obj(content_obj);
        self.write_str(&format!("<< /Length {} >>\nstream\n", content.len()));
        self.write_str(&content);
        self.write_str("\nendstream\nendobj\n");

        let compressed = deflate(&raster.to_rgb())?;
        self.begin_obj(image_obj);
        self.write_str(&format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode \
             /Length {} >>\nstream\n",
            raster.width(),
            raster.height(),
            compressed.len()
        ));
        self.buf.extend_from_slice(&compressed);
        self.write_str("\nendstream\nendobj\n");
        Ok(())
    }

    fn begin_obj(&mut self, number: usize) {
        debug_assert_eq!(number, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.write_str(&format!("{number} 0 obj\n"));
    }

    fn write_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }
}

impl Default for PdfEmitter {
    fn default() -> Self {
        Self::new()
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
