//! Shared fixture builder: synthesizes .note container buffers in memory.
#![allow(dead_code)] // not every test crate uses every helper

/// Incrementally builds a note container: blocks are appended and their
/// absolute addresses handed back, the footer pointer is written last.
pub struct NoteBuilder {
    buf: Vec<u8>,
}

impl NoteBuilder {
    pub fn new() -> Self {
        Self::with_signature(b"SN_FILE_VER_20230015")
    }

    pub fn with_signature(signature: &[u8; 20]) -> Self {
        let mut buf = b"note".to_vec();
        buf.extend_from_slice(signature);
        Self { buf }
    }

    /// Append a length-prefixed metadata block, returning its address.
    pub fn push_block(&mut self, text: &str) -> u32 {
        self.push_payload(text.as_bytes())
    }

    /// Append a length-prefixed bitmap payload, returning its address.
    pub fn push_bitmap(&mut self, data: &[u8]) -> u32 {
        self.push_payload(data)
    }

    fn push_payload(&mut self, data: &[u8]) -> u32 {
        let address = self.buf.len() as u32;
        self.buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(data);
        address
    }

    /// Write the trailing footer pointer and return the finished buffer,
    /// padded past the minimum-size gate if needed.
    pub fn finish(mut self, footer_address: u32) -> Vec<u8> {
        if self.buf.len() < 96 {
            self.buf.resize(96, 0);
        }
        self.buf.extend_from_slice(&footer_address.to_le_bytes());
        self.buf
    }
}

/// A complete single-page container: one MAINLAYER with the given
/// protocol and bitmap bytes. Returns the finished buffer.
pub fn single_page_note(protocol: &str, bitmap: &[u8]) -> Vec<u8> {
    let mut b = NoteBuilder::new();
    let bitmap_addr = b.push_bitmap(bitmap);
    let layer_addr = b.push_block(&format!(
        "<LAYERPROTOCOL:{protocol}><LAYERBITMAP:{bitmap_addr}>"
    ));
    let page_addr = b.push_block(&format!("<MAINLAYER:{layer_addr}>"));
    let footer_addr = b.push_block(&format!("<PAGE1:{page_addr}>"));
    b.finish(footer_addr)
}
