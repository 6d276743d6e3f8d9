//! Bounds-checked cursor over an immutable note container buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{NoteError, Result};

/// Positioned reader over a byte buffer.
///
/// Every read validates the requested range against `[0, len)` and fails
/// with [`NoteError::OutOfBounds`] carrying the offending offset, size and
/// buffer length. No read ever silently truncates or wraps; callers that
/// hold untrusted addresses must check them before seeking (the metadata
/// resolver does exactly that).
pub struct NoteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> NoteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Total buffer length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Seek to an absolute offset. The offset must lie within the buffer.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset >= self.buf.len() {
            return Err(NoteError::OutOfBounds {
                offset,
                size: 0,
                len: self.buf.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Seek to `len - offset`, i.e. `offset` bytes before the end.
    pub fn seek_from_end(&mut self, offset: usize) -> Result<()> {
        let len = self.buf.len();
        let target = len.checked_sub(offset).ok_or(NoteError::OutOfBounds {
            offset: 0,
            size: offset,
            len,
        })?;
        self.pos = target;
        Ok(())
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(size).ok_or(NoteError::OutOfBounds {
            offset: self.pos,
            size,
            len: self.buf.len(),
        })?;
        if end > self.buf.len() {
            return Err(NoteError::OutOfBounds {
                offset: self.pos,
                size,
                len: self.buf.len(),
            });
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read a 4-byte little-endian unsigned integer at the cursor.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// Read `size` raw bytes at the cursor.
    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8]> {
        self.take(size)
    }

    /// Read `size` bytes and decode them as UTF-8 text.
    ///
    /// The container's metadata blocks are ASCII in practice; invalid
    /// byte sequences are replaced rather than rejected so a single bad
    /// byte cannot take down record resolution.
    pub fn read_str(&mut self, size: usize) -> Result<String> {
        let bytes = self.take(size)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
