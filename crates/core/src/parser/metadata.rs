//! Metadata record resolution for note containers.
//!
//! The container stores its structure as a graph of length-prefixed text
//! blocks of `<key:value>` pairs, reachable through absolute byte offsets
//! written elsewhere in the file. There is no fixed schema; a record is
//! whatever pairs the block happens to contain.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::warn;

use super::reader::NoteReader;
use crate::error::{NoteError, Result};

/// Minimum plausible container size; anything smaller is rejected before
/// the signature is even inspected.
pub const MIN_FILE_SIZE: usize = 100;

/// Byte offset of the 20-byte signature string.
pub const SIGNATURE_OFFSET: usize = 4;
pub const SIGNATURE_LEN: usize = 20;

/// Recognized signature prefixes. The third is the legacy form carrying
/// an extra leading `note` token.
pub const SIGNATURE_PREFIXES: [&str; 3] = ["SN_FILE_VER_", "SN_FILE_ASA_", "noteSN_FILE_VER_"];

static KEY_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^:]+):([^>]*)>").unwrap());

/// A flat key → value mapping parsed from one metadata block.
///
/// Keys are unique within a block; insertion order carries no meaning.
/// Records are transient: resolved for one address, consumed, dropped.
#[derive(Debug, Clone, Default)]
pub struct MetadataRecord {
    entries: FxHashMap<String, String>,
}

impl MetadataRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value parsed as an address/integer. `None` if absent or unparseable.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.entries.get(key)?.trim().parse().ok()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn from_block(text: &str) -> Self {
        let mut entries = FxHashMap::default();
        for caps in KEY_VALUE_RE.captures_iter(text) {
            entries.insert(caps[1].to_string(), caps[2].to_string());
        }
        Self { entries }
    }
}

/// Check the container signature, rejecting anything that cannot be a
/// note document.
///
/// Returns the signature string on success. A buffer that instead starts
/// with HTML markup gets a dedicated message: an error page handed over
/// by a failed transfer looks nothing like a corrupt note file, and the
/// distinction matters to whoever reads the failure.
pub fn check_signature(buf: &[u8]) -> Result<String> {
    if buf.len() < MIN_FILE_SIZE {
        return Err(NoteError::TooSmall { len: buf.len() });
    }
    let mut reader = NoteReader::new(buf);
    reader.seek(SIGNATURE_OFFSET)?;
    let signature = reader.read_str(SIGNATURE_LEN)?;
    if SIGNATURE_PREFIXES.iter().any(|p| signature.starts_with(p)) {
        return Ok(signature);
    }
    if looks_like_markup(buf) {
        return Err(NoteError::InvalidFormat(
            "markup received instead of binary document (server error page?)".to_string(),
        ));
    }
    Err(NoteError::InvalidFormat(format!(
        "unrecognized signature at offset {SIGNATURE_OFFSET}: {signature:?}"
    )))
}

fn looks_like_markup(buf: &[u8]) -> bool {
    let head = &buf[..buf.len().min(64)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start().to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Resolve the metadata record stored at `address`.
///
/// Address `0` is the documented "no metadata here" sentinel and yields
/// an empty record. A malformed or out-of-range address also yields an
/// empty record, with a warning: real-world files carry stale pointers
/// for unused optional blocks, and one bad pointer must not abort the
/// whole conversion. Only genuinely fatal conditions are reported by the
/// callers that know an address is structurally required.
pub fn record_at(buf: &[u8], address: u32) -> MetadataRecord {
    if address == 0 {
        return MetadataRecord::empty();
    }
    match read_block(buf, address) {
        Ok(text) => MetadataRecord::from_block(&text),
        Err(err) => {
            warn!(address, %err, "unresolvable metadata address, using empty record");
            MetadataRecord::empty()
        }
    }
}

fn read_block(buf: &[u8], address: u32) -> Result<String> {
    let mut reader = NoteReader::new(buf);
    reader.seek(address as usize)?;
    let block_len = reader.read_u32()? as usize;
    if block_len == 0 {
        return Err(NoteError::InvalidFormat(format!(
            "zero-length metadata block at address {address}"
        )));
    }
    reader.read_str(block_len)
}
