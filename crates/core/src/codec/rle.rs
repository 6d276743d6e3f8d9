//! RATTA_RLE run-length decoder.
//!
//! The codec is a stream of (color code, length code) byte pairs. A
//! length code with its high bit set opens a two-pair escape: its low
//! 7 bits carry the high part of an extended run length that the next
//! pair completes. Length code 0xFF is its own special case, a run of
//! exactly 16384 pixels.
//!
//! Decoding is deliberately lenient. Well-formed files can legitimately
//! end mid-run, so truncated or oversized output degrades to
//! padding/truncation instead of an error.

use tracing::debug;

use crate::model::color::CODE_TRANSPARENT;

/// Run length encoded by the 0xFF length code.
const SPECIAL_LENGTH: usize = 16384;

/// Decoder state between byte pairs.
///
/// The escape handling has exactly two states; a tagged enum keeps the
/// four decode rules exhaustively matched instead of threading a
/// nullable held-pair variable through the loop.
enum RunState {
    Idle,
    PendingEscape { color: u8, length_code: u8 },
}

fn escape_high_part(length_code: u8) -> usize {
    (((length_code & 0x7F) as usize) + 1) << 7
}

/// Decode a compressed layer bitmap into exactly `expected` color codes.
///
/// The output always has `expected` entries: short streams are padded
/// with the transparent code, long streams are truncated.
pub fn decode(data: &[u8], expected: usize) -> Vec<u8> {
    let mut out = vec![CODE_TRANSPARENT; expected];
    let mut pos = 0usize;

    let emit = |out: &mut Vec<u8>, pos: &mut usize, color: u8, run: usize| {
        let take = run.min(expected - *pos);
        out[*pos..*pos + take].fill(color);
        *pos += take;
    };

    let mut state = RunState::Idle;
    for pair in data.chunks_exact(2) {
        let (color, length_code) = (pair[0], pair[1]);
        match state {
            RunState::PendingEscape {
                color: held_color,
                length_code: held_length,
            } => {
                if color == held_color {
                    // The held pair's low 7 bits form the high part of
                    // an extended run completed by this pair.
                    let run = 1 + length_code as usize + escape_high_part(held_length);
                    emit(&mut out, &mut pos, color, run);
                } else {
                    // Color changed: the escape stands alone. Flush it,
                    // then start an ordinary run with the current pair.
                    emit(&mut out, &mut pos, held_color, escape_high_part(held_length));
                    emit(&mut out, &mut pos, color, length_code as usize + 1);
                }
                state = RunState::Idle;
            }
            RunState::Idle => {
                if length_code == 0xFF {
                    emit(&mut out, &mut pos, color, SPECIAL_LENGTH);
                } else if length_code & 0x80 != 0 {
                    state = RunState::PendingEscape { color, length_code };
                } else {
                    emit(&mut out, &mut pos, color, length_code as usize + 1);
                }
            }
        }
        if pos >= expected {
            break;
        }
    }

    // An unresolved trailing escape is flushed capped to the remaining
    // capacity so it cannot overrun the raster.
    if let RunState::PendingEscape { color, length_code } = state {
        emit(&mut out, &mut pos, color, escape_high_part(length_code));
    }

    if data.len() % 2 != 0 {
        debug!(len = data.len(), "odd trailing byte in run-length stream ignored");
    }
    if pos < expected {
        debug!(
            decoded = pos,
            expected, "run-length stream short of raster size, padded with transparent"
        );
    }
    out
}
