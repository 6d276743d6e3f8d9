//! Color-code palette for the run-length codec.
//!
//! The pen hardware writes a small set of named color codes; everything
//! outside the table is an anti-aliased edge pixel whose byte value IS
//! its grayscale intensity.

/// Named color codes used by the encoder.
pub const CODE_BLACK: u8 = 0x61;
pub const CODE_TRANSPARENT: u8 = 0x62;
pub const CODE_WHITE: u8 = 0x65;
pub const CODE_DARK_GRAY: u8 = 0x9D;
pub const CODE_DARK_GRAY_COMPAT: u8 = 0x9E;
pub const CODE_GRAY: u8 = 0xC9;
pub const CODE_GRAY_COMPAT: u8 = 0xCA;

/// An RGBA pixel value.
pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [0xFF, 0xFF, 0xFF, 0xFF];
pub const TRANSPARENT: Rgba = [0x00, 0x00, 0x00, 0x00];

/// Resolve a color code to its RGBA value.
///
/// The two compat codes are near-duplicates some firmware revisions emit
/// for the same ink shade; both fold onto the canonical gray.
pub fn resolve(code: u8) -> Rgba {
    match code {
        CODE_BLACK => [0x00, 0x00, 0x00, 0xFF],
        CODE_TRANSPARENT => TRANSPARENT,
        CODE_WHITE => WHITE,
        CODE_DARK_GRAY | CODE_DARK_GRAY_COMPAT => {
            [CODE_DARK_GRAY, CODE_DARK_GRAY, CODE_DARK_GRAY, 0xFF]
        }
        CODE_GRAY | CODE_GRAY_COMPAT => [CODE_GRAY, CODE_GRAY, CODE_GRAY, 0xFF],
        v => [v, v, v, 0xFF],
    }
}
