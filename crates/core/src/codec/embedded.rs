//! Secondary layer codec: embedded general-purpose images.
//!
//! Some layers carry an ordinary compressed image (PNG in every file
//! seen so far) instead of run-length ink data. Decompression is
//! delegated to a collaborator rather than reimplemented; the default
//! collaborator wraps the `image` crate.

use tracing::warn;

/// Decodes an embedded image payload into straight-alpha RGBA pixels at
/// an exact target resolution.
///
/// Failure is soft by contract: a `None` means the layer is skipped,
/// never that the page or document fails.
pub trait EmbeddedImageDecoder: Sync {
    fn decode(&self, data: &[u8], width: usize, height: usize) -> Option<Vec<u8>>;
}

/// Default decoder backed by the `image` crate (PNG only).
#[derive(Debug, Default)]
pub struct PngDecoder;

impl EmbeddedImageDecoder for PngDecoder {
    fn decode(&self, data: &[u8], width: usize, height: usize) -> Option<Vec<u8>> {
        let img = match image::load_from_memory_with_format(data, image::ImageFormat::Png) {
            Ok(img) => img,
            Err(err) => {
                warn!(%err, "embedded image decode failed, skipping layer");
                return None;
            }
        };
        let (w, h) = (img.width() as usize, img.height() as usize);
        if (w, h) != (width, height) {
            // The contract is pixels at target resolution; no rescaling.
            warn!(
                got_width = w,
                got_height = h,
                width,
                height,
                "embedded image resolution mismatch, skipping layer"
            );
            return None;
        }
        Some(img.into_rgba8().into_raw())
    }
}
