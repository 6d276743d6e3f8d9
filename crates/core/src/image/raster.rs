//! Fixed-size RGBA raster with source-over compositing.

use crate::model::color::{self, Rgba};

/// A width × height RGBA pixel grid.
///
/// The pixel buffer is always exactly `width * height * 4` bytes. Rasters
/// are mutable while a page is being composited and handed to the
/// emitter immutably afterwards; they are never shared between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// An opaque white canvas, the starting point of every page.
    pub fn white(width: usize, height: usize) -> Self {
        let pixels = vec![0xFF; width * height * 4];
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build a raster from decoded color codes (one byte per pixel).
    ///
    /// `codes` must already be exactly `width * height` long; the
    /// run-length decoder guarantees that.
    pub fn from_codes(codes: &[u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(codes.len(), width * height);
        let mut pixels = Vec::with_capacity(width * height * 4);
        for &code in codes {
            pixels.extend_from_slice(&color::resolve(code));
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap raw RGBA bytes. Returns `None` on a size mismatch.
    pub fn from_rgba(pixels: Vec<u8>, width: usize, height: usize) -> Option<Self> {
        if pixels.len() != width * height * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Composite `src` onto `self` with source-over alpha blending.
    ///
    /// Alpha 0 leaves the destination untouched, alpha 255 overwrites it,
    /// anything in between blends with rounding. The destination pixel is
    /// always left fully opaque.
    pub fn composite_over(&mut self, src: &Raster) {
        debug_assert_eq!((self.width, self.height), (src.width, src.height));
        for (dst, s) in self.pixels.chunks_exact_mut(4).zip(src.pixels.chunks_exact(4)) {
            let alpha = s[3] as u32;
            match alpha {
                0 => {}
                255 => {
                    dst.copy_from_slice(s);
                    dst[3] = 0xFF;
                }
                a => {
                    for c in 0..3 {
                        let blended = s[c] as u32 * a + dst[c] as u32 * (255 - a);
                        // Round to nearest over the 0..255*255 range.
                        dst[c] = ((blended + 127) / 255) as u8;
                    }
                    dst[3] = 0xFF;
                }
            }
        }
    }

    /// Drop the alpha channel, yielding tightly packed RGB bytes.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        for px in self.pixels.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: usize, height: usize, px: Rgba) -> Raster {
        let pixels = px.repeat(width * height);
        Raster::from_rgba(pixels, width, height).unwrap()
    }

    #[test]
    fn opaque_layer_overwrites() {
        let mut canvas = Raster::white(2, 2);
        let layer = uniform(2, 2, [10, 20, 30, 255]);
        canvas.composite_over(&layer);
        assert_eq!(canvas, layer);
    }

    #[test]
    fn transparent_layer_is_noop() {
        let mut canvas = Raster::white(3, 1);
        let before = canvas.clone();
        canvas.composite_over(&uniform(3, 1, [0, 0, 0, 0]));
        assert_eq!(canvas, before);
    }

    #[test]
    fn half_alpha_black_on_white_blends_to_mid_gray() {
        let mut canvas = Raster::white(1, 1);
        canvas.composite_over(&uniform(1, 1, [0, 0, 0, 128]));
        let [r, g, b, a] = canvas.pixel(0, 0);
        // 0*128/255 + 255*127/255 rounds to 127.
        assert!((126..=128).contains(&r));
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn rgb_drops_alpha() {
        let r = uniform(2, 1, [1, 2, 3, 77]);
        assert_eq!(r.to_rgb(), vec![1, 2, 3, 1, 2, 3]);
    }
}
