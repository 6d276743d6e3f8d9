//! Raster representation and layer compositing.

pub mod compositor;
pub mod raster;

pub use compositor::{decode_layer, render_page};
pub use raster::Raster;
