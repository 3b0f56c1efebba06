//! Seams to the external raster collaborators.
//!
//! Pixel I/O and map reprojection are bounded wrappers around a third-party
//! raster library and live outside this crate; the core only issues blocking
//! calls through these traits, opening and closing one dataset per call.

use ndarray::Array2;

/// Reads the full pixel grid of a single-band raster dataset.
pub trait RasterReader: Send + Sync {
    fn read(&self, url: &str) -> anyhow::Result<Array2<f32>>;
}

/// Reprojects a pixel grid onto a target grid.
pub trait Reprojection: Send + Sync {
    fn reproject(&self, data: Array2<f32>) -> anyhow::Result<Array2<f32>>;
}
