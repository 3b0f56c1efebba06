//! Output boundary contract: multi-file GeoTIFF sets.
//!
//! One file per logical output variable, each optionally multi-band,
//! written with DEFLATE compression, tiling and BigTIFF addressing. The
//! decision logic (list validation, band layout, reshaping of flattened
//! retrieval output) lives here; pixel I/O stays behind [`RasterSink`].

use ndarray::{Array3, ArrayD, ArrayView2, Axis};
use std::str::FromStr;

use crate::error::{ObservationsError, Result};

/// Affine geo-referencing transform, GDAL element order.
pub type GeoTransform = [f64; 6];

/// Creation options applied to every output file.
pub const GTIFF_CREATION_OPTIONS: &[&str] = &[
    "COMPRESS=DEFLATE",
    "BIGTIFF=YES",
    "PREDICTOR=1",
    "TILED=YES",
];

/// Numeric kind of an output variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Float,
    Double,
    Int,
}

impl FromStr for DataKind {
    type Err = ObservationsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Float" => Ok(DataKind::Float),
            "Double" => Ok(DataKind::Double),
            "Int" => Ok(DataKind::Int),
            other => Err(ObservationsError::UnsupportedDataKind(other.to_string())),
        }
    }
}

/// External raster-writing collaborator.
///
/// Datasets are addressed by the index they were created with; band indices
/// are zero-based.
pub trait RasterSink: Send {
    #[allow(clippy::too_many_arguments)]
    fn create_dataset(
        &mut self,
        file_name: &str,
        width: usize,
        height: usize,
        num_bands: usize,
        kind: DataKind,
        options: &[&str],
        geo_transform: &GeoTransform,
        projection: &str,
    ) -> anyhow::Result<()>;

    fn write_band(
        &mut self,
        dataset_index: usize,
        band_index: usize,
        data: ArrayView2<'_, f32>,
        offset_x: usize,
        offset_y: usize,
    ) -> anyhow::Result<()>;

    fn close(&mut self) -> anyhow::Result<()>;
}

/// Writer for a set of GeoTIFF output files.
pub struct GeoTiffWriter<S: RasterSink> {
    sink: S,
    num_bands: Vec<usize>,
    width: usize,
    height: usize,
}

impl<S: RasterSink> GeoTiffWriter<S> {
    /// Create the output datasets.
    ///
    /// `num_bands` and `data_kinds`, when given, must have one entry per
    /// file name; when absent, every file gets one band of `Float` data.
    /// File names missing a TIFF extension get `.tif` appended.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mut sink: S,
        file_names: &[String],
        geo_transform: GeoTransform,
        projection: &str,
        width: usize,
        height: usize,
        num_bands: Option<Vec<usize>>,
        data_kinds: Option<Vec<DataKind>>,
    ) -> Result<Self> {
        let count = file_names.len();
        let num_bands = match num_bands {
            None => vec![1; count],
            Some(bands) if bands.is_empty() => vec![1; count],
            Some(bands) if bands.len() == count => bands,
            Some(bands) => {
                return Err(ObservationsError::LengthMismatch {
                    what: "number of bands",
                    expected: count,
                    actual: bands.len(),
                })
            }
        };
        let data_kinds = match data_kinds {
            None => vec![DataKind::Float; count],
            Some(kinds) if kinds.is_empty() => vec![DataKind::Float; count],
            Some(kinds) if kinds.len() == count => kinds,
            Some(kinds) => {
                return Err(ObservationsError::LengthMismatch {
                    what: "data kinds",
                    expected: count,
                    actual: kinds.len(),
                })
            }
        };

        for (i, file_name) in file_names.iter().enumerate() {
            let file_name = if file_name.ends_with(".tif") || file_name.ends_with("tiff") {
                file_name.clone()
            } else {
                format!("{file_name}.tif")
            };
            sink.create_dataset(
                &file_name,
                width,
                height,
                num_bands[i],
                data_kinds[i],
                GTIFF_CREATION_OPTIONS,
                &geo_transform,
                projection,
            )?;
        }

        Ok(Self {
            sink,
            num_bands,
            width,
            height,
        })
    }

    /// Write one array per output file, optionally into a sub-window.
    ///
    /// Arrays may arrive flattened (`w·h` or `bands×w·h`); they are reshaped
    /// to the file's band layout before writing.
    pub fn write(
        &mut self,
        data: &[ArrayD<f32>],
        width: Option<usize>,
        height: Option<usize>,
        offset_x: usize,
        offset_y: usize,
    ) -> Result<()> {
        if data.len() != self.num_bands.len() {
            return Err(ObservationsError::LengthMismatch {
                what: "data arrays",
                expected: self.num_bands.len(),
                actual: data.len(),
            });
        }
        let width = width.unwrap_or(self.width);
        let height = height.unwrap_or(self.height);

        for (i, array) in data.iter().enumerate() {
            let banded = reshape_to_bands(array, self.num_bands[i], width, height)?;
            for band in 0..self.num_bands[i] {
                self.sink
                    .write_band(i, band, banded.index_axis(Axis(0), band), offset_x, offset_y)?;
            }
        }
        Ok(())
    }

    /// Flush and release all datasets.
    pub fn close(&mut self) -> Result<()> {
        self.sink.close()?;
        Ok(())
    }
}

/// Bring an output array into `(bands, width, height)` layout.
fn reshape_to_bands(
    array: &ArrayD<f32>,
    bands: usize,
    width: usize,
    height: usize,
) -> Result<Array3<f32>> {
    let mismatch = || ObservationsError::ShapeMismatch {
        shape: array.shape().to_vec(),
        width,
        height,
        bands,
    };
    let reshape = |shape: (usize, usize, usize)| {
        array
            .to_owned()
            .into_shape(shape)
            .map_err(|_| mismatch())
    };
    match array.shape() {
        &[n] if n == width * height && bands == 1 => reshape((1, width, height)),
        &[b, n] if b == bands && n == width * height => reshape((bands, width, height)),
        &[w, h] if w == width && h == height && bands == 1 => reshape((1, width, height)),
        &[b, w, h] if b == bands && w == width && h == height => reshape((bands, width, height)),
        _ => Err(mismatch()),
    }
}
