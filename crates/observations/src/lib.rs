//! Observation assembly for heterogeneous earth-observation archives.
//!
//! Given a list of [`eo_common::FileRef`]s spanning time, this crate selects
//! the correct reader for each, builds per-timestamp observation objects,
//! sorts them chronologically and serves band-level data (reflectance,
//! uncertainty, mask, emulator) to callers that only know a timestamp and a
//! band.
//!
//! Raster pixel I/O and map reprojection stay behind the [`RasterReader`]
//! and [`Reprojection`] traits; emulator deserialization stays behind
//! [`EmulatorLoader`]. The core issues blocking calls to those collaborators
//! and holds no long-lived handles.

pub mod data;
pub mod emulator;
pub mod error;
pub mod factory;
pub mod file_refs;
pub mod output;
pub mod product;
pub mod raster;
pub mod s2;
pub mod xml;

pub use data::{DiagonalPrecision, ObservationData};
pub use emulator::{
    select_emulator_file, Emulator, EmulatorEncoding, EmulatorLoader, EmulatorSet, ViewGeometry,
};
pub use error::{ObservationsError, Result};
pub use factory::{ObservationsCreatorRegistry, ObservationsFactory, ObservationsWrapper};
pub use file_refs::{AwsS2L2FileRefCreator, FileRefCreation, FileRefCreator};
pub use output::{DataKind, GeoTiffWriter, GeoTransform, RasterSink};
pub use product::{Band, ObservationsCreator, ProductObservations};
pub use raster::{RasterReader, Reprojection};
pub use s2::{S2Observations, S2ObservationsCreator, BAND_NAMES, EMULATOR_BAND_MAP};
