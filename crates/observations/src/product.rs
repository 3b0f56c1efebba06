//! The per-source-type reader contract.

use std::path::Path;
use std::sync::Arc;

use eo_common::FileRef;

use crate::data::ObservationData;
use crate::error::Result;
use crate::raster::Reprojection;

/// A band addressed by index or by canonical file-name suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Band {
    Index(usize),
    Name(String),
}

impl From<usize> for Band {
    fn from(index: usize) -> Self {
        Band::Index(index)
    }
}

impl From<&str> for Band {
    fn from(name: &str) -> Self {
        Band::Name(name.to_string())
    }
}

/// Per-source-type reader serving band-level data for one time slot.
///
/// An instance owns one file ref, an optional reprojection target and an
/// optional emulator source; it lives for one retrieval session. Apart from
/// the per-band no-data override table (mutable through
/// [`set_no_data_value`](ProductObservations::set_no_data_value)) instances
/// are stateless between calls.
pub trait ProductObservations: Send + Sync {
    /// Number of distinguishable band channels this source exposes for one
    /// time slot.
    fn bands_per_observation(&self) -> usize;

    /// The catalogue type identifier this instance was built from.
    fn data_type(&self) -> &'static str;

    /// Read one band. Fails with a band-index error if `band_index` is not
    /// in `[0, bands_per_observation)`.
    fn get_band_data(&self, band_index: usize, retrieve_uncertainty: bool)
        -> Result<ObservationData>;

    /// Resolve `band_name` against the source's band-name table, then read
    /// that band.
    fn get_band_data_by_name(
        &self,
        band_name: &str,
        retrieve_uncertainty: bool,
    ) -> Result<ObservationData>;

    /// Override the sentinel written to invalid pixels of one band.
    fn set_no_data_value(&mut self, band: Band, no_data_value: f32) -> Result<()>;
}

/// Capability probe and builder for one product type.
///
/// Creators are held in an ordered list; the first whose `can_read` accepts
/// a file ref builds the reader for it. Registration order is the tie-break.
pub trait ObservationsCreator: Send + Sync {
    /// True iff this creator can read the referenced product.
    fn can_read(&self, file_ref: &FileRef) -> bool;

    /// Build the reader for one time slot.
    fn create(
        &self,
        file_ref: &FileRef,
        reprojection: Option<Arc<dyn Reprojection>>,
        emulator_folder: Option<&Path>,
    ) -> Result<Box<dyn ProductObservations>>;
}
