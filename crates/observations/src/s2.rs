//! Sentinel-2 surface-reflectance observations in the AWS tile layout.
//!
//! A tile directory holds one GeoTIFF per band (`B02_sur.tif`, ...) next to
//! the `metadata.xml` the angles and sensing time come from. Digital counts
//! are rescaled to reflectance by 1/10000; non-positive raw values are
//! invalid and replaced by a per-band no-data sentinel.

use ndarray::Array2;
use std::path::Path;
use std::sync::Arc;

use eo_common::{mime, FileRef};

use crate::data::{DiagonalPrecision, ObservationData};
use crate::emulator::{load_geometry_matched, Emulator, EmulatorLoader, EmulatorSet, ViewGeometry};
use crate::error::{ObservationsError, Result};
use crate::product::{Band, ObservationsCreator, ProductObservations};
use crate::raster::{RasterReader, Reprojection};
use crate::xml;

use data_validation::{types, AwsS2L2Validator, DataValidator};

/// Canonical band-file suffixes, in band-index order.
pub const BAND_NAMES: [&str; 13] = [
    "B02_sur.tif",
    "B03_sur.tif",
    "B04_sur.tif",
    "B05_sur.tif",
    "B06_sur.tif",
    "B07_sur.tif",
    "B08_sur.tif",
    "B8A_sur.tif",
    "B09_sur.tif",
    "B12_sur.tif",
    "B01_sur.tif",
    "B10_sur.tif",
    "B11_sur.tif",
];

/// Spectral band number behind each emulator key, by band index.
pub const EMULATOR_BAND_MAP: [u8; 10] = [2, 3, 4, 5, 6, 7, 8, 9, 12, 13];

/// Digital counts divide by this to give reflectance.
const SCALE_FACTOR: f32 = 10_000.0;

/// Fixed relative-uncertainty model: sd = 0.05 × reflectance.
const RELATIVE_UNCERTAINTY: f64 = 0.05;

const DEFAULT_NO_DATA: f32 = 0.0;

/// Observations read from one AWS-layout Sentinel-2 L2 tile directory.
pub struct S2Observations {
    file_ref: FileRef,
    raster_reader: Arc<dyn RasterReader>,
    reprojection: Option<Arc<dyn Reprojection>>,
    metadata: std::collections::HashMap<String, f64>,
    band_emulators: Option<EmulatorSet>,
    no_data_values: Vec<f32>,
}

impl S2Observations {
    /// Build a reader for one tile directory.
    ///
    /// Reads the tile geometry from `metadata.xml` eagerly; when an emulator
    /// folder is given, the geometry-matched emulator set is deserialized
    /// here as well.
    pub fn new(
        file_ref: FileRef,
        raster_reader: Arc<dyn RasterReader>,
        reprojection: Option<Arc<dyn Reprojection>>,
        emulator_folder: Option<&Path>,
        emulator_loader: &dyn EmulatorLoader,
    ) -> Result<Self> {
        let metadata_file = Path::new(&file_ref.url).join("metadata.xml");
        let geometry = xml::extract_angles(&metadata_file)?;
        let metadata = std::collections::HashMap::from([
            ("sza".to_string(), geometry.sza),
            ("saa".to_string(), geometry.saa),
            ("vza".to_string(), geometry.vza),
            ("vaa".to_string(), geometry.vaa),
        ]);
        let band_emulators = match emulator_folder {
            Some(folder) => load_geometry_matched(folder, &geometry, emulator_loader)?,
            None => None,
        };
        Ok(Self {
            file_ref,
            raster_reader,
            reprojection,
            metadata,
            band_emulators,
            no_data_values: vec![DEFAULT_NO_DATA; BAND_NAMES.len()],
        })
    }

    /// The tile geometry as read from the metadata.
    pub fn geometry(&self) -> ViewGeometry {
        ViewGeometry {
            sza: self.metadata["sza"],
            saa: self.metadata["saa"],
            vza: self.metadata["vza"],
            vaa: self.metadata["vaa"],
        }
    }

    /// Band-file location; falls back to the `.tiff` spelling when the
    /// `.tif` one is absent.
    fn data_set_url(&self, band_index: usize) -> String {
        let url = format!("{}/{}", self.file_ref.url, BAND_NAMES[band_index]);
        if Path::new(&url).exists() {
            url
        } else {
            format!("{url}f")
        }
    }

    fn band_emulator(&self, band_index: usize) -> Result<Option<Emulator>> {
        let Some(emulators) = &self.band_emulators else {
            return Ok(None);
        };
        let key = format!("S2A_MSI_{:02}", EMULATOR_BAND_MAP[band_index]);
        emulators
            .get(&key)
            .cloned()
            .map(Some)
            .ok_or(ObservationsError::UnknownEmulatorBand(band_index))
    }

    fn resolve_band_name(band_name: &str) -> Result<usize> {
        BAND_NAMES
            .iter()
            .position(|&name| name == band_name)
            .ok_or_else(|| ObservationsError::UnknownBandName(band_name.to_string()))
    }
}

impl ProductObservations for S2Observations {
    // TODO: derive this from an emulator description instead of the fixed
    // band map, so bands without an emulator become addressable too.
    fn bands_per_observation(&self) -> usize {
        EMULATOR_BAND_MAP.len()
    }

    fn data_type(&self) -> &'static str {
        types::AWS_S2_L2
    }

    fn get_band_data(
        &self,
        band_index: usize,
        retrieve_uncertainty: bool,
    ) -> Result<ObservationData> {
        let bands = self.bands_per_observation();
        if band_index >= bands {
            return Err(ObservationsError::BandOutOfRange {
                band: band_index,
                bands,
            });
        }

        let url = self.data_set_url(band_index);
        let mut raw = self.raster_reader.read(&url)?;
        if let Some(reprojection) = &self.reprojection {
            raw = reprojection.reproject(raw)?;
        }

        let mask: Array2<bool> = raw.mapv(|v| v > 0.0);
        let no_data = self.no_data_values[band_index];
        let observations = raw.mapv(|v| if v > 0.0 { v / SCALE_FACTOR } else { no_data });

        let uncertainty = retrieve_uncertainty.then(|| {
            DiagonalPrecision::from_relative_uncertainty(&observations, &mask, RELATIVE_UNCERTAINTY)
        });
        let emulator = self.band_emulator(band_index)?;

        Ok(ObservationData {
            observations,
            uncertainty,
            mask,
            metadata: self.metadata.clone(),
            emulator,
        })
    }

    fn get_band_data_by_name(
        &self,
        band_name: &str,
        retrieve_uncertainty: bool,
    ) -> Result<ObservationData> {
        let band_index = Self::resolve_band_name(band_name)?;
        self.get_band_data(band_index, retrieve_uncertainty)
    }

    fn set_no_data_value(&mut self, band: Band, no_data_value: f32) -> Result<()> {
        let band_index = match band {
            Band::Index(index) => index,
            Band::Name(name) => Self::resolve_band_name(&name)?,
        };
        if band_index >= self.no_data_values.len() {
            return Err(ObservationsError::BandOutOfRange {
                band: band_index,
                bands: self.no_data_values.len(),
            });
        }
        self.no_data_values[band_index] = no_data_value;
        Ok(())
    }
}

/// Builds [`S2Observations`] for file refs recognized as corrected AWS
/// Sentinel-2 tiles.
pub struct S2ObservationsCreator {
    raster_reader: Arc<dyn RasterReader>,
    emulator_loader: Arc<dyn EmulatorLoader>,
    validator: AwsS2L2Validator,
}

impl S2ObservationsCreator {
    pub fn new(
        raster_reader: Arc<dyn RasterReader>,
        emulator_loader: Arc<dyn EmulatorLoader>,
    ) -> Self {
        Self {
            raster_reader,
            emulator_loader,
            validator: AwsS2L2Validator::new(),
        }
    }
}

impl ObservationsCreator for S2ObservationsCreator {
    fn can_read(&self, file_ref: &FileRef) -> bool {
        self.validator.is_valid(&file_ref.url) && file_ref.mime_type == mime::DIRECTORY
    }

    fn create(
        &self,
        file_ref: &FileRef,
        reprojection: Option<Arc<dyn Reprojection>>,
        emulator_folder: Option<&Path>,
    ) -> Result<Box<dyn ProductObservations>> {
        Ok(Box::new(S2Observations::new(
            file_ref.clone(),
            self.raster_reader.clone(),
            reprojection,
            emulator_folder,
            self.emulator_loader.as_ref(),
        )?))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use chrono::{TimeZone, Utc};
    use ndarray::array;

    fn tile_file_ref(url: &str) -> FileRef {
        FileRef::new(
            url,
            Utc.with_ymd_and_hms(2017, 9, 4, 11, 18, 25).unwrap(),
            Utc.with_ymd_and_hms(2017, 9, 4, 11, 18, 25).unwrap(),
            mime::DIRECTORY,
        )
    }

    fn make_observations(root: &std::path::Path, raw: Array2<f32>) -> S2Observations {
        let tile = make_tile_dir(root);
        S2Observations::new(
            tile_file_ref(tile.to_str().unwrap()),
            Arc::new(FixedReader(raw)),
            None,
            None,
            &FakeEmulatorLoader,
        )
        .unwrap()
    }

    #[test]
    fn test_band_data_scaling_and_mask() {
        let dir = tempfile::tempdir().unwrap();
        let observations =
            make_observations(dir.path(), array![[1000.0, 5000.0], [0.0, -32768.0]]);

        let band = observations.get_band_data(0, false).unwrap();
        assert!((band.observations[[0, 0]] - 0.1).abs() < 1e-6);
        assert!((band.observations[[0, 1]] - 0.5).abs() < 1e-6);
        // non-positive raw counts are invalid and carry the sentinel
        assert_eq!(band.observations[[1, 0]], 0.0);
        assert_eq!(band.observations[[1, 1]], 0.0);
        assert_eq!(band.mask, array![[true, true], [false, false]]);
        assert!(band.uncertainty.is_none());
        assert!((band.metadata["sza"] - 34.2).abs() < 1e-9);
    }

    #[test]
    fn test_uncertainty_is_inverse_variance() {
        let dir = tempfile::tempdir().unwrap();
        let observations = make_observations(dir.path(), array![[2000.0, 0.0]]);

        let band = observations.get_band_data(0, true).unwrap();
        let precision = band.uncertainty.unwrap();
        assert_eq!(precision.size(), 2);
        let sd = 0.05 * 0.2;
        assert!(((precision.get(0) - 1.0 / (sd * sd)) / precision.get(0)).abs() < 1e-6);
        assert_eq!(precision.get(1), 0.0);
    }

    #[test]
    fn test_no_data_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut observations = make_observations(dir.path(), array![[-1.0, 4000.0]]);

        observations
            .set_no_data_value(Band::Name("B02_sur.tif".to_string()), f32::NAN)
            .unwrap();
        let band = observations.get_band_data(0, false).unwrap();
        assert!(band.observations[[0, 0]].is_nan());
        // other bands keep the default sentinel
        let other = observations.get_band_data(1, false).unwrap();
        assert_eq!(other.observations[[0, 0]], 0.0);
    }

    #[test]
    fn test_band_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let observations = make_observations(dir.path(), array![[1.0]]);
        assert_eq!(observations.bands_per_observation(), 10);
        assert!(matches!(
            observations.get_band_data(10, false),
            Err(ObservationsError::BandOutOfRange { .. })
        ));
    }

    #[test]
    fn test_band_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let observations = make_observations(dir.path(), array![[3000.0]]);
        let band = observations.get_band_data_by_name("B04_sur.tif", false).unwrap();
        assert!((band.observations[[0, 0]] - 0.3).abs() < 1e-6);
        assert!(matches!(
            observations.get_band_data_by_name("B99_sur.tif", false),
            Err(ObservationsError::UnknownBandName(_))
        ));
    }

    #[test]
    fn test_emulator_attached_per_band() {
        let dir = tempfile::tempdir().unwrap();
        let tile = make_tile_dir(dir.path());
        let emulator_dir = dir.path().join("emulators");
        std::fs::create_dir(&emulator_dir).unwrap();
        // vza 6, sza 34.2, raa |110 - 155.8| = 45.8
        std::fs::write(emulator_dir.join("emus_S2A_5_35_45.pkl"), b"blob").unwrap();

        let observations = S2Observations::new(
            tile_file_ref(tile.to_str().unwrap()),
            Arc::new(FixedReader(array![[100.0]])),
            None,
            Some(&emulator_dir),
            &FakeEmulatorLoader,
        )
        .unwrap();

        let band = observations.get_band_data(0, false).unwrap();
        let emulator = band.emulator.unwrap();
        assert_eq!(emulator.bytes(), b"blob");
    }

    #[test]
    fn test_creator_probes_tile_layout() {
        let dir = tempfile::tempdir().unwrap();
        let tile = make_tile_dir(dir.path());
        let creator = S2ObservationsCreator::new(
            Arc::new(FixedReader(array![[1.0]])),
            Arc::new(FakeEmulatorLoader),
        );
        assert!(creator.can_read(&tile_file_ref(tile.to_str().unwrap())));
        assert!(!creator.can_read(&tile_file_ref("/not/a/tile")));
    }

    #[test]
    fn test_data_type() {
        let dir = tempfile::tempdir().unwrap();
        let observations = make_observations(dir.path(), array![[1.0]]);
        assert_eq!(observations.data_type(), types::AWS_S2_L2);
    }
}
