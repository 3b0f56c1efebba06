//! Geometry-matched selection of radiative-transfer emulators.
//!
//! An emulator directory holds one serialized model per acquisition
//! geometry, named with trailing underscore-separated angle tokens
//! `..._<vza>_<sza>_<raa>.pkl`. Given an observed geometry, the selector
//! picks the single file matching the per-axis nearest catalogue values on
//! all three axes simultaneously.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ObservationsError, Result};

/// Observed sun/view geometry of one acquisition, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    /// Sun zenith angle.
    pub sza: f64,
    /// Sun azimuth angle.
    pub saa: f64,
    /// View zenith angle.
    pub vza: f64,
    /// View azimuth angle.
    pub vaa: f64,
}

impl ViewGeometry {
    /// Relative azimuth: absolute difference between view and sun azimuth.
    pub fn relative_azimuth(&self) -> f64 {
        (self.vaa - self.saa).abs()
    }
}

/// Text decoding convention of a serialized emulator.
///
/// Two historical variants of the loader disagree on whether the payload
/// assumes a latin-1 decoding; the true on-disk convention is unresolved, so
/// blobs carry their assumed encoding alongside the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulatorEncoding {
    Latin1,
    Raw,
}

/// An opaque deserialized radiative-transfer surrogate model.
#[derive(Debug, Clone)]
pub struct Emulator {
    encoding: EmulatorEncoding,
    bytes: Vec<u8>,
}

impl Emulator {
    pub fn new(encoding: EmulatorEncoding, bytes: Vec<u8>) -> Self {
        Self { encoding, bytes }
    }

    pub fn encoding(&self) -> EmulatorEncoding {
        self.encoding
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Per-band emulators from one file, keyed by model id (e.g. `S2A_MSI_02`).
pub type EmulatorSet = HashMap<String, Emulator>;

/// Deserializes a selected emulator file into its per-band models.
///
/// Deserialization is a collaborator seam: the serialized format is an
/// opaque versioned blob and is not interpreted by this crate.
pub trait EmulatorLoader: Send + Sync {
    fn load(&self, path: &Path) -> anyhow::Result<EmulatorSet>;
}

/// Angle tokens decoded from an emulator file name.
#[derive(Debug, Clone, Copy)]
struct FileGeometry {
    vza: f64,
    sza: f64,
    raa: f64,
}

fn decode_file_name(name: &str) -> Result<FileGeometry> {
    let invalid = || ObservationsError::InvalidEmulatorName(name.to_string());
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return Err(invalid());
    }
    let vza: f64 = parts[parts.len() - 3].parse().map_err(|_| invalid())?;
    let sza: f64 = parts[parts.len() - 2].parse().map_err(|_| invalid())?;
    let raa: f64 = parts[parts.len() - 1]
        .split('.')
        .next()
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())?;
    Ok(FileGeometry { vza, sza, raa })
}

/// Catalogue value nearest to `target`; scan order breaks ties, so with
/// values in ascending file order the first-encountered candidate wins.
fn nearest(values: &[f64], target: f64) -> f64 {
    let mut best = values[0];
    for &value in &values[1..] {
        if (value - target).abs() < (best - target).abs() {
            best = value;
        }
    }
    best
}

/// Select the emulator file best matching the observed geometry.
///
/// For each angular axis independently, the catalogue value nearest to the
/// observed value is found; a file qualifies only if it carries the nearest
/// value on all three axes at once, and the first qualifying file in sorted
/// name order is returned. An empty directory yields `Ok(None)`. The
/// catalogue is expected to be fully gridded, so independently-nearest
/// values that co-occur in no file are reported as a lookup error.
pub fn select_emulator_file(folder: &Path, geometry: &ViewGeometry) -> Result<Option<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().map(|ext| ext == "pkl").unwrap_or(false))
        .collect();
    if files.is_empty() {
        return Ok(None);
    }
    files.sort();

    let mut decoded = Vec::with_capacity(files.len());
    for file in &files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ObservationsError::InvalidEmulatorName(file.display().to_string()))?;
        decoded.push(decode_file_name(name)?);
    }

    let raa = geometry.relative_azimuth();
    let vzas: Vec<f64> = decoded.iter().map(|g| g.vza).collect();
    let szas: Vec<f64> = decoded.iter().map(|g| g.sza).collect();
    let raas: Vec<f64> = decoded.iter().map(|g| g.raa).collect();
    let best_vza = nearest(&vzas, geometry.vza);
    let best_sza = nearest(&szas, geometry.sza);
    let best_raa = nearest(&raas, raa);

    for (file, file_geometry) in files.iter().zip(&decoded) {
        if file_geometry.vza == best_vza
            && file_geometry.sza == best_sza
            && file_geometry.raa == best_raa
        {
            debug!(file = %file.display(), "selected emulator");
            return Ok(Some(file.clone()));
        }
    }

    Err(ObservationsError::NoMatchingEmulator {
        vza: best_vza,
        sza: best_sza,
        raa: best_raa,
    })
}

/// Select and deserialize the emulators for one acquisition geometry.
pub fn load_geometry_matched(
    folder: &Path,
    geometry: &ViewGeometry,
    loader: &dyn EmulatorLoader,
) -> Result<Option<EmulatorSet>> {
    match select_emulator_file(folder, geometry)? {
        Some(file) => Ok(Some(loader.load(&file)?)),
        None => Ok(None),
    }
}
