//! Error types for the observations crate.

use thiserror::Error;

/// Errors that can occur while assembling and serving observations.
#[derive(Error, Debug)]
pub enum ObservationsError {
    #[error("Band index {band} out of range (0..{bands})")]
    BandOutOfRange { band: usize, bands: usize },

    #[error("Unknown band name: {0}")]
    UnknownBandName(String),

    #[error("No emulator key for band index {0}")]
    UnknownEmulatorBand(usize),

    #[error(
        "No emulator matches the observed geometry on all axes \
         (vza {vza}, sza {sza}, raa {raa})"
    )]
    NoMatchingEmulator { vza: f64, sza: f64, raa: f64 },

    #[error("Emulator file name does not encode a geometry: {0}")]
    InvalidEmulatorName(String),

    #[error("No observations available in wrapper")]
    EmptyWrapper,

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse XML metadata: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Missing metadata field: {0}")]
    MissingMetadata(String),

    #[error("Invalid metadata value for {field}: {value}")]
    InvalidMetadata { field: String, value: String },

    #[error("Invalid time: {0}")]
    Time(#[from] eo_common::TimeParseError),

    #[error("Unsupported data kind: {0}")]
    UnsupportedDataKind(String),

    #[error("{what} list must be of same size as list of file names ({expected}, got {actual})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Data shape {shape:?} does not fit a {width}x{height} raster with {bands} band(s)")]
    ShapeMismatch {
        shape: Vec<usize>,
        width: usize,
        height: usize,
        bands: usize,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type for observation operations.
pub type Result<T> = std::result::Result<T, ObservationsError>;
