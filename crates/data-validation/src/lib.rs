//! Data-type classification for earth-observation archives.
//!
//! Given an arbitrary file or directory path, decides which of a fixed
//! catalogue of product types it belongs to, from naming conventions alone
//! (plus optional spatio-temporal admissibility checks). Payloads are never
//! opened or parsed.
//!
//! The catalogue covers AWS-layout Sentinel-2 tiles (L1C and
//! atmospherically-corrected L2), MODIS products, CAMS reanalysis, ASTER DEM
//! tiles, and serialized radiative-transfer emulators.

pub mod error;
pub mod registry;
pub mod types;
pub mod validators;

pub use error::{Result, ValidationError};
pub use registry::ValidatorRegistry;
pub use validators::{
    AsterValidator, AwsS2L1Validator, AwsS2L2Validator, CamsTiffValidator, CamsValidator,
    DataValidator, ModisMcd15Validator, ModisMcd43Validator, S2aEmulatorValidator,
    S2bEmulatorValidator, WvEmulatorValidator,
};
