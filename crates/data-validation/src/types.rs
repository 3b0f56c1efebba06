//! The catalogue of known product type identifiers.
//!
//! These strings are the stable external vocabulary for "what kind of
//! product is this" and are relied upon by directory scanners and
//! downstream retrieval tools.

/// AWS-layout Sentinel-2 Level-1C tile directory.
pub const AWS_S2_L1C: &str = "AWS_S2_L1C";

/// AWS-layout Sentinel-2 tile directory with atmospherically-corrected
/// surface reflectance bands.
pub const AWS_S2_L2: &str = "AWS_S2_L2";

/// MODIS BRDF/albedo model parameters, collection 6.
pub const MCD43A1: &str = "MCD43A1.006";

/// MODIS leaf area index, collection 6.
pub const MCD15A2H: &str = "MCD15A2H.006";

/// CAMS atmospheric reanalysis, NetCDF file per day.
pub const CAMS: &str = "CAMS";

/// CAMS atmospheric reanalysis converted to a TIFF directory per day.
pub const CAMS_TIFF: &str = "CAMS_TIFF";

/// Isotropic MSI radiative-transfer emulators for Sentinel-2A.
pub const ISO_MSI_A_EMU: &str = "ISO_MSI_A_EMU";

/// Isotropic MSI radiative-transfer emulators for Sentinel-2B.
pub const ISO_MSI_B_EMU: &str = "ISO_MSI_B_EMU";

/// Water-vapour retrieval emulators for Sentinel-2 MSI.
pub const WV_EMU: &str = "WV_EMU";

/// ASTER global DEM tile.
pub const ASTER: &str = "ASTER";
