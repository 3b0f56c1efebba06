//! MIME type constants used by file refs across product types.

/// Directory-shaped products (AWS Sentinel-2 tiles, CAMS TIFF day folders).
pub const DIRECTORY: &str = "application/x-directory";

/// NetCDF files (CAMS reanalysis).
pub const NETCDF: &str = "application/netcdf";

/// GeoTIFF rasters (ASTER DEM, band files).
pub const TIFF: &str = "image/tiff";

/// HDF files (MODIS products).
pub const HDF: &str = "application/x-hdf";

/// Serialized emulator blobs.
pub const OCTET_STREAM: &str = "application/octet-stream";
