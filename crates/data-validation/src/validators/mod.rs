//! The validator family: one validator per known product type.

mod aster;
mod cams;
mod emulators;
mod modis;
mod s2_aws;

pub use aster::AsterValidator;
pub use cams::{CamsTiffValidator, CamsValidator};
pub use emulators::{S2aEmulatorValidator, S2bEmulatorValidator, WvEmulatorValidator};
pub use modis::{ModisMcd15Validator, ModisMcd43Validator};
pub use s2_aws::{AwsS2L1Validator, AwsS2L2Validator};

use eo_common::{BoundingBox, TimeRange};

/// Decides whether a path belongs to one known product type.
///
/// Decisions are made from the path's trailing segments only; payloads are
/// never opened. `is_valid_for` refines the structural check with temporal
/// and/or spatial admissibility where the naming convention embeds a date or
/// tile code; types without embedded geometry or time fall back to
/// `is_valid`.
pub trait DataValidator: Send + Sync {
    /// The registered type identifier.
    fn name(&self) -> &'static str;

    /// True iff the path's trailing segment(s) satisfy this type's
    /// structural pattern.
    fn is_valid(&self, path: &str) -> bool;

    /// The suffix of `path` starting at the first component that matches
    /// this type's structural pattern, or `None` if the path does not match.
    ///
    /// Used to normalize absolute paths from different mount points into a
    /// comparable relative key. Idempotent on already-relative paths.
    fn get_relative_path(&self, path: &str) -> Option<String>;

    /// The naming-convention pattern relied upon by directory scanners to
    /// enumerate candidates. Changing a pattern is a breaking change.
    fn file_pattern(&self) -> &str;

    /// Admissibility beyond naming: temporal overlap of the embedded date
    /// with `window` (inclusive) and/or spatial intersection of the tile
    /// footprint with `region`.
    fn is_valid_for(&self, path: &str, _region: &BoundingBox, _window: &TimeRange) -> bool {
        self.is_valid(path)
    }
}

/// Last path segment, ignoring a trailing separator.
pub(crate) fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Relative path for filename-addressed types: the file name itself,
/// provided it matches the pattern.
pub(crate) fn relative_file_name(path: &str, matches: bool) -> Option<String> {
    if matches {
        Some(last_segment(path).to_string())
    } else {
        None
    }
}
