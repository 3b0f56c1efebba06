//! Validators for Sentinel-2 tiles in the AWS directory layout.
//!
//! AWS stores Sentinel-2 granules under
//! `<utm-zone>/<lat-band>/<square>/<year>/<month>/<day>/<index>`. The L1C
//! validator accepts that layout structurally; the L2 validator additionally
//! requires the directory to hold atmospherically-corrected surface
//! reflectance bands (`*_sur.tif`) next to a `metadata.xml`. Only the
//! directory listing is consulted, never file payloads.

use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;

use eo_common::{BoundingBox, TimeRange};

use crate::types;
use crate::validators::DataValidator;

/// Trailing tiled-grid layout: UTM zone / latitude band / square /
/// year / month / day / granule index.
const AWS_S2_PATTERN: &str =
    r"(\d{1,2})/([C-HJ-NP-X])/([A-Z]{2})/(20\d{2})/(\d{1,2})/(\d{1,2})/(\d+)/?$";

struct AwsS2Grid {
    regex: Regex,
}

impl AwsS2Grid {
    fn new() -> Self {
        Self {
            regex: Regex::new(AWS_S2_PATTERN).expect("hard-coded pattern compiles"),
        }
    }

    /// Match the trailing grid layout and decode its embedded parts.
    fn matches(&self, path: &str) -> Option<(usize, NaiveDate)> {
        let caps = self.regex.captures(path)?;
        let zone: u32 = caps.get(1)?.as_str().parse().ok()?;
        if zone == 0 || zone > 60 {
            return None;
        }
        let year: i32 = caps.get(4)?.as_str().parse().ok()?;
        let month: u32 = caps.get(5)?.as_str().parse().ok()?;
        let day: u32 = caps.get(6)?.as_str().parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some((caps.get(1)?.start(), date))
    }

    fn relative_path(&self, path: &str) -> Option<String> {
        self.matches(path).map(|(start, _)| path[start..].to_string())
    }

    fn overlaps_window(&self, path: &str, window: &TimeRange) -> bool {
        match self.matches(path) {
            Some((_, date)) => match TimeRange::day(date) {
                Some(day) => day.overlaps(window),
                None => false,
            },
            None => false,
        }
    }
}

/// Validator for AWS-layout Sentinel-2 L1C tile directories.
pub struct AwsS2L1Validator {
    grid: AwsS2Grid,
}

impl AwsS2L1Validator {
    pub fn new() -> Self {
        Self {
            grid: AwsS2Grid::new(),
        }
    }
}

impl Default for AwsS2L1Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator for AwsS2L1Validator {
    fn name(&self) -> &'static str {
        types::AWS_S2_L1C
    }

    fn is_valid(&self, path: &str) -> bool {
        self.grid.matches(path).is_some()
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        self.grid.relative_path(path)
    }

    fn file_pattern(&self) -> &str {
        AWS_S2_PATTERN
    }

    // The MGRS code in the path would allow a spatial check as well; the
    // footprint lookup is not worth carrying here, so admissibility refines
    // on the embedded date only.
    fn is_valid_for(&self, path: &str, _region: &BoundingBox, window: &TimeRange) -> bool {
        self.grid.overlaps_window(path, window)
    }
}

/// Validator for AWS-layout Sentinel-2 directories holding surface
/// reflectance (L2) bands.
pub struct AwsS2L2Validator {
    grid: AwsS2Grid,
}

impl AwsS2L2Validator {
    pub fn new() -> Self {
        Self {
            grid: AwsS2Grid::new(),
        }
    }

    /// True iff the directory listing shows corrected band output:
    /// a `metadata.xml` plus at least one `*_sur.tif`/`*_sur.tiff`.
    fn has_corrected_bands(path: &str) -> bool {
        let dir = Path::new(path);
        if !dir.join("metadata.xml").is_file() {
            return false;
        }
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.flatten().any(|e| {
                let name = e.file_name();
                let name = name.to_string_lossy();
                name.ends_with("_sur.tif") || name.ends_with("_sur.tiff")
            }),
            Err(_) => false,
        }
    }
}

impl Default for AwsS2L2Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator for AwsS2L2Validator {
    fn name(&self) -> &'static str {
        types::AWS_S2_L2
    }

    fn is_valid(&self, path: &str) -> bool {
        self.grid.matches(path).is_some() && Self::has_corrected_bands(path)
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        self.grid.relative_path(path)
    }

    fn file_pattern(&self) -> &str {
        AWS_S2_PATTERN
    }

    fn is_valid_for(&self, path: &str, _region: &BoundingBox, window: &TimeRange) -> bool {
        self.is_valid(path) && self.grid.overlaps_window(path, window)
    }
}
