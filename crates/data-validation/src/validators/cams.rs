//! Validators for CAMS atmospheric reanalysis products.
//!
//! CAMS data arrives either as one NetCDF file per day (`2017-09-14.nc`) or
//! as one directory of TIFF rasters per day (`2017_09_14`). Both carry
//! global coverage, so admissibility refines on the embedded date only.

use chrono::NaiveDate;
use regex::Regex;

use eo_common::{BoundingBox, TimeRange};

use crate::types;
use crate::validators::{last_segment, relative_file_name, DataValidator};

const CAMS_PATTERN: &str = r"^(\d{4})-(\d{2})-(\d{2})\.nc$";
const CAMS_TIFF_PATTERN: &str = r"^(\d{4})_(\d{2})_(\d{2})$";

fn decode_date(regex: &Regex, name: &str) -> Option<NaiveDate> {
    let caps = regex.captures(name)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn day_overlaps(date: Option<NaiveDate>, window: &TimeRange) -> bool {
    date.and_then(TimeRange::day)
        .map(|day| day.overlaps(window))
        .unwrap_or(false)
}

/// Validator for daily CAMS NetCDF files.
pub struct CamsValidator {
    regex: Regex,
}

impl CamsValidator {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(CAMS_PATTERN).expect("hard-coded pattern compiles"),
        }
    }
}

impl Default for CamsValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator for CamsValidator {
    fn name(&self) -> &'static str {
        types::CAMS
    }

    fn is_valid(&self, path: &str) -> bool {
        decode_date(&self.regex, last_segment(path)).is_some()
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        relative_file_name(path, self.is_valid(path))
    }

    fn file_pattern(&self) -> &str {
        CAMS_PATTERN
    }

    fn is_valid_for(&self, path: &str, _region: &BoundingBox, window: &TimeRange) -> bool {
        day_overlaps(decode_date(&self.regex, last_segment(path)), window)
    }
}

/// Validator for daily CAMS TIFF directories.
pub struct CamsTiffValidator {
    regex: Regex,
}

impl CamsTiffValidator {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(CAMS_TIFF_PATTERN).expect("hard-coded pattern compiles"),
        }
    }
}

impl Default for CamsTiffValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator for CamsTiffValidator {
    fn name(&self) -> &'static str {
        types::CAMS_TIFF
    }

    fn is_valid(&self, path: &str) -> bool {
        decode_date(&self.regex, last_segment(path)).is_some()
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        relative_file_name(path, self.is_valid(path))
    }

    fn file_pattern(&self) -> &str {
        CAMS_TIFF_PATTERN
    }

    fn is_valid_for(&self, path: &str, _region: &BoundingBox, window: &TimeRange) -> bool {
        day_overlaps(decode_date(&self.regex, last_segment(path)), window)
    }
}
