//! Validator for ASTER global DEM tiles.

use regex::Regex;

use eo_common::{BoundingBox, TimeRange};

use crate::types;
use crate::validators::{last_segment, relative_file_name, DataValidator};

const ASTER_PATTERN: &str = r"^ASTGTM2_([NS])(\d{2})([EW])(\d{3})_dem\.tif$";

/// Validator for ASTER GDEM v2 tiles.
///
/// The file name encodes the south-west corner of a 1°×1° tile
/// (`ASTGTM2_N38W009_dem.tif`). DEM tiles carry no temporal component, so
/// admissibility refines on the footprint only.
pub struct AsterValidator {
    regex: Regex,
}

impl AsterValidator {
    pub fn new() -> Self {
        Self {
            regex: Regex::new(ASTER_PATTERN).expect("hard-coded pattern compiles"),
        }
    }

    /// Decode the 1°×1° footprint from the corner code.
    fn footprint(&self, path: &str) -> Option<BoundingBox> {
        let caps = self.regex.captures(last_segment(path))?;
        let lat: f64 = caps.get(2)?.as_str().parse().ok()?;
        let lon: f64 = caps.get(4)?.as_str().parse().ok()?;
        let lat = if caps.get(1)?.as_str() == "S" { -lat } else { lat };
        let lon = if caps.get(3)?.as_str() == "W" { -lon } else { lon };
        if !(-90.0..=89.0).contains(&lat) || !(-180.0..=179.0).contains(&lon) {
            return None;
        }
        Some(BoundingBox::new(lon, lat, lon + 1.0, lat + 1.0))
    }
}

impl Default for AsterValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator for AsterValidator {
    fn name(&self) -> &'static str {
        types::ASTER
    }

    fn is_valid(&self, path: &str) -> bool {
        self.footprint(path).is_some()
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        relative_file_name(path, self.is_valid(path))
    }

    fn file_pattern(&self) -> &str {
        ASTER_PATTERN
    }

    fn is_valid_for(&self, path: &str, region: &BoundingBox, _window: &TimeRange) -> bool {
        match self.footprint(path) {
            Some(tile) => tile.intersects(region),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eo_common::parse_datetime;

    #[test]
    fn test_valid_names() {
        let validator = AsterValidator::new();
        assert!(validator.is_valid("ASTGTM2_N38W009_dem.tif"));
        assert!(validator.is_valid("/dem/ASTGTM2_S02E136_dem.tif"));
        assert!(!validator.is_valid("ASTGTM2_N38W009_num.tif"));
        assert!(!validator.is_valid("ASTGTM2_N38W09_dem.tif"));
    }

    #[test]
    fn test_footprint_intersection() {
        let validator = AsterValidator::new();
        let window = TimeRange::new(
            parse_datetime("2017-01-01").unwrap(),
            parse_datetime("2017-12-31").unwrap(),
        );
        // N38W009 covers [-9, -8] x [38, 39] - Lisbon area
        let lisbon = BoundingBox::new(-9.5, 38.5, -8.9, 39.0);
        let madrid = BoundingBox::new(-4.0, 40.0, -3.0, 41.0);
        assert!(validator.is_valid_for("ASTGTM2_N38W009_dem.tif", &lisbon, &window));
        assert!(!validator.is_valid_for("ASTGTM2_N38W009_dem.tif", &madrid, &window));
    }

    #[test]
    fn test_southern_hemisphere_code() {
        let validator = AsterValidator::new();
        let footprint = validator.footprint("ASTGTM2_S02E136_dem.tif").unwrap();
        assert!((footprint.min_lat - -2.0).abs() < 1e-9);
        assert!((footprint.min_lon - 136.0).abs() < 1e-9);
    }
}
