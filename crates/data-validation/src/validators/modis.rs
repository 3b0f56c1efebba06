//! Validators for MODIS products on the sinusoidal tile grid.

use chrono::NaiveDate;
use regex::Regex;

use eo_common::{BoundingBox, TimeRange};

use crate::types;
use crate::validators::{last_segment, relative_file_name, DataValidator};

/// Year range for which collection-6 products exist.
const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

/// Horizontal tile indices span 0..=35, vertical 0..=17.
const MAX_H: u32 = 35;
const MAX_V: u32 = 17;

/// Approximate WGS84 bounding box of a sinusoidal grid tile.
///
/// The tile is a 10°-tall band in latitude; its longitudinal extent follows
/// x = lon·cos(lat), so the box is taken as the envelope of the tile edges
/// evaluated at both latitude bounds.
fn sinusoidal_tile_bbox(h: u32, v: u32) -> BoundingBox {
    let lat_max = 90.0 - 10.0 * v as f64;
    let lat_min = lat_max - 10.0;
    let x_min = -180.0 + 10.0 * h as f64;
    let x_max = x_min + 10.0;

    let mut min_lon = f64::MAX;
    let mut max_lon = f64::MIN;
    for lat in [lat_min, lat_max] {
        let cos = lat.to_radians().cos();
        if cos <= f64::EPSILON {
            // polar tile edge degenerates to the full longitude range
            min_lon = -180.0;
            max_lon = 180.0;
            continue;
        }
        for x in [x_min, x_max] {
            let lon = x / cos;
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
        }
    }
    BoundingBox::new(min_lon, lat_min, max_lon, lat_max).clamp_to_valid()
}

struct ModisValidator {
    type_name: &'static str,
    pattern: String,
    regex: Regex,
}

struct ModisTileInfo {
    date: NaiveDate,
    h: u32,
    v: u32,
}

impl ModisValidator {
    fn new(type_name: &'static str, product: &str, collection: &str) -> Self {
        let pattern = format!(
            r"^{}\.A(\d{{4}})(\d{{3}})\.h(\d{{2}})v(\d{{2}})\.{}\..*\.hdf$",
            regex::escape(product),
            regex::escape(collection)
        );
        let regex = Regex::new(&pattern).expect("hard-coded pattern compiles");
        Self {
            type_name,
            pattern,
            regex,
        }
    }

    fn decode(&self, path: &str) -> Option<ModisTileInfo> {
        let caps = self.regex.captures(last_segment(path))?;
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let doy: u32 = caps.get(2)?.as_str().parse().ok()?;
        let h: u32 = caps.get(3)?.as_str().parse().ok()?;
        let v: u32 = caps.get(4)?.as_str().parse().ok()?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || h > MAX_H || v > MAX_V {
            return None;
        }
        // rejects doy 0 and anything past the year's length
        let date = NaiveDate::from_yo_opt(year, doy)?;
        Some(ModisTileInfo { date, h, v })
    }
}

impl DataValidator for ModisValidator {
    fn name(&self) -> &'static str {
        self.type_name
    }

    fn is_valid(&self, path: &str) -> bool {
        self.decode(path).is_some()
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        relative_file_name(path, self.is_valid(path))
    }

    fn file_pattern(&self) -> &str {
        &self.pattern
    }

    fn is_valid_for(&self, path: &str, region: &BoundingBox, window: &TimeRange) -> bool {
        match self.decode(path) {
            Some(info) => {
                let temporal = TimeRange::day(info.date)
                    .map(|day| day.overlaps(window))
                    .unwrap_or(false);
                temporal && sinusoidal_tile_bbox(info.h, info.v).intersects(region)
            }
            None => false,
        }
    }
}

/// Validator for MODIS BRDF/albedo model parameters (MCD43A1, collection 6).
pub struct ModisMcd43Validator {
    inner: ModisValidator,
}

impl ModisMcd43Validator {
    pub fn new() -> Self {
        Self {
            inner: ModisValidator::new(types::MCD43A1, "MCD43A1", "006"),
        }
    }
}

impl Default for ModisMcd43Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator for ModisMcd43Validator {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn is_valid(&self, path: &str) -> bool {
        self.inner.is_valid(path)
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        self.inner.get_relative_path(path)
    }

    fn file_pattern(&self) -> &str {
        self.inner.file_pattern()
    }

    fn is_valid_for(&self, path: &str, region: &BoundingBox, window: &TimeRange) -> bool {
        self.inner.is_valid_for(path, region, window)
    }
}

/// Validator for MODIS leaf area index (MCD15A2H, collection 6).
pub struct ModisMcd15Validator {
    inner: ModisValidator,
}

impl ModisMcd15Validator {
    pub fn new() -> Self {
        Self {
            inner: ModisValidator::new(types::MCD15A2H, "MCD15A2H", "006"),
        }
    }
}

impl Default for ModisMcd15Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataValidator for ModisMcd15Validator {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn is_valid(&self, path: &str) -> bool {
        self.inner.is_valid(path)
    }

    fn get_relative_path(&self, path: &str) -> Option<String> {
        self.inner.get_relative_path(path)
    }

    fn file_pattern(&self) -> &str {
        self.inner.file_pattern()
    }

    fn is_valid_for(&self, path: &str, region: &BoundingBox, window: &TimeRange) -> bool {
        self.inner.is_valid_for(path, region, window)
    }
}
