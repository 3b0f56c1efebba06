//! Extraction of scalar fields from Sentinel-2 tile metadata XML.
//!
//! Pure extraction, no decision logic: sensing time, tile id and mean
//! sun/view angles. The angle grids in the file are ignored; only the mean
//! values are read, and the per-band viewing angles are averaged.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

use eo_common::parse_datetime;

use crate::emulator::ViewGeometry;
use crate::error::{ObservationsError, Result};

/// Extract the sensing time from a tile `metadata.xml`.
pub fn extract_sensing_time(path: &Path) -> Result<DateTime<Utc>> {
    let text = find_first_text(path, b"SENSING_TIME")?
        .ok_or_else(|| ObservationsError::MissingMetadata("SENSING_TIME".to_string()))?;
    parse_sensing_time(&text)
}

/// Extract the tile id from a tile `metadata.xml`.
pub fn extract_tile_id(path: &Path) -> Result<String> {
    find_first_text(path, b"TILE_ID")?
        .ok_or_else(|| ObservationsError::MissingMetadata("TILE_ID".to_string()))
}

/// Extract the mean sun and viewing geometry from a tile `metadata.xml`.
///
/// The sun angles come from `Mean_Sun_Angle`; the viewing angles are the
/// mean over the `Mean_Viewing_Incidence_Angle_List` entries (one per band).
pub fn extract_angles(path: &Path) -> Result<ViewGeometry> {
    let document = std::fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&document);

    let mut in_mean_sun = false;
    let mut in_view_list = false;
    let mut sza: Option<f64> = None;
    let mut saa: Option<f64> = None;
    let mut vzas: Vec<f64> = Vec::new();
    let mut vaas: Vec<f64> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"Mean_Sun_Angle" => in_mean_sun = true,
                b"Mean_Viewing_Incidence_Angle_List" => in_view_list = true,
                b"ZENITH_ANGLE" => {
                    let value = parse_angle(&reader.read_text(e.name())?)?;
                    if in_mean_sun {
                        sza = Some(value);
                    } else if in_view_list {
                        vzas.push(value);
                    }
                }
                b"AZIMUTH_ANGLE" => {
                    let value = parse_angle(&reader.read_text(e.name())?)?;
                    if in_mean_sun {
                        saa = Some(value);
                    } else if in_view_list {
                        vaas.push(value);
                    }
                }
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"Mean_Sun_Angle" => in_mean_sun = false,
                b"Mean_Viewing_Incidence_Angle_List" => in_view_list = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    let sza = sza.ok_or_else(|| ObservationsError::MissingMetadata("Mean_Sun_Angle".into()))?;
    let saa = saa.ok_or_else(|| ObservationsError::MissingMetadata("Mean_Sun_Angle".into()))?;
    if vzas.is_empty() || vaas.is_empty() {
        return Err(ObservationsError::MissingMetadata(
            "Mean_Viewing_Incidence_Angle_List".into(),
        ));
    }

    Ok(ViewGeometry {
        sza,
        saa,
        vza: mean(&vzas),
        vaa: mean(&vaas),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn parse_angle(text: &str) -> Result<f64> {
    text.trim()
        .parse()
        .map_err(|_| ObservationsError::InvalidMetadata {
            field: "angle".to_string(),
            value: text.trim().to_string(),
        })
}

/// Sensing times come as `2017-09-04T11:18:25.466Z`; tolerate missing
/// fractions or zone designators.
fn parse_sensing_time(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = parse_datetime(raw) {
        return Ok(dt);
    }
    let mut normalized = raw.trim_end_matches('Z').to_string();
    if let Some(dot) = normalized.rfind('.') {
        normalized.truncate(dot);
    }
    Ok(parse_datetime(&normalized)?)
}

/// First text content of the named element anywhere in the document.
fn find_first_text(path: &Path, element: &[u8]) -> Result<Option<String>> {
    let document = std::fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&document);
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == element => {
                let text = reader.read_text(e.name())?;
                return Ok(Some(text.trim().to_string()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;

    const METADATA_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Level-1C_Tile_ID>
  <General_Info>
    <TILE_ID>S2A_OPER_MSI_L1C_TL_SGS__20170904T113839_A011513_T30SWJ_N02.05</TILE_ID>
    <SENSING_TIME>2017-09-04T11:18:25.466Z</SENSING_TIME>
  </General_Info>
  <Geometric_Info>
    <Tile_Angles>
      <Mean_Sun_Angle>
        <ZENITH_ANGLE unit="deg">34.2</ZENITH_ANGLE>
        <AZIMUTH_ANGLE unit="deg">155.8</AZIMUTH_ANGLE>
      </Mean_Sun_Angle>
      <Mean_Viewing_Incidence_Angle_List>
        <Mean_Viewing_Incidence_Angle bandId="0">
          <ZENITH_ANGLE unit="deg">5.0</ZENITH_ANGLE>
          <AZIMUTH_ANGLE unit="deg">105.0</AZIMUTH_ANGLE>
        </Mean_Viewing_Incidence_Angle>
        <Mean_Viewing_Incidence_Angle bandId="1">
          <ZENITH_ANGLE unit="deg">7.0</ZENITH_ANGLE>
          <AZIMUTH_ANGLE unit="deg">115.0</AZIMUTH_ANGLE>
        </Mean_Viewing_Incidence_Angle>
      </Mean_Viewing_Incidence_Angle_List>
    </Tile_Angles>
  </Geometric_Info>
</Level-1C_Tile_ID>"#;

    fn write_metadata() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(METADATA_XML.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_extract_sensing_time() {
        let file = write_metadata();
        let time = extract_sensing_time(file.path()).unwrap();
        assert_eq!(time.year(), 2017);
        assert_eq!(time.month(), 9);
        assert_eq!(time.day(), 4);
        assert_eq!(time.hour(), 11);
        assert_eq!(time.minute(), 18);
        assert_eq!(time.second(), 25);
    }

    #[test]
    fn test_extract_tile_id() {
        let file = write_metadata();
        let tile_id = extract_tile_id(file.path()).unwrap();
        assert!(tile_id.contains("T30SWJ"));
    }

    #[test]
    fn test_extract_angles_averages_view_angles() {
        let file = write_metadata();
        let geometry = extract_angles(file.path()).unwrap();
        assert!((geometry.sza - 34.2).abs() < 1e-9);
        assert!((geometry.saa - 155.8).abs() < 1e-9);
        assert!((geometry.vza - 6.0).abs() < 1e-9);
        assert!((geometry.vaa - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<root><other>1</other></root>").unwrap();
        assert!(matches!(
            extract_sensing_time(file.path()),
            Err(ObservationsError::MissingMetadata(_))
        ));
    }
}
