//! Common types and utilities shared across all eo-data-access crates.

pub mod bbox;
pub mod fileref;
pub mod mime;
pub mod time;

pub use bbox::BoundingBox;
pub use fileref::FileRef;
pub use time::{parse_datetime, TimeParseError, TimeRange};
