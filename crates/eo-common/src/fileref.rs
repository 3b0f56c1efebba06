//! File references: located resources with a validity time interval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{parse_datetime, TimeParseError};

/// A located data resource with a validity time interval and a MIME type.
///
/// Produced by directory scanners, consumed (never mutated) by the
/// observations factory and the file-ref creators. Ordering for assembly is
/// by `start_time`; ties keep input order (stable sort).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Location of the resource (path or URL).
    pub url: String,
    /// Start of the validity interval.
    pub start_time: DateTime<Utc>,
    /// End of the validity interval.
    pub end_time: DateTime<Utc>,
    /// MIME type of the resource.
    pub mime_type: String,
}

impl FileRef {
    pub fn new(
        url: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            start_time,
            end_time,
            mime_type: mime_type.into(),
        }
    }

    /// Build a file ref from string timestamps as delivered by scanners.
    pub fn parse(
        url: impl Into<String>,
        start_time: &str,
        end_time: &str,
        mime_type: impl Into<String>,
    ) -> Result<Self, TimeParseError> {
        Ok(Self {
            url: url.into(),
            start_time: parse_datetime(start_time)?,
            end_time: parse_datetime(end_time)?,
            mime_type: mime_type.into(),
        })
    }

    /// Sort a list of file refs ascending by start time.
    ///
    /// The sort is stable: refs with equal start times keep their input order.
    pub fn sort_by_start_time(refs: &mut [FileRef]) {
        refs.sort_by_key(|r| r.start_time);
    }
}
