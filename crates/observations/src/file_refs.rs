//! File-ref creators: extract the authoritative time interval for a path
//! already classified as a known product type.

use std::path::Path;

use eo_common::{mime, FileRef};

use crate::error::Result;
use crate::xml;

use data_validation::types;

/// Creates file refs for one product type.
pub trait FileRefCreator: Send + Sync {
    /// The name of the data type supported by this creator.
    fn name(&self) -> &'static str;

    /// Create a file ref to this file, with the authoritative timestamp read
    /// from metadata colocated with `path`.
    fn create_file_ref(&self, path: &str) -> Result<FileRef>;
}

/// Creator for corrected AWS Sentinel-2 tile directories.
///
/// The sensing time from the tile's `metadata.xml` is the authoritative
/// instant; start and end of the validity interval coincide with it.
pub struct AwsS2L2FileRefCreator;

impl FileRefCreator for AwsS2L2FileRefCreator {
    fn name(&self) -> &'static str {
        types::AWS_S2_L2
    }

    fn create_file_ref(&self, path: &str) -> Result<FileRef> {
        let time = xml::extract_sensing_time(&Path::new(path).join("metadata.xml"))?;
        Ok(FileRef::new(path, time, time, mime::DIRECTORY))
    }
}

/// Registry mapping a product type name to its file-ref creator.
#[derive(Default)]
pub struct FileRefCreation {
    creators: Vec<Box<dyn FileRefCreator>>,
}

impl FileRefCreation {
    /// A registry holding the built-in creators.
    pub fn new() -> Self {
        let mut creation = Self {
            creators: Vec::new(),
        };
        creation.add_file_ref_creator(Box::new(AwsS2L2FileRefCreator));
        creation
    }

    pub fn add_file_ref_creator(&mut self, creator: Box<dyn FileRefCreator>) {
        self.creators.push(creator);
    }

    /// Create a file ref for `path` of type `data_type`.
    ///
    /// A type no creator supports yields `Ok(None)`: that is an expected
    /// outcome during scanning, not an error. Failures inside a matching
    /// creator propagate.
    pub fn get_file_ref(&self, data_type: &str, path: &str) -> Result<Option<FileRef>> {
        for creator in &self.creators {
            if creator.name() == data_type {
                return creator.create_file_ref(path).map(Some);
            }
        }
        Ok(None)
    }
}
