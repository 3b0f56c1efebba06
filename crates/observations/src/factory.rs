//! Assembly of time-sorted observations from heterogeneous file refs.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use eo_common::FileRef;

use crate::data::ObservationData;
use crate::error::{ObservationsError, Result};
use crate::product::{ObservationsCreator, ProductObservations};
use crate::raster::Reprojection;

/// Ordered list of creators, probed first-to-last.
///
/// Probing is a capability check (`can_read`), not a name lookup;
/// registration order is the tie-break when more than one creator could
/// read a ref.
#[derive(Default)]
pub struct ObservationsCreatorRegistry {
    creators: Vec<Box<dyn ObservationsCreator>>,
}

impl ObservationsCreatorRegistry {
    pub fn new() -> Self {
        Self {
            creators: Vec::new(),
        }
    }

    pub fn register(&mut self, creator: Box<dyn ObservationsCreator>) {
        self.creators.push(creator);
    }

    /// First creator able to read the ref, if any.
    pub fn find(&self, file_ref: &FileRef) -> Option<&dyn ObservationsCreator> {
        self.creators
            .iter()
            .find(|c| c.can_read(file_ref))
            .map(|c| c.as_ref())
    }
}

/// Builds [`ObservationsWrapper`]s from lists of file refs.
pub struct ObservationsFactory {
    creators: ObservationsCreatorRegistry,
}

impl ObservationsFactory {
    pub fn new(creators: ObservationsCreatorRegistry) -> Self {
        Self { creators }
    }

    /// Sort the refs chronologically, pick a reader for each and assemble
    /// the time-addressed wrapper.
    ///
    /// A file ref no creator can read is dropped from the wrapper without
    /// failing; "not of a known type" is an expected outcome when the input
    /// comes from a directory scan.
    pub fn create_observations(
        &self,
        mut file_refs: Vec<FileRef>,
        reprojection: Option<Arc<dyn Reprojection>>,
        emulator_folder: Option<&Path>,
    ) -> Result<ObservationsWrapper> {
        FileRef::sort_by_start_time(&mut file_refs);

        let mut slots: Vec<(DateTime<Utc>, Box<dyn ProductObservations>)> = Vec::new();
        for file_ref in file_refs {
            match self.creators.find(&file_ref) {
                Some(creator) => {
                    let observations =
                        creator.create(&file_ref, reprojection.clone(), emulator_folder)?;
                    slots.push((file_ref.start_time, observations));
                }
                None => {
                    warn!(url = %file_ref.url, "no creator can read file ref, dropping it");
                }
            }
        }
        info!(slots = slots.len(), "assembled observations");
        Ok(ObservationsWrapper { slots })
    }
}

/// A time-addressed sequence of per-slot observations.
///
/// Slots are sorted ascending by time at construction and never re-sorted
/// or extended afterwards.
pub struct ObservationsWrapper {
    slots: Vec<(DateTime<Utc>, Box<dyn ProductObservations>)>,
}

impl ObservationsWrapper {
    /// Number of time slots.
    pub fn get_num_observations(&self) -> usize {
        self.slots.len()
    }

    /// Slot times, in ascending order.
    pub fn dates(&self) -> Vec<DateTime<Utc>> {
        self.slots.iter().map(|(time, _)| *time).collect()
    }

    /// Number of bands exposed by the slot addressed by `time`.
    pub fn bands_per_observation(&self, time: DateTime<Utc>) -> Result<usize> {
        Ok(self.resolve(time)?.bands_per_observation())
    }

    /// Catalogue type identifier of the slot addressed by `time`.
    pub fn get_data_type(&self, time: DateTime<Utc>) -> Result<&'static str> {
        Ok(self.resolve(time)?.data_type())
    }

    /// Band data of the slot addressed by `time`.
    pub fn get_band_data(
        &self,
        time: DateTime<Utc>,
        band_index: usize,
        retrieve_uncertainty: bool,
    ) -> Result<ObservationData> {
        self.resolve(time)?
            .get_band_data(band_index, retrieve_uncertainty)
    }

    /// Band data of the slot addressed by `time`, band given by name.
    pub fn get_band_data_by_name(
        &self,
        time: DateTime<Utc>,
        band_name: &str,
        retrieve_uncertainty: bool,
    ) -> Result<ObservationData> {
        self.resolve(time)?
            .get_band_data_by_name(band_name, retrieve_uncertainty)
    }

    /// Resolve a timestamp to a slot: exact match first, else the
    /// chronologically nearest slot. An empty wrapper is a lookup failure.
    fn resolve(&self, time: DateTime<Utc>) -> Result<&dyn ProductObservations> {
        if self.slots.is_empty() {
            return Err(ObservationsError::EmptyWrapper);
        }
        let nearest = self
            .slots
            .iter()
            .min_by_key(|(slot_time, _)| {
                (*slot_time - time).num_milliseconds().unsigned_abs()
            })
            .map(|(_, observations)| observations.as_ref());
        // min_by_key on a non-empty list always yields a slot
        nearest.ok_or(ObservationsError::EmptyWrapper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Band;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct StubObservations {
        type_name: &'static str,
        bands: usize,
    }

    impl ProductObservations for StubObservations {
        fn bands_per_observation(&self) -> usize {
            self.bands
        }

        fn data_type(&self) -> &'static str {
            self.type_name
        }

        fn get_band_data(
            &self,
            band_index: usize,
            _retrieve_uncertainty: bool,
        ) -> Result<ObservationData> {
            if band_index >= self.bands {
                return Err(ObservationsError::BandOutOfRange {
                    band: band_index,
                    bands: self.bands,
                });
            }
            Ok(ObservationData {
                observations: ndarray::Array2::zeros((1, 1)),
                uncertainty: None,
                mask: ndarray::Array2::from_elem((1, 1), true),
                metadata: HashMap::new(),
                emulator: None,
            })
        }

        fn get_band_data_by_name(
            &self,
            _band_name: &str,
            retrieve_uncertainty: bool,
        ) -> Result<ObservationData> {
            self.get_band_data(0, retrieve_uncertainty)
        }

        fn set_no_data_value(&mut self, _band: Band, _no_data_value: f32) -> Result<()> {
            Ok(())
        }
    }

    /// Reads only refs whose url starts with a fixed prefix.
    struct PrefixCreator {
        prefix: &'static str,
        type_name: &'static str,
    }

    impl ObservationsCreator for PrefixCreator {
        fn can_read(&self, file_ref: &FileRef) -> bool {
            file_ref.url.starts_with(self.prefix)
        }

        fn create(
            &self,
            _file_ref: &FileRef,
            _reprojection: Option<Arc<dyn Reprojection>>,
            _emulator_folder: Option<&Path>,
        ) -> Result<Box<dyn ProductObservations>> {
            Ok(Box::new(StubObservations {
                type_name: self.type_name,
                bands: 3,
            }))
        }
    }

    fn file_ref(url: &str, day: u32) -> FileRef {
        let time = Utc.with_ymd_and_hms(2017, 6, day, 0, 0, 0).unwrap();
        FileRef::new(url, time, time, "application/x-directory")
    }

    fn factory() -> ObservationsFactory {
        let mut registry = ObservationsCreatorRegistry::new();
        registry.register(Box::new(PrefixCreator {
            prefix: "s2:",
            type_name: "AWS_S2_L2",
        }));
        registry.register(Box::new(PrefixCreator {
            prefix: "modis:",
            type_name: "MCD43A1.006",
        }));
        ObservationsFactory::new(registry)
    }

    #[test]
    fn test_slots_are_time_sorted() {
        let wrapper = factory()
            .create_observations(
                vec![
                    file_ref("s2:a", 4),
                    file_ref("s2:b", 1),
                    file_ref("modis:c", 3),
                    file_ref("s2:d", 2),
                    file_ref("s2:e", 5),
                ],
                None,
                None,
            )
            .unwrap();

        assert_eq!(wrapper.get_num_observations(), 5);
        let dates = wrapper.dates();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            wrapper
                .get_data_type(Utc.with_ymd_and_hms(2017, 6, 3, 0, 0, 0).unwrap())
                .unwrap(),
            "MCD43A1.006"
        );
    }

    #[test]
    fn test_unmatched_refs_are_dropped_silently() {
        let wrapper = factory()
            .create_observations(
                vec![
                    file_ref("s2:a", 1),
                    file_ref("unknown:x", 2),
                    file_ref("modis:b", 3),
                ],
                None,
                None,
            )
            .unwrap();
        assert_eq!(wrapper.get_num_observations(), 2);
    }

    #[test]
    fn test_time_resolution_exact_and_nearest() {
        let wrapper = factory()
            .create_observations(vec![file_ref("s2:a", 1), file_ref("modis:b", 10)], None, None)
            .unwrap();

        // exact
        let exact = Utc.with_ymd_and_hms(2017, 6, 10, 0, 0, 0).unwrap();
        assert_eq!(wrapper.get_data_type(exact).unwrap(), "MCD43A1.006");
        // nearest
        let near = Utc.with_ymd_and_hms(2017, 6, 2, 12, 0, 0).unwrap();
        assert_eq!(wrapper.get_data_type(near).unwrap(), "AWS_S2_L2");
    }

    #[test]
    fn test_empty_wrapper_is_a_lookup_failure() {
        let wrapper = factory().create_observations(vec![], None, None).unwrap();
        let time = Utc.with_ymd_and_hms(2017, 6, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            wrapper.get_data_type(time),
            Err(ObservationsError::EmptyWrapper)
        ));
    }

    #[test]
    fn test_band_errors_pass_through() {
        let wrapper = factory()
            .create_observations(vec![file_ref("s2:a", 1)], None, None)
            .unwrap();
        let time = Utc.with_ymd_and_hms(2017, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(wrapper.bands_per_observation(time).unwrap(), 3);
        assert!(wrapper.get_band_data(time, 0, false).is_ok());
        assert!(matches!(
            wrapper.get_band_data(time, 7, false),
            Err(ObservationsError::BandOutOfRange { .. })
        ));
    }
}
