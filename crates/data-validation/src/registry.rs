//! The validator registry.
//!
//! An explicitly constructed registry object, built once at process start
//! and passed by reference to every consumer. There is no ambient global
//! registry; consumers treat the registry as read-only after setup.

use eo_common::{BoundingBox, TimeRange};

use crate::error::{Result, ValidationError};
use crate::validators::{
    AsterValidator, AwsS2L1Validator, AwsS2L2Validator, CamsTiffValidator, CamsValidator,
    DataValidator, ModisMcd15Validator, ModisMcd43Validator, S2aEmulatorValidator,
    S2bEmulatorValidator, WvEmulatorValidator,
};

/// Registry mapping product type names to their validators.
///
/// Validators are probed in registration order, and the first structural
/// match wins. That ordering is a documented contract: patterns are meant to
/// be disjoint, but where two could match the same path the
/// earliest-registered type is authoritative.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn DataValidator>>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Create a registry holding the full catalogue of known product types.
    ///
    /// AWS_S2_L2 registers ahead of AWS_S2_L1C: both share the tiled-grid
    /// layout, and a corrected tile directory must classify as L2.
    pub fn with_known_types() -> Self {
        let mut registry = Self::new();
        let catalogue: Vec<Box<dyn DataValidator>> = vec![
            Box::new(AwsS2L2Validator::new()),
            Box::new(AwsS2L1Validator::new()),
            Box::new(ModisMcd43Validator::new()),
            Box::new(ModisMcd15Validator::new()),
            Box::new(CamsTiffValidator::new()),
            Box::new(CamsValidator::new()),
            Box::new(S2aEmulatorValidator::new()),
            Box::new(S2bEmulatorValidator::new()),
            Box::new(WvEmulatorValidator::new()),
            Box::new(AsterValidator::new()),
        ];
        for validator in catalogue {
            // names in the canonical catalogue are unique
            registry
                .register(validator)
                .expect("catalogue registers without duplicates");
        }
        registry
    }

    /// Add a validator. Fails if its type name is already registered.
    pub fn register(&mut self, validator: Box<dyn DataValidator>) -> Result<()> {
        if self.validators.iter().any(|v| v.name() == validator.name()) {
            return Err(ValidationError::DuplicateType(validator.name().to_string()));
        }
        self.validators.push(validator);
        Ok(())
    }

    /// The type name of the first registered validator whose structural
    /// pattern matches `path`, or `None` if the path is of no known type.
    ///
    /// An unrecognized path is an expected outcome during directory
    /// scanning, not an error.
    pub fn get_valid_type(&self, path: &str) -> Option<&str> {
        self.validators
            .iter()
            .find(|v| v.is_valid(path))
            .map(|v| v.name())
    }

    /// All registered type names, in registration order.
    pub fn get_valid_types(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Dispatch `is_valid_for` to the named validator.
    pub fn is_valid_for(
        &self,
        type_name: &str,
        path: &str,
        region: &BoundingBox,
        window: &TimeRange,
    ) -> Result<bool> {
        Ok(self.find(type_name)?.is_valid_for(path, region, window))
    }

    /// Dispatch `file_pattern` to the named validator.
    pub fn file_pattern(&self, type_name: &str) -> Result<&str> {
        Ok(self.find(type_name)?.file_pattern())
    }

    /// Dispatch `get_relative_path` to the named validator.
    pub fn get_relative_path(&self, type_name: &str, path: &str) -> Result<Option<String>> {
        Ok(self.find(type_name)?.get_relative_path(path))
    }

    fn find(&self, type_name: &str) -> Result<&dyn DataValidator> {
        self.validators
            .iter()
            .find(|v| v.name() == type_name)
            .map(|v| v.as_ref())
            .ok_or_else(|| ValidationError::UnknownType(type_name.to_string()))
    }
}
