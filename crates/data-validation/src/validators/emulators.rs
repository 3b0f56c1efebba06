//! Validators for serialized radiative-transfer emulator files.
//!
//! Emulator files follow fixed literal grammars with no temporal or spatial
//! component, so the default `is_valid_for` (structural check only) applies.

use regex::Regex;

use crate::types;
use crate::validators::{last_segment, relative_file_name, DataValidator};

const ISO_MSI_A_PATTERN: &str =
    r"^isotropic_MSI_emulators_(?:correction|optimization)_x[abc]p_S2A\.pkl$";
const ISO_MSI_B_PATTERN: &str =
    r"^isotropic_MSI_emulators_(?:correction|optimization)_x[abc]p_S2B\.pkl$";
const WV_PATTERN: &str = r"^wv_MSI_retrieval_S2[AB]\.pkl$";

macro_rules! emulator_validator {
    ($(#[$doc:meta])* $name:ident, $type_name:expr, $pattern:expr) => {
        $(#[$doc])*
        pub struct $name {
            regex: Regex,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    regex: Regex::new($pattern).expect("hard-coded pattern compiles"),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl DataValidator for $name {
            fn name(&self) -> &'static str {
                $type_name
            }

            fn is_valid(&self, path: &str) -> bool {
                self.regex.is_match(last_segment(path))
            }

            fn get_relative_path(&self, path: &str) -> Option<String> {
                relative_file_name(path, self.is_valid(path))
            }

            fn file_pattern(&self) -> &str {
                $pattern
            }
        }
    };
}

emulator_validator!(
    /// Validator for isotropic MSI emulators for Sentinel-2A.
    S2aEmulatorValidator,
    types::ISO_MSI_A_EMU,
    ISO_MSI_A_PATTERN
);

emulator_validator!(
    /// Validator for isotropic MSI emulators for Sentinel-2B.
    S2bEmulatorValidator,
    types::ISO_MSI_B_EMU,
    ISO_MSI_B_PATTERN
);

emulator_validator!(
    /// Validator for water-vapour retrieval emulators.
    WvEmulatorValidator,
    types::WV_EMU,
    WV_PATTERN
);
