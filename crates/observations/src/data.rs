//! Observation data for a single band and time slot.

use ndarray::Array2;
use std::collections::HashMap;

use crate::emulator::Emulator;

/// One band's pixel values plus everything a retrieval needs alongside them.
///
/// Invariants: `mask` has the same shape as `observations`; `uncertainty`,
/// when present, is square with side `mask.len()`.
#[derive(Debug, Clone)]
pub struct ObservationData {
    /// Reflectance (or other physical) values, H×W.
    pub observations: Array2<f32>,
    /// Per-pixel inverse-variance over the flattened pixel grid, if requested.
    pub uncertainty: Option<DiagonalPrecision>,
    /// Marks pixels carrying valid data.
    pub mask: Array2<bool>,
    /// Scalar metadata: sun/view geometry and the like.
    pub metadata: HashMap<String, f64>,
    /// Geometry-matched radiative-transfer emulator for this band.
    pub emulator: Option<Emulator>,
}

/// A diagonal precision matrix over the flattened pixel grid.
///
/// Per-pixel uncertainties are independent, so only the diagonal is stored.
/// Entries are inverse variances (precision), not variances: callers must
/// know which convention is in force. Invalid pixels carry precision 0.0,
/// i.e. infinite uncertainty.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalPrecision {
    diag: Vec<f64>,
}

impl DiagonalPrecision {
    /// Build from a relative-uncertainty model: the standard deviation of a
    /// valid pixel is `relative × value`; masked-out pixels get precision 0.
    pub fn from_relative_uncertainty(
        values: &Array2<f32>,
        mask: &Array2<bool>,
        relative: f64,
    ) -> Self {
        debug_assert_eq!(values.dim(), mask.dim());
        let diag = values
            .iter()
            .zip(mask.iter())
            .map(|(&value, &valid)| {
                if valid {
                    let sd = relative * value as f64;
                    if sd > 0.0 {
                        1.0 / (sd * sd)
                    } else {
                        0.0
                    }
                } else {
                    0.0
                }
            })
            .collect();
        Self { diag }
    }

    /// Side length of the (square) matrix: the flattened pixel count.
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Diagonal entry `i` (all off-diagonal entries are zero).
    pub fn get(&self, i: usize) -> f64 {
        self.diag[i]
    }

    /// The full diagonal, in flattened row-major pixel order.
    pub fn diagonal(&self) -> &[f64] {
        &self.diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_precision_from_relative_uncertainty() {
        let values = array![[0.2f32, 0.4], [0.0, 0.1]];
        let mask = array![[true, true], [false, true]];
        let precision = DiagonalPrecision::from_relative_uncertainty(&values, &mask, 0.05);

        assert_eq!(precision.size(), 4);
        // sd = 0.05 * 0.2 = 0.01 -> precision 1e4
        assert!(((precision.get(0) - 1.0e4) / 1.0e4).abs() < 1e-6);
        // masked pixel carries zero precision
        assert_eq!(precision.get(2), 0.0);
        assert!(precision.get(3) > precision.get(1));
    }

    #[test]
    fn test_precision_zero_value_does_not_divide_by_zero() {
        let values = array![[0.0f32]];
        let mask = array![[true]];
        let precision = DiagonalPrecision::from_relative_uncertainty(&values, &mask, 0.05);
        assert_eq!(precision.get(0), 0.0);
    }
}
