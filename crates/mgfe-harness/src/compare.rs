//! Element-wise comparison of a solution vector against reference values.

use thiserror::Error;

/// Absolute tolerance used by the regression testcases.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompareError {
    #[error("length mismatch: reference has {expected} values, solution has {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error(
        "first mismatch at index {index}: {actual} vs reference {reference} \
         (tolerance {tolerance:e})"
    )]
    Mismatch {
        index: usize,
        actual: f64,
        reference: f64,
        tolerance: f64,
    },
}

/// Compare entry by entry within an absolute tolerance: a pair matches only
/// when its difference is strictly below the tolerance. Reports the first
/// mismatching index; a length mismatch is an error, never a truncation.
pub fn compare_values(
    actual: &[f64],
    reference: &[f64],
    tolerance: f64,
) -> Result<(), CompareError> {
    if actual.len() != reference.len() {
        return Err(CompareError::LengthMismatch {
            expected: reference.len(),
            actual: actual.len(),
        });
    }
    for (index, (&a, &r)) in actual.iter().zip(reference.iter()).enumerate() {
        if (a - r).abs() >= tolerance {
            return Err(CompareError::Mismatch {
                index,
                actual: a,
                reference: r,
                tolerance,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_vectors_pass() {
        let v = [0.0, -1.0, 0.5];
        assert!(compare_values(&v, &v, DEFAULT_TOLERANCE).is_ok());
    }

    #[test]
    fn deviation_within_tolerance_passes() {
        let a = [1.0 + 5e-7, -1.0];
        let r = [1.0, -1.0];
        assert!(compare_values(&a, &r, DEFAULT_TOLERANCE).is_ok());
    }

    #[test]
    fn difference_equal_to_tolerance_is_a_mismatch() {
        // 2e-6 - 1e-6 is exactly the tolerance; matching is strict.
        let a = [2e-6];
        let r = [1e-6];
        match compare_values(&a, &r, 1e-6) {
            Err(CompareError::Mismatch { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn first_mismatch_index_is_reported() {
        let a = [0.0, 1.0, 2.0, 3.1, 4.5];
        let r = [0.0, 1.0, 2.0, 3.0, 4.0];
        match compare_values(&a, &r, DEFAULT_TOLERANCE) {
            Err(CompareError::Mismatch { index, .. }) => assert_eq!(index, 3),
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let a = [0.0, 1.0];
        let r = [0.0, 1.0, 2.0];
        assert_eq!(
            compare_values(&a, &r, DEFAULT_TOLERANCE),
            Err(CompareError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }
}
