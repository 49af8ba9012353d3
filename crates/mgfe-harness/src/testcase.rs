//! The testcase contract shared by all regression runs.

use std::path::Path;

use crate::compare::{self, DEFAULT_TOLERANCE};
use crate::reference::read_reference;
use crate::{HarnessError, Result};

/// A regression testcase: produce a coefficient vector, then hold it against
/// a stored reference.
pub trait Testcase {
    fn name(&self) -> &str;

    fn reference_path(&self) -> &Path;

    /// Execute the computation. The default is a stub that fails, so a
    /// testcase forgetting to override it is caught rather than silently
    /// comparing nothing.
    fn run(&mut self) -> Result<()> {
        Err(HarnessError::RunNotImplemented(self.name().to_string()))
    }

    /// The computed values, available after a successful `run`.
    fn solution(&self) -> Result<&[f64]>;

    /// Absolute tolerance for the comparison.
    fn tolerance(&self) -> f64 {
        DEFAULT_TOLERANCE
    }

    fn compare(&self) -> Result<()> {
        let reference = read_reference(self.reference_path())?;
        compare::compare_values(self.solution()?, &reference, self.tolerance())?;
        Ok(())
    }
}
