//! Regression harness for the multigrid FEM stack.
//!
//! A testcase loads a grid, runs a solve, and compares the resulting
//! coefficient vector entry by entry against a stored reference file.

pub mod compare;
pub mod error;
pub mod laplace;
pub mod parallel;
pub mod reference;
pub mod report;
pub mod testcase;

pub use compare::{CompareError, DEFAULT_TOLERANCE, compare_values};
pub use error::HarnessError;
pub use laplace::LaplaceTestcase;
pub use parallel::init_thread_pool;
pub use reference::{read_reference, write_reference};
pub use report::RunReport;
pub use testcase::Testcase;

pub type Result<T> = std::result::Result<T, HarnessError>;
