//! JSON run reports for archiving regression results.

use std::fs::File;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{HarnessError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub testcase: String,
    pub timestamp: String,
    pub passed: bool,
    pub values_compared: usize,
    pub iterations: Option<usize>,
    pub residual_norm: Option<f64>,
}

impl RunReport {
    pub fn new(testcase: &str, passed: bool, values_compared: usize) -> Self {
        Self {
            testcase: testcase.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            passed,
            values_compared,
            iterations: None,
            residual_norm: None,
        }
    }

    pub fn with_solve(mut self, iterations: usize, residual_norm: f64) -> Self {
        self.iterations = Some(iterations);
        self.residual_norm = Some(residual_norm);
        self
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = RunReport::new("laplace", true, 4913).with_solve(7, 3.2e-11);
        report.write(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: RunReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.testcase, "laplace");
        assert!(parsed.passed);
        assert_eq!(parsed.values_compared, 4913);
        assert_eq!(parsed.iterations, Some(7));
    }
}
