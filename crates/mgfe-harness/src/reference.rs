//! Reference files: one value per line, `#` starts a comment.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::{HarnessError, Result};

pub fn read_reference(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: f64 = line.parse().map_err(|_| HarnessError::Reference {
            path: path.to_path_buf(),
            line: lineno + 1,
            message: format!("not a number: '{line}'"),
        })?;
        values.push(value);
    }
    Ok(values)
}

pub fn write_reference(path: impl AsRef<Path>, values: &[f64]) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::with_capacity(values.len() * 24);
    for value in values {
        out.push_str(&format!("{value}\n"));
    }
    fs::File::create(path)
        .and_then(|mut f| f.write_all(out.as_bytes()))
        .map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.txt");
        let values = vec![-1.0, -0.875, 0.0, 0.125, 1.0];
        write_reference(&path, &values).unwrap();
        assert_eq!(read_reference(&path).unwrap(), values);
    }

    #[test]
    fn skips_blanks_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.txt");
        fs::write(&path, "# header\n1.5\n\n-2.0 # trailing\n").unwrap();
        assert_eq!(read_reference(&path).unwrap(), vec![1.5, -2.0]);
    }

    #[test]
    fn bad_line_reports_its_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.txt");
        fs::write(&path, "1.0\nabc\n").unwrap();
        match read_reference(&path) {
            Err(HarnessError::Reference { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected reference error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_reference("/nonexistent/values.txt"),
            Err(HarnessError::Io { .. })
        ));
    }
}
