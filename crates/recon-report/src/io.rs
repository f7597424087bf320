//! Atomic file output.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{ReportError, Result};

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// The parent directory is created when missing. On failure the temp file
/// is removed and the target is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ReportError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = write_temp(&temp_path, bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| ReportError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| ReportError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    file.write_all(bytes).map_err(|e| ReportError::Io {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    file.sync_all().map_err(|e| ReportError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parent_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join("nested").join("out.csv.tmp").exists());
    }

    #[test]
    fn test_write_atomic_into_file_parent_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = write_atomic(&blocker.join("out.csv"), b"data").unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
