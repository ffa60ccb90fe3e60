//! Write a rendered table to disk.
//!
//! The write is a single `fs::write`, not temp-file-then-rename, so a failure may
//! leave a partial file behind. The I/O error is returned as-is.

use std::path::Path;

use log::info;

use crate::error::AppError;

/// Write rendered table text to `path`.
pub fn write_rendered(path: &Path, contents: &str) -> Result<(), AppError> {
    std::fs::write(path, contents)?;
    info!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.html");
        write_rendered(&path, "<table></table>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<table></table>");
    }

    #[test]
    fn missing_directory_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/table.html");
        let err = write_rendered(&path, "x").unwrap_err();
        assert!(matches!(err, AppError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
