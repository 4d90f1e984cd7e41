//! Output file naming and writing.

use std::path::{Path, PathBuf};

use chrono::Local;

use adtopo_core::{Error, Result};

/// Default output path: `adtopo_<timestamp>.graphml` inside `dir`, with
/// one-second timestamp resolution.
pub fn default_output_path(dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("adtopo_{stamp}.graphml"))
}

/// Write the rendered document. A failed write is fatal.
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    std::fs::write(path, document).map_err(|err| {
        Error::from(err)
            .with_operation("output::write_document")
            .with_context("path", path.display().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_shape() {
        let path = default_output_path(Path::new("/tmp"));
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(name.starts_with("adtopo_"));
        assert!(name.ends_with(".graphml"));
        // adtopo_YYYYMMDD_HHMMSS.graphml
        assert_eq!(name.len(), "adtopo_".len() + 15 + ".graphml".len());
    }

    #[test]
    fn test_write_document_failure_is_fatal() {
        let err = write_document(Path::new("/nonexistent/dir/out.graphml"), "x").unwrap_err();
        assert_eq!(err.kind(), adtopo_core::ErrorKind::FileNotFound);
    }
}
