//! Locating and loading the two files of a case.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::CompareConfig;
use crate::error::CompareError;

/// The pair of files for one case name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePaths {
    pub left: PathBuf,
    pub right: PathBuf,
}

impl CasePaths {
    /// `{left_dir}/{case}.{ext}` and `{right_dir}/{case}.{ext}`.
    #[must_use]
    pub fn for_case(case: &str, config: &CompareConfig) -> Self {
        let file = format!("{case}.{}", config.extension);
        Self {
            left: config.left_dir.join(&file),
            right: config.right_dir.join(&file),
        }
    }

    /// Read both files fully into memory.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Io`] naming the file that failed to read.
    pub fn load(&self) -> Result<(Vec<u8>, Vec<u8>), CompareError> {
        Ok((read_file(&self.left)?, read_file(&self.right)?))
    }
}

/// Read a whole file.
///
/// # Errors
///
/// Returns [`CompareError::Io`] with the offending path.
pub fn read_file(path: &Path) -> Result<Vec<u8>, CompareError> {
    let bytes = std::fs::read(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), len = bytes.len(), "loaded");
    Ok(bytes)
}
