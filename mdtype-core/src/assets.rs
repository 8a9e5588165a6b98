//! Deferred asset copies.
//!
//! Converting a document never touches the filesystem. When the output references a file
//! that has to be copied next to it (header and footer logos), the converter queues an
//! [`AssetCopy`] instead and the caller performs the queue once the markup has been written.
//! The markup may therefore reference an asset whose copy later fails; such failures are
//! only warnings.

use crate::error::ConvertError;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A file to copy from the source tree into the output's asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl AssetCopy {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Copy the asset, creating the destination directory when needed.
    pub fn perform(&self) -> Result<(), ConvertError> {
        if !self.source.is_file() {
            return Err(ConvertError::io(&self.source, "asset file not found"));
        }
        if let Some(parent) = self.destination.parent() {
            fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
        }
        fs::copy(&self.source, &self.destination)
            .map(|_| ())
            .map_err(|e| ConvertError::io(&self.destination, e))
    }
}

/// Perform every queued copy, logging failures. Returns the number of copies that succeeded.
pub fn perform_all(copies: &[AssetCopy]) -> usize {
    let mut copied = 0;
    for copy in copies {
        match copy.perform() {
            Ok(()) => {
                debug!(source = %copy.source.display(), "copied asset");
                copied += 1;
            }
            Err(err) => warn!("Failed to copy asset {}: {err}", copy.source.display()),
        }
    }
    copied
}
