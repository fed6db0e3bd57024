//! Transient staging of inbound audio payloads.
//!
//! Each call stages to its own uniquely named file, so concurrent requests
//! never observe each other's bytes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Writes inbound payloads to per-call files under a staging directory.
#[derive(Debug, Clone)]
pub struct AudioStaging {
    dir: PathBuf,
}

impl AudioStaging {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Stage one payload, creating the staging directory on demand.
    pub fn stage(&self, bytes: &[u8]) -> Result<StagedAudio> {
        if bytes.is_empty() {
            return Err(Error::EmptyAudio);
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.wav", Uuid::new_v4()));
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), len = bytes.len(), "staged audio payload");

        Ok(StagedAudio {
            path,
            released: false,
        })
    }
}

/// A staged audio file scoped to a single call.
///
/// Dropping the handle removes the file, so cleanup happens even when
/// downstream recognition fails. `release` is idempotent.
#[derive(Debug)]
pub struct StagedAudio {
    path: PathBuf,
    released: bool,
}

impl StagedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove the staged file. Safe to call any number of times.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "failed to remove staged audio");
            }
        }
    }

    /// Disarm cleanup and hand the file over to the caller.
    pub fn persist(mut self) -> PathBuf {
        self.released = true;
        self.path.clone()
    }
}

impl Drop for StagedAudio {
    fn drop(&mut self) {
        self.release();
    }
}
