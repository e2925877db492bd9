//! File-backed node readiness.
//!
//! Fake service managers record the node state in a plain text file holding
//! `ready` or `not_ready`; [`FileReadinessSource`] reads it back for the
//! polling probe.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use svctoggle::{BoxError, Readiness, ReadinessSource, Target};
use thiserror::Error;

/// Text written for [`Readiness::Ready`].
pub const READY: &str = "ready";
/// Text written for [`Readiness::NotReady`].
pub const NOT_READY: &str = "not_ready";

/// Failures observing the state file.
#[derive(Debug, Error)]
pub enum NodeStateError {
    /// The state file could not be read.
    #[error("failed to read node state {path:?}: {source}")]
    Read {
        /// State file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The state file held unexpected content.
    #[error("unrecognised node state '{content}' in {path:?}")]
    Unrecognised {
        /// State file path.
        path: PathBuf,
        /// Trimmed file content.
        content: String,
    },
}

/// Reads node readiness from a state file.
#[derive(Debug, Clone)]
pub struct FileReadinessSource {
    path: PathBuf,
}

impl FileReadinessSource {
    /// Observes the state recorded at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl ReadinessSource for FileReadinessSource {
    fn observe(&self, _target: &Target) -> Result<Readiness, BoxError> {
        let content = fs::read_to_string(&self.path).map_err(|source| NodeStateError::Read {
            path: self.path.clone(),
            source,
        })?;
        match content.trim() {
            READY => Ok(Readiness::Ready),
            NOT_READY => Ok(Readiness::NotReady),
            other => Err(NodeStateError::Unrecognised {
                path: self.path.clone(),
                content: other.to_owned(),
            }
            .into()),
        }
    }
}

/// Records `state` in the file at `path`.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be written.
pub fn write_state(path: &Path, state: Readiness) -> io::Result<()> {
    let text = match state {
        Readiness::Ready => READY,
        Readiness::NotReady => NOT_READY,
    };
    fs::write(path, format!("{text}\n"))
}
