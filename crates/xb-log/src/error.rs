//! Typed error definitions for the XBridge log subsystem.
//!
//! [`XbError`] covers the few things that can fail: reading the settings
//! file, touching the filesystem during a flush, and installing a process
//! logger twice. Flush failures are built as `XbError` values but stop at the
//! flush boundary; only configuration and installation errors reach callers.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for the XBridge log subsystem.
#[derive(Debug, Error)]
pub enum XbError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// Directory creation, file open or append failure.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A process-wide logger was installed more than once.
    #[error("{0} logger already installed")]
    AlreadyInstalled(&'static str),
}

impl XbError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
