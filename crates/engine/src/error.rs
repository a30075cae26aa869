//! Error types for reconciliation and writeback.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zeromerge_core::exit_code::{ExitCode, HasExitCode};

/// Errors produced while reconciling two input streams.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Both inputs carry non-zero data at the same offset and it differs.
    ///
    /// The offset is 1-based, matching the diagnostics shown to users.
    /// Reconciliation halts at the first conflict; no merged output is
    /// valid once this is returned.
    #[error("files have different non-zero data at offset {offset}")]
    Conflict {
        /// 1-based position of the first irreconcilable difference.
        offset: u64,
    },

    /// An I/O operation on one of the streams failed.
    #[error("{action}: {source}")]
    Io {
        /// What the engine was doing when the failure occurred.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl ReconcileError {
    /// Constructs an I/O error with action context.
    #[must_use]
    pub fn io(action: &'static str, source: io::Error) -> Self {
        Self::Io { action, source }
    }
}

impl HasExitCode for ReconcileError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Conflict { .. } => ExitCode::Conflict,
            Self::Io { .. } => ExitCode::FileSystem,
        }
    }
}

/// Error produced while writing a merged stream back to a target file.
#[derive(Debug, Error)]
#[error("{action} \"{path}\": {source}")]
pub struct WritebackError {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl WritebackError {
    /// Constructs a writeback error with action and path context.
    #[must_use]
    pub fn io(action: &'static str, path: PathBuf, source: io::Error) -> Self {
        Self {
            action,
            path,
            source,
        }
    }

    /// Returns the path of the target the writeback was addressing.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl HasExitCode for WritebackError {
    fn exit_code(&self) -> ExitCode {
        ExitCode::FileSystem
    }
}
