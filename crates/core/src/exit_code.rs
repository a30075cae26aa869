//! Centralized exit code definitions for the zeromerge workspace.
//!
//! This module provides a unified [`ExitCode`] enum covering every way a
//! merge invocation can terminate. All error types across the workspace
//! map onto these codes so scripts can rely on stable numeric values.
//!
//! Codes 1 and 2 separate "the user asked for help" from "the user passed a
//! broken option"; codes 3 through 8 cover the precondition pipeline in the
//! order it runs; code 9 is the only failure the merge algorithm itself can
//! produce. Code 66 is reserved for internal consistency failures that
//! should never happen in a correct build.

use std::fmt;

/// Exit codes returned by zeromerge operations.
///
/// Each variant documents the condition that produces it. The numeric
/// values are part of the tool's public contract and never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful completion, including the files-already-identical no-op.
    Ok = 0,

    /// Usage help or version information was requested.
    Usage = 1,

    /// Invalid or conflicting command-line options.
    BadOption = 2,

    /// The command line did not name exactly two files.
    FileCount = 3,

    /// A filesystem operation (stat, open, read, write, flush) failed.
    FileSystem = 4,

    /// One of the operands is not a regular file.
    NotRegular = 5,

    /// The two operands share an inode (hard links to the same file).
    HardLinked = 6,

    /// The files differ in length and `--same-size` was given.
    SizeMismatch = 7,

    /// An empty file was rejected by the emptiness policy.
    EmptyFile = 8,

    /// The files hold different non-zero data at the same offset.
    Conflict = 9,

    /// An internal consistency check failed.
    Internal = 66,
}

impl ExitCode {
    /// Returns the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a human-readable description of this exit code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Usage => "usage or help requested",
            Self::BadOption => "option error",
            Self::FileCount => "not exactly two files",
            Self::FileSystem => "filesystem error",
            Self::NotRegular => "not a regular file",
            Self::HardLinked => "files are hard linked",
            Self::SizeMismatch => "files are of different length",
            Self::EmptyFile => "empty file",
            Self::Conflict => "files have different non-zero data",
            Self::Internal => "internal consistency check failed",
        }
    }

    /// Returns `true` if this represents a successful exit.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Creates an exit code from an i32 value.
    ///
    /// Returns `None` if the value doesn't correspond to a known exit code.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            1 => Some(Self::Usage),
            2 => Some(Self::BadOption),
            3 => Some(Self::FileCount),
            4 => Some(Self::FileSystem),
            5 => Some(Self::NotRegular),
            6 => Some(Self::HardLinked),
            7 => Some(Self::SizeMismatch),
            8 => Some(Self::EmptyFile),
            9 => Some(Self::Conflict),
            66 => Some(Self::Internal),
            _ => None,
        }
    }

    /// Maps a `std::io::Error` to an exit code.
    ///
    /// The tool exposes a single filesystem-error code, so every I/O
    /// failure collapses to [`ExitCode::FileSystem`]. The function exists
    /// so call sites document the mapping rather than hard-coding `4`.
    #[must_use]
    pub const fn from_io_error(_error: &std::io::Error) -> Self {
        Self::FileSystem
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Clamp to u8 range for std::process::ExitCode
        let value = code.as_i32().clamp(0, 255) as u8;
        Self::from(value)
    }
}

/// Trait for types that have an associated exit code.
///
/// Implement this trait for error types so the CLI can translate any
/// failure into a process status without inspecting the error's shape.
pub trait HasExitCode {
    /// Returns the exit code associated with this value.
    fn exit_code(&self) -> ExitCode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(ExitCode::Ok.as_i32(), 0);
        assert_eq!(ExitCode::Usage.as_i32(), 1);
        assert_eq!(ExitCode::BadOption.as_i32(), 2);
        assert_eq!(ExitCode::FileCount.as_i32(), 3);
        assert_eq!(ExitCode::FileSystem.as_i32(), 4);
        assert_eq!(ExitCode::NotRegular.as_i32(), 5);
        assert_eq!(ExitCode::HardLinked.as_i32(), 6);
        assert_eq!(ExitCode::SizeMismatch.as_i32(), 7);
        assert_eq!(ExitCode::EmptyFile.as_i32(), 8);
        assert_eq!(ExitCode::Conflict.as_i32(), 9);
        assert_eq!(ExitCode::Internal.as_i32(), 66);
    }

    #[test]
    fn from_i32_roundtrips() {
        for code in [
            ExitCode::Ok,
            ExitCode::Usage,
            ExitCode::BadOption,
            ExitCode::FileCount,
            ExitCode::FileSystem,
            ExitCode::NotRegular,
            ExitCode::HardLinked,
            ExitCode::SizeMismatch,
            ExitCode::EmptyFile,
            ExitCode::Conflict,
            ExitCode::Internal,
        ] {
            assert_eq!(ExitCode::from_i32(code.as_i32()), Some(code));
        }
    }

    #[test]
    fn from_i32_returns_none_for_unknown() {
        assert_eq!(ExitCode::from_i32(-1), None);
        assert_eq!(ExitCode::from_i32(10), None);
        assert_eq!(ExitCode::from_i32(65), None);
        assert_eq!(ExitCode::from_i32(255), None);
    }

    #[test]
    fn is_success_only_for_ok() {
        assert!(ExitCode::Ok.is_success());
        assert!(!ExitCode::Usage.is_success());
        assert!(!ExitCode::Conflict.is_success());
    }

    #[test]
    fn every_io_error_maps_to_filesystem() {
        use std::io::{Error, ErrorKind};

        for kind in [
            ErrorKind::NotFound,
            ErrorKind::PermissionDenied,
            ErrorKind::UnexpectedEof,
            ErrorKind::WriteZero,
            ErrorKind::Other,
        ] {
            let err = Error::from(kind);
            assert_eq!(ExitCode::from_io_error(&err), ExitCode::FileSystem);
        }
    }

    #[test]
    fn display_shows_description() {
        assert_eq!(format!("{}", ExitCode::Ok), "success");
        assert_eq!(
            format!("{}", ExitCode::Conflict),
            "files have different non-zero data"
        );
    }

    #[test]
    fn into_process_exit_code_clamps() {
        let code: std::process::ExitCode = ExitCode::Internal.into();
        let _ = code;
    }

    #[test]
    fn descriptions_are_not_empty() {
        for value in [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 66] {
            let code = ExitCode::from_i32(value).expect("known code");
            assert!(!code.description().is_empty(), "empty description for {code:?}");
        }
    }
}
