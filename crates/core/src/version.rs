//! Program name and version constants.
//!
//! Centralises the strings rendered by `--help` and `--version` so every
//! crate in the workspace agrees on the banner wording.

/// Canonical program name used in diagnostics and banners.
pub const PROGRAM_NAME: &str = "zeromerge";

/// Workspace version, taken from the crate manifest at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the one-line version banner.
#[must_use]
pub fn version_banner() -> String {
    format!("{PROGRAM_NAME} version {VERSION}")
}
