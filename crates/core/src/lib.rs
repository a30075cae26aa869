#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `core` collects the pieces of the zeromerge workspace that every other
//! crate hangs off: the stable exit-code taxonomy, the diagnostic
//! [`Message`](message::Message) type rendered into caller-supplied writers,
//! and the program/version constants used by the CLI banners.
//!
//! The crate deliberately has no dependencies and performs no I/O of its
//! own; it only defines vocabulary. Higher layers (the engine and the CLI)
//! decide when and where diagnostics are written.

pub mod exit_code;
pub mod message;
pub mod version;

pub use exit_code::{ExitCode, HasExitCode};
pub use message::Message;
