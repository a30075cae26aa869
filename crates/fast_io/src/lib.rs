//! Low-level I/O primitives for zeromerge.
//!
//! This crate provides the two platform-facing building blocks the merge
//! engine relies on:
//!
//! - **Sparse writing** - zero runs in the output are skipped by seeking,
//!   so filesystems with hole support store nothing for them. On storage
//!   without hole support the write position still advances correctly and
//!   the final content is byte-identical; only the space saving is lost.
//! - **Activity probing** - a best-effort check for whether another
//!   process currently holds a file open, backed by non-blocking write
//!   leases on Linux and a permissive stub elsewhere.
//!
//! Both modules handle platform differences internally via `#[cfg]` blocks;
//! callers see one portable API.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

pub mod lease;
pub mod sparse;

pub use lease::{ActivityProbe, AlwaysInactive, default_probe, lease_support};
pub use sparse::{copy_sparse, write_sparse_chunk};
