//! Safe writeback of a merged stream onto a target file.
//!
//! Overwriting happens in place: non-zero bytes are written, zero runs are
//! seeked over. A skipped position keeps whatever byte the target already
//! holds there - which is always zero, because a zero in the merged stream
//! means both inputs were zero (or past EOF) at that offset, and the
//! target is one of those inputs. After the sparse pass the target is
//! truncated to the merged length, which materialises any trailing hole
//! and removes stale tail bytes should a target ever be longer than the
//! merge.
//!
//! In-place overwrite is not crash-atomic. An abrupt termination mid-pass
//! can leave the target inconsistent; the tool accepts that risk rather
//! than hiding it.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use fast_io::lease::ActivityProbe;
use fast_io::sparse::copy_sparse;
use tracing::debug;

use crate::error::WritebackError;

/// Caller-selected safety switches for a writeback.
#[derive(Clone, Copy, Debug, Default)]
pub struct WritebackOptions {
    /// Overwrite the target even when another process holds it open.
    pub force_active: bool,
    /// Report the intended action without touching the target.
    pub pretend: bool,
}

/// What a writeback attempt did, for the caller to report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WritebackOutcome {
    /// Pretend mode: the target was not touched.
    DryRun,
    /// The target is held open elsewhere and `force_active` was off.
    SkippedActive,
    /// The target was overwritten.
    Updated {
        /// Whether the target was held open elsewhere at probe time.
        was_active: bool,
    },
}

/// Writes `merged` (of logical length `length`) over `target` in place.
///
/// The protocol, in order: honor pretend mode before anything else (a dry
/// run must not even probe the target); probe for concurrent openers and
/// skip unless forced; rewind both handles; sparse-overwrite; flush; and
/// truncate the target to `length`. The probe is advisory - a writer can
/// appear between the probe and the overwrite; that race is accepted.
pub fn write_back<M>(
    target: &mut File,
    target_path: &Path,
    merged: &mut M,
    length: u64,
    probe: &dyn ActivityProbe,
    options: WritebackOptions,
) -> Result<WritebackOutcome, WritebackError>
where
    M: Read + Seek,
{
    if options.pretend {
        return Ok(WritebackOutcome::DryRun);
    }

    let was_active = probe.is_active(target);
    if was_active && !options.force_active {
        return Ok(WritebackOutcome::SkippedActive);
    }

    merged
        .rewind()
        .map_err(|error| WritebackError::io("rewind merged stream for", target_path.to_path_buf(), error))?;
    target
        .rewind()
        .map_err(|error| WritebackError::io("rewind", target_path.to_path_buf(), error))?;

    let (total, written) = copy_sparse(merged, target)
        .map_err(|error| WritebackError::io("overwrite", target_path.to_path_buf(), error))?;
    debug!(total, written, path = %target_path.display(), "sparse overwrite complete");

    target
        .flush()
        .map_err(|error| WritebackError::io("flush", target_path.to_path_buf(), error))?;

    // Extends the file over a trailing hole, and would truncate stale
    // tail bytes if a target ever exceeded the merged length.
    target
        .set_len(length)
        .map_err(|error| WritebackError::io("truncate", target_path.to_path_buf(), error))?;

    Ok(WritebackOutcome::Updated { was_active })
}
