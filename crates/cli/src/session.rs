//! The merge session: precondition pipeline, reconciliation, writeback.
//!
//! Every step of the pipeline maps to a stable exit code, in the order the
//! steps run: filesystem errors (4), non-regular files (5), hard links
//! (6), the same-size policy (7), the emptiness policy (8). Only after all
//! preconditions hold does the engine see the files; the only failure it
//! can add is a conflict (9).

use std::fs::{File, Metadata, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use engine::{
    ReconcileError, WritebackOptions, WritebackOutcome, percent_nonzero, reconcile, write_back,
};
use fast_io::lease::{ActivityProbe, default_probe, lease_support};
use tracing::debug;
use zeromerge_core::exit_code::{ExitCode, HasExitCode};
use zeromerge_core::message::Message;

use crate::display::display_name;

/// Spool threshold for the merge staging buffer: merges up to this size
/// stay in memory, larger ones spill to an unlinked temporary file.
const SPOOL_THRESHOLD: usize = 8 * 1024 * 1024;

/// Behavior switches collected from the command line.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SessionOptions {
    pub(crate) quiet: bool,
    pub(crate) basename_only: bool,
    pub(crate) same_size: bool,
    pub(crate) allow_empty: bool,
    pub(crate) force_active: bool,
    pub(crate) pretend: bool,
}

/// Runs one merge session over the two validated operands.
pub(crate) fn execute<Out, ErrW>(
    left_path: &Path,
    right_path: &Path,
    options: &SessionOptions,
    stdout: &mut Out,
    stderr: &mut ErrW,
) -> ExitCode
where
    Out: Write,
    ErrW: Write,
{
    let left_name = display_name(left_path, options.basename_only);
    let right_name = display_name(right_path, options.basename_only);

    let left_meta = match stat(left_path, stderr) {
        Ok(meta) => meta,
        Err(code) => return code,
    };
    let right_meta = match stat(right_path, stderr) {
        Ok(meta) => meta,
        Err(code) => return code,
    };

    if !left_meta.is_file() {
        let _ = writeln!(stderr, "\"{left_name}\" is not a regular file.");
        return ExitCode::NotRegular;
    }
    if !right_meta.is_file() {
        let _ = writeln!(stderr, "\"{right_name}\" is not a regular file.");
        return ExitCode::NotRegular;
    }

    if same_inode(&left_meta, &right_meta) {
        if !options.quiet {
            let _ = writeln!(stderr, "files are the same inode");
        }
        return ExitCode::HardLinked;
    }

    if options.same_size && left_meta.len() != right_meta.len() {
        if !options.quiet {
            let _ = writeln!(stdout, "files are of different lengths");
        }
        return ExitCode::SizeMismatch;
    }

    if left_meta.len() == 0 && right_meta.len() == 0 {
        if !options.quiet {
            let _ = writeln!(stdout, "files are empty");
        }
        return ExitCode::EmptyFile;
    }
    if !options.allow_empty {
        if left_meta.len() == 0 {
            if !options.quiet {
                let _ = writeln!(stdout, "\"{left_name}\" is empty");
            }
            return ExitCode::EmptyFile;
        }
        if right_meta.len() == 0 {
            if !options.quiet {
                let _ = writeln!(stdout, "\"{right_name}\" is empty");
            }
            return ExitCode::EmptyFile;
        }
    }

    let mut left_file = match open_rw(left_path, stderr) {
        Ok(file) => file,
        Err(code) => return code,
    };
    let mut right_file = match open_rw(right_path, stderr) {
        Ok(file) => file,
        Err(code) => return code,
    };

    // On platforms without a lease backend the probe can never say
    // "active", so skipping would silently become the only behavior.
    // Warn once and write as if forced, per the documented fallback.
    let mut force_active = options.force_active;
    if !lease_support() && !force_active {
        if !options.quiet {
            let _ = Message::warning(
                "file leases are unsupported on this platform; writing as if --force were given",
            )
            .render_line_to(stderr);
        }
        force_active = true;
    }

    let probe = default_probe();
    if !options.quiet {
        report_active_inputs(
            probe.as_ref(),
            &left_file,
            &left_name,
            &right_file,
            &right_name,
            stderr,
        );
    }

    let mut staging = tempfile::SpooledTempFile::new(SPOOL_THRESHOLD);
    let result = match reconcile(&left_file, &right_file, &mut staging) {
        Ok(result) => result,
        Err(ReconcileError::Conflict { offset }) => {
            if !options.quiet {
                let _ = writeln!(stderr, "files have different non-zero data at offset {offset}");
            }
            return ExitCode::Conflict;
        }
        Err(error) => {
            let code = error.exit_code();
            let _ = Message::error(code.as_i32(), error.to_string()).render_line_to(stderr);
            return code;
        }
    };

    let staged_len = match staging.seek(SeekFrom::End(0)) {
        Ok(len) => len,
        Err(error) => {
            let _ = Message::error(
                ExitCode::FileSystem.as_i32(),
                format!("seek staged merge: {error}"),
            )
            .render_line_to(stderr);
            return ExitCode::FileSystem;
        }
    };
    if staged_len != result.total() {
        let _ = Message::error(
            ExitCode::Internal.as_i32(),
            format!(
                "staged merge holds {staged_len} bytes but {} were resolved",
                result.total()
            ),
        )
        .render_line_to(stderr);
        return ExitCode::Internal;
    }

    let pct = percent_nonzero(result.common_count, result.zero_count);
    let common = result.common_count;
    let total = result.total();
    debug!(%pct, common, total, "merge statistics");

    if result.is_identical() {
        if !options.quiet {
            let _ = writeln!(
                stdout,
                "files are identical, {pct}% nonzero ({common} of {total})"
            );
        }
        return ExitCode::Ok;
    }

    let writeback_options = WritebackOptions {
        force_active,
        pretend: options.pretend,
    };
    let sides: [(&mut File, &Path, &str, bool); 2] = [
        (
            &mut left_file,
            left_path,
            left_name.as_str(),
            result.changed_left,
        ),
        (
            &mut right_file,
            right_path,
            right_name.as_str(),
            result.changed_right,
        ),
    ];
    for (file, path, name, changed) in sides {
        if !changed {
            continue;
        }
        match write_back(
            file,
            path,
            &mut staging,
            total,
            probe.as_ref(),
            writeback_options,
        ) {
            Ok(outcome) => {
                report_outcome(outcome, name, &pct, common, total, stdout);
            }
            Err(error) => {
                let code = error.exit_code();
                let _ = Message::error(code.as_i32(), error.to_string()).render_line_to(stderr);
                return code;
            }
        }
    }

    ExitCode::Ok
}

/// Stats a path, reporting failures in the `"path": error` form.
fn stat<ErrW: Write>(path: &Path, stderr: &mut ErrW) -> Result<Metadata, ExitCode> {
    std::fs::metadata(path).map_err(|error| {
        let _ = writeln!(stderr, "\"{}\": {error}", path.display());
        ExitCode::from_io_error(&error)
    })
}

/// Opens a path read+write, reporting failures in the `"path": error` form.
fn open_rw<ErrW: Write>(path: &Path, stderr: &mut ErrW) -> Result<File, ExitCode> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|error| {
            let _ = writeln!(stderr, "\"{}\": {error}", path.display());
            ExitCode::from_io_error(&error)
        })
}

#[cfg(unix)]
fn same_inode(left: &Metadata, right: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    left.dev() == right.dev() && left.ino() == right.ino()
}

#[cfg(not(unix))]
fn same_inode(_left: &Metadata, _right: &Metadata) -> bool {
    // Distinct-path regular files are assumed distinct where inode
    // identity is unavailable.
    false
}

/// Warns about inputs currently held open by other processes.
fn report_active_inputs<ErrW: Write>(
    probe: &dyn ActivityProbe,
    left_file: &File,
    left_name: &str,
    right_file: &File,
    right_name: &str,
    stderr: &mut ErrW,
) {
    if probe.is_active(left_file) {
        let _ = writeln!(stderr, "\"{left_name}\" is =ACTIVE=");
    }
    if probe.is_active(right_file) {
        let _ = writeln!(stderr, "\"{right_name}\" is =ACTIVE=");
    }
}

/// Prints the per-target report line for a writeback outcome.
///
/// Update reports are never suppressed by quiet mode: quiet means "report
/// only when files are changed", and these lines are exactly that report.
fn report_outcome<Out: Write>(
    outcome: WritebackOutcome,
    name: &str,
    pct: &str,
    common: u64,
    total: u64,
    stdout: &mut Out,
) {
    let line = match outcome {
        WritebackOutcome::DryRun => format!("pretending to update \"{name}\""),
        WritebackOutcome::SkippedActive => format!("NOT updating =ACTIVE= \"{name}\""),
        WritebackOutcome::Updated { was_active: true } => {
            format!("updating =ACTIVE= \"{name}\"")
        }
        WritebackOutcome::Updated { was_active: false } => format!("updating \"{name}\""),
    };
    let _ = writeln!(stdout, "{line} {pct}% nonzero ({common} of {total})");
}
