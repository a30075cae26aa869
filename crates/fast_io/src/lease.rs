//! Best-effort detection of files held open by other processes.
//!
//! The probe attempts to place a non-blocking exclusive write lease on the
//! file descriptor. The kernel refuses with `EAGAIN` when any other process
//! has the file open, which is exactly the signal we want. Any lease the
//! probe does acquire is released before returning.
//!
//! The check is advisory and inherently racy: a writer may open the file
//! in the window between the probe and a subsequent write. Callers must
//! treat the answer as a hint, not a guarantee.
//!
//! # Platform Support
//!
//! - **Linux**: real probe via `fcntl(F_SETLEASE)`.
//! - **Other platforms**: [`AlwaysInactive`] stub; [`lease_support`]
//!   reports `false` so callers can warn and fall back to forced writes.

use std::fs::File;

/// Capability interface for "is this file open elsewhere?" checks.
pub trait ActivityProbe {
    /// Returns `true` when another process is believed to hold `file` open.
    fn is_active(&self, file: &File) -> bool;
}

/// Probe backend that never reports activity.
///
/// Used on platforms without advisory leases, and useful in tests that
/// need deterministic probe answers.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysInactive;

impl ActivityProbe for AlwaysInactive {
    fn is_active(&self, _file: &File) -> bool {
        false
    }
}

/// Lease-based probe for Linux.
#[cfg(target_os = "linux")]
#[derive(Clone, Copy, Debug, Default)]
pub struct WriteLeaseProbe;

#[cfg(target_os = "linux")]
impl ActivityProbe for WriteLeaseProbe {
    fn is_active(&self, file: &File) -> bool {
        use std::os::fd::AsRawFd;

        let fd = file.as_raw_fd();
        // SAFETY: `fd` is a valid descriptor borrowed from the open `file`.
        let result = unsafe { libc::fcntl(fd, libc::F_SETLEASE, libc::F_WRLCK) };
        if result == -1 {
            let errno = std::io::Error::last_os_error();
            if errno.raw_os_error() == Some(libc::EAGAIN) {
                tracing::debug!(fd, "write lease refused, file is open elsewhere");
                return true;
            }
            // Any other failure (EACCES on some filesystems, ENOLCK, ...)
            // means the probe cannot answer; treat the file as inactive.
            tracing::debug!(fd, error = %errno, "write lease probe inconclusive");
            return false;
        }

        // The lease was granted; release it before reporting inactive.
        // SAFETY: same descriptor as above.
        let released = unsafe { libc::fcntl(fd, libc::F_SETLEASE, libc::F_UNLCK) };
        if released == -1 {
            tracing::debug!(fd, "failed to release probe lease");
        }
        false
    }
}

/// Returns the probe backend for the current platform.
#[must_use]
pub fn default_probe() -> Box<dyn ActivityProbe> {
    #[cfg(target_os = "linux")]
    {
        Box::new(WriteLeaseProbe)
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(AlwaysInactive)
    }
}

/// Reports whether the current platform has a real lease backend.
///
/// When this returns `false` the probe never detects activity, and callers
/// should warn the user and behave as if forced writes were requested.
#[must_use]
pub const fn lease_support() -> bool {
    cfg!(target_os = "linux")
}
