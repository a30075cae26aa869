#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end for zeromerge. The crate
//! recognises the full option surface (`--help`/`-h`, `--version`/`-V`,
//! `--quiet`/`-q`, `--basename`/`-b`, `--same-size`/`-s`,
//! `--allow-empty`/`-e`, `--force`/`-f`, and `--pretend`/`-p`), validates
//! the two file operands through the precondition pipeline, and drives the
//! merge session: reconcile both inputs into a spooled staging buffer,
//! then write the merge back over each side that needs it.
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function
//! accepts an iterator of arguments together with handles for standard
//! output and error, so the whole front-end can be exercised in-process
//! against byte-vector sinks. Diagnostics never touch process-global
//! streams.
//!
//! # Invariants
//!
//! - [`run`] never panics; unexpected I/O failures surface as the
//!   filesystem exit code.
//! - Exit codes are stable and documented in
//!   [`zeromerge_core::exit_code::ExitCode`]; every path out of [`run`]
//!   maps to exactly one of them.
//! - Pretend mode never mutates any file, regardless of what else happens
//!   during the run.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["zeromerge", "--version"], &mut stdout, &mut stderr);
//!
//! // Version requests map to the usage exit code.
//! assert_eq!(exit_code, 1);
//! assert!(!stdout.is_empty());
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use zeromerge_core::exit_code::ExitCode;
use zeromerge_core::version::version_banner;

mod display;
mod frontend;
mod session;

use frontend::parse_args;
use session::SessionOptions;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// One-line usage banner, shown on operand and option errors.
const USAGE: &str = "Usage: zeromerge [-hVqbsefp] <file1> <file2>";

/// Deterministic help text describing the CLI surface.
const HELP_TEXT: &str = concat!(
    "zeromerge ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "\n",
    "Usage: zeromerge [-hVqbsefp] <file1> <file2>\n",
    "\n",
    "  -h, --help         Show this help message and exit.\n",
    "  -q, --quiet        Report only when files are changed.\n",
    "  -b, --basename     Show only basenames in messages.\n",
    "  -s, --same-size    Require the files to be the same length.\n",
    "  -e, --allow-empty  Allow appending to empty files.\n",
    "  -f, --force        Write even when a file is open in another program.\n",
    "  -p, --pretend      Report what would change, but change no files.\n",
    "  -V, --version      Output version information and exit.\n",
    "\n",
    "Exit codes:\n",
    "   0 - success\n",
    "   1 - usage or help requested\n",
    "   2 - option error\n",
    "   3 - not exactly two files\n",
    "   4 - filesystem error\n",
    "   5 - not a regular file\n",
    "   6 - files are hard linked\n",
    "   7 - files are of different length\n",
    "   8 - empty file\n",
    "   9 - files have different non-zero data\n",
    "  66 - internal consistency check failed\n",
    "\n",
    "If the content of the two files differs only where one of the\n",
    "bytes at each offset is zero, the files are bytewise merged by\n",
    "overwriting zeros in one file with the non-zero data of the\n",
    "other. Useful for merging two incomplete copies of the same\n",
    "file, where the missing data is zero or \"sparse\".\n",
    "\n",
    "Exactly two files must be named on the command line. By default\n",
    "the shorter file is presumed to hold zero data beyond its end.\n",
);

/// Initialises the tracing subscriber from the `ZEROMERGE_LOG` filter.
///
/// Diagnostics default to off so user-visible output stays exactly the
/// documented report lines unless logging is explicitly requested.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("ZEROMERGE_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// The function returns the process exit code that should be used by the
/// caller; [`exit_code_from`] converts it into [`std::process::ExitCode`].
pub fn run<I, S, Out, ErrW>(arguments: I, stdout: &mut Out, stderr: &mut ErrW) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    ErrW: Write,
{
    init_tracing();

    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => {
            let text = error.to_string();
            let _ = writeln!(stderr, "{}", text.trim_end());
            let _ = writeln!(stderr, "{USAGE}");
            return ExitCode::BadOption.as_i32();
        }
    };

    if parsed.show_help {
        let _ = stdout.write_all(HELP_TEXT.as_bytes());
        return ExitCode::Usage.as_i32();
    }
    if parsed.show_version {
        let _ = writeln!(stdout, "{}", version_banner());
        return ExitCode::Usage.as_i32();
    }

    // Leading empty operands are ignored, as some shells and scripts
    // expand unset variables into them.
    let mut operands = parsed.operands.as_slice();
    while operands.first().is_some_and(|operand| operand.is_empty()) {
        operands = &operands[1..];
    }

    if operands.len() != 2 {
        let _ = writeln!(stderr, "{USAGE}");
        let _ = writeln!(
            stderr,
            "must be exactly two files on the command line, found {}:",
            operands.len()
        );
        for (index, operand) in operands.iter().enumerate() {
            let _ = writeln!(
                stderr,
                "{}: \"{}\"",
                index + 1,
                Path::new(operand).display()
            );
        }
        return ExitCode::FileCount.as_i32();
    }

    let options = SessionOptions {
        quiet: parsed.quiet,
        basename_only: parsed.basename_only,
        same_size: parsed.same_size,
        allow_empty: parsed.allow_empty,
        force_active: parsed.force_active,
        pretend: parsed.pretend,
    };
    session::execute(
        Path::new(&operands[0]),
        Path::new(&operands[1]),
        &options,
        stdout,
        stderr,
    )
    .as_i32()
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
