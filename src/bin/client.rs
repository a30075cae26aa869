use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

/// Runs the shared client entry point for the `zeromerge` executable.
///
/// The binary's `main` forwards its arguments and I/O handles here, and
/// tests call the same path in-process. Centralising the dispatch keeps
/// the exit-code mapping in exactly one place: [`cli::run`] produces the
/// numeric status and [`cli::exit_code_from`] normalises it for the
/// process.
#[must_use]
pub fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
{
    cli::exit_code_from(cli::run(args, stdout, stderr))
}
