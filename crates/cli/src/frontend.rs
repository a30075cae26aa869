//! Command-line parsing.
//!
//! The clap command disables the automatic help/version handling and
//! declares explicit flags instead, so that requesting help maps to the
//! documented exit code rather than clap's defaults, and every diagnostic
//! flows through the caller-supplied writers.

use std::ffi::OsString;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};
use zeromerge_core::version::PROGRAM_NAME;

/// Parsed command produced by [`parse_args`].
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) quiet: bool,
    pub(crate) basename_only: bool,
    pub(crate) same_size: bool,
    pub(crate) allow_empty: bool,
    pub(crate) force_active: bool,
    pub(crate) pretend: bool,
    pub(crate) operands: Vec<OsString>,
}

/// Argument-processing failures, all mapping to the option-error exit code.
#[derive(Debug)]
pub(crate) enum FrontendError {
    /// clap rejected the argument list (unknown flag, malformed value).
    Parse(clap::Error),
    /// Two recognised options contradict each other.
    Conflicting(&'static str),
}

impl std::fmt::Display for FrontendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(error) => write!(f, "{error}"),
            Self::Conflicting(text) => write!(f, "{text}"),
        }
    }
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Report only when files are changed.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("basename")
                .long("basename")
                .short('b')
                .help("Show only basenames in messages.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("same-size")
                .long("same-size")
                .short('s')
                .help("Require the files to be the same length.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-empty")
                .long("allow-empty")
                .short('e')
                .help("Allow appending to empty files.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .short('f')
                .help("Write even when a file is open in another program.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretend")
                .long("pretend")
                .visible_alias("dry-run")
                .short('p')
                .help("Report what would change, but change no files.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(0..)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses the argument list into [`ParsedArgs`].
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, FrontendError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut matches = clap_command()
        .try_get_matches_from(arguments.into_iter().map(Into::into))
        .map_err(FrontendError::Parse)?;

    let same_size = matches.get_flag("same-size");
    let allow_empty = matches.get_flag("allow-empty");
    if same_size && allow_empty {
        return Err(FrontendError::Conflicting(
            "the \"allow-empty\" and \"same-size\" options are mutually exclusive",
        ));
    }

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        quiet: matches.get_flag("quiet"),
        basename_only: matches.get_flag("basename"),
        same_size,
        allow_empty,
        force_active: matches.get_flag("force"),
        pretend: matches.get_flag("pretend"),
        operands: matches
            .remove_many::<OsString>("files")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ParsedArgs {
        let full = std::iter::once(PROGRAM_NAME).chain(args.iter().copied());
        parse_args(full).expect("arguments parse")
    }

    #[test]
    fn bare_invocation_parses_to_defaults() {
        let parsed = parse(&[]);
        assert!(!parsed.show_help);
        assert!(!parsed.quiet);
        assert!(parsed.operands.is_empty());
    }

    #[test]
    fn short_flags_are_recognised() {
        let parsed = parse(&["-q", "-b", "-f", "-p", "a", "b"]);
        assert!(parsed.quiet);
        assert!(parsed.basename_only);
        assert!(parsed.force_active);
        assert!(parsed.pretend);
        assert_eq!(parsed.operands.len(), 2);
    }

    #[test]
    fn long_flags_are_recognised() {
        let parsed = parse(&["--same-size", "--quiet", "a", "b"]);
        assert!(parsed.same_size);
        assert!(parsed.quiet);
    }

    #[test]
    fn dry_run_aliases_pretend() {
        let parsed = parse(&["--dry-run", "a", "b"]);
        assert!(parsed.pretend);
    }

    #[test]
    fn same_size_and_allow_empty_conflict() {
        let error = parse_args([PROGRAM_NAME, "-s", "-e", "a", "b"]).unwrap_err();
        assert!(matches!(error, FrontendError::Conflicting(_)));
        assert!(error.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let error = parse_args([PROGRAM_NAME, "--definitely-not-a-flag"]).unwrap_err();
        assert!(matches!(error, FrontendError::Parse(_)));
    }

    #[test]
    fn operands_keep_order_and_empties() {
        let parsed = parse(&["", "a", "b"]);
        assert_eq!(parsed.operands.len(), 3);
        assert!(parsed.operands[0].is_empty());
    }
}
