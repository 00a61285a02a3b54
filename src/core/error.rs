//! Error taxonomy shared by the directive compiler and the splitter.
//!
//! Every variant is fatal and maps to exit status 1. Compilation errors are
//! raised before any output file exists; splitting errors are raised after
//! the session has swept its output files (unless keep is set).

use std::fmt;
use std::io;

use camino::Utf8PathBuf;
use miette::Diagnostic;

/// Why a numeric token was rejected (mirrors `strtonum` wording).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberReason
{
    Invalid,
    TooSmall,
    TooLarge,
}

impl fmt::Display for NumberReason
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        let s = match self
        {
            NumberReason::Invalid => "invalid",
            NumberReason::TooSmall => "too small",
            NumberReason::TooLarge => "too large",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CsplitError
{
    #[error("{0}")]
    #[diagnostic(
        code(csplit::usage),
        help("usage: csplit [-ks] [-f prefix] [-n number] file arg ...")
    )]
    Usage(String),

    #[error("{token}: {reason}")]
    #[diagnostic(code(csplit::invalid_number))]
    InvalidNumber
    {
        token: String,
        reason: NumberReason,
    },

    #[error("{token}: {reason}")]
    #[diagnostic(
        code(csplit::invalid_regex),
        help("escape a literal delimiter inside the pattern with a backslash")
    )]
    InvalidRegex
    {
        token: String,
        reason: String,
    },

    #[error("no previous argument to repeat")]
    #[diagnostic(
        code(csplit::no_previous_directive),
        help("a {{count}} suffix must follow a line number or pattern")
    )]
    NoPreviousDirective,

    #[error("{token}: invalid argument")]
    #[diagnostic(
        code(csplit::invalid_argument),
        help("expected a line number, /regex/[offset], %regex%[offset] or {{count}}")
    )]
    InvalidArgument
    {
        token: String,
    },

    #[error("{path}: {source}")]
    #[diagnostic(code(csplit::input))]
    InputOpen
    {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    #[diagnostic(code(csplit::output_create))]
    OutputCreateFailed
    {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    #[diagnostic(code(csplit::io))]
    Io
    {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("configuration: {0}")]
    #[diagnostic(code(csplit::config))]
    Config(String),

    #[error("internal error: {0}")]
    #[diagnostic(code(csplit::internal))]
    Internal(String),
}

impl CsplitError
{
    /// Shorthand for wrapping an I/O failure with a short context string.
    pub fn io(
        context: impl Into<String>,
        source: io::Error,
    ) -> Self
    {
        CsplitError::Io { context: context.into(), source }
    }

    /// Process exit status for this error. Every failure is fatal.
    pub fn exit_code(&self) -> u8
    {
        1
    }
}
