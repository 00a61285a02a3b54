//! **csplit** - Split a file into sections determined by context lines
//!
//! Directives (line counts, `/regex/offset`, `%regex%offset`, `{repeat}`)
//! are compiled up front, then applied in a single forward pass over the
//! input, writing one numbered file per section.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core processing pipeline - directive compilation and stream splitting
pub mod core {
    /// Argument grammar: line numbers, patterns, repeat suffixes
    pub mod directive;
    pub use directive::{Directive, DirectiveKind, Pattern, compile};

    /// Single-pass splitter with cleanup-on-failure
    pub mod split;
    pub use split::{SplitOptions, SplitSummary, split};

    /// Error taxonomy and exit codes
    pub mod error;
    pub use error::{CsplitError, NumberReason};

    /// Option resolution and the end-to-end run
    pub mod command;
    pub use command::{resolve_options, run};
}

/// Infrastructure - Configuration, I/O, and utilities
pub mod infra {
    /// Layered configuration (file + environment)
    pub mod config;
    pub use self::config::{Config, load_config};

    /// Input opening and output file naming
    pub mod io;
    pub use io::{open_input, output_name};

    /// Bounded number parsing
    pub mod utils;
}

// Strategic re-exports for clean CLI interface
pub use cli::Cli;
pub use crate::core::{CsplitError, Directive, SplitOptions, SplitSummary, compile, run, split};
