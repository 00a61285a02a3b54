//! Shell completion generation using clap_complete.

use std::io::Write;

use clap::{Command, CommandFactory};
use clap_complete::{Shell as CompletionShell, generate};

use crate::cli::{Cli, Shell};

impl From<Shell> for CompletionShell
{
    fn from(shell: Shell) -> Self
    {
        match shell
        {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn run(
    shell: Shell,
    out: &mut dyn Write,
)
{
    let mut cmd: Command = Cli::command();
    generate(CompletionShell::from(shell), &mut cmd, "csplit", out);
}
