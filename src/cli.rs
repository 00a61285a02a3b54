use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "csplit")]
#[command(
    about = "Split a file into sections determined by line numbers and regular expressions"
)]
#[command(version, long_about = None)]
#[command(override_usage = "csplit [-ks] [-f prefix] [-n number] file arg ...")]
#[command(after_help = "\
Directive arguments:
  N            section ends after N more lines
  /re/[off]    section ends before the line matching re, shifted by off lines
  %re%[off]    like /re/ but the section is discarded
  {N}          repeat the previous directive N times")]
pub struct Cli
{
    /// Output file name prefix [default: xx]
    #[arg(short = 'f', long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Keep output files when an error occurs
    #[arg(short = 'k', long = "keep-files")]
    pub keep: bool,

    /// Number of digits in output file names [default: 2]
    #[arg(short = 'n', long = "digits", value_name = "NUMBER", allow_hyphen_values = true)]
    pub digits: Option<String>,

    /// Do not print section sizes
    #[arg(short = 's', long = "silent", visible_alias = "quiet")]
    pub silent: bool,

    /// Print a completion script for SHELL and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,

    /// Input file, or - for standard input
    #[arg(value_name = "FILE", required_unless_present = "completions")]
    pub file: Option<String>,

    /// Split directives
    #[arg(
        value_name = "ARG",
        required_unless_present = "completions",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell
{
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
