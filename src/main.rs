use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use csplit::{Cli, CsplitError};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode
{
    // Diagnostics go to stderr; stdout carries only section sizes
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = match Cli::try_parse()
    {
        Ok(cli) => cli,
        Err(e) =>
        {
            // --help/--version print to stdout and succeed; usage errors exit 1
            let _ = e.print();
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Sizes still buffered at exit must reach stdout, or the run fails
    let result = csplit::run(cli, &mut out)
        .and_then(|()| out.flush().map_err(|e| CsplitError::io("standard output", e)));

    match result
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) =>
        {
            let _ = out.flush();
            let code = e.exit_code();
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}
