//! Top-level command: resolve options, compile directives, split the input.

use std::io::Write;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::cli::Cli;
use crate::core::directive::compile;
use crate::core::error::CsplitError;
use crate::core::split::{SplitOptions, split};
use crate::infra::config::{Config, load_config};
use crate::infra::io::open_input;
use crate::infra::utils::{MAX_INT, NumUtils};

/// Merge command-line flags over the layered configuration.
///
/// # Errors
///
/// Fails when the digit width (from either source) is outside `[1, MAX_INT]`.
pub fn resolve_options(
    cli: &Cli,
    config: Config,
) -> Result<SplitOptions, CsplitError>
{
    let digits = match &cli.digits
    {
        Some(raw) => NumUtils::parse_token(raw, 1, MAX_INT)?,
        None => NumUtils::parse_token(&config.digits.to_string(), 1, MAX_INT)?,
    };

    Ok(SplitOptions {
        prefix: cli.prefix.clone().unwrap_or(config.prefix),
        digits: digits as usize,
        keep: cli.keep || config.keep,
        silent: cli.silent || config.silent,
        dir: Utf8PathBuf::from("."),
    })
}

/// Run one invocation, writing section sizes (or a completion script) to `out`.
pub fn run(
    cli: Cli,
    out: &mut dyn Write,
) -> Result<(), CsplitError>
{
    if let Some(shell) = cli.completions
    {
        crate::completion::run(shell, out);
        return Ok(());
    }

    let file = cli
        .file
        .as_deref()
        .ok_or_else(|| CsplitError::Usage("missing input file".to_string()))?;
    if cli.args.is_empty()
    {
        return Err(CsplitError::Usage("missing split directive".to_string()));
    }

    let config = load_config().map_err(|e| CsplitError::Config(format!("{e:#}")))?;
    let opts = resolve_options(&cli, config)?;
    debug!(?opts, "resolved options");

    // Compile everything before touching the filesystem
    let directives = compile(&cli.args)?;
    let input = open_input(file)?;

    let summary = split(&directives, input, out, &opts)?;
    debug!(files = summary.files.len(), tail = summary.tail_bytes, "split finished");

    Ok(())
}
