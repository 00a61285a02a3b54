use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::core::error::CsplitError;

/// Longest file name component most filesystems accept (`NAME_MAX`).
pub const NAME_MAX: usize = 255;

/// Open the input stream; `-` selects standard input.
pub fn open_input(path: &str) -> Result<Box<dyn BufRead>, CsplitError>
{
    if path == "-"
    {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file = File::open(path).map_err(|source| CsplitError::InputOpen {
        path: path.to_string(),
        source,
    })?;

    Ok(Box::new(BufReader::new(file)))
}

/// Build `<dir>/<prefix><index>` with the index zero-padded to `digits`.
///
/// Returns `None` when the file name would exceed [`NAME_MAX`]; the padded
/// index is never formatted in that case.
pub fn output_name(
    dir: &Utf8Path,
    prefix: &str,
    digits: usize,
    index: usize,
) -> Option<Utf8PathBuf>
{
    // Width of the index without padding
    let natural = index
        .checked_ilog10()
        .map_or(1, |l| l as usize + 1);

    if prefix.len() + digits.max(natural) > NAME_MAX
    {
        return None;
    }

    Some(dir.join(format!("{prefix}{index:0digits$}")))
}

/// Create (or truncate) an output file for writing.
pub fn create_output(path: &Utf8Path) -> Result<BufWriter<File>, CsplitError>
{
    let file = File::create(path).map_err(|source| CsplitError::OutputCreateFailed {
        path: path.to_owned(),
        source,
    })?;

    Ok(BufWriter::new(file))
}

/// Remove a file, ignoring failures.
pub fn remove_quietly(path: &Utf8Path)
{
    match std::fs::remove_file(path)
    {
        Ok(()) => debug!(%path, "removed output file"),
        Err(e) => debug!(%path, error = %e, "could not remove output file"),
    }
}
