//! Filepath: src/core/split.rs
//! Stream splitter: applies compiled directives to one input stream and
//! writes numbered section files.
//!
//! Session rules:
//! - Input is read strictly forward; lines read ahead by a pattern search
//!   wait in a look-ahead queue until the next section claims them.
//! - At most one output file is open. The last one stays open so trailing
//!   input can be appended after the directives run out.
//! - On any error every file this session created is removed, unless the
//!   caller asked to keep them.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

use bstr::ByteSlice;
use camino::Utf8PathBuf;
use tracing::{debug, instrument, trace, warn};

use crate::core::directive::{Directive, DirectiveKind, Pattern};
use crate::core::error::CsplitError;
use crate::infra::io::{create_output, output_name, remove_quietly};

/// Naming and failure policy for one run.
#[derive(Debug, Clone)]
pub struct SplitOptions
{
    /// File name prefix, `xx` by default.
    pub prefix: String,
    /// Zero-padded width of the numeric suffix.
    pub digits: usize,
    /// Leave created files in place when the run fails.
    pub keep: bool,
    /// Do not print section sizes.
    pub silent: bool,
    /// Directory the section files are written to.
    pub dir: Utf8PathBuf,
}

impl Default for SplitOptions
{
    fn default() -> Self
    {
        Self {
            prefix: "xx".to_string(),
            digits: 2,
            keep: false,
            silent: false,
            dir: Utf8PathBuf::from("."),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SplitSummary
{
    /// Every file created, in index order.
    pub files: Vec<Utf8PathBuf>,
    /// Byte size of each written section, in order.
    pub sizes: Vec<u64>,
    /// Bytes appended to the last file after the directives ran out.
    pub tail_bytes: u64,
}

/// Which side of a copy failed.
#[derive(Debug)]
enum CopyError
{
    Read(io::Error),
    Write(io::Error),
}

/// Forward-only line reader with a push-back queue.
struct LineSource<R>
{
    reader: R,
    pending: VecDeque<Vec<u8>>,
    /// Complete lines handed out so far (pushed-back lines excluded).
    consumed: u64,
}

impl<R: BufRead> LineSource<R>
{
    fn new(reader: R) -> Self
    {
        Self { reader, pending: VecDeque::new(), consumed: 0 }
    }

    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>>
    {
        if let Some(line) = self.pending.pop_front()
        {
            self.consumed += 1;
            return Ok(Some(line));
        }

        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0
        {
            return Ok(None);
        }

        self.consumed += 1;
        Ok(Some(line))
    }

    /// Return lines to the front of the stream, preserving their order.
    fn unread(
        &mut self,
        lines: Vec<Vec<u8>>,
    )
    {
        self.consumed -= lines.len() as u64;
        for line in lines.into_iter().rev()
        {
            self.pending.push_front(line);
        }
    }

    fn is_exhausted(&mut self) -> io::Result<bool>
    {
        if !self.pending.is_empty()
        {
            return Ok(false);
        }

        Ok(self.reader.fill_buf()?.is_empty())
    }

    /// Copy input to `out` until `lines` newlines have passed or input ends.
    /// Returns the number of bytes copied.
    fn copy_lines<W: Write>(
        &mut self,
        lines: u64,
        out: &mut W,
    ) -> Result<u64, CopyError>
    {
        let mut remaining = lines;
        let mut bytes = 0u64;

        while remaining > 0
        {
            // Drain look-ahead first; only the final line can lack a newline
            if let Some(line) = self.pending.pop_front()
            {
                out.write_all(&line).map_err(CopyError::Write)?;
                bytes += line.len() as u64;
                self.consumed += 1;
                if line.ends_with(b"\n")
                {
                    remaining -= 1;
                }
                continue;
            }

            let chunk = self.reader.fill_buf().map_err(CopyError::Read)?;
            if chunk.is_empty()
            {
                break;
            }

            // Find the `remaining`-th newline in this chunk, if it is here
            let mut seen = 0u64;
            let mut take = chunk.len();
            for pos in memchr::memchr_iter(b'\n', chunk)
            {
                seen += 1;
                if seen == remaining
                {
                    take = pos + 1;
                    break;
                }
            }

            out.write_all(&chunk[..take]).map_err(CopyError::Write)?;
            self.reader.consume(take);

            bytes += take as u64;
            self.consumed += seen;
            remaining -= seen;
        }

        Ok(bytes)
    }

    /// Copy everything left (look-ahead included) into `out`.
    fn drain_into<W: Write>(
        &mut self,
        out: &mut W,
    ) -> Result<u64, CopyError>
    {
        let mut bytes = 0u64;

        while let Some(line) = self.pending.pop_front()
        {
            out.write_all(&line).map_err(CopyError::Write)?;
            bytes += line.len() as u64;
        }

        loop
        {
            let chunk = self.reader.fill_buf().map_err(CopyError::Read)?;
            if chunk.is_empty()
            {
                break;
            }

            out.write_all(chunk).map_err(CopyError::Write)?;
            let len = chunk.len();
            self.reader.consume(len);
            bytes += len as u64;
        }

        Ok(bytes)
    }
}

/// The file currently open for writing.
struct OpenOutput
{
    path: Utf8PathBuf,
    writer: BufWriter<File>,
}

/// Mutable state of one run. Owned exclusively by [`split`].
struct SplitSession<'a, W>
{
    opts: &'a SplitOptions,
    report: W,
    /// Index the next output file will get.
    index: usize,
    current: Option<OpenOutput>,
    created: Vec<Utf8PathBuf>,
    sizes: Vec<u64>,
    tail_bytes: u64,
    /// Absolute number of the most recently matched line (0 = none yet).
    last_match: u64,
}

impl<'a, W: Write> SplitSession<'a, W>
{
    fn new(
        opts: &'a SplitOptions,
        report: W,
    ) -> Self
    {
        Self {
            opts,
            report,
            index: 0,
            current: None,
            created: Vec::new(),
            sizes: Vec::new(),
            tail_bytes: 0,
            last_match: 0,
        }
    }

    fn run<R: BufRead>(
        &mut self,
        directives: &[Directive],
        source: &mut LineSource<R>,
    ) -> Result<(), CsplitError>
    {
        'directives: for directive in directives
        {
            for round in 0..directive.repeat
            {
                if source.is_exhausted().map_err(read_error)?
                {
                    debug!(round, "input exhausted; remaining directives skipped");
                    break 'directives;
                }

                trace!(round, skip = directive.is_skip(), index = self.index, "applying directive");

                match &directive.kind
                {
                    DirectiveKind::LineNumber(lines) => self.cut_lines(u64::from(*lines), source)?,
                    DirectiveKind::Pattern(pattern) => self.cut_pattern(pattern, source)?,
                }
            }
        }

        self.copy_tail(source)?;
        self.close_current()
    }

    /// Close the previous file and open the next numbered one.
    fn open_next(&mut self) -> Result<&mut BufWriter<File>, CsplitError>
    {
        self.close_current()?;

        let path = output_name(&self.opts.dir, &self.opts.prefix, self.opts.digits, self.index)
            .ok_or_else(|| CsplitError::OutputCreateFailed {
                path: self.opts.dir.join(&self.opts.prefix),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file name too long"),
            })?;

        let writer = create_output(&path)?;
        debug!(%path, "created output file");

        self.created.push(path.clone());
        let open = self.current.insert(OpenOutput { path, writer });
        Ok(&mut open.writer)
    }

    fn close_current(&mut self) -> Result<(), CsplitError>
    {
        if let Some(mut open) = self.current.take()
        {
            open.writer
                .flush()
                .map_err(|e| CsplitError::io(format!("write {}", open.path), e))?;
        }
        Ok(())
    }

    fn current_path(&self) -> String
    {
        self.current
            .as_ref()
            .map(|o| o.path.to_string())
            .unwrap_or_default()
    }

    /// Report a finished section and advance the file index.
    fn complete_segment(
        &mut self,
        bytes: u64,
    ) -> Result<(), CsplitError>
    {
        if !self.opts.silent
        {
            writeln!(self.report, "{bytes}").map_err(|e| CsplitError::io("standard output", e))?;
        }

        debug!(index = self.index, bytes, "section complete");
        self.sizes.push(bytes);
        self.index += 1;
        Ok(())
    }

    fn cut_lines<R: BufRead>(
        &mut self,
        lines: u64,
        source: &mut LineSource<R>,
    ) -> Result<(), CsplitError>
    {
        let out = self.open_next()?;
        let copied = source.copy_lines(lines, out);
        let bytes = copied.map_err(|e| copy_error(e, &self.current_path()))?;
        self.complete_segment(bytes)
    }

    fn cut_pattern<R: BufRead>(
        &mut self,
        pattern: &Pattern,
        source: &mut LineSource<R>,
    ) -> Result<(), CsplitError>
    {
        let first = source.consumed + 1;
        let mut lines: Vec<Vec<u8>> = Vec::new();
        let mut hit = None;

        // Scan forward; the previously matched line is never re-tested
        while let Some(line) = source.next_line().map_err(read_error)?
        {
            let number = first + lines.len() as u64;
            let matched = number != self.last_match && pattern.regex.is_match(strip_newline(&line));
            lines.push(line);

            if matched
            {
                trace!(number, line = %lines[lines.len() - 1].trim_end().as_bstr(), "pattern matched");
                self.last_match = number;
                hit = Some(lines.len() - 1);
                break;
            }
        }

        let cut = match hit
        {
            None =>
            {
                warn!(pattern = %pattern.source, "no match before end of input");
                lines.len()
            }

            Some(at) =>
            {
                let target = at as i64 + i64::from(pattern.offset);
                if target <= 0
                {
                    0
                }
                else
                {
                    // Positive offsets pull in following lines, clamped at EOF
                    let target = target as usize;
                    while lines.len() < target
                    {
                        match source.next_line().map_err(read_error)?
                        {
                            Some(line) => lines.push(line),
                            None => break,
                        }
                    }
                    target.min(lines.len())
                }
            }
        };

        let rest = lines.split_off(cut);
        source.unread(rest);

        if pattern.skip
        {
            debug!(lines = lines.len(), pattern = %pattern.source, "section discarded");
            return Ok(());
        }

        let out = self.open_next()?;
        let written = write_lines(out, &lines);
        let bytes = written.map_err(|e| CsplitError::io(format!("write {}", self.current_path()), e))?;

        self.complete_segment(bytes)
    }

    /// Append whatever input is left to the most recently opened file.
    fn copy_tail<R: BufRead>(
        &mut self,
        source: &mut LineSource<R>,
    ) -> Result<(), CsplitError>
    {
        if source.is_exhausted().map_err(read_error)?
        {
            return Ok(());
        }

        // Only skip sections ran: nothing is open yet
        if self.current.is_none()
        {
            self.open_next()?;
        }

        let open = self
            .current
            .as_mut()
            .ok_or_else(|| CsplitError::Internal("no output file open for trailing input".to_string()))?;

        let bytes = source
            .drain_into(&mut open.writer)
            .map_err(|e| copy_error(e, open.path.as_str()))?;

        debug!(path = %open.path, bytes, "appended trailing input");
        self.tail_bytes = bytes;
        Ok(())
    }

    /// Close the open file and, unless keeping, remove everything created.
    fn abort(&mut self)
    {
        // Dropping the writer closes the handle before removal
        self.current = None;

        if self.opts.keep
        {
            debug!(files = self.created.len(), "keeping partial output");
            return;
        }

        for path in self.created.drain(..)
        {
            remove_quietly(&path);
        }
    }

    fn finish(self) -> SplitSummary
    {
        SplitSummary { files: self.created, sizes: self.sizes, tail_bytes: self.tail_bytes }
    }
}

fn read_error(e: io::Error) -> CsplitError
{
    CsplitError::io("read input", e)
}

fn copy_error(
    e: CopyError,
    path: &str,
) -> CsplitError
{
    match e
    {
        CopyError::Read(e) => read_error(e),
        CopyError::Write(e) => CsplitError::io(format!("write {path}"), e),
    }
}

fn write_lines<W: Write>(
    out: &mut W,
    lines: &[Vec<u8>],
) -> io::Result<u64>
{
    let mut bytes = 0u64;
    for line in lines
    {
        out.write_all(line)?;
        bytes += line.len() as u64;
    }
    Ok(bytes)
}

fn strip_newline(line: &[u8]) -> &[u8]
{
    line.strip_suffix(b"\n").unwrap_or(line)
}

/// Split `input` according to `directives`, printing each section's size to
/// `report`.
///
/// # Errors
///
/// Any failure removes the files created so far (unless `opts.keep`) before
/// the error is returned.
#[instrument(skip_all, fields(prefix = %opts.prefix, directives = directives.len()))]
pub fn split<R: BufRead, W: Write>(
    directives: &[Directive],
    input: R,
    report: W,
    opts: &SplitOptions,
) -> Result<SplitSummary, CsplitError>
{
    let mut session = SplitSession::new(opts, report);
    let mut source = LineSource::new(input);

    match session.run(directives, &mut source)
    {
        Ok(()) => Ok(session.finish()),
        Err(e) =>
        {
            session.abort();
            Err(e)
        }
    }
}
