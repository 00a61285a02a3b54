//! Directive compilation: turns the trailing operands into an ordered list of
//! split instructions.
//!
//! Grammar, one token at a time:
//! - `N`: cut after `N` more lines
//! - `/re/[off]`: cut at the first line matching `re`, shifted by `off`
//! - `%re%[off]`: as above, but the section is discarded
//! - `{N}`: apply the previous directive `N` times

use regex::bytes::Regex;
use tracing::{debug, instrument};

use crate::core::error::CsplitError;
use crate::infra::utils::{MAX_INT, MIN_INT, NumUtils};

/// A compiled regular-expression directive.
#[derive(Debug, Clone)]
pub struct Pattern
{
    /// Compiled expression, matched against each line without its newline.
    pub regex: Regex,
    /// Signed line offset applied to the matching line.
    pub offset: i32,
    /// `%...%` form: the section is read but never written.
    pub skip: bool,
    /// The token as given, for diagnostics.
    pub source: String,
}

#[derive(Debug, Clone)]
pub enum DirectiveKind
{
    /// Segment ends once this many newlines have been consumed.
    LineNumber(u32),
    Pattern(Pattern),
}

/// One split instruction plus how many times in a row to apply it.
#[derive(Debug, Clone)]
pub struct Directive
{
    pub kind: DirectiveKind,
    /// Always >= 1.
    pub repeat: u32,
}

impl Directive
{
    fn once(kind: DirectiveKind) -> Self
    {
        Self { kind, repeat: 1 }
    }

    /// True for `%re%` directives.
    pub fn is_skip(&self) -> bool
    {
        matches!(&self.kind, DirectiveKind::Pattern(p) if p.skip)
    }
}

/// Incremental compiler state. `last` tracks the directive a `{N}` suffix
/// attaches to.
#[derive(Debug, Default)]
struct Compiler
{
    directives: Vec<Directive>,
    last: Option<usize>,
}

impl Compiler
{
    fn push(
        &mut self,
        directive: Directive,
    )
    {
        self.directives.push(directive);
        self.last = Some(self.directives.len() - 1);
    }

    fn feed(
        &mut self,
        token: &str,
    ) -> Result<(), CsplitError>
    {
        match token.chars().next()
        {
            Some(c) if c.is_ascii_digit() =>
            {
                let line = NumUtils::parse_token(token, 0, MAX_INT)?;
                self.push(Directive::once(DirectiveKind::LineNumber(line as u32)));
            }

            Some(delim @ ('/' | '%')) =>
            {
                let pattern = parse_pattern(token, delim)?;
                self.push(Directive::once(DirectiveKind::Pattern(pattern)));
            }

            Some('{') =>
            {
                let repeat = parse_repeat(token)?;
                let last = self.last.ok_or(CsplitError::NoPreviousDirective)?;
                self.directives[last].repeat = repeat;
            }

            _ => return Err(CsplitError::InvalidArgument { token: token.to_string() }),
        }

        Ok(())
    }
}

/// Compile operands (everything after the input file name) into directives,
/// preserving their order.
///
/// # Errors
///
/// Fails on the first malformed token; no partial list is returned.
#[instrument(skip_all, fields(tokens = args.len()))]
pub fn compile<S: AsRef<str>>(args: &[S]) -> Result<Vec<Directive>, CsplitError>
{
    let mut compiler = Compiler::default();

    for arg in args
    {
        compiler.feed(arg.as_ref())?;
    }

    for d in &compiler.directives
    {
        debug!(kind = %kind_name(&d.kind), repeat = d.repeat, "compiled directive");
    }

    Ok(compiler.directives)
}

fn kind_name(kind: &DirectiveKind) -> String
{
    match kind
    {
        DirectiveKind::LineNumber(n) => format!("line {n}"),
        DirectiveKind::Pattern(p) => p.source.clone(),
    }
}

/// Parse `/re/off` or `%re%off`. The closing delimiter is the last one in
/// the token, so literal delimiters inside `re` must be backslash-escaped.
fn parse_pattern(
    token: &str,
    delim: char,
) -> Result<Pattern, CsplitError>
{
    let invalid = |reason: String| CsplitError::InvalidRegex { token: token.to_string(), reason };

    // Delimiters are ASCII, so byte slicing stays on char boundaries
    let body = &token[1..];
    let close = body
        .rfind(delim)
        .ok_or_else(|| invalid(format!("missing closing '{delim}'")))?;

    let (raw, offset_str) = (&body[..close], &body[close + 1..]);

    let offset = if offset_str.is_empty()
    {
        0
    }
    else
    {
        NumUtils::parse_token(offset_str, MIN_INT, MAX_INT)? as i32
    };

    let pattern = unescape_delimiter(raw, delim).map_err(invalid)?;
    let regex = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;

    Ok(Pattern { regex, offset, skip: delim == '%', source: token.to_string() })
}

/// Collapse `\<delim>` to `<delim>`. A delimiter without a preceding
/// backslash is an error.
fn unescape_delimiter(
    raw: &str,
    delim: char,
) -> Result<String, String>
{
    let mut out = String::with_capacity(raw.len());
    let mut escaping = false;

    for c in raw.chars()
    {
        if c == delim
        {
            if !escaping
            {
                return Err(format!("unescaped '{delim}' in pattern"));
            }

            // Replace the backslash with the delimiter itself
            out.pop();
            out.push(c);
            escaping = false;
        }
        else
        {
            escaping = c == '\\';
            out.push(c);
        }
    }

    Ok(out)
}

/// Parse `{N}`; zero is normalized to one.
fn parse_repeat(token: &str) -> Result<u32, CsplitError>
{
    let inner = token
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .ok_or_else(|| CsplitError::InvalidArgument { token: token.to_string() })?;

    let n = NumUtils::parse_token(inner, 0, MAX_INT)?;

    Ok((n as u32).max(1))
}
