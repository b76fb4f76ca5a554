//! Two-pass, allocation-minimizing template formatter.
//!
//! Templates contain sequential unindexed `{}` placeholders bound to
//! arguments left-to-right, and `{{` / `}}` escapes for literal braces.
//! The measure pass computes the exact output length; the fill pass
//! allocates a single `String` of that capacity and copies into it.

use std::fmt;

/// Errors raised by [`format`] and [`format_opt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The template references more positional placeholders than arguments
    /// were supplied. Raised before any output is produced.
    ArgumentCountMismatch { placeholders: usize, args: usize },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgumentCountMismatch { placeholders, args } => write!(
                f,
                "template has at least {placeholders} placeholders but only {args} arguments were supplied"
            ),
        }
    }
}

impl std::error::Error for FormatError {}

/// One lexical unit of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    /// A run of characters copied verbatim.
    Literal(&'a str),
    /// An escaped brace pair (`{{` or `}}`), rendered as one brace.
    Escaped(char),
    /// An unindexed `{}` placeholder.
    Placeholder,
}

/// Left-to-right template scanner shared by the measure and fill passes.
///
/// Brace runs longer than two are consumed greedily from the left: one
/// escaped pair, then scanning resumes on what remains. A lone unpaired
/// brace is a literal character.
struct Pieces<'a> {
    rest: &'a str,
}

impl<'a> Pieces<'a> {
    const fn new(template: &'a str) -> Self {
        Self { rest: template }
    }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Piece<'a>> {
        let bytes = self.rest.as_bytes();
        let first = *bytes.first()?;
        if first == b'{' || first == b'}' {
            match bytes.get(1) {
                Some(&second) if second == first => {
                    self.rest = &self.rest[2..];
                    return Some(Piece::Escaped(first as char));
                }
                Some(&b'}') if first == b'{' => {
                    self.rest = &self.rest[2..];
                    return Some(Piece::Placeholder);
                }
                _ => {}
            }
        }

        // Literal run: everything up to the next brace after this character.
        // Braces are ASCII, so byte positions are always char boundaries.
        let end = bytes
            .iter()
            .skip(1)
            .position(|&b| b == b'{' || b == b'}')
            .map_or(self.rest.len(), |i| i + 1);
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Piece::Literal(run))
    }
}

/// Positional argument access shared by the `&[&str]` and `&[Option<&str>]`
/// entry points. `get` is only called with `index < count()`.
trait ArgLookup {
    fn count(&self) -> usize;
    fn get(&self, index: usize) -> &str;
}

impl ArgLookup for [&str] {
    fn count(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> &str {
        self[index]
    }
}

impl ArgLookup for [Option<&str>] {
    fn count(&self) -> usize {
        self.len()
    }

    // An absent slot contributes zero-length text.
    fn get(&self, index: usize) -> &str {
        self[index].unwrap_or("")
    }
}

/// Measure pass: exact output length in bytes.
fn measure<A: ArgLookup + ?Sized>(template: &str, args: &A) -> Result<usize, FormatError> {
    let mut len = 0;
    let mut next_arg = 0;
    for piece in Pieces::new(template) {
        match piece {
            Piece::Literal(run) => len += run.len(),
            Piece::Escaped(_) => len += 1,
            Piece::Placeholder => {
                if next_arg >= args.count() {
                    return Err(FormatError::ArgumentCountMismatch {
                        placeholders: next_arg + 1,
                        args: args.count(),
                    });
                }
                len += args.get(next_arg).len();
                next_arg += 1;
            }
        }
    }
    Ok(len)
}

/// Fill pass: copies literal runs and bound arguments into a buffer of
/// exactly `len` bytes. Never reallocates.
fn fill<A: ArgLookup + ?Sized>(template: &str, args: &A, len: usize) -> String {
    let mut out = String::with_capacity(len);
    let mut next_arg = 0;
    for piece in Pieces::new(template) {
        match piece {
            Piece::Literal(run) => out.push_str(run),
            Piece::Escaped(brace) => out.push(brace),
            Piece::Placeholder => {
                out.push_str(args.get(next_arg));
                next_arg += 1;
            }
        }
    }
    debug_assert_eq!(out.len(), len);
    out
}

/// Substitutes `args` into the `{}` placeholders of `template`, left to
/// right, allocating exactly one result buffer sized by the measure pass.
///
/// Trailing unused arguments are not an error.
///
/// # Errors
///
/// Returns [`FormatError::ArgumentCountMismatch`] if the template contains
/// more placeholders than arguments; no partial string is produced.
pub fn format(template: &str, args: &[&str]) -> Result<String, FormatError> {
    let len = measure(template, args)?;
    Ok(fill(template, args, len))
}

/// Variant of [`format`] over optional argument slots: a `None` slot
/// substitutes zero-length text instead of failing. Placeholders beyond the
/// end of `args` still fail with [`FormatError::ArgumentCountMismatch`].
///
/// # Errors
///
/// Returns [`FormatError::ArgumentCountMismatch`] if the template contains
/// more placeholders than argument slots.
pub fn format_opt(template: &str, args: &[Option<&str>]) -> Result<String, FormatError> {
    let len = measure(template, args)?;
    Ok(fill(template, args, len))
}

/// Exposes the measure pass so callers (and tests) can assert that the
/// produced string is exactly the precomputed size.
///
/// # Errors
///
/// Same conditions as [`format`].
pub fn measured_len(template: &str, args: &[&str]) -> Result<usize, FormatError> {
    measure(template, args)
}
