// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cursor over listing text shared by the format parsers
//!
//! Every read advances a byte offset and keeps a 1-based line counter so
//! errors can point at the offending line.

use crate::table::TableError;
use crate::traits::{ConversionError, DirFormat, Result};

pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    format: DirFormat,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str, format: DirFormat) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            format,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn error(&self, message: impl Into<String>) -> ConversionError {
        ConversionError::ParseError {
            format: self.format,
            line: self.line,
            message: message.into(),
        }
    }

    /// Attach the current line to a failed table operation
    pub fn reference(&self, source: TableError) -> ConversionError {
        ConversionError::Reference {
            format: self.format,
            line: self.line,
            source,
        }
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let taken = &self.input[self.pos..self.pos + len];
        self.line += taken.bytes().filter(|b| *b == b'\n').count();
        self.pos += len;
        taken
    }

    pub fn skip_whitespace(&mut self) {
        let len = self
            .rest()
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(self.rest().len());
        self.advance(len);
    }

    /// Next whitespace-delimited token, `None` at end of input
    pub fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        Some(self.advance(len))
    }

    pub fn expect_token(&mut self, what: &str) -> Result<&'a str> {
        self.next_token()
            .ok_or_else(|| self.error(format!("unexpected end of input, expected {what}")))
    }

    pub fn next_int(&mut self, what: &str) -> Result<i64> {
        let token = self.expect_token(what)?;
        token
            .parse()
            .map_err(|_| self.error(format!("expected {what}, found '{token}'")))
    }

    pub fn next_count(&mut self, what: &str) -> Result<usize> {
        let token = self.expect_token(what)?;
        token
            .parse()
            .map_err(|_| self.error(format!("expected {what}, found '{token}'")))
    }

    /// Integer starting at the next non-blank character; stops at the first
    /// character that cannot continue it.
    pub fn next_int_prefix(&mut self, what: &str) -> Result<i64> {
        self.skip_whitespace();
        let rest = self.rest();
        let sign = usize::from(rest.starts_with(['-', '+']));
        let digits = rest[sign..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len() - sign);
        if digits == 0 {
            let found: String = rest.chars().take(12).collect();
            return Err(self.error(format!("expected {what}, found '{found}'")));
        }
        let text = self.advance(sign + digits);
        text.parse()
            .map_err(|_| self.error(format!("{what} '{text}' is out of range")))
    }

    /// Consume up to and including the next line break.
    pub fn skip_line(&mut self) {
        let len = self
            .rest()
            .find('\n')
            .map(|i| i + 1)
            .unwrap_or(self.rest().len());
        self.advance(len);
    }

    /// Next physical line without its terminator, `None` at end of input
    pub fn next_line(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let (len, consumed) = match rest.find('\n') {
            Some(i) => (i, i + 1),
            None => (rest.len(), rest.len()),
        };
        let line = &rest[..len];
        self.advance(consumed);
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Consume everything up to and including `delim`.
    pub fn skip_past(&mut self, delim: char) -> Result<()> {
        self.read_until(delim).map(|_| ())
    }

    /// Text before the next `delim`; the delimiter itself is consumed.
    pub fn read_until(&mut self, delim: char) -> Result<&'a str> {
        let idx = self
            .rest()
            .find(delim)
            .ok_or_else(|| self.error(format!("unexpected end of input, expected '{delim}'")))?;
        let text = self.advance(idx);
        self.advance(delim.len_utf8());
        Ok(text)
    }
}
