//! Cursor over a text buffer.

use thiserror::Error;

/// Distinguishes natural termination from malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The cursor ran out of input.
    EndOfInput,
    /// The input at the cursor did not match.
    Unexpected,
}

/// A parse failure with the byte offset where it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (offset {position})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn is_eof(&self) -> bool {
        self.kind == ParseErrorKind::EndOfInput
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Positional view over the input.
///
/// Positions are byte offsets and always sit on a char boundary. They only
/// move backwards through [`State::rewind`].
#[derive(Debug, Clone)]
pub struct State<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> State<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Consume and return the next char.
    pub fn next(&mut self) -> ParseResult<char> {
        match self.peek() {
            Some(c) => {
                self.pos += c.len_utf8();
                Ok(c)
            }
            None => Err(self.eof_error()),
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Current position, usable as a rewind mark.
    pub fn status(&self) -> usize {
        self.pos
    }

    pub fn rewind(&mut self, mark: usize) {
        debug_assert!(mark <= self.pos, "rewind may only move backwards");
        debug_assert!(self.source.is_char_boundary(mark));
        self.pos = mark;
    }

    /// Advance past `len` bytes already matched against [`State::rest`].
    pub(crate) fn advance(&mut self, len: usize) {
        self.pos += len;
    }

    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn trap(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            kind: ParseErrorKind::Unexpected,
            position: self.pos,
            message: message.into(),
        }
    }

    pub fn eof_error(&self) -> ParseError {
        ParseError {
            kind: ParseErrorKind::EndOfInput,
            position: self.pos,
            message: "unexpected end of input".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_multibyte_chars() {
        let mut state = State::new("a中b");
        assert_eq!(state.next().unwrap(), 'a');
        assert_eq!(state.next().unwrap(), '中');
        assert_eq!(state.status(), 4);
        assert_eq!(state.rest(), "b");
        assert_eq!(state.next().unwrap(), 'b');
        assert!(state.is_eof());
    }

    #[test]
    fn test_next_at_end_is_eof() {
        let mut state = State::new("");
        let err = state.next().unwrap_err();
        assert!(err.is_eof());
        assert_eq!(err.position, 0);
    }

    #[test]
    fn test_rewind_restores_position() {
        let mut state = State::new("abc");
        let mark = state.status();
        state.next().unwrap();
        state.next().unwrap();
        state.rewind(mark);
        assert_eq!(state.rest(), "abc");
    }
}
