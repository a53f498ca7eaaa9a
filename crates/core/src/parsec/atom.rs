//! Atomic matchers. None of them consume input when they fail.

use super::combinator::{many, many1, map};
use super::{from_fn, ParseResult, Parser, State};

fn next_if(
    state: &mut State<'_>,
    accept: impl Fn(char) -> bool,
    expected: impl FnOnce() -> String,
) -> ParseResult<char> {
    match state.peek() {
        Some(c) if accept(c) => state.next(),
        Some(c) => Err(state.trap(format!("expected {}, found {:?}", expected(), c))),
        None => Err(state.eof_error()),
    }
}

/// Any single char.
pub fn one() -> impl Parser<char> {
    from_fn(|state| state.next())
}

pub fn satisfy<F>(accept: F, expected: &'static str) -> impl Parser<char>
where
    F: Fn(char) -> bool,
{
    from_fn(move |state| next_if(state, &accept, || expected.to_string()))
}

pub fn ch(expected: char) -> impl Parser<char> {
    from_fn(move |state| next_if(state, |c| c == expected, || format!("{expected:?}")))
}

/// A char contained in `set`.
pub fn ch_in(set: &'static str) -> impl Parser<char> {
    from_fn(move |state| next_if(state, |c| set.contains(c), || format!("one of {set:?}")))
}

/// A char not contained in `set`.
pub fn ch_none(set: &'static str) -> impl Parser<char> {
    from_fn(move |state| next_if(state, |c| !set.contains(c), || format!("none of {set:?}")))
}

/// The exact text `expected`.
pub fn text<'p>(expected: &'p str) -> impl Parser<String> + 'p {
    from_fn(move |state| {
        if state.rest().starts_with(expected) {
            state.advance(expected.len());
            Ok(expected.to_string())
        } else if state.is_eof() {
            Err(state.eof_error())
        } else {
            Err(state.trap(format!("expected {expected:?}")))
        }
    })
}

/// `\n` or `\r\n`.
pub fn newline() -> impl Parser<String> {
    from_fn(|state| {
        let rest = state.rest();
        let matched = if rest.starts_with("\r\n") {
            "\r\n"
        } else if rest.starts_with('\n') {
            "\n"
        } else if rest.is_empty() {
            return Err(state.eof_error());
        } else {
            return Err(state.trap("expected newline"));
        };
        state.advance(matched.len());
        Ok(matched.to_string())
    })
}

pub fn space() -> impl Parser<char> {
    satisfy(char::is_whitespace, "whitespace")
}

pub fn skip_spaces() -> impl Parser<()> {
    map(many(space()), |_| ())
}

/// An unsigned run of ASCII digits.
pub fn decimal() -> impl Parser<String> {
    map(many1(satisfy(|c| c.is_ascii_digit(), "digit")), |digits| {
        digits.into_iter().collect::<String>()
    })
}

pub fn eof() -> impl Parser<()> {
    from_fn(|state| {
        if state.is_eof() {
            Ok(())
        } else {
            Err(state.trap("expected end of input"))
        }
    })
}

/// Always succeed with `value`, consuming nothing.
pub fn pack<T: Clone>(value: T) -> impl Parser<T> {
    from_fn(move |_| -> ParseResult<T> { Ok(value.clone()) })
}
