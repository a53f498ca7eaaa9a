//! A small backtracking parser-combinator framework over text.
//!
//! A parser is anything callable as `Fn(&mut State) -> ParseResult<T>`.
//! Failures follow the usual parsec contract: [`choice`] only moves on to the
//! next alternative when the failed one consumed nothing, and [`attempt`]
//! turns a consuming failure into a non-consuming one by rewinding the
//! cursor. A consuming failure that is not wrapped in [`attempt`] is a real
//! structural error and propagates.

mod atom;
mod combinator;
mod state;

pub use atom::{ch, ch_in, ch_none, decimal, eof, newline, one, pack, satisfy, skip_spaces, space, text};
pub use combinator::{
    ahead, attempt, between, bind, choice, many, many1, map, optional, sep_by, skip, then,
};
pub use state::{ParseError, ParseErrorKind, ParseResult, State};

/// Anything that can consume a prefix of a [`State`].
pub trait Parser<T> {
    fn parse(&self, state: &mut State<'_>) -> ParseResult<T>;
}

impl<T, F> Parser<T> for F
where
    F: Fn(&mut State<'_>) -> ParseResult<T>,
{
    fn parse(&self, state: &mut State<'_>) -> ParseResult<T> {
        self(state)
    }
}

/// A type-erased parser, used for heterogeneous alternatives in [`choice`].
pub type Boxed<'p, T> = Box<dyn Fn(&mut State<'_>) -> ParseResult<T> + 'p>;

/// Pin a closure to the parser signature.
///
/// Closures handed to this function get their argument type from the bound,
/// so they are generic over the state lifetime without annotations.
pub fn from_fn<T, F>(f: F) -> F
where
    F: Fn(&mut State<'_>) -> ParseResult<T>,
{
    f
}

pub fn boxed<'p, T: 'p>(p: impl Parser<T> + 'p) -> Boxed<'p, T> {
    Box::new(from_fn(move |state| p.parse(state)))
}

/// Run `p` against the start of `source`.
pub fn run<T>(p: &impl Parser<T>, source: &str) -> ParseResult<T> {
    p.parse(&mut State::new(source))
}
