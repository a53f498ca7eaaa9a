//! Combinators composing parsers into larger ones.

use super::{from_fn, Boxed, ParseResult, Parser, State};

pub fn map<A, B, P, F>(p: P, f: F) -> impl Parser<B>
where
    P: Parser<A>,
    F: Fn(A) -> B,
{
    from_fn(move |state| p.parse(state).map(&f))
}

/// Run `left` then `right`, keeping the value of `right`.
pub fn then<A, B>(left: impl Parser<A>, right: impl Parser<B>) -> impl Parser<B> {
    from_fn(move |state| {
        left.parse(state)?;
        right.parse(state)
    })
}

/// Run `left` then `right`, keeping the value of `left`.
pub fn skip<A, B>(left: impl Parser<A>, right: impl Parser<B>) -> impl Parser<A> {
    from_fn(move |state| {
        let value = left.parse(state)?;
        right.parse(state)?;
        Ok(value)
    })
}

/// Feed the value of `p` into `f` and run the parser it returns.
pub fn bind<A, B, P, Q, F>(p: P, f: F) -> impl Parser<B>
where
    P: Parser<A>,
    Q: Parser<B>,
    F: Fn(A) -> Q,
{
    from_fn(move |state| {
        let value = p.parse(state)?;
        f(value).parse(state)
    })
}

/// Rewind to the starting position when `p` fails.
pub fn attempt<T>(p: impl Parser<T>) -> impl Parser<T> {
    from_fn(move |state| {
        let mark = state.status();
        match p.parse(state) {
            Ok(value) => Ok(value),
            Err(err) => {
                state.rewind(mark);
                Err(err)
            }
        }
    })
}

/// Run `p` as a probe: the cursor is restored whether it succeeds or not.
pub fn ahead<T>(p: impl Parser<T>) -> impl Parser<T> {
    from_fn(move |state| {
        let mark = state.status();
        let result = p.parse(state);
        state.rewind(mark);
        result
    })
}

/// Ordered choice.
///
/// An alternative that fails after consuming input ends the choice with its
/// error; wrap it in [`attempt`] to let the next alternative run instead.
pub fn choice<'p, T: 'p>(alternatives: Vec<Boxed<'p, T>>) -> impl Parser<T> + 'p {
    from_fn(move |state| {
        let mark = state.status();
        let mut last = None;
        for alternative in &alternatives {
            match alternative.parse(state) {
                Ok(value) => return Ok(value),
                Err(err) if state.status() == mark => last = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last.unwrap_or_else(|| state.trap("no alternative matched")))
    })
}

/// Apply `p` until it fails without consuming input. A consuming failure
/// propagates; a success that consumed nothing ends the loop.
fn repeat<T>(p: &impl Parser<T>, state: &mut State<'_>, values: &mut Vec<T>) -> ParseResult<()> {
    loop {
        let mark = state.status();
        match p.parse(state) {
            Ok(_) if state.status() == mark => return Ok(()),
            Ok(value) => values.push(value),
            Err(_) if state.status() == mark => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

/// Zero or more.
pub fn many<T>(p: impl Parser<T>) -> impl Parser<Vec<T>> {
    from_fn(move |state| {
        let mut values = Vec::new();
        repeat(&p, state, &mut values)?;
        Ok(values)
    })
}

/// One or more.
pub fn many1<T>(p: impl Parser<T>) -> impl Parser<Vec<T>> {
    from_fn(move |state| {
        let mut values = vec![p.parse(state)?];
        repeat(&p, state, &mut values)?;
        Ok(values)
    })
}

/// Zero or more `p` separated by `sep`.
///
/// When `sep` matches but `p` then fails without consuming, the separator is
/// given back and the sequence ends.
pub fn sep_by<T, S>(p: impl Parser<T>, sep: impl Parser<S>) -> impl Parser<Vec<T>> {
    from_fn(move |state| {
        let mut values = Vec::new();
        let start = state.status();
        match p.parse(state) {
            Ok(value) => values.push(value),
            Err(_) if state.status() == start => return Ok(values),
            Err(err) => return Err(err),
        }
        loop {
            let mark = state.status();
            match sep.parse(state) {
                Ok(_) => {}
                Err(_) if state.status() == mark => break,
                Err(err) => return Err(err),
            }
            let after_sep = state.status();
            match p.parse(state) {
                Ok(_) if state.status() == mark => break,
                Ok(value) => values.push(value),
                Err(_) if state.status() == after_sep => {
                    state.rewind(mark);
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(values)
    })
}

/// `p` enclosed by `open` and `close`, keeping the value of `p`.
pub fn between<A, B, T>(
    open: impl Parser<A>,
    close: impl Parser<B>,
    p: impl Parser<T>,
) -> impl Parser<T> {
    from_fn(move |state| {
        open.parse(state)?;
        let value = p.parse(state)?;
        close.parse(state)?;
        Ok(value)
    })
}

/// `Some` when `p` matches, `None` when it fails without consuming input.
pub fn optional<T>(p: impl Parser<T>) -> impl Parser<Option<T>> {
    from_fn(move |state| {
        let mark = state.status();
        match p.parse(state) {
            Ok(value) => Ok(Some(value)),
            Err(_) if state.status() == mark => Ok(None),
            Err(err) => Err(err),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsec::{boxed, ch, one, run, text, ParseErrorKind};

    /// Consumes `ab` then fails on anything other than `c`.
    fn abc() -> impl Parser<String> {
        map(then(text("ab"), ch('c')), |_| "abc".to_string())
    }

    #[test]
    fn test_attempt_restores_position() {
        let mut state = State::new("abx");
        let err = attempt(abc()).parse(&mut state).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Unexpected);
        assert_eq!(err.position, 2);
        assert_eq!(state.status(), 0);
    }

    #[test]
    fn test_without_attempt_failure_keeps_consumption() {
        let mut state = State::new("abx");
        assert!(abc().parse(&mut state).is_err());
        assert_eq!(state.status(), 2);
    }

    #[test]
    fn test_choice_tries_next_after_clean_failure() {
        let p = choice(vec![boxed(text("x")), boxed(text("ab"))]);
        assert_eq!(run(&p, "abx").unwrap(), "ab");
    }

    #[test]
    fn test_choice_tries_next_after_attempted_failure() {
        let p = choice(vec![boxed(attempt(abc())), boxed(text("ab"))]);
        assert_eq!(run(&p, "abx").unwrap(), "ab");
    }

    #[test]
    fn test_choice_propagates_consuming_failure() {
        let p = choice(vec![boxed(abc()), boxed(text("ab"))]);
        let mut state = State::new("abx");
        let err = p.parse(&mut state).unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(state.status(), 2);
    }

    #[test]
    fn test_ahead_always_restores() {
        let mut state = State::new("abc");
        assert!(ahead(text("ab")).parse(&mut state).is_ok());
        assert_eq!(state.status(), 0);
        assert!(ahead(abc()).parse(&mut State::new("abx")).is_err());
    }

    #[test]
    fn test_many_stops_at_first_failure() {
        let mut state = State::new("aaab");
        let values = many(ch('a')).parse(&mut state).unwrap();
        assert_eq!(values, vec!['a', 'a', 'a']);
        assert_eq!(state.rest(), "b");
        assert!(many(ch('z')).parse(&mut state).unwrap().is_empty());
    }

    #[test]
    fn test_many1_requires_one() {
        assert!(run(&many1(ch('a')), "b").is_err());
        assert_eq!(run(&many1(ch('a')), "ab").unwrap(), vec!['a']);
    }

    #[test]
    fn test_many_ends_cleanly_at_eof() {
        let mut state = State::new("aa");
        assert_eq!(many(one()).parse(&mut state).unwrap().len(), 2);
        assert!(state.is_eof());
    }

    #[test]
    fn test_many_propagates_consuming_failure() {
        assert!(run(&many(abc()), "abcabx").is_err());
    }

    #[test]
    fn test_sep_by_gives_back_trailing_separator() {
        let mut state = State::new("a,a,b");
        let values = sep_by(ch('a'), ch(',')).parse(&mut state).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(state.rest(), ",b");
    }

    #[test]
    fn test_between_keeps_inner_value() {
        let p = between(ch('('), ch(')'), many1(ch('x')));
        assert_eq!(run(&p, "(xx)").unwrap(), vec!['x', 'x']);
        assert!(run(&p, "(xx").unwrap_err().is_eof());
    }

    #[test]
    fn test_optional_and_bind() {
        assert_eq!(run(&optional(ch('a')), "b").unwrap(), None);
        let closing = bind(ch_or_bracket(), |open| ch(if open == '(' { ')' } else { open }));
        assert_eq!(run(&closing, "()").unwrap(), ')');
        assert_eq!(run(&skip(ch('a'), ch('b')), "ab").unwrap(), 'a');
    }

    fn ch_or_bracket() -> impl Parser<char> {
        choice(vec![boxed(ch('(')), boxed(ch('|'))])
    }
}
