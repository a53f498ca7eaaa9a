//! Table-driven token grammar shared by the C-like and Python-like lexers.
//!
//! Both language families use the same productions. They differ only in the
//! character sets and delimiters held by [`Grammar`]. Productions are tried
//! in this order, first match wins:
//!
//! number, name, symbol run, line comment, block comment, char literal,
//! string literal.
//!
//! Every production except the string literal is wrapped in
//! [`attempt`](crate::parsec::attempt). Once a string opener has matched the
//! lexer is committed, so an unterminated string fails the whole file instead
//! of being skipped.

use crate::parsec::{
    ahead, attempt, between, bind, boxed, ch, ch_in, ch_none, choice, decimal, from_fn, many,
    many1, map, newline, one, optional, satisfy, sep_by, skip_spaces, space, text, then, Boxed,
    ParseResult, Parser, State,
};
use crate::token::{Category, Token};

const QUOTE: &str = "\"";
const TRIPLE_QUOTE: &str = "\"\"\"";

/// Lexical configuration of one language family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    /// Chars allowed in names besides letters and digits.
    pub name_extras: &'static str,
    pub line_comment: &'static str,
    /// Opener and closer of block comments, if the language has them.
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Chars that may prefix a string literal, such as `r` and `f`.
    pub string_prefixes: &'static str,
    /// Whether a leading `#!` line is split off as an instruction token.
    pub shebang: bool,
    /// Openers that end a symbol run, besides whitespace, name chars and char
    /// literals.
    pub symbol_stops: &'static [&'static str],
    /// Category of names and numbers.
    pub name_category: Category,
    /// Category of string literals.
    pub string_category: Category,
}

impl Grammar {
    pub const C_LIKE: Grammar = Grammar {
        name_extras: "_.#",
        line_comment: "//",
        block_comment: Some(("/*", "*/")),
        string_prefixes: "",
        shebang: false,
        symbol_stops: &[QUOTE, "//", "/*"],
        name_category: Category::Word,
        string_category: Category::Literal,
    };

    pub const PYTHON_LIKE: Grammar = Grammar {
        name_extras: "_.@",
        line_comment: "#",
        block_comment: None,
        string_prefixes: "rf",
        shebang: true,
        symbol_stops: &[QUOTE, "#"],
        name_category: Category::Symbol,
        string_category: Category::Text,
    };

    /// Tokenize a whole source file.
    ///
    /// Whitespace between tokens is skipped. When no production matches the
    /// remaining input the stream ends there; a production that fails after
    /// committing (an unterminated string) fails the file.
    pub fn tokenize(&self, source: &str) -> ParseResult<Vec<Token>> {
        let mut state = State::new(source);
        let mut tokens = Vec::new();

        if self.shebang {
            if let Some(line) = optional(attempt(self.instruction())).parse(&mut state)? {
                tokens.push(line);
            }
        }

        let body = then(skip_spaces(), sep_by(self.token(), skip_spaces()));
        tokens.extend(body.parse(&mut state)?);
        skip_spaces().parse(&mut state)?;

        if !state.is_eof() {
            log::warn!(
                "tokenizer stopped at offset {}, {} bytes left unmatched",
                state.status(),
                state.rest().len()
            );
        }
        Ok(tokens)
    }

    /// One token, by ordered choice over the productions.
    pub fn token(self) -> impl Parser<Token> {
        let mut alternatives: Vec<Boxed<'static, Token>> = vec![
            boxed(attempt(self.number())),
            boxed(attempt(self.name())),
            boxed(attempt(self.symbol_run())),
            boxed(attempt(comment(self.line_comment, newline()))),
        ];
        if let Some((open, close)) = self.block_comment {
            alternatives.push(boxed(attempt(comment(open, text(close)))));
        }
        alternatives.push(boxed(attempt(self.char_literal())));
        alternatives.push(boxed(self.string_literal()));
        choice(alternatives)
    }

    fn is_name_char(&self, c: char) -> bool {
        c.is_alphanumeric() || self.name_extras.contains(c)
    }

    fn is_string_prefix(&self, name: &str) -> bool {
        !self.string_prefixes.is_empty() && name.chars().all(|c| self.string_prefixes.contains(c))
    }

    fn number(self) -> impl Parser<Token> {
        map(decimal(), move |digits| Token::new(self.name_category, digits))
    }

    fn name(self) -> impl Parser<Token> {
        let chars = many1(satisfy(move |c| self.is_name_char(c), "name character"));
        from_fn(move |state| {
            let name: String = chars.parse(state)?.into_iter().collect();
            // `f"..."` is a prefixed string, not a name followed by a string.
            if self.is_string_prefix(&name) && state.rest().starts_with(QUOTE) {
                return Err(state.trap(format!("{name:?} prefixes a string literal")));
            }
            Ok(Token::new(self.name_category, name))
        })
    }

    /// Probe for anything that ends a symbol run.
    fn symbol_stop(self) -> impl Parser<()> {
        let mut probes: Vec<Boxed<'static, ()>> = self
            .symbol_stops
            .iter()
            .map(|&opener| boxed(map(text(opener), |_| ())))
            .collect();
        probes.push(boxed(map(attempt(self.char_literal()), |_| ())));
        probes.push(boxed(map(space(), |_| ())));
        probes.push(boxed(map(
            satisfy(move |c| self.is_name_char(c), "name character"),
            |_| (),
        )));
        choice(probes)
    }

    fn symbol_run(self) -> impl Parser<Token> {
        let stop = ahead(self.symbol_stop());
        let symbol_char = from_fn(move |state| match stop.parse(state) {
            Ok(()) => Err(state.trap("symbol run ends here")),
            Err(_) => state.next(),
        });
        map(many1(symbol_char), |chars| {
            Token::symbol(chars.into_iter().collect::<String>())
        })
    }

    fn char_literal(self) -> impl Parser<Token> {
        let body = choice(vec![
            boxed(escaped()),
            boxed(map(ch_none("\\"), |c| c.to_string())),
        ]);
        map(between(ch('\''), ch('\''), body), |body| {
            Token::literal(format!("'{body}'"))
        })
    }

    /// Prefix plus `delimiter`, yielding the opening text and the closer.
    fn string_opener(self, delimiter: &'static str) -> impl Parser<(String, &'static str)> {
        let prefix = many(ch_in(self.string_prefixes));
        let quote = text(delimiter);
        attempt(from_fn(move |state| {
            let mut opened: String = prefix.parse(state)?.into_iter().collect();
            opened.push_str(&quote.parse(state)?);
            Ok((opened, delimiter))
        }))
    }

    fn string_literal(self) -> impl Parser<Token> {
        let opener = choice(vec![
            boxed(self.string_opener(TRIPLE_QUOTE)),
            boxed(self.string_opener(QUOTE)),
        ]);
        let category = self.string_category;
        bind(opener, move |(opened, delimiter)| {
            map(string_body(opened, delimiter), move |literal| {
                Token::new(category, literal)
            })
        })
    }

    /// `#!...` up to and including the first newline.
    fn instruction(self) -> impl Parser<Token> {
        map(between(text("#!"), ch('\n'), many1(ch_none("\n"))), |line| {
            Token::instruction(format!("#!{}\n", line.into_iter().collect::<String>()))
        })
    }
}

/// A backslash and the char after it, kept verbatim.
fn escaped() -> impl Parser<String> {
    map(then(ch('\\'), one()), |c| format!("\\{c}"))
}

/// Append chars to `buf` until `closer` matches. Running out of input ends
/// the scan without an error.
fn scan_until(closer: &impl Parser<String>, state: &mut State<'_>, mut buf: String) -> ParseResult<String> {
    loop {
        match closer.parse(state) {
            Ok(close) => {
                buf.push_str(&close);
                return Ok(buf);
            }
            Err(err) if err.is_eof() => return Ok(buf),
            Err(_) => buf.push(state.next()?),
        }
    }
}

/// A comment from `opener` through `closer`, or through end of input.
fn comment(opener: &'static str, closer: impl Parser<String>) -> impl Parser<Token> {
    let open = text(opener);
    from_fn(move |state| {
        let opened = open.parse(state)?;
        scan_until(&closer, state, opened).map(Token::text)
    })
}

/// String body after the opener, through the closing `delimiter`.
///
/// The closer is checked before each body char. Escapes are copied as
/// two-char units and never terminate the literal.
fn string_body(opened: String, delimiter: &'static str) -> impl Parser<String> {
    let closer = text(delimiter);
    let unit = choice(vec![
        boxed(attempt(escaped())),
        boxed(map(one(), |c| c.to_string())),
    ]);
    from_fn(move |state| {
        let start = state.status() - opened.len();
        let mut literal = opened.clone();
        loop {
            if let Ok(close) = closer.parse(state) {
                literal.push_str(&close);
                return Ok(literal);
            }
            match unit.parse(state) {
                Ok(piece) => literal.push_str(&piece),
                Err(err) if err.is_eof() => {
                    return Err(state.trap(format!(
                        "unterminated string literal opened at offset {start}"
                    )))
                }
                Err(err) => return Err(err),
            }
        }
    })
}
