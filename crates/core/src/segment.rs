//! Natural-language segmentation.

use unicode_segmentation::UnicodeSegmentation;

use crate::parsec::{boxed, choice, many, many1, map, satisfy, space, Parser, State};
use crate::token::Token;
use crate::Segmenter;

/// Splits text on Unicode word boundaries (UAX #29).
///
/// Runs of letters stay whole, while scripts written without spaces come
/// apart into one unit per ideograph.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl Segmenter for UnicodeSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_word_bounds().map(str::to_string).collect()
    }
}

/// A maximal run of whitespace (`true`) or of anything else (`false`).
fn run() -> impl Parser<(bool, String)> {
    let blank = map(many1(space()), |chars| (true, chars.into_iter().collect::<String>()));
    let solid = map(
        many1(satisfy(|c| !c.is_whitespace(), "non-whitespace")),
        |chars| (false, chars.into_iter().collect::<String>()),
    );
    choice(vec![boxed(blank), boxed(solid)])
}

/// Segment `source` while keeping its whitespace layout.
///
/// Each whitespace run becomes one token carrying the original whitespace.
/// Every other run is segmented on its own, so words never merge across a
/// space. All tokens are [`Category::Text`](crate::Category::Text), and
/// concatenating them gives back `source`.
pub fn segment_preserving_whitespace<S>(segmenter: &S, source: &str) -> Vec<Token>
where
    S: Segmenter + ?Sized,
{
    let mut state = State::new(source);
    // Every char is either whitespace or not, so this consumes everything.
    let runs = many(run()).parse(&mut state).unwrap_or_default();

    let mut tokens = Vec::with_capacity(runs.len());
    for (blank, text) in runs {
        if blank {
            tokens.push(Token::text(text));
        } else {
            tokens.extend(
                segmenter
                    .segment(&text)
                    .into_iter()
                    .filter(|piece| !piece.is_empty())
                    .map(Token::text),
            );
        }
    }
    tokens
}
