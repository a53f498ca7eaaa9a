//! Routes each source kind to its tokenizer.

use std::fmt;
use std::path::Path;

use crate::grammar::Grammar;
use crate::parsec::ParseResult;
use crate::segment::segment_preserving_whitespace;
use crate::token::{Category, Token};
use crate::Segmenter;

/// Kind of a source file, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    C,
    Java,
    Scala,
    Python,
    /// Natural-language text.
    Text,
}

impl SourceKind {
    /// Detect the kind from the file extension. Unknown extensions give `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "c" => Some(SourceKind::C),
            "java" => Some(SourceKind::Java),
            "scala" => Some(SourceKind::Scala),
            "py" => Some(SourceKind::Python),
            "txt" => Some(SourceKind::Text),
            _ => None,
        }
    }

    /// Label prefixed to instructions. Empty for natural-language text.
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::C => "c",
            SourceKind::Java => "java",
            SourceKind::Scala => "scala",
            SourceKind::Python => "python",
            SourceKind::Text => "",
        }
    }

    /// Separator used when tokens are joined back into text.
    pub fn joiner(self) -> &'static str {
        match self {
            SourceKind::Text => "",
            _ => " ",
        }
    }

    /// The token grammar, or `None` for the natural-language path.
    pub fn grammar(self) -> Option<Grammar> {
        match self {
            SourceKind::C | SourceKind::Java | SourceKind::Scala => Some(Grammar::C_LIKE),
            SourceKind::Python => Some(Grammar::PYTHON_LIKE),
            SourceKind::Text => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Text => f.write_str("text"),
            kind => f.write_str(kind.label()),
        }
    }
}

/// Tokenize `source` as `kind`.
pub fn tokenize<S>(source: &str, kind: SourceKind, segmenter: &S) -> ParseResult<Vec<Token>>
where
    S: Segmenter + ?Sized,
{
    match kind.grammar() {
        Some(grammar) => grammar.tokenize(source),
        None => Ok(segment_preserving_whitespace(segmenter, source)),
    }
}

/// Flatten classified tokens into the strings that get windowed.
///
/// Instruction tokens are dropped. On the code path, text tokens (comments
/// and some strings) are segmented and their whitespace pieces dropped,
/// since the joiner puts spacing back. Natural-language tokens arrive
/// segmented already and are kept as they are.
pub fn token_texts<S>(tokens: Vec<Token>, kind: SourceKind, segmenter: &S) -> Vec<String>
where
    S: Segmenter + ?Sized,
{
    let mut texts = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token.category {
            Category::Instruction => {}
            Category::Text if kind != SourceKind::Text => {
                texts.extend(
                    segmenter
                        .segment(&token.text)
                        .into_iter()
                        .filter(|piece| !piece.trim().is_empty()),
                );
            }
            _ => texts.push(token.text),
        }
    }
    texts
}
