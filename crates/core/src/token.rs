//! Classified lexical units.

use std::fmt;

use serde::Serialize;

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Word,
    Symbol,
    /// Free text: comments, natural language and some string literals.
    /// Runs through the segmenter before windowing.
    Text,
    Literal,
    /// Leading directive such as a shebang line. Never part of the body stream.
    Instruction,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Word => "word",
            Category::Symbol => "symbol",
            Category::Text => "text",
            Category::Literal => "literal",
            Category::Instruction => "instruction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub category: Category,
    pub text: String,
}

impl Token {
    pub fn new(category: Category, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(Category::Word, text)
    }

    pub fn symbol(text: impl Into<String>) -> Self {
        Self::new(Category::Symbol, text)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Category::Text, text)
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(Category::Literal, text)
    }

    pub fn instruction(text: impl Into<String>) -> Self {
        Self::new(Category::Instruction, text)
    }
}
