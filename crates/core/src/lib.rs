//! Core logic for turning source trees into LoRA fine-tuning datasets.
//!
//! Files are tokenized with a per-language grammar built from the [`parsec`]
//! combinators (or segmented, for natural-language text), and the token
//! stream is cut into randomly sized windows, one
//! [`TrainingRecord`] per window.

/// Trait for word segmentation.
///
/// Implementors split a run of text into word-like units. The pipeline takes
/// a segmenter explicitly, so tests can substitute a deterministic one.
pub trait Segmenter {
    /// Split `text` into segments, in order.
    fn segment(&self, text: &str) -> Vec<String>;
}

// Blanket implementation for references to Segmenters
impl<T: Segmenter + ?Sized> Segmenter for &T {
    fn segment(&self, text: &str) -> Vec<String> {
        (*self).segment(text)
    }
}

mod error;
mod grammar;
mod lexer;
pub mod parsec;
pub mod pipeline;
mod segment;
mod token;
mod window;

pub use error::{Error, Result};
pub use grammar::Grammar;
pub use lexer::{token_texts, tokenize, SourceKind};
pub use pipeline::{
    discover_source_files, load_text, process_all_files, process_file, write_json_output,
    BatchOutcome, FileFailure, FileJob, PipelineConfig,
};
pub use segment::{segment_preserving_whitespace, UnicodeSegmenter};
pub use token::{Category, Token};
pub use window::{partition, synthesize_records, TrainingRecord, Window, WindowConfig};

/// Default minimum window length, in tokens
pub const MIN_WINDOW: usize = 32;

/// Default window length upper bound (exclusive)
pub const MAX_WINDOW: usize = 128;

/// Default minimum header length, in tokens
pub const MIN_HEADER: usize = 4;

/// Default header length upper bound (exclusive)
pub const MAX_HEADER: usize = 16;
