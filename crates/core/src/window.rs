//! Windowing synthesizer: cuts a token sequence into training records.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{MAX_HEADER, MAX_WINDOW, MIN_HEADER, MIN_WINDOW};

/// One instruction/input/output training triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub instruction: String,
    pub input: String,
    pub output: String,
}

/// Size ranges for windows and headers, in tokens. Upper bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub min_window: usize,
    pub max_window: usize,
    pub min_header: usize,
    pub max_header: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            min_window: MIN_WINDOW,
            max_window: MAX_WINDOW,
            min_header: MIN_HEADER,
            max_header: MAX_HEADER,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_window == 0 {
            return Err(Error::InvalidConfig("min_window must be at least 1".into()));
        }
        if self.min_window >= self.max_window {
            return Err(Error::InvalidConfig(format!(
                "window range {}..{} is empty",
                self.min_window, self.max_window
            )));
        }
        if self.min_header >= self.max_header {
            return Err(Error::InvalidConfig(format!(
                "header range {}..{} is empty",
                self.min_header, self.max_header
            )));
        }
        Ok(())
    }
}

/// A contiguous slice `start..end` of the token sequence. The first `header`
/// tokens form the record input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub header: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partition `0..len` into consecutive windows.
///
/// Window sizes are drawn from `min_window..max_window` and clamped at the
/// end of the sequence, so only the last window may be shorter than
/// `min_window`. Header sizes are drawn from `min_header..max_header` and
/// clamped to their window. `config` must be valid.
pub fn partition<R: Rng>(len: usize, config: &WindowConfig, rng: &mut R) -> Vec<Window> {
    let mut windows = Vec::with_capacity(len / config.min_window.max(1) + 1);
    let mut start = 0;
    while start < len {
        let step = rng.random_range(config.min_window..config.max_window);
        let end = (start + step).min(len);
        let header = rng
            .random_range(config.min_header..config.max_header)
            .min(end - start);
        windows.push(Window { start, end, header });
        start = end;
    }
    windows
}

/// Build one record per window of `tokens`.
///
/// `input` joins the window header and `output` the whole window with
/// `joiner`. The instruction is `"{label}: {input}"`, or empty when `label`
/// is empty.
pub fn synthesize_records<R: Rng>(
    tokens: &[String],
    label: &str,
    joiner: &str,
    config: &WindowConfig,
    rng: &mut R,
) -> Vec<TrainingRecord> {
    partition(tokens.len(), config, rng)
        .into_iter()
        .map(|window| {
            let material = &tokens[window.start..window.end];
            let input = material[..window.header].join(joiner);
            let output = material.join(joiner);
            let instruction = if label.is_empty() {
                String::new()
            } else {
                format!("{label}: {input}")
            };
            TrainingRecord {
                instruction,
                input,
                output,
            }
        })
        .collect()
}
