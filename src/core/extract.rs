//! Numeric extraction from streamed model output.
//!
//! The inference service streams newline-delimited JSON objects, each with an
//! incremental `response` fragment. [`StreamAccumulator`] stitches the
//! fragments back together and, once the stream ends, returns the first
//! decimal number in the full text along with the text itself.
//!
//! The contract is deliberately narrow: the first match of `\d+(\.\d+)?`
//! wins. No attempt is made to understand the prose around it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, TrendcastError};

/// First unsigned decimal number in free text.
static NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Decimal number at the very start of a reply.
static LEADING_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?").unwrap());

/// One line of a streamed generate response. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct StreamLine {
    #[serde(default)]
    response: Option<String>,
}

/// A number pulled out of model output, with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub value: f64,
    pub text: String,
}

/// Find the first decimal number in `text`.
#[must_use]
pub fn first_number(text: &str) -> Option<f64> {
    NUMBER_REGEX
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Read the number a reply starts with, ignoring whatever prose follows.
///
/// Leading whitespace is skipped. `None` when the reply does not open with
/// a digit (or a minus sign and a digit).
#[must_use]
pub fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER_REGEX
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Incremental decoder for NDJSON generate streams.
///
/// Feed raw body chunks in arrival order with [`push_chunk`](Self::push_chunk)
/// and call [`finish`](Self::finish) once the body is exhausted.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    pending: Vec<u8>,
    lines_parsed: usize,
    lines_skipped: usize,
}

impl StreamAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one body chunk.
    ///
    /// Complete lines are decoded immediately. A trailing segment without a
    /// newline is decoded if it already forms a whole object, and otherwise
    /// held back and prefixed to the next chunk.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        let mut buffer = std::mem::take(&mut self.pending);
        buffer.extend_from_slice(chunk);

        let mut segments = buffer.split(|&b| b == b'\n').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                self.consume_line(segment);
            } else if !is_blank(segment) {
                match serde_json::from_slice::<StreamLine>(segment) {
                    Ok(line) => self.record(line),
                    Err(_) => self.pending = segment.to_vec(),
                }
            }
        }
    }

    /// Text accumulated so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines that decoded successfully.
    #[must_use]
    pub const fn lines_parsed(&self) -> usize {
        self.lines_parsed
    }

    /// Number of lines that were skipped as malformed.
    #[must_use]
    pub const fn lines_skipped(&self) -> usize {
        self.lines_skipped
    }

    /// Flush any held-back segment and scan the full text.
    ///
    /// # Errors
    ///
    /// Returns `Extraction` when the accumulated text contains no number.
    pub fn finish(mut self) -> Result<Extraction> {
        let leftover = std::mem::take(&mut self.pending);
        self.consume_line(&leftover);

        match first_number(&self.text) {
            Some(value) => Ok(Extraction {
                value,
                text: self.text,
            }),
            None => Err(TrendcastError::Extraction(format!(
                "{} line(s) decoded, {} skipped, no number in {} chars of output",
                self.lines_parsed,
                self.lines_skipped,
                self.text.len()
            ))),
        }
    }

    fn consume_line(&mut self, segment: &[u8]) {
        if is_blank(segment) {
            return;
        }
        match serde_json::from_slice::<StreamLine>(segment) {
            Ok(line) => self.record(line),
            Err(e) => {
                self.lines_skipped += 1;
                tracing::warn!(
                    error = %e,
                    line = %String::from_utf8_lossy(segment),
                    "Skipping malformed stream line"
                );
            }
        }
    }

    fn record(&mut self, line: StreamLine) {
        self.lines_parsed += 1;
        if let Some(fragment) = line.response {
            self.text.push_str(&fragment);
        }
    }
}

/// Run a complete chunk sequence through a fresh accumulator.
///
/// # Errors
///
/// Returns `Extraction` when no number appears in the combined output.
pub fn extract_from_chunks<I, C>(chunks: I) -> Result<Extraction>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut acc = StreamAccumulator::new();
    for chunk in chunks {
        acc.push_chunk(chunk.as_ref());
    }
    acc.finish()
}

fn is_blank(segment: &[u8]) -> bool {
    segment.iter().all(u8::is_ascii_whitespace)
}
