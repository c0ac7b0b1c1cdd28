//! Tokenizer output types.

use glint_profile::TokenClass;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::state::ContinuationState;

/// A classified span of one line.
///
/// Offsets are byte offsets into the line, `start..end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Final class, after the profile's remap.
    pub class: TokenClass,
    pub start: usize,
    pub end: usize,
    /// Format placeholders inside a string token.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_spans: Vec<Range<usize>>,
}

impl Token {
    pub fn new(class: TokenClass, start: usize, end: usize) -> Self {
        Self {
            class,
            start,
            end,
            sub_spans: Vec::new(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the text this token covers.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.range()]
    }
}

/// Kinds of soft scanning problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// A single-line string reached the end of the line or a raw newline.
    UnterminatedString,
    /// A comment rule without multi-line support reached the end of the line.
    UnterminatedComment,
    /// A single-character rule held zero or several characters.
    NotSingleChar,
    /// A number with a bare base prefix or repeated glue.
    MalformedNumber,
    /// The incoming state named a rule the profile does not have.
    UnknownContinuation,
}

/// A locally contained scanning problem. Never stops tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub start: usize,
    pub end: usize,
}

/// Everything produced for one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedLine {
    pub tokens: Vec<Token>,
    /// State to pass in when tokenizing the next line.
    pub outgoing: ContinuationState,
    pub anomalies: Vec<Anomaly>,
}
