//! # Glint Tokenizer
//!
//! A cheap, data-driven syntax highlighter.
//!
//! [`tokenize`] classifies one line at a time using a
//! [`LanguageProfile`](glint_profile::LanguageProfile). It builds no tree
//! and never fails: malformed input only produces a wrong class for the
//! malformed construct, while the spans still cover the line exactly.
//!
//! ```text
//!   line n-1 ──► outgoing ─┐
//!                          ▼
//!   line n   ──► tokenize(profile, line, incoming) ──► tokens
//!                          │
//!                          └──► outgoing ──► line n+1
//! ```
//!
//! ## Learning: State as a Value
//!
//! The only thing that crosses a line boundary is a small `Copy` value,
//! [`ContinuationState`]. Because the scanner keeps no hidden state, any
//! line can be re-tokenized in isolation given its incoming state, which is
//! what [`LineCache`] relies on.

mod cache;
mod scanner;
mod state;
mod token;

pub use cache::LineCache;
pub use scanner::{tokenize, tokenize_line};
pub use state::ContinuationState;
pub use token::{Anomaly, AnomalyKind, Token, TokenizedLine};
