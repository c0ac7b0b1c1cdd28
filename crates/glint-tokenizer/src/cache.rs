//! Per-document cache of tokenized lines.
//!
//! Each entry remembers the state it was tokenized with. A refresh walks
//! the document once, re-tokenizing dirty lines and any clean line whose
//! incoming state no longer matches, so an edit that opens a comment
//! re-highlights exactly the lines the comment swallows.

use std::ops::Range;
use std::sync::Arc;

use glint_profile::LanguageProfile;

use crate::scanner::tokenize_line;
use crate::state::ContinuationState;
use crate::token::{Anomaly, Token, TokenizedLine};

#[derive(Debug, Clone, Default)]
struct CachedLine {
    text: String,
    tokens: Vec<Token>,
    anomalies: Vec<Anomaly>,
    incoming: ContinuationState,
    outgoing: ContinuationState,
    dirty: bool,
}

impl CachedLine {
    fn dirty(text: String) -> Self {
        Self {
            text,
            dirty: true,
            ..Default::default()
        }
    }
}

/// Tokenized lines of one document, kept in sync by [`LineCache::refresh`].
#[derive(Debug, Clone)]
pub struct LineCache {
    profile: Arc<LanguageProfile>,
    lines: Vec<CachedLine>,
}

impl LineCache {
    pub fn new(profile: Arc<LanguageProfile>) -> Self {
        Self {
            profile,
            lines: Vec::new(),
        }
    }

    pub fn profile(&self) -> &Arc<LanguageProfile> {
        &self.profile
    }

    /// Switches language; every line is re-tokenized on the next refresh.
    pub fn set_profile(&mut self, profile: Arc<LanguageProfile>) {
        self.profile = profile;
        self.invalidate_all();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replaces the whole document. Every line starts out dirty.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text
            .lines()
            .map(|line| CachedLine::dirty(line.to_string()))
            .collect();
    }

    /// Replaces the lines in `range` with `new_lines`, which start out dirty.
    ///
    /// Out-of-range bounds are clamped to the document length, so an empty
    /// range at the end appends.
    pub fn replace_lines<I, S>(&mut self, range: Range<usize>, new_lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines.splice(
            start..end,
            new_lines
                .into_iter()
                .map(|line| CachedLine::dirty(line.into())),
        );
    }

    /// Marks one line for re-tokenization.
    pub fn invalidate(&mut self, line: usize) {
        if let Some(entry) = self.lines.get_mut(line) {
            entry.dirty = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        for entry in &mut self.lines {
            entry.dirty = true;
        }
    }

    /// Re-tokenizes what the last edits touched and returns how many lines
    /// were tokenized.
    pub fn refresh(&mut self) -> usize {
        let mut incoming = ContinuationState::None;
        let mut tokenized = 0;

        for entry in &mut self.lines {
            if entry.dirty || entry.incoming != incoming {
                let TokenizedLine {
                    tokens,
                    outgoing,
                    anomalies,
                } = tokenize_line(&self.profile, &entry.text, incoming);

                entry.tokens = tokens;
                entry.anomalies = anomalies;
                entry.incoming = incoming;
                entry.outgoing = outgoing;
                entry.dirty = false;
                tokenized += 1;
            }

            incoming = entry.outgoing;
        }

        tracing::trace!(
            language = self.profile.name(),
            lines = self.lines.len(),
            tokenized,
            "Refreshed line cache"
        );
        tokenized
    }

    /// Text of a line.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|entry| entry.text.as_str())
    }

    /// Tokens of a line, or `None` if it is unknown or dirty.
    pub fn line(&self, index: usize) -> Option<&[Token]> {
        self.lines
            .get(index)
            .filter(|entry| !entry.dirty)
            .map(|entry| entry.tokens.as_slice())
    }

    pub fn anomalies(&self, index: usize) -> Option<&[Anomaly]> {
        self.lines
            .get(index)
            .filter(|entry| !entry.dirty)
            .map(|entry| entry.anomalies.as_slice())
    }

    /// State at the end of a line, once it has been tokenized.
    pub fn outgoing(&self, index: usize) -> Option<ContinuationState> {
        self.lines
            .get(index)
            .filter(|entry| !entry.dirty)
            .map(|entry| entry.outgoing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_profile::{ProfileRegistry, TokenClass};

    fn rust_cache(text: &str) -> LineCache {
        let registry = ProfileRegistry::builtin().unwrap();
        let mut cache = LineCache::new(registry.get("rust").unwrap());
        cache.set_text(text);
        cache
    }

    #[test]
    fn test_first_refresh_tokenizes_everything() {
        let mut cache = rust_cache("fn main() {\n    let x = 1;\n}\n");
        assert_eq!(cache.len(), 3);
        assert!(cache.line(0).is_none());

        assert_eq!(cache.refresh(), 3);
        assert_eq!(cache.line(0).unwrap()[0].class, TokenClass::KeywordWeak);
        assert_eq!(cache.text(1), Some("    let x = 1;"));
        assert_eq!(cache.refresh(), 0);
    }

    #[test]
    fn test_set_text_replaces_document() {
        let mut cache = rust_cache("a\nb\nc");
        cache.refresh();

        cache.set_text("/* x");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.refresh(), 1);
        assert_eq!(cache.outgoing(0), Some(ContinuationState::InComment(0)));
    }

    #[test]
    fn test_opening_comment_propagates_forward() {
        let mut cache = rust_cache("a\nb\nc\nd");
        cache.refresh();

        cache.replace_lines(1..2, ["/* b"]);
        assert_eq!(cache.refresh(), 3);
        assert_eq!(cache.line(3).unwrap()[0].class, TokenClass::Comment);

        cache.replace_lines(2..3, ["c */"]);
        assert_eq!(cache.refresh(), 2);
        assert_eq!(cache.line(3).unwrap()[0].class, TokenClass::IdentifierLower);
    }

    #[test]
    fn test_edit_inside_stops_at_unchanged_state() {
        let mut cache = rust_cache("a\nb\nc");
        cache.refresh();

        cache.replace_lines(0..1, ["aa"]);
        assert_eq!(cache.refresh(), 1);
    }

    #[test]
    fn test_replace_lines() {
        let mut cache = rust_cache("a\nb\nc");
        cache.refresh();

        cache.replace_lines(1..2, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(cache.len(), 4);
        assert!(cache.line(1).is_none());
        assert!(cache.line(3).is_some());
        assert_eq!(cache.text(2), Some("y"));

        assert_eq!(cache.refresh(), 2);
        assert_eq!(cache.text(3), Some("c"));
        assert_eq!(cache.outgoing(3), Some(ContinuationState::None));
    }

    #[test]
    fn test_replace_lines_deletes() {
        let mut cache = rust_cache("a\n/* b\nc");
        cache.refresh();
        assert_eq!(cache.line(2).unwrap()[0].class, TokenClass::Comment);

        cache.replace_lines(1..2, Vec::<String>::new());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.refresh(), 1);
        assert_eq!(cache.line(1).unwrap()[0].class, TokenClass::IdentifierLower);
    }

    #[test]
    fn test_replace_lines_clamps_range() {
        let mut cache = rust_cache("a");
        cache.replace_lines(5..9, ["b"]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.text(1), Some("b"));
    }

    #[test]
    fn test_invalidate_forces_retokenize() {
        let mut cache = rust_cache("a\nb");
        cache.refresh();
        cache.invalidate(1);
        cache.invalidate(7);
        assert!(cache.line(1).is_none());
        assert_eq!(cache.refresh(), 1);
    }

    #[test]
    fn test_set_profile_invalidates() {
        let registry = ProfileRegistry::builtin().unwrap();
        let mut cache = rust_cache("# note");
        cache.refresh();
        assert_ne!(cache.line(0).unwrap()[0].class, TokenClass::Comment);

        cache.set_profile(registry.get("python").unwrap());
        assert_eq!(cache.refresh(), 1);
        assert_eq!(cache.line(0).unwrap()[0].class, TokenClass::Comment);
    }
}
