//! The line scanning loop.
//!
//! At each position the scanner tries, in order: the continuation carried
//! in from the previous line, string and comment openings, symbols,
//! numbers, identifiers, and finally a plain character. Every step
//! consumes at least one character, so a line is scanned in one pass.

use std::ops::Range;

use glint_profile::{
    CommentRule, DelimitedRule, ESCAPE_MARKER, LanguageProfile, NumberBase, StringRule,
    StringTier, TokenClass,
};

use crate::state::ContinuationState;
use crate::token::{Anomaly, AnomalyKind, Token, TokenizedLine};

/// Tokenizes one line, returning its tokens and the state for the next line.
pub fn tokenize(
    profile: &LanguageProfile,
    line: &str,
    incoming: ContinuationState,
) -> (Vec<Token>, ContinuationState) {
    let TokenizedLine {
        tokens, outgoing, ..
    } = tokenize_line(profile, line, incoming);
    (tokens, outgoing)
}

/// Tokenizes one line, also reporting soft anomalies.
pub fn tokenize_line(
    profile: &LanguageProfile,
    line: &str,
    incoming: ContinuationState,
) -> TokenizedLine {
    let mut scanner = Scanner::new(profile, line);
    scanner.resume(incoming);

    while scanner.pos < line.len() {
        let advanced = scanner.open_delimited()
            || scanner.symbol()
            || scanner.number()
            || scanner.identifier()
            || scanner.plain();
        debug_assert!(advanced, "scanner stalled at byte {}", scanner.pos);
    }

    scanner.finish()
}

/// How a string or comment ended on this line.
enum Close {
    /// Stop delimiter found at `stop_start`; the construct ends at `end`.
    Stop { stop_start: usize, end: usize },
    /// A raw newline closed a rule that does not allow them.
    Newline { end: usize },
    /// The line ran out first.
    EndOfLine,
}

/// Finds the end of a delimited construct whose content begins at `from`.
fn find_close<R: DelimitedRule>(rule: &R, line: &str, from: usize) -> Close {
    let stop = rule.stop();
    let mut chars = line[from..].char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let i = from + offset;

        if c == ESCAPE_MARKER {
            if let Some(&(_, next)) = chars.peek() {
                if rule.is_escape(next) {
                    // marker and escaped char are one unit
                    chars.next();
                    continue;
                }
            }
        }

        if line[i..].starts_with(stop) {
            return Close::Stop {
                stop_start: i,
                end: i + stop.len(),
            };
        }

        if c == '\n' && rule.ends_at_newline() {
            return Close::Newline { end: i + 1 };
        }
    }

    Close::EndOfLine
}

/// Counts logical characters: an escape sequence counts as one.
fn logical_chars<R: DelimitedRule>(rule: &R, content: &str) -> usize {
    let mut count = 0;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ESCAPE_MARKER && chars.peek().is_some_and(|&next| rule.is_escape(next)) {
            chars.next();
        }
        count += 1;
    }

    count
}

/// Finds the placeholders `rule` enables (`%x`, `{...}`) in `line[range]`.
fn format_placeholders(rule: &StringRule, line: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let base = range.start;
    let content = &line[range];
    let mut spans = Vec::new();
    let mut i = 0;

    while let Some(c) = content[i..].chars().next() {
        let next = content[i + c.len_utf8()..].chars().next();

        match (c, next) {
            ('%', Some('%')) if rule.format_percent => {
                i += 2;
                continue;
            }
            ('%', Some(spec)) if rule.format_percent && spec.is_ascii_alphabetic() => {
                spans.push(base + i..base + i + 2);
                i += 2;
                continue;
            }
            ('{', _) if rule.format_braces => {
                let rest = &content[i + 1..];
                if let Some(k) = rest.find(['{', '}']) {
                    if rest[k..].starts_with('}') {
                        let end = i + 1 + k + 1;
                        spans.push(base + i..base + end);
                        i = end;
                        continue;
                    }
                }
            }
            _ => {}
        }

        i += c.len_utf8();
    }

    spans
}

/// Classifies an identifier by the cased letters it contains.
fn case_shape(word: &str) -> TokenClass {
    let upper = word.chars().any(char::is_uppercase);
    let lower = word.chars().any(char::is_lowercase);

    match (upper, lower) {
        (true, true) => TokenClass::IdentifierMixed,
        (true, false) => TokenClass::IdentifierUpper,
        (false, _) => TokenClass::IdentifierLower,
    }
}

struct Scanner<'a> {
    profile: &'a LanguageProfile,
    line: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    anomalies: Vec<Anomaly>,
    outgoing: ContinuationState,
    /// The last token is a fallback span that may be extended.
    open_plain: bool,
}

impl<'a> Scanner<'a> {
    fn new(profile: &'a LanguageProfile, line: &'a str) -> Self {
        Self {
            profile,
            line,
            pos: 0,
            tokens: Vec::new(),
            anomalies: Vec::new(),
            outgoing: ContinuationState::None,
            open_plain: false,
        }
    }

    fn finish(self) -> TokenizedLine {
        TokenizedLine {
            tokens: self.tokens,
            outgoing: self.outgoing,
            anomalies: self.anomalies,
        }
    }

    fn current(&self) -> Option<char> {
        self.line[self.pos..].chars().next()
    }

    fn emit(&mut self, class: TokenClass, end: usize, sub_spans: Vec<Range<usize>>) {
        let start = self.pos;
        self.pos = end;
        self.open_plain = false;

        if start == end {
            return;
        }

        self.tokens.push(Token {
            class: self.profile.remap().apply(class),
            start,
            end,
            sub_spans,
        });
    }

    fn report(&mut self, kind: AnomalyKind, start: usize, end: usize) {
        tracing::trace!(?kind, start, end, "Soft tokenizer anomaly");
        self.anomalies.push(Anomaly { kind, start, end });
    }

    /// Continues a string or comment left open by the previous line.
    fn resume(&mut self, incoming: ContinuationState) {
        let profile = self.profile;

        match incoming {
            ContinuationState::None => {}
            ContinuationState::InString(index) => match profile.string_rules().get(index) {
                Some(rule) => self.string_body(index, rule, 0, false),
                None => self.report(AnomalyKind::UnknownContinuation, 0, 0),
            },
            ContinuationState::InComment(index) => match profile.comment_rules().get(index) {
                Some(rule) => self.comment_body(index, rule, 0),
                None => self.report(AnomalyKind::UnknownContinuation, 0, 0),
            },
        }
    }

    /// Tries string, block comment and line comment openings, in that order.
    fn open_delimited(&mut self) -> bool {
        let profile = self.profile;
        let line = self.line;
        let rest = &line[self.pos..];

        // special rules come first in the list
        for (index, rule) in profile.string_rules().iter().enumerate() {
            if rest.starts_with(rule.start.as_str()) {
                let content_start = self.pos + rule.start.len();
                self.string_body(index, rule, content_start, true);
                return true;
            }
        }

        for (index, rule) in profile.comment_rules().iter().enumerate() {
            if rest.starts_with(rule.start.as_str()) {
                let content_start = self.pos + rule.start.len();
                self.comment_body(index, rule, content_start);
                return true;
            }
        }

        if profile
            .line_comment_prefixes()
            .iter()
            .any(|prefix| rest.starts_with(prefix.as_str()))
        {
            self.emit(TokenClass::Comment, line.len(), Vec::new());
            return true;
        }

        false
    }

    /// Scans a string from `content_start` and emits it from `self.pos`.
    fn string_body(&mut self, index: usize, rule: &StringRule, content_start: usize, opened: bool) {
        let line = self.line;
        let class = match rule.tier {
            StringTier::Normal => TokenClass::StringNormal,
            StringTier::Special => TokenClass::StringSpecial,
        };

        let (content_end, end) = match find_close(rule, line, content_start) {
            Close::Stop { stop_start, end } => {
                if rule.single_char
                    && opened
                    && logical_chars(rule, &line[content_start..stop_start]) != 1
                {
                    self.report(AnomalyKind::NotSingleChar, self.pos, end);
                }
                (stop_start, end)
            }
            Close::Newline { end } => {
                self.report(AnomalyKind::UnterminatedString, self.pos, end);
                (end - 1, end)
            }
            Close::EndOfLine => {
                if rule.multi_line {
                    self.outgoing = ContinuationState::InString(index);
                } else {
                    self.report(AnomalyKind::UnterminatedString, self.pos, line.len());
                }
                (line.len(), line.len())
            }
        };

        let sub_spans = if rule.format_percent || rule.format_braces {
            format_placeholders(rule, line, content_start..content_end)
        } else {
            Vec::new()
        };

        self.emit(class, end, sub_spans);
    }

    /// Scans a multi-line comment from `content_start` and emits it from `self.pos`.
    fn comment_body(&mut self, index: usize, rule: &CommentRule, content_start: usize) {
        let line = self.line;

        let end = match find_close(rule, line, content_start) {
            Close::Stop { end, .. } => end,
            Close::Newline { end } => {
                self.report(AnomalyKind::UnterminatedComment, self.pos, end);
                end
            }
            Close::EndOfLine => {
                if rule.multi_line {
                    self.outgoing = ContinuationState::InComment(index);
                } else {
                    self.report(AnomalyKind::UnterminatedComment, self.pos, line.len());
                }
                line.len()
            }
        };

        self.emit(TokenClass::Comment, end, Vec::new());
    }

    fn symbol(&mut self) -> bool {
        let profile = self.profile;
        let line = self.line;
        let rest = &line[self.pos..];

        match profile
            .symbols()
            .iter()
            .find(|symbol| rest.starts_with(symbol.as_str()))
        {
            Some(symbol) => {
                self.emit(TokenClass::Symbol, self.pos + symbol.len(), Vec::new());
                true
            }
            None => false,
        }
    }

    fn number(&mut self) -> bool {
        let profile = self.profile;
        let line = self.line;
        let start = self.pos;

        if !self.current().is_some_and(|c| c.is_ascii_digit()) {
            return false;
        }

        let mut base = NumberBase::Decimal;
        let mut digits_from = start;

        if line[start..].starts_with('0') {
            let prefixed = line[start + 1..]
                .chars()
                .next()
                .and_then(NumberBase::from_prefix)
                .filter(|&b| profile.accepts_base(b));

            if let Some(prefixed) = prefixed {
                base = prefixed;
                digits_from = start + 2;
            }
        }

        if base == NumberBase::Decimal && !profile.accepts_base(NumberBase::Decimal) {
            return false;
        }

        let mut end = digits_from;
        let mut digits = 0;
        let mut malformed = false;
        let mut prev: Option<char> = None;
        let mut prev_glue = false;

        for c in line[digits_from..].chars() {
            if base.is_digit(c) {
                digits += 1;
                prev_glue = false;
            } else if profile.is_number_glue(c) {
                let sign = c == '+' || c == '-';
                let after_exponent = matches!(prev, Some('e' | 'E'));

                if sign && !(base == NumberBase::Decimal && after_exponent) {
                    break;
                }
                if prev_glue && !sign {
                    malformed = true;
                }
                prev_glue = true;
            } else {
                break;
            }

            prev = Some(c);
            end += c.len_utf8();
        }

        if digits == 0 && base != NumberBase::Decimal {
            malformed = true;
        }
        if malformed {
            self.report(AnomalyKind::MalformedNumber, start, end);
        }

        self.emit(TokenClass::Number, end, Vec::new());
        true
    }

    fn identifier(&mut self) -> bool {
        let profile = self.profile;
        let line = self.line;
        let start = self.pos;

        if !self.current().is_some_and(|c| profile.is_identifier_start(c)) {
            return false;
        }

        let len: usize = line[start..]
            .chars()
            .take_while(|&c| profile.is_identifier_continue(c))
            .map(char::len_utf8)
            .sum();
        let end = start + len;
        let word = &line[start..end];

        let rest = &line[end..];
        let class = if profile
            .call_symbols()
            .iter()
            .any(|symbol| rest.starts_with(symbol.as_str()))
        {
            TokenClass::CallIdentifier
        } else {
            profile
                .keywords()
                .classify(word)
                .unwrap_or_else(|| case_shape(word))
        };

        self.emit(class, end, Vec::new());
        true
    }

    /// Consumes one unrecognized character, merging with a preceding plain span.
    fn plain(&mut self) -> bool {
        let Some(c) = self.current() else {
            return false;
        };
        let end = self.pos + c.len_utf8();

        if self.open_plain {
            if let Some(last) = self.tokens.last_mut() {
                last.end = end;
                self.pos = end;
                return true;
            }
        }

        self.emit(TokenClass::Plain, end, Vec::new());
        self.open_plain = true;
        true
    }
}
