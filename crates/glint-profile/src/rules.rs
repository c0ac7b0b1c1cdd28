//! Rule tables as they appear in a syntax file.
//!
//! ## Learning: Serde Field Defaults
//!
//! `#[serde(default)]` on a struct fills every missing field from
//! `Default::default()`. A field-level `default = "path"` overrides that
//! for a single field, which is how `numbers` ends up as decimal-only when
//! a table omits it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Character that introduces an escape sequence inside strings and comments.
pub const ESCAPE_MARKER: char = '\\';

/// Which list a string rule came from.
///
/// Special strings are matched before normal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringTier {
    #[default]
    Normal,
    Special,
}

/// Number literal bases a language accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberBase {
    #[serde(alias = "dec")]
    Decimal,
    #[serde(alias = "hex")]
    Hexadecimal,
    #[serde(alias = "oct")]
    Octal,
    #[serde(alias = "bin")]
    Binary,
}

impl NumberBase {
    /// Returns the base selected by a prefix letter (either case).
    pub fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(NumberBase::Hexadecimal),
            'o' => Some(NumberBase::Octal),
            'b' => Some(NumberBase::Binary),
            _ => None,
        }
    }

    /// Whether `c` is a digit in this base.
    pub fn is_digit(self, c: char) -> bool {
        match self {
            NumberBase::Decimal => c.is_ascii_digit(),
            NumberBase::Hexadecimal => c.is_ascii_hexdigit(),
            NumberBase::Octal => ('0'..='7').contains(&c),
            NumberBase::Binary => c == '0' || c == '1',
        }
    }
}

/// Shared shape of string and multi-line comment rules.
///
/// The tokenizer resumes either kind through this trait, so a
/// continuation only needs to know which list the rule lives in.
pub trait DelimitedRule {
    fn stop(&self) -> &str;
    fn escape(&self) -> &[char];

    /// Whether `c` forms an escape sequence when it follows [`ESCAPE_MARKER`].
    fn is_escape(&self, c: char) -> bool {
        self.escape().contains(&c)
    }

    /// A `'\n'` escape entry means a raw newline closes the construct.
    fn ends_at_newline(&self) -> bool {
        self.escape().contains(&'\n')
    }
}

/// A string literal rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StringRule {
    pub start: String,
    pub stop: String,

    #[serde(default)]
    pub escape: Vec<char>,

    #[serde(default)]
    pub multi_line: bool,

    /// The content must be exactly one logical character.
    #[serde(default)]
    pub single_char: bool,

    /// Recognize `%d` style placeholders inside the string.
    #[serde(default)]
    pub format_percent: bool,

    /// Recognize `{}` style placeholders inside the string.
    #[serde(default)]
    pub format_braces: bool,

    /// Filled in from the list the rule was declared in.
    #[serde(skip)]
    pub tier: StringTier,
}

impl StringRule {
    /// Creates a single-line normal string rule.
    pub fn new(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            escape: Vec::new(),
            multi_line: false,
            single_char: false,
            format_percent: false,
            format_braces: false,
            tier: StringTier::Normal,
        }
    }

    pub fn with_escape(mut self, escape: impl IntoIterator<Item = char>) -> Self {
        self.escape = escape.into_iter().collect();
        self
    }

    pub fn multi_line(mut self) -> Self {
        self.multi_line = true;
        self
    }

    pub fn single_char(mut self) -> Self {
        self.single_char = true;
        self
    }

    pub fn format_percent(mut self) -> Self {
        self.format_percent = true;
        self
    }

    pub fn format_braces(mut self) -> Self {
        self.format_braces = true;
        self
    }
}

impl DelimitedRule for StringRule {
    fn stop(&self) -> &str {
        &self.stop
    }

    fn escape(&self) -> &[char] {
        &self.escape
    }
}

fn default_true() -> bool {
    true
}

/// A comment rule with explicit start and stop delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommentRule {
    pub start: String,
    pub stop: String,

    #[serde(default)]
    pub escape: Vec<char>,

    #[serde(default = "default_true")]
    pub multi_line: bool,
}

impl CommentRule {
    pub fn new(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
            escape: Vec::new(),
            multi_line: true,
        }
    }
}

impl DelimitedRule for CommentRule {
    fn stop(&self) -> &str {
        &self.stop
    }

    fn escape(&self) -> &[char] {
        &self.escape
    }
}

fn default_numbers() -> Vec<NumberBase> {
    vec![NumberBase::Decimal]
}

/// Unvalidated description of one language.
///
/// This is what a syntax file holds under each language key. Turn it into
/// a usable profile with [`LanguageProfile::load`](crate::LanguageProfile::load).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RuleTable {
    pub extensions: Vec<String>,
    pub strings_normal: Vec<StringRule>,
    pub strings_special: Vec<StringRule>,
    pub multi_line_comments: Vec<CommentRule>,
    pub comment_prefix: Vec<String>,
    pub keywords_strong: Vec<String>,
    pub keywords_basic: Vec<String>,
    pub keywords_weak: Vec<String>,
    pub identifier_glue: Vec<char>,
    pub number_glue: Vec<char>,
    #[serde(default = "default_numbers")]
    pub numbers: Vec<NumberBase>,
    pub call_syms: Vec<String>,
    pub symbols: Vec<String>,
    pub remap: BTreeMap<String, String>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            strings_normal: Vec::new(),
            strings_special: Vec::new(),
            multi_line_comments: Vec::new(),
            comment_prefix: Vec::new(),
            keywords_strong: Vec::new(),
            keywords_basic: Vec::new(),
            keywords_weak: Vec::new(),
            identifier_glue: Vec::new(),
            number_glue: Vec::new(),
            numbers: default_numbers(),
            call_syms: Vec::new(),
            symbols: Vec::new(),
            remap: BTreeMap::new(),
        }
    }
}
