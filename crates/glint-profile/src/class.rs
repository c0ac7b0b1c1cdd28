//! Token classes shared by profiles and the tokenizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display category attached to a token.
///
/// The renderer maps each class to a color through the theme. `Plain`
/// covers whitespace and characters no rule recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    StringNormal,
    StringSpecial,
    Comment,
    Symbol,
    Number,
    IdentifierLower,
    IdentifierUpper,
    IdentifierMixed,
    KeywordStrong,
    KeywordBasic,
    KeywordWeak,
    CallIdentifier,
    Plain,
}

impl TokenClass {
    /// Number of classes, `Plain` included.
    pub const COUNT: usize = 13;

    /// Every class, in declaration order.
    pub const ALL: [TokenClass; Self::COUNT] = [
        TokenClass::StringNormal,
        TokenClass::StringSpecial,
        TokenClass::Comment,
        TokenClass::Symbol,
        TokenClass::Number,
        TokenClass::IdentifierLower,
        TokenClass::IdentifierUpper,
        TokenClass::IdentifierMixed,
        TokenClass::KeywordStrong,
        TokenClass::KeywordBasic,
        TokenClass::KeywordWeak,
        TokenClass::CallIdentifier,
        TokenClass::Plain,
    ];

    /// Returns the theme key for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenClass::StringNormal => "string_normal",
            TokenClass::StringSpecial => "string_special",
            TokenClass::Comment => "comment",
            TokenClass::Symbol => "symbol",
            TokenClass::Number => "number",
            TokenClass::IdentifierLower => "identifier_lower",
            TokenClass::IdentifierUpper => "identifier_upper",
            TokenClass::IdentifierMixed => "identifier_mixed",
            TokenClass::KeywordStrong => "keyword_strong",
            TokenClass::KeywordBasic => "keyword_basic",
            TokenClass::KeywordWeak => "keyword_weak",
            TokenClass::CallIdentifier => "call_identifier",
            TokenClass::Plain => "plain",
        }
    }

    /// Parses a theme key. Dashes are accepted in place of underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.as_str() == normalized)
    }

    /// Position of this class in [`TokenClass::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_name() {
        for class in TokenClass::ALL {
            assert_eq!(TokenClass::from_name(class.as_str()), Some(class));
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, class) in TokenClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn test_from_name_accepts_kebab_case() {
        assert_eq!(
            TokenClass::from_name("keyword-strong"),
            Some(TokenClass::KeywordStrong)
        );
        assert_eq!(TokenClass::from_name("fncall"), None);
    }
}
