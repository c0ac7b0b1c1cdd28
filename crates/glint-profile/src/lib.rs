//! # Glint Profile
//!
//! Language profiles for the glint line tokenizer.
//!
//! A profile is plain data: ordered string, comment and symbol lists,
//! keyword tiers, number rules and a class remap. One scanning loop in
//! `glint-tokenizer` serves every language, so adding a language is a
//! change to the syntax file only.
//!
//! ## Learning: Validate Once, Trust Afterwards
//!
//! Everything that could make the scanner misbehave (empty delimiters,
//! remap cycles, overlapping keyword tiers) is rejected by
//! [`LanguageProfile::load`]. After that the profile is immutable and
//! can be shared freely behind an `Arc`.

mod class;
mod profile;
mod registry;
mod rules;

pub use class::TokenClass;
pub use profile::{KeywordTiers, LanguageProfile, RemapTable};
pub use registry::{ProfileRegistry, SyntaxFile};
pub use rules::{
    CommentRule, DelimitedRule, ESCAPE_MARKER, NumberBase, RuleTable, StringRule, StringTier,
};

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors raised while loading profiles
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Keyword {keyword:?} appears in both the {first} and {second} tiers")]
    KeywordTierOverlap {
        keyword: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Unknown token class: {0}")]
    UnknownClass(String),

    #[error("The plain class cannot be remapped")]
    PlainRemap,

    #[error("Token class {0} is remapped more than once")]
    DuplicateRemap(TokenClass),

    #[error("Remap cycle: {0}")]
    RemapCycle(String),

    #[error("Empty {0}")]
    EmptyLiteral(&'static str),

    #[error("Language already registered: {0}")]
    DuplicateLanguage(String),

    #[error("Extension {extension:?} is claimed by both {first} and {second}")]
    DuplicateExtension {
        extension: String,
        first: String,
        second: String,
    },

    #[error("Invalid profile {language}: {source}")]
    Invalid {
        language: String,
        #[source]
        source: Box<ProfileError>,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
