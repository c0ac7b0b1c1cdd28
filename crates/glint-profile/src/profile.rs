//! Validated language profiles.

use std::collections::{BTreeMap, HashSet};

use crate::class::TokenClass;
use crate::rules::{CommentRule, NumberBase, RuleTable, StringRule, StringTier};
use crate::{ProfileError, ProfileResult};

/// Keyword spellings grouped by emphasis.
#[derive(Debug, Clone, Default)]
pub struct KeywordTiers {
    strong: HashSet<String>,
    basic: HashSet<String>,
    weak: HashSet<String>,
}

impl KeywordTiers {
    /// Builds the tiers, rejecting any spelling listed in two of them.
    pub fn new(
        strong: impl IntoIterator<Item = String>,
        basic: impl IntoIterator<Item = String>,
        weak: impl IntoIterator<Item = String>,
    ) -> ProfileResult<Self> {
        let tiers = Self {
            strong: strong.into_iter().collect(),
            basic: basic.into_iter().collect(),
            weak: weak.into_iter().collect(),
        };

        let pairs = [
            (&tiers.strong, "strong", &tiers.basic, "basic"),
            (&tiers.strong, "strong", &tiers.weak, "weak"),
            (&tiers.basic, "basic", &tiers.weak, "weak"),
        ];

        for (left, first, right, second) in pairs {
            // sorted so the reported keyword does not depend on hash order
            let mut shared: Vec<_> = left.intersection(right).collect();
            shared.sort();
            if let Some(keyword) = shared.first() {
                return Err(ProfileError::KeywordTierOverlap {
                    keyword: keyword.to_string(),
                    first,
                    second,
                });
            }
        }

        Ok(tiers)
    }

    /// Returns the keyword class for an exact spelling.
    pub fn classify(&self, word: &str) -> Option<TokenClass> {
        if self.strong.contains(word) {
            Some(TokenClass::KeywordStrong)
        } else if self.basic.contains(word) {
            Some(TokenClass::KeywordBasic)
        } else if self.weak.contains(word) {
            Some(TokenClass::KeywordWeak)
        } else {
            None
        }
    }
}

/// Flattened class remapping.
///
/// Every chain is followed to its end at load time, so [`RemapTable::apply`]
/// is a single lookup and applying it twice changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemapTable {
    table: [TokenClass; TokenClass::COUNT],
}

impl RemapTable {
    /// Maps every class to itself.
    pub fn identity() -> Self {
        Self {
            table: TokenClass::ALL,
        }
    }

    /// Resolves `from -> to` entries (class names) into a flat table.
    ///
    /// A class mapped to itself is already at its fixed point and is
    /// ignored. `plain` may appear on neither side.
    pub fn resolve(entries: &BTreeMap<String, String>) -> ProfileResult<Self> {
        let mut direct: [Option<TokenClass>; TokenClass::COUNT] = [None; TokenClass::COUNT];
        let mut seen = [false; TokenClass::COUNT];

        for (from, to) in entries {
            let source = remappable_class(from)?;
            let target = remappable_class(to)?;

            if std::mem::replace(&mut seen[source.index()], true) {
                return Err(ProfileError::DuplicateRemap(source));
            }
            if source != target {
                direct[source.index()] = Some(target);
            }
        }

        let mut table = TokenClass::ALL;

        for class in TokenClass::ALL {
            let mut chain = vec![class];
            let mut current = class;

            while let Some(next) = direct[current.index()] {
                let revisited = chain.contains(&next);
                chain.push(next);
                if revisited {
                    let names: Vec<_> = chain.iter().map(|c| c.as_str()).collect();
                    return Err(ProfileError::RemapCycle(names.join(" -> ")));
                }
                current = next;
            }

            table[class.index()] = current;
        }

        Ok(Self { table })
    }

    pub fn apply(&self, class: TokenClass) -> TokenClass {
        self.table[class.index()]
    }
}

fn remappable_class(name: &str) -> ProfileResult<TokenClass> {
    match TokenClass::from_name(name) {
        Some(TokenClass::Plain) => Err(ProfileError::PlainRemap),
        Some(class) => Ok(class),
        None => Err(ProfileError::UnknownClass(name.to_string())),
    }
}

impl Default for RemapTable {
    fn default() -> Self {
        Self::identity()
    }
}

/// Everything the tokenizer needs to highlight one language.
///
/// Profiles are immutable after [`LanguageProfile::load`] and are shared
/// between documents behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    name: String,
    extensions: Vec<String>,
    /// Special rules first, then normal rules, each in declared order.
    string_rules: Vec<StringRule>,
    comment_rules: Vec<CommentRule>,
    line_comment_prefixes: Vec<String>,
    symbols: Vec<String>,
    number_glue: HashSet<char>,
    number_bases: Vec<NumberBase>,
    keywords: KeywordTiers,
    identifier_glue: HashSet<char>,
    call_symbols: Vec<String>,
    remap: RemapTable,
}

impl LanguageProfile {
    /// Validates a rule table and builds a profile from it.
    pub fn load(name: impl Into<String>, table: RuleTable) -> ProfileResult<Self> {
        let name = name.into();

        let RuleTable {
            extensions,
            strings_normal,
            strings_special,
            multi_line_comments,
            comment_prefix,
            keywords_strong,
            keywords_basic,
            keywords_weak,
            identifier_glue,
            number_glue,
            numbers,
            call_syms,
            symbols,
            remap,
        } = table;

        let string_rules: Vec<StringRule> = strings_special
            .into_iter()
            .map(|rule| StringRule {
                tier: StringTier::Special,
                ..rule
            })
            .chain(strings_normal.into_iter().map(|rule| StringRule {
                tier: StringTier::Normal,
                ..rule
            }))
            .collect();

        for rule in &string_rules {
            require_literal(&rule.start, "string start delimiter")?;
            require_literal(&rule.stop, "string stop delimiter")?;
        }
        for rule in &multi_line_comments {
            require_literal(&rule.start, "comment start delimiter")?;
            require_literal(&rule.stop, "comment stop delimiter")?;
        }
        for prefix in &comment_prefix {
            require_literal(prefix, "line comment prefix")?;
        }
        for symbol in &symbols {
            require_literal(symbol, "symbol")?;
        }
        for symbol in &call_syms {
            require_literal(symbol, "call symbol")?;
        }

        let keywords = KeywordTiers::new(keywords_strong, keywords_basic, keywords_weak)?;
        let remap = RemapTable::resolve(&remap)?;

        warn_shadowed_symbols(&name, &symbols);

        let extensions = extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();

        tracing::debug!(
            language = %name,
            strings = string_rules.len(),
            comments = multi_line_comments.len(),
            symbols = symbols.len(),
            "Loaded language profile"
        );

        Ok(Self {
            name,
            extensions,
            string_rules,
            comment_rules: multi_line_comments,
            line_comment_prefixes: comment_prefix,
            symbols,
            number_glue: number_glue.into_iter().collect(),
            number_bases: numbers,
            keywords,
            identifier_glue: identifier_glue.into_iter().collect(),
            call_symbols: call_syms,
            remap,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// String rules; a continuation's rule index points into this list.
    pub fn string_rules(&self) -> &[StringRule] {
        &self.string_rules
    }

    /// Multi-line comment rules; a continuation's rule index points into this list.
    pub fn comment_rules(&self) -> &[CommentRule] {
        &self.comment_rules
    }

    pub fn line_comment_prefixes(&self) -> &[String] {
        &self.line_comment_prefixes
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn call_symbols(&self) -> &[String] {
        &self.call_symbols
    }

    pub fn is_number_glue(&self, c: char) -> bool {
        self.number_glue.contains(&c)
    }

    pub fn accepts_base(&self, base: NumberBase) -> bool {
        self.number_bases.contains(&base)
    }

    pub fn is_identifier_start(&self, c: char) -> bool {
        c.is_alphabetic() || self.identifier_glue.contains(&c)
    }

    pub fn is_identifier_continue(&self, c: char) -> bool {
        c.is_alphanumeric() || self.identifier_glue.contains(&c)
    }

    pub fn keywords(&self) -> &KeywordTiers {
        &self.keywords
    }

    pub fn remap(&self) -> &RemapTable {
        &self.remap
    }
}

fn require_literal(literal: &str, what: &'static str) -> ProfileResult<()> {
    if literal.is_empty() {
        return Err(ProfileError::EmptyLiteral(what));
    }
    Ok(())
}

/// Symbols match in declared order, so a prefix listed first hides the
/// longer symbol entirely. Returns `(hidden, hidden_by)` pairs.
fn shadowed_symbols(symbols: &[String]) -> Vec<(&str, &str)> {
    symbols
        .iter()
        .enumerate()
        .filter_map(|(i, symbol)| {
            symbols[..i]
                .iter()
                .find(|earlier| symbol.starts_with(earlier.as_str()))
                .map(|earlier| (symbol.as_str(), earlier.as_str()))
        })
        .collect()
}

fn warn_shadowed_symbols(language: &str, symbols: &[String]) {
    for (symbol, earlier) in shadowed_symbols(symbols) {
        tracing::warn!(
            language,
            symbol,
            shadowed_by = earlier,
            "Symbol can never match"
        );
    }
}

pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn remap(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_keyword_tiers_classify() {
        let tiers =
            KeywordTiers::new(words(&["return"]), words(&["int"]), words(&["self"])).unwrap();
        assert_eq!(tiers.classify("return"), Some(TokenClass::KeywordStrong));
        assert_eq!(tiers.classify("int"), Some(TokenClass::KeywordBasic));
        assert_eq!(tiers.classify("self"), Some(TokenClass::KeywordWeak));
        assert_eq!(tiers.classify("Self"), None);
    }

    #[test]
    fn test_keyword_tiers_overlap_rejected() {
        let err = KeywordTiers::new(words(&["if"]), words(&[]), words(&["if"])).unwrap_err();
        match err {
            ProfileError::KeywordTierOverlap {
                keyword,
                first,
                second,
            } => {
                assert_eq!(keyword, "if");
                assert_eq!(first, "strong");
                assert_eq!(second, "weak");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remap_chain_flattened() {
        let table = RemapTable::resolve(&remap(&[
            ("keyword_weak", "keyword_basic"),
            ("keyword_basic", "keyword_strong"),
        ]))
        .unwrap();
        assert_eq!(
            table.apply(TokenClass::KeywordWeak),
            TokenClass::KeywordStrong
        );
        assert_eq!(
            table.apply(TokenClass::KeywordBasic),
            TokenClass::KeywordStrong
        );
        assert_eq!(table.apply(TokenClass::Number), TokenClass::Number);
    }

    #[test]
    fn test_remap_cycle_rejected() {
        let err = RemapTable::resolve(&remap(&[
            ("number", "symbol"),
            ("symbol", "number"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ProfileError::RemapCycle(_)));
    }

    #[test]
    fn test_remap_self_mapping_is_ignored() {
        let table = RemapTable::resolve(&remap(&[
            ("comment", "comment"),
            ("number", "symbol"),
        ]))
        .unwrap();
        assert_eq!(table.apply(TokenClass::Comment), TokenClass::Comment);
        assert_eq!(table.apply(TokenClass::Number), TokenClass::Symbol);
    }

    #[test]
    fn test_remap_plain_rejected() {
        let err = RemapTable::resolve(&remap(&[("plain", "comment")])).unwrap_err();
        assert!(matches!(err, ProfileError::PlainRemap));

        let err = RemapTable::resolve(&remap(&[("comment", "plain")])).unwrap_err();
        assert!(matches!(err, ProfileError::PlainRemap));
    }

    #[test]
    fn test_shadowed_symbols() {
        let symbols = words(&["&", "&&", "=", "==", "->", "-"]);
        assert_eq!(
            shadowed_symbols(&symbols),
            vec![("&&", "&"), ("==", "=")]
        );
        assert!(shadowed_symbols(&words(&["&&", "&"])).is_empty());
    }

    #[test]
    fn test_remap_unknown_class() {
        let err = RemapTable::resolve(&remap(&[("number", "fncall")])).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownClass(name) if name == "fncall"));
    }

    #[test]
    fn test_remap_duplicate_source() {
        let err = RemapTable::resolve(&remap(&[
            ("keyword-weak", "number"),
            ("keyword_weak", "symbol"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::DuplicateRemap(TokenClass::KeywordWeak)
        ));
    }

    #[test]
    fn test_load_orders_special_strings_first() {
        let table = RuleTable {
            strings_normal: vec![StringRule::new("\"", "\"")],
            strings_special: vec![StringRule::new("r\"", "\"")],
            ..Default::default()
        };
        let profile = LanguageProfile::load("test", table).unwrap();
        let rules = profile.string_rules();
        assert_eq!(rules[0].tier, StringTier::Special);
        assert_eq!(rules[0].start, "r\"");
        assert_eq!(rules[1].tier, StringTier::Normal);
    }

    #[test]
    fn test_load_rejects_empty_symbol() {
        let table = RuleTable {
            symbols: words(&["+", ""]),
            ..Default::default()
        };
        let err = LanguageProfile::load("test", table).unwrap_err();
        assert!(matches!(err, ProfileError::EmptyLiteral("symbol")));
    }

    #[test]
    fn test_load_normalizes_extensions() {
        let table = RuleTable {
            extensions: words(&[".RS", "rs"]),
            ..Default::default()
        };
        let profile = LanguageProfile::load("rust", table).unwrap();
        assert_eq!(profile.extensions(), ["rs", "rs"]);
    }

    fn class_strategy() -> impl Strategy<Value = TokenClass> {
        (0..TokenClass::COUNT).prop_map(|i| TokenClass::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_remap_is_idempotent(
            entries in proptest::collection::vec((class_strategy(), class_strategy()), 0..8)
        ) {
            let map: BTreeMap<String, String> = entries
                .iter()
                .map(|(from, to)| (from.as_str().to_string(), to.as_str().to_string()))
                .collect();

            if let Ok(table) = RemapTable::resolve(&map) {
                for class in TokenClass::ALL {
                    let once = table.apply(class);
                    prop_assert_eq!(table.apply(once), once);
                }
            }
        }
    }
}
