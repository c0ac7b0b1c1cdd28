//! Profile lookup by language name and file extension.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::profile::{LanguageProfile, normalize_extension};
use crate::rules::RuleTable;
use crate::{ProfileError, ProfileResult};

/// Contents of a syntax file: language name to rule table.
pub type SyntaxFile = BTreeMap<String, RuleTable>;

const BUILTIN_SYNTAX: &str = include_str!("../assets/syntax.toml");

/// All loaded profiles.
///
/// Profiles are handed out as `Arc`s so open documents keep using the
/// profile they started with even if the registry is rebuilt.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, Arc<LanguageProfile>>,
    by_extension: HashMap<String, String>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every table, failing on the first invalid one.
    pub fn from_tables(tables: impl IntoIterator<Item = (String, RuleTable)>) -> ProfileResult<Self> {
        let mut registry = Self::new();

        for (language, table) in tables {
            let profile = LanguageProfile::load(language.clone(), table).map_err(|source| {
                ProfileError::Invalid {
                    language,
                    source: Box::new(source),
                }
            })?;
            registry.insert(profile)?;
        }

        tracing::debug!(languages = registry.len(), "Built profile registry");
        Ok(registry)
    }

    /// Parses a TOML syntax file and loads all of its languages.
    pub fn from_toml_str(source: &str) -> ProfileResult<Self> {
        let file: SyntaxFile = toml::from_str(source)?;
        Self::from_tables(file)
    }

    /// Registry built from the bundled syntax file.
    pub fn builtin() -> ProfileResult<Self> {
        Self::from_toml_str(BUILTIN_SYNTAX)
    }

    /// Adds a profile. Names and extensions must be unique.
    pub fn insert(&mut self, profile: LanguageProfile) -> ProfileResult<()> {
        let name = profile.name().to_string();

        if self.profiles.contains_key(&name) {
            return Err(ProfileError::DuplicateLanguage(name));
        }

        for ext in profile.extensions() {
            if let Some(owner) = self.by_extension.get(ext) {
                // a profile listing the same extension twice is harmless
                if *owner != name {
                    return Err(ProfileError::DuplicateExtension {
                        extension: ext.clone(),
                        first: owner.clone(),
                        second: name,
                    });
                }
            }
        }

        for ext in profile.extensions() {
            self.by_extension.insert(ext.clone(), name.clone());
        }
        self.profiles.insert(name, Arc::new(profile));
        Ok(())
    }

    /// Gets a profile by language name.
    pub fn get(&self, name: &str) -> Option<Arc<LanguageProfile>> {
        self.profiles.get(name).cloned()
    }

    /// Gets the profile for a file extension, with or without the dot.
    pub fn lookup(&self, extension: &str) -> Option<Arc<LanguageProfile>> {
        let name = self.by_extension.get(&normalize_extension(extension))?;
        self.get(name)
    }

    /// Gets the profile for a path by its extension.
    pub fn lookup_path(&self, path: impl AsRef<Path>) -> Option<Arc<LanguageProfile>> {
        let ext = path.as_ref().extension()?.to_str()?;
        self.lookup(ext)
    }

    /// Language names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
