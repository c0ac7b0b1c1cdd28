//! State carried from one line to the next.

use serde::{Deserialize, Serialize};

/// Where the previous line left off.
///
/// The rule index points into [`LanguageProfile::string_rules`] or
/// [`LanguageProfile::comment_rules`] of the profile that produced the
/// state. A state is only valid for the line that follows the one it came
/// from; after an edit to an earlier line it must be recomputed.
///
/// [`LanguageProfile::string_rules`]: glint_profile::LanguageProfile::string_rules
/// [`LanguageProfile::comment_rules`]: glint_profile::LanguageProfile::comment_rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationState {
    #[default]
    None,
    InString(usize),
    InComment(usize),
}

