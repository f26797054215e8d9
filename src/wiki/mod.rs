// src/wiki/mod.rs - Wiki target resolution and tool URL building

use thiserror::Error;

pub mod alias;
pub mod comparison;
pub mod mwapi;
pub mod prefix;
pub mod sites;
pub mod page;

pub use alias::{AliasDict, AliasDictBuilder};
pub use comparison::{comparison_url, Comparison, ComparisonTool};
pub use prefix::{PrefixResolver, ResolvedTarget};
pub use sites::WikiSites;
pub use page::{page_url, wiki_page_url};

/// Why a run of `xx:yy:` prefixes could not be turned into a wiki
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixProblem {
    /// More than one family code and one language code were given
    TooManyPrefixes(usize),
    /// Two prefixes that are not exactly one family plus one language
    NotFamilyAndLanguage,
    /// The family code names a pseudo-language site (`d:fr:`, `m:en:`)
    PseudoLanguageFamily,
}

impl std::fmt::Display for PrefixProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefixProblem::TooManyPrefixes(count) => {
                write!(f, "{} prefixes given, at most 2 are allowed", count)
            }
            PrefixProblem::NotFamilyAndLanguage => {
                write!(f, "two prefixes must be one family code and one language code")
            }
            PrefixProblem::PseudoLanguageFamily => {
                write!(f, "this family code cannot be combined with a language code")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WikiError {
    #[error("invalid prefix combination in '{target}': {problem}")]
    InvalidPrefixCombination { target: String, problem: PrefixProblem },

    #[error("need at least two usernames, got {found}")]
    TooFewUsernames { found: usize },

    #[error("alias key '{key}' collides with a canonical value")]
    AliasCollision { key: String },

    #[error("alias key '{key}' maps to both '{first}' and '{second}'")]
    DuplicateAlias { key: String, first: String, second: String },
}

pub type WikiResult<T> = std::result::Result<T, WikiError>;
