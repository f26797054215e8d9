// src/wiki/prefix.rs - Resolve `fr:s:Page` style targets to a wiki

use log::debug;
use std::collections::HashSet;

use super::{PrefixProblem, WikiError, WikiResult, WikiSites};

/// A target page on a specific wiki
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub family: String,
    pub language: String,
    pub subpage: String,
}

impl ResolvedTarget {
    /// Host name of the wiki, e.g. `fr.wikisource.org`
    pub fn host(&self) -> String {
        format!("{}.{}.org", self.language, self.family)
    }

    /// Article path base, e.g. `https://fr.wikisource.org/wiki/`
    pub fn article_base(&self) -> String {
        format!("https://{}/wiki/", self.host())
    }
}

/// Splits user targets into family/language prefixes and a page name.
///
/// Up to two prefixes are accepted: one family code and one language code,
/// in either order. A single prefix may be a family, a language or a
/// pseudo-language such as `m` or `commons`.
#[derive(Debug, Clone)]
pub struct PrefixResolver {
    sites: WikiSites,
    default_family: String,
    default_language: String,
}

impl PrefixResolver {
    pub fn new(sites: WikiSites, default_family: &str, default_language: &str) -> Self {
        Self {
            sites,
            default_family: default_family.to_string(),
            default_language: default_language.to_string(),
        }
    }

    pub fn sites(&self) -> &WikiSites {
        &self.sites
    }

    pub fn defaults(&self) -> (&str, &str) {
        (self.default_family.as_str(), self.default_language.as_str())
    }

    /// Resolve `target` against the configured default wiki
    pub fn resolve(&self, target: &str) -> WikiResult<ResolvedTarget> {
        self.resolve_with(target, (self.default_family.as_str(), self.default_language.as_str()))
    }

    /// Resolve `target`, falling back to `defaults` (family, language)
    pub fn resolve_with(&self, target: &str, defaults: (&str, &str)) -> WikiResult<ResolvedTarget> {
        let (prefixes, subpage) = self.split_prefixes(target);
        let (default_family, default_language) = defaults;

        let (family, language) = match prefixes.as_slice() {
            [] => (default_family.to_string(), default_language.to_string()),
            [prefix] => self.resolve_single(prefix, defaults),
            [first, second] => self.resolve_pair(target, first, second)?,
            _ => {
                return Err(invalid(target, PrefixProblem::TooManyPrefixes(prefixes.len())));
            }
        };

        debug!("Resolved '{}' to {}.{} page '{}'", target, language, family, subpage);

        Ok(ResolvedTarget {
            family,
            language,
            subpage,
        })
    }

    /// Returns the lowercased prefixes and the remaining page name
    fn split_prefixes(&self, target: &str) -> (Vec<String>, String) {
        let parts: Vec<&str> = target.trim_start_matches(':').split(':').collect();

        let first_page_part = parts
            .iter()
            .position(|part| !self.sites.is_valid_prefix(&part.to_lowercase()))
            // Every part is a prefix: the last one is still the page name
            .unwrap_or(parts.len() - 1);

        let prefixes = parts[..first_page_part]
            .iter()
            .map(|part| part.to_lowercase())
            .collect();
        (prefixes, parts[first_page_part..].join(":"))
    }

    fn resolve_single(&self, prefix: &str, defaults: (&str, &str)) -> (String, String) {
        let family = self.sites.families().get(prefix).unwrap_or(defaults.0);
        let language = match self.sites.pseudo_languages().get(prefix) {
            Some(pseudo) => pseudo,
            None if self.sites.is_language(prefix) => prefix,
            None => defaults.1,
        };
        (family.to_string(), language.to_string())
    }

    fn resolve_pair(&self, target: &str, first: &str, second: &str) -> WikiResult<(String, String)> {
        let families = self.sites.families();
        let distinct: HashSet<&str> = [first, second].into_iter().collect();

        let family_count = distinct.iter().filter(|p| families.contains_key(p)).count();
        let language_count = distinct.iter().filter(|p| self.sites.is_language(p)).count();
        let ambiguous = distinct
            .iter()
            .any(|p| families.contains_key(p) && self.sites.is_language(p));

        if family_count != 1 || language_count != 1 || ambiguous {
            return Err(invalid(target, PrefixProblem::NotFamilyAndLanguage));
        }

        let (language_code, family_code) = if families.contains_key(second) {
            (first, second)
        } else {
            (second, first)
        };

        // `d:fr:` and friends: the family already implies its own subdomain
        if self.sites.pseudo_languages().contains_key(family_code) {
            return Err(invalid(target, PrefixProblem::PseudoLanguageFamily));
        }

        match families.get(family_code) {
            Some(family) => Ok((family.to_string(), language_code.to_string())),
            None => Err(invalid(target, PrefixProblem::NotFamilyAndLanguage)),
        }
    }
}

fn invalid(target: &str, problem: PrefixProblem) -> WikiError {
    WikiError::InvalidPrefixCombination {
        target: target.to_string(),
        problem,
    }
}
