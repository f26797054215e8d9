// src/wiki/sites.rs - Wiki families, language codes and pseudo-languages

use log::debug;
use std::collections::HashSet;

use super::{AliasDict, WikiResult};

/// Language subdomains that host a wiki.
const WIKI_LANGUAGES: &[&str] = &[
    "aa", "ab", "ace", "ady", "af", "ak", "als", "alt", "am", "an", "ang", "ar",
    "arc", "ary", "arz", "as", "ast", "atj", "av", "avk", "awa", "ay", "az", "azb",
    "ba", "ban", "bar", "bat-smg", "bcl", "be", "be-tarask", "be-x-old", "bg",
    "bh", "bi", "bjn", "bm", "bn", "bo", "bpy", "br", "bs", "bug", "bxr", "ca",
    "cbk-zam", "cdo", "ce", "ceb", "ch", "cho", "chr", "chy", "ckb", "co", "cr",
    "crh", "cs", "csb", "cu", "cv", "cy", "da", "dag", "de", "din", "diq", "dsb",
    "dty", "dv", "dz", "ee", "el", "eml", "en", "eo", "es", "et", "eu", "ext",
    "fa", "ff", "fi", "fiu-vro", "fj", "fo", "fr", "frp", "frr", "fur", "fy", "ga",
    "gag", "gan", "gcr", "gd", "gl", "glk", "gn", "gom", "gor", "got", "gu", "gv",
    "ha", "hak", "haw", "he", "hi", "hif", "ho", "hr", "hsb", "ht", "hu", "hy",
    "hyw", "hz", "ia", "id", "ie", "ig", "ii", "ik", "ilo", "inh", "io", "is",
    "it", "iu", "ja", "jam", "jbo", "jv", "ka", "kaa", "kab", "kbd", "kbp", "kg",
    "ki", "kj", "kk", "kl", "km", "kn", "ko", "koi", "kr", "krc", "ks", "ksh",
    "ku", "kv", "kw", "ky", "la", "lad", "lb", "lbe", "lez", "lfn", "lg", "li",
    "lij", "lld", "lmo", "ln", "lo", "lrc", "lt", "ltg", "lv", "mad", "mai",
    "map-bms", "mdf", "mg", "mh", "mhr", "mi", "min", "mk", "ml", "mn", "mni",
    "mnw", "mo", "mr", "mrj", "ms", "mt", "mus", "mwl", "my", "myv", "mzn", "na",
    "nah", "nap", "nds", "nds-nl", "ne", "new", "ng", "nia", "nl", "nn", "no",
    "nov", "nqo", "nrm", "nso", "nv", "ny", "oc", "olo", "om", "or", "os", "pa",
    "pag", "pam", "pap", "pcd", "pdc", "pfl", "pi", "pih", "pl", "pms", "pnb",
    "pnt", "ps", "pt", "qu", "rm", "rmy", "rn", "ro", "roa-rup", "roa-tara", "ru",
    "rue", "rw", "sa", "sah", "sat", "sc", "scn", "sco", "sd", "se", "sg", "sh",
    "shi", "shn", "shy", "si", "simple", "sk", "skr", "sl", "sm", "smn", "sn",
    "so", "sq", "sr", "srn", "ss", "st", "stq", "su", "sv", "sw", "szl", "szy",
    "ta", "tay", "tcy", "te", "tet", "tg", "th", "ti", "tk", "tl", "tn", "to",
    "tpi", "tr", "trv", "ts", "tt", "tum", "tw", "ty", "tyv", "udm", "ug", "uk",
    "ur", "uz", "ve", "vec", "vep", "vi", "vls", "vo", "wa", "war", "wo", "wuu",
    "xal", "xh", "xmf", "yi", "yo", "yue", "za", "zea", "zh", "zh-classical",
    "zh-min-nan", "zh-yue", "zu",];

/// The static prefix tables every target is resolved against.
#[derive(Debug, Clone)]
pub struct WikiSites {
    families: AliasDict,
    pseudo_languages: AliasDict,
    languages: HashSet<&'static str>,
    valid_prefixes: HashSet<String>,
}

impl WikiSites {
    /// Build the Wikimedia family and pseudo-language tables
    pub fn standard() -> WikiResult<Self> {
        let families = AliasDict::builder()
            .alias(&["w", "testwiki", "test2wiki", "nost", "nostalgia"], "wikipedia")
            .alias(&["wikt"], "wiktionary")
            .alias(&["b"], "wikibooks")
            .alias(&["d", "testwikidata"], "wikidata")
            .alias(&["n"], "wikinews")
            .alias(&["q"], "wikiquote")
            .alias(&["s"], "wikisource")
            .alias(&["species"], "wikispecies")
            .alias(&["v"], "wikiversity")
            .alias(&["voy"], "wikivoyage")
            .alias_only(
                &["c", "commons", "login", "m", "meta", "metawiki", "incubator"],
                "wikimedia",
            )
            .alias(&["mw"], "mediawiki")
            .build()?;

        let pseudo_languages = AliasDict::builder()
            .alias(&["c"], "commons")
            .alias(&["m", "metawiki"], "meta")
            .alias(&["nost"], "nostalgia")
            .alias_only(&["d", "wikidata", "mw", "mediawiki", "species", "wikispecies"], "www")
            .alias_only(&["testwiki", "testwikidata"], "test")
            .alias_only(&["test2wiki"], "test2")
            .unaliased("login")
            .unaliased("incubator")
            .build()?;

        Ok(Self::from_tables(families, pseudo_languages, WIKI_LANGUAGES))
    }

    pub fn from_tables(
        families: AliasDict,
        pseudo_languages: AliasDict,
        languages: &[&'static str],
    ) -> Self {
        let languages: HashSet<&'static str> = languages.iter().copied().collect();
        let valid_prefixes: HashSet<String> = families
            .keys()
            .chain(pseudo_languages.keys())
            .chain(languages.iter().copied())
            .map(str::to_string)
            .collect();

        debug!(
            "Loaded {} families, {} pseudo-languages, {} languages",
            families.len(),
            pseudo_languages.len(),
            languages.len()
        );

        Self {
            families,
            pseudo_languages,
            languages,
            valid_prefixes,
        }
    }

    pub fn families(&self) -> &AliasDict {
        &self.families
    }

    pub fn pseudo_languages(&self) -> &AliasDict {
        &self.pseudo_languages
    }

    pub fn is_language(&self, code: &str) -> bool {
        self.languages.contains(code)
    }

    /// Whether `code` (already lowercased) is a family, language or pseudo-language prefix
    pub fn is_valid_prefix(&self, code: &str) -> bool {
        self.valid_prefixes.contains(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_build() {
        let sites = WikiSites::standard().unwrap();

        assert_eq!(sites.families().get("s"), Some("wikisource"));
        assert_eq!(sites.families().get("commons"), Some("wikimedia"));
        assert_eq!(sites.pseudo_languages().get("d"), Some("www"));
        assert_eq!(sites.pseudo_languages().get("incubator"), Some("incubator"));
        assert!(sites.is_language("fr"));
        assert!(!sites.is_language("s"));
    }

    #[test]
    fn test_valid_prefixes_cover_all_tables() {
        let sites = WikiSites::standard().unwrap();

        for code in ["w", "wikipedia", "meta", "fr", "zh-min-nan", "wikidata", "mediawiki"] {
            assert!(sites.is_valid_prefix(code), "{} should be a prefix", code);
        }
        for code in ["user", "talk", "special", "www", "wikimedia"] {
            assert!(!sites.is_valid_prefix(code), "{} should not be a prefix", code);
        }
    }

    #[test]
    fn test_no_code_is_both_family_and_language() {
        let sites = WikiSites::standard().unwrap();

        for key in sites.families().keys() {
            assert!(!sites.is_language(key), "{} is ambiguous", key);
        }
    }
}
