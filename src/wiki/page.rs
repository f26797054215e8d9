// src/wiki/page.rs - Page URL assembly

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::ResolvedTarget;

/// Characters left alone when encoding a user-supplied page name
const SUBPAGE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Build `<base_url basepage subpage suffix>`.
///
/// `basepage` and `suffix` must already be URL-encoded; `subpage` comes from
/// the user and is percent-encoded here. The angle brackets stop chat clients
/// from unfurling a link preview.
pub fn page_url(base_url: &str, basepage: &str, subpage: &str, suffix: &str) -> String {
    format!(
        "<{}{}{}{}>",
        base_url,
        basepage,
        utf8_percent_encode(subpage, SUBPAGE),
        suffix
    )
}

/// [`page_url`] on the article path of a resolved wiki
pub fn wiki_page_url(target: &ResolvedTarget, basepage: &str, suffix: &str) -> String {
    page_url(&target.article_base(), basepage, &target.subpage, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subpage_is_percent_encoded() {
        assert_eq!(
            page_url("https://en.wikipedia.org/wiki/", "", "A B#C", ""),
            "<https://en.wikipedia.org/wiki/A%20B%23C>"
        );
    }

    #[test]
    fn test_basepage_and_suffix_are_literal() {
        assert_eq!(
            page_url(
                "https://en.wikipedia.org/wiki/",
                "Special:Contributions/",
                "Foo Bar",
                "?limit=500"
            ),
            "<https://en.wikipedia.org/wiki/Special:Contributions/Foo%20Bar?limit=500>"
        );
    }

    #[test]
    fn test_subpage_keeps_slashes_and_encodes_unicode() {
        assert_eq!(
            page_url("https://de.wikipedia.org/wiki/", "", "Benutzer:Jörg/Test", ""),
            "<https://de.wikipedia.org/wiki/Benutzer%3AJ%C3%B6rg/Test>"
        );
    }

    #[test]
    fn test_wiki_page_url_uses_resolved_host() {
        let target = ResolvedTarget {
            family: "wikisource".to_string(),
            language: "fr".to_string(),
            subpage: "Example".to_string(),
        };

        assert_eq!(
            wiki_page_url(&target, "User:", ""),
            "<https://fr.wikisource.org/wiki/User:Example>"
        );
    }
}
