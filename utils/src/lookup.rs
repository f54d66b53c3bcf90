use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::protocol::PLACEHOLDER;

// RFC 3986 unreserved characters stay as-is; everything else is escaped.
const WORD_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn encode_word(word: &str) -> String {
    utf8_percent_encode(word, WORD_ESCAPE).to_string()
}

/// Substitute the percent-encoded `word` into the template's placeholder.
pub fn build_lookup_url(template: &str, word: &str) -> String {
    template.replace(PLACEHOLDER, &encode_word(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn wiktionary_example() {
        let url = build_lookup_url("https://en.wiktionary.org/wiki/{word}", "data race");
        assert_eq!(url, "https://en.wiktionary.org/wiki/data%20race");
    }

    #[test]
    fn reserved_characters_survive_decoding() {
        let template = "https://example.org/q={word}&lang=en";
        for word in ["a&b", "x/y", "50% off", "what?#", "naïve café", "a+b=c"] {
            let url = build_lookup_url(template, word);
            let segment = url
                .strip_prefix("https://example.org/q=")
                .and_then(|s| s.strip_suffix("&lang=en"))
                .unwrap();
            assert!(!segment.contains('&') && !segment.contains('/'), "{segment}");
            let decoded = percent_decode_str(segment).decode_utf8().unwrap();
            assert_eq!(decoded, word);
        }
    }

    #[test]
    fn unreserved_characters_are_left_alone() {
        assert_eq!(encode_word("well-known_term.v2~"), "well-known_term.v2~");
    }
}
