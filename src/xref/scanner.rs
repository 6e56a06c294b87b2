//! Finds in-text citations such as `Smith 1999` or `O'Brien 2001a`.

use super::key::normalized_key;
use lazy_static::lazy_static;
use regex::Regex;
use slog::trace;

lazy_static! {
    /// A capitalized word, whitespace, and a year with an optional letter.
    static ref CITATION: Regex =
        Regex::new(r"\b([A-Z][a-zA-Z']+)\s+(\d{4}\s*[a-z]?)\b").unwrap();
}

/// Elements whose text is never scanned.
///
/// Text inside a link is already linked, and script and style contents are
/// not prose.
const EXCLUDED_PARENTS: [&str; 3] = ["a", "script", "style"];

/// One citation found in a piece of text.
///
/// Offsets are byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMatch<'a> {
    pub start: usize,
    pub end: usize,
    pub author: &'a str,
    pub year: &'a str,
    pub year_start: usize,
    pub key: String,
}

impl<'a> CitationMatch<'a> {
    /// The full matched text, author through year.
    pub fn as_str(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Find every citation in `text`, left to right, without overlaps.
pub fn scan(text: &str) -> Vec<CitationMatch<'_>> {
    CITATION
        .captures_iter(text)
        .map(|caps| {
            let full = caps.get(0).unwrap();
            let author = caps.get(1).unwrap();
            let year = caps.get(2).unwrap();
            let key = normalized_key(author.as_str(), year.as_str());
            trace!(
                slog_scope::logger(),
                "Found citation {:?} with key {}",
                full.as_str(),
                key
            );
            CitationMatch {
                start: full.start(),
                end: full.end(),
                author: author.as_str(),
                year: year.as_str(),
                year_start: year.start(),
                key,
            }
        })
        .collect()
}

/// Whether text directly inside an element named `name` must be skipped.
///
/// XHTML element names are case-sensitive, so `<SCRIPT>` is not a script.
pub fn is_excluded_parent(name: &str) -> bool {
    EXCLUDED_PARENTS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod scan {
        use super::*;

        #[test]
        fn single_citation() {
            let text = "As argued by Smith 1999, the point stands.";
            let matches = scan(text);
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].author, "Smith");
            assert_eq!(matches[0].year, "1999");
            assert_eq!(matches[0].key, "smith1999");
            assert_eq!(matches[0].as_str(text), "Smith 1999");
            assert_eq!(&text[matches[0].year_start..matches[0].end], "1999");
        }

        #[test]
        fn several_citations_in_order() {
            let matches = scan("See Smith 1999a and O'Brien 2001; also Jones\n2003.");
            let keys: Vec<&str> = matches.iter().map(|m| m.key.as_str()).collect();
            assert_eq!(keys, vec!["smith1999a", "o'brien2001", "jones2003"]);
            assert!(matches.windows(2).all(|w| w[0].end <= w[1].start));
        }

        #[test]
        fn spaced_letter_suffix() {
            let matches = scan("Smith 1999 b.");
            assert_eq!(matches[0].year, "1999 b");
            assert_eq!(matches[0].key, "smith1999b");
        }

        #[test]
        fn no_citations() {
            assert!(scan("Nothing to see here, not even in 1999.").is_empty());
            assert!(scan("").is_empty());
        }

        #[test]
        fn lowercase_author_is_not_a_citation() {
            assert!(scan("smith 1999").is_empty());
        }

        #[test]
        fn five_digit_number_is_not_a_year() {
            assert!(scan("Route 19990").is_empty());
        }

        #[test]
        fn uppercase_suffix_is_not_part_of_year() {
            assert!(scan("Smith 1999A").is_empty());
        }

        #[test]
        fn author_must_start_a_word() {
            assert!(scan("macSmith 1999").is_empty());
        }
    }

    mod excluded {
        use super::*;

        #[test]
        fn links_scripts_and_styles() {
            assert!(is_excluded_parent("a"));
            assert!(is_excluded_parent("script"));
            assert!(is_excluded_parent("style"));
            assert!(!is_excluded_parent("STYLE"));
            assert!(!is_excluded_parent("p"));
            assert!(!is_excluded_parent("abbr"));
        }
    }
}
