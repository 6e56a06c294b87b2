//! Splits a text node into plain text and citation links.

use super::bibliography::BibliographyIndex;
use super::scanner::CitationMatch;
use slog::trace;

/// A piece of a rewritten text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Text copied verbatim from the original node.
    Text(&'a str),
    /// A new link to a bibliography entry.
    Link(Link<'a>),
}

/// A link from a citation's year to its bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<'a> {
    pub href: String,
    pub class: &'a str,
    pub text: &'a str,
}

/// Rewrite `text` so that every citation found in the index links its year.
///
/// `matches` must come from scanning `text`. Citations whose key is not in
/// the index are left as plain text. Everything that is not a link is copied
/// through exactly, including the whitespace between author and year, so
/// joining the fragments' text gives back `text`.
pub fn rewrite<'a>(
    text: &'a str,
    matches: &[CitationMatch<'a>],
    index: &BibliographyIndex,
    class: &'a str,
) -> Vec<Fragment<'a>> {
    let mut fragments = Vec::new();
    // Start of the text not yet pushed.
    let mut last = 0;

    for m in matches {
        let entry = match index.first(&m.key) {
            Some(e) => e,
            None => {
                trace!(slog_scope::logger(), "No entry for {}", m.key);
                continue;
            }
        };

        // The year can carry trailing whitespace; it stays outside the link.
        let year = m.year.trim_end();
        let year_end = m.year_start + year.len();

        if m.year_start > last {
            fragments.push(Fragment::Text(&text[last..m.year_start]));
        }
        fragments.push(Fragment::Link(Link {
            href: format!("{}#{}", entry.source_filename, entry.id),
            class,
            text: year,
        }));
        last = year_end;
    }

    if last < text.len() {
        fragments.push(Fragment::Text(&text[last..]));
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xref::bibliography::build_index;
    use crate::xref::scanner::scan;

    const BIB: &str = r#"<ol>
<li id="smith-a">Smith, J. (1999). First.</li>
<li id="smith-b">Smith, K. (1999). Second.</li>
<li id="smith-c">Smith, J. (1999a). Lettered.</li>
<li id="jones">Jones, A. 2003. Third.</li>
</ol>"#;

    fn run<'a>(text: &'a str, index: &BibliographyIndex) -> Vec<Fragment<'a>> {
        let matches = scan(text);
        rewrite(text, &matches, index, "xref")
    }

    fn plain_text(fragments: &[Fragment]) -> String {
        fragments
            .iter()
            .map(|f| match f {
                Fragment::Text(t) => *t,
                Fragment::Link(l) => l.text,
            })
            .collect()
    }

    #[test]
    fn no_matches_is_unchanged() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        let text = "Nothing cited here.";
        assert_eq!(run(text, &index), vec![Fragment::Text(text)]);
    }

    #[test]
    fn empty_text() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        assert!(run("", &index).is_empty());
    }

    #[test]
    fn single_link() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        let fragments = run("As Jones 2003 shows.", &index);
        assert_eq!(
            fragments,
            vec![
                Fragment::Text("As Jones "),
                Fragment::Link(Link {
                    href: "bib.xhtml#jones".to_string(),
                    class: "xref",
                    text: "2003",
                }),
                Fragment::Text(" shows."),
            ]
        );
    }

    #[test]
    fn first_entry_wins() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        for _ in 0..3 {
            let fragments = run("Smith 1999", &index);
            match &fragments[1] {
                Fragment::Link(l) => assert_eq!(l.href, "bib.xhtml#smith-a"),
                f => panic!("expected a link, got {:?}", f),
            }
        }
    }

    #[test]
    fn letter_suffix_does_not_cross_match() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        let fragments = run("Smith 1999a", &index);
        match &fragments[1] {
            Fragment::Link(l) => {
                assert_eq!(l.href, "bib.xhtml#smith-c");
                assert_eq!(l.text, "1999a");
            }
            f => panic!("expected a link, got {:?}", f),
        }
    }

    #[test]
    fn unknown_citation_is_left_alone() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        let text = "Brown 2010 and Jones 2003.";
        let fragments = run(text, &index);
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0], Fragment::Text("Brown 2010 and Jones "));
        assert_eq!(plain_text(&fragments), text);
    }

    #[test]
    fn whitespace_is_preserved() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        let text = "(Jones\n   2003 and Smith  1999 )";
        let fragments = run(text, &index);
        assert_eq!(plain_text(&fragments), text);
        let links: Vec<&str> = fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Link(l) => Some(l.text),
                Fragment::Text(_) => None,
            })
            .collect();
        assert_eq!(links, vec!["2003", "1999"]);
    }

    #[test]
    fn adjacent_citations() {
        let index = build_index(BIB, "bib.xhtml").unwrap();
        let fragments = run("Jones 2003 Smith 1999", &index);
        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[2], Fragment::Text(" Smith "));
    }
}
