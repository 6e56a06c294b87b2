//! Links the citations in a chapter.
//!
//! The chapter is read as a stream of XML events and written straight back
//! out. Text events inside `body` are scanned for citations, and any text
//! event that gains a link is replaced in place by its fragments. Every other
//! event is written through untouched.

use super::bibliography::BibliographyIndex;
use super::rewriter::{rewrite, Fragment};
use super::scanner::{is_excluded_parent, scan};
use crate::error::XrefError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use slog::{debug, trace};

/// The linked chapter and what happened along the way.
#[derive(Debug)]
pub struct LinkedChapter {
    pub document: String,
    pub citations_found: usize,
    pub links_created: usize,
    pub unmatched: Vec<String>,
}

/// Link every citation in `chapter`'s body against `index`.
///
/// `chapter` must already have had its entities protected. Fails with
/// [`XrefError::NoBody`] when there is no `body` element.
pub fn link_chapter(
    chapter: &str,
    index: &BibliographyIndex,
    link_class: &str,
) -> Result<LinkedChapter, XrefError> {
    debug!(slog_scope::logger(), "Starting chapter linking...");

    let mut reader = Reader::from_str(chapter);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(chapter.len()));

    // Local names of the open elements.
    let mut stack: Vec<String> = Vec::new();
    // Depth of the open `body`, if inside it.
    let mut body: Option<usize> = None;
    let mut found_body = false;

    let mut citations_found = 0;
    let mut links_created = 0;
    let mut unmatched = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if !found_body && name == "body" {
                    trace!(slog_scope::logger(), "Entering body");
                    found_body = true;
                    body = Some(stack.len());
                }
                stack.push(name);
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) => {
                if !found_body && local_name(&e) == "body" {
                    found_body = true;
                }
                writer.write_event(Event::Empty(e))?;
            }
            Event::End(e) => {
                stack.pop();
                if body == Some(stack.len()) {
                    trace!(slog_scope::logger(), "Leaving body");
                    body = None;
                }
                writer.write_event(Event::End(e))?;
            }
            Event::Text(e)
                if body.is_some()
                    && !stack.last().is_some_and(|parent| is_excluded_parent(parent)) =>
            {
                let text = std::str::from_utf8(&e)?;
                let matches = scan(text);
                if matches.is_empty() {
                    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
                    continue;
                }

                citations_found += matches.len();
                unmatched.extend(
                    matches
                        .iter()
                        .filter(|m| !index.contains_key(&m.key))
                        .map(|m| m.as_str(text).trim_end().to_string()),
                );

                for fragment in rewrite(text, &matches, index, link_class) {
                    match fragment {
                        Fragment::Text(t) => {
                            writer.write_event(Event::Text(BytesText::from_escaped(t)))?;
                        }
                        Fragment::Link(link) => {
                            trace!(
                                slog_scope::logger(),
                                "Linking {} to {}",
                                link.text,
                                link.href
                            );
                            let mut a = BytesStart::new("a");
                            a.push_attribute(("class", link.class));
                            a.push_attribute(("href", link.href.as_str()));
                            writer.write_event(Event::Start(a))?;
                            writer.write_event(Event::Text(BytesText::from_escaped(link.text)))?;
                            writer.write_event(Event::End(BytesEnd::new("a")))?;
                            links_created += 1;
                        }
                    }
                }
            }
            Event::Eof => break,
            e => writer.write_event(e)?,
        }
    }

    if !found_body {
        return Err(XrefError::NoBody);
    }

    let document = String::from_utf8(writer.into_inner()).map_err(|e| e.utf8_error())?;

    debug!(
        slog_scope::logger(),
        "Chapter linking complete: {} citations, {} links.", citations_found, links_created
    );
    Ok(LinkedChapter {
        document,
        citations_found,
        links_created,
        unmatched,
    })
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}
