//! Builds the lookup table from the bibliography document.
//!
//! Each `<li id="...">` in the bibliography is one entry. The text of the
//! entry is searched for a year, everything before the year is treated as the
//! author text, and the first word of the author text (before any comma) is the
//! surname. The surname and year make up the entry's key.

use super::key::normalized_key;
use crate::error::{MalformedEntry, XrefError};
use lazy_static::lazy_static;
use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use slog::{debug, trace, warn};
use std::collections::HashMap;

lazy_static! {
    /// The author text and year of a bibliography entry.
    static ref ENTRY: Regex = Regex::new(r"^(.*?)\b(\d{4}\s*[a-z]?)\b").unwrap();
}

/// One linkable bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub id: String,
    pub source_filename: String,
}

/// A bibliography entry that could not be keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub id: String,
    pub reason: String,
}

/// Normalized keys mapped to their entries in document order.
#[derive(Debug, Default)]
pub struct BibliographyIndex {
    entries: HashMap<String, Vec<BibEntry>>,
    skipped: Vec<SkippedEntry>,
}

impl BibliographyIndex {
    /// The first entry in the bibliography with this key.
    ///
    /// Several entries can share a key. The earliest one always wins.
    pub fn first(&self, key: &str) -> Option<&BibEntry> {
        self.entries.get(key).and_then(|e| e.first())
    }

    /// All entries with this key, in document order.
    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&[BibEntry]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that had an id but could not be keyed.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    fn insert(&mut self, key: String, entry: BibEntry) {
        self.entries.entry(key).or_default().push(entry);
    }
}

/// An `li` with an id, collected while reading the bibliography.
struct Candidate {
    id: String,
    text: String,
}

/// Build the index for the bibliography `bib`.
///
/// `source_filename` is the name links will point at. Fails with
/// [`XrefError::EmptyBibliography`] when no entry produced a key.
pub fn build_index(bib: &str, source_filename: &str) -> Result<BibliographyIndex, XrefError> {
    debug!(slog_scope::logger(), "Starting bibliography indexing...");

    let candidates = collect_candidates(bib)?;
    debug!(
        slog_scope::logger(),
        "Found {} bibliography entries with ids",
        candidates.len()
    );

    let mut index = BibliographyIndex::default();
    for candidate in candidates {
        match entry_key(&candidate.text) {
            Ok(key) => {
                trace!(
                    slog_scope::logger(),
                    "Entry {} has key {}",
                    candidate.id,
                    key
                );
                index.insert(
                    key,
                    BibEntry {
                        id: candidate.id,
                        source_filename: source_filename.to_string(),
                    },
                );
            }
            Err(e) => {
                warn!(
                    slog_scope::logger(),
                    "Skipping bibliography entry {}: {}", candidate.id, e
                );
                index.skipped.push(SkippedEntry {
                    id: candidate.id,
                    reason: e.to_string(),
                });
            }
        }
    }

    if index.is_empty() {
        return Err(XrefError::EmptyBibliography);
    }

    debug!(
        slog_scope::logger(),
        "Bibliography indexed with {} keys.",
        index.len()
    );
    Ok(index)
}

/// The normalized key for one entry's text.
pub fn entry_key(text: &str) -> Result<String, MalformedEntry> {
    let text = text.trim();
    let caps = ENTRY.captures(text).ok_or(MalformedEntry::NoYear)?;
    let author = caps[1].trim();
    if author.is_empty() {
        return Err(MalformedEntry::EmptyAuthor);
    }

    let surname = author
        .split(',')
        .next()
        .and_then(|a| a.split_whitespace().next())
        .ok_or_else(|| MalformedEntry::NoSurname(author.to_string()))?;

    Ok(normalized_key(surname, &caps[2]))
}

/// Collect every `li` with an `id`, along with all of the text inside it.
///
/// Candidates come back in the order their start tags appear. Nested list
/// items each get their own candidate, and the outer item's text includes the
/// inner item's.
fn collect_candidates(bib: &str) -> Result<Vec<Candidate>, XrefError> {
    let mut reader = Reader::from_str(bib);
    reader.config_mut().trim_text(false);

    let mut candidates: Vec<Candidate> = Vec::new();
    // Candidates whose `li` is still open.
    let mut open: Vec<usize> = Vec::new();
    // For each open element, whether it pushed onto `open`.
    let mut frames: Vec<bool> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let collecting = match entry_id(&e) {
                    Some(id) => {
                        open.push(candidates.len());
                        candidates.push(Candidate {
                            id,
                            text: String::new(),
                        });
                        true
                    }
                    None => false,
                };
                frames.push(collecting);
            }
            Event::Empty(e) => {
                if let Some(id) = entry_id(&e) {
                    candidates.push(Candidate {
                        id,
                        text: String::new(),
                    });
                }
            }
            Event::End(_) => {
                if frames.pop() == Some(true) {
                    open.pop();
                }
            }
            Event::Text(e) => {
                let text = text_content(&e);
                for &i in &open {
                    candidates[i].text.push_str(&text);
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e);
                for &i in &open {
                    candidates[i].text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(candidates)
}

/// The `id` of an `li` element, if it is one and has one.
fn entry_id(e: &BytesStart) -> Option<String> {
    if e.local_name().as_ref() != b"li" {
        return None;
    }

    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"id")
        .map(|attr| match attr.unescape_value_with(resolve_entity) {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// Unescaped text, or the raw text when a character reference is malformed.
fn text_content(e: &BytesText) -> String {
    match e.unescape_with(resolve_entity) {
        Ok(t) => t.into_owned(),
        Err(_) => String::from_utf8_lossy(e).into_owned(),
    }
}

/// Resolve a named entity, XML's own first and then HTML's.
///
/// Names neither knows are dropped so that the rest of the text still gets
/// unescaped.
fn resolve_entity(name: &str) -> Option<&'static str> {
    resolve_predefined_entity(name)
        .or_else(|| resolve_html5_entity(name))
        .or_else(|| {
            trace!(slog_scope::logger(), "Dropping unknown entity &{};", name);
            Some("")
        })
}
