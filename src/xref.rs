//! The cross-reference engine.
//!
//! Indexes the bibliography, protects the chapter's entities, links the
//! chapter's citations, and restores the entities. No I/O happens here; the
//! caller supplies both documents and decides what to do with the result.

mod bibliography;
mod chapter;
mod entities;
mod key;
mod rewriter;
mod scanner;

pub use bibliography::{build_index, BibEntry, BibliographyIndex, SkippedEntry};
pub use entities::{protect, restore, EntityMap};
pub use key::normalized_key;
pub use rewriter::{rewrite, Fragment, Link};
pub use scanner::{is_excluded_parent, scan, CitationMatch};

use crate::error::XrefError;
use crate::report::RunReport;
use slog::{debug, info, o};

/// The class given to generated links unless told otherwise.
pub const DEFAULT_LINK_CLASS: &str = "xref";

/// Options for one run of the engine.
#[derive(Debug, Clone, Copy)]
pub struct XrefOptions<'a> {
    /// The bibliography's file name, used as the target of every link.
    pub bib_filename: &'a str,
    /// The class attribute of every link.
    pub link_class: &'a str,
}

impl<'a> XrefOptions<'a> {
    pub fn new(bib_filename: &'a str) -> XrefOptions<'a> {
        XrefOptions {
            bib_filename,
            link_class: DEFAULT_LINK_CLASS,
        }
    }
}

/// A successfully linked chapter.
#[derive(Debug)]
pub struct CrossReference {
    pub document: String,
    pub report: RunReport,
}

/// Link the citations in `chapter` to the entries in `bibliography`.
///
/// Either the whole chapter comes back rewritten with every entity restored,
/// or an error comes back and nothing else.
pub fn cross_reference(
    chapter: &[u8],
    bibliography: &[u8],
    options: &XrefOptions,
) -> Result<CrossReference, XrefError> {
    debug!(slog_scope::logger(), "Starting cross-referencing...");

    let bibliography = std::str::from_utf8(bibliography)?;
    let chapter = std::str::from_utf8(chapter)?;

    // Index the bibliography
    let index = slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "build_index()")),
        || build_index(bibliography, options.bib_filename),
    )?;

    // Protect the chapter's entities
    let (protected, entity_map) =
        slog_scope::scope(&slog_scope::logger().new(o!("fn" => "protect()")), || {
            protect(chapter)
        });

    // Link the citations
    let linked = slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "link_chapter()")),
        || chapter::link_chapter(&protected, &index, options.link_class),
    )?;

    // Restore the entities
    let document = slog_scope::scope(&slog_scope::logger().new(o!("fn" => "restore()")), || {
        restore(&linked.document, &entity_map)
    });

    info!(
        slog_scope::logger(),
        "Cross-referencing complete: {} links created.", linked.links_created
    );

    let report = RunReport {
        bibliography: options.bib_filename.to_string(),
        keys: index.len(),
        skipped_entries: index.skipped().to_vec(),
        citations_found: linked.citations_found,
        links_created: linked.links_created,
        unmatched: linked.unmatched,
    };

    Ok(CrossReference { document, report })
}
