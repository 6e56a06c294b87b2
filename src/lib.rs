//! Contains the main citelink function. Loads the chapter and bibliography,
//! runs the cross-reference engine, and writes the results.

pub mod config;
pub mod error;
mod fs;
pub mod report;
pub mod xref;

use ansi_term::Color;
use config::{CitelinkConfig, Output};
use error::XrefError;
use fs::load_file;
use slog::{debug, o};
use std::path::Path;
use xref::XrefOptions;

/// The main citelink function.
///
/// Nothing is written unless the whole chapter was linked successfully.
pub fn citelink(config: CitelinkConfig) -> Result<(), XrefError> {
    eprintln!("{} Starting citelink...", Color::Green.paint("INFO"));

    let chapter_path = Path::new(config.chapter);
    let bibliography_path = Path::new(config.bibliography);

    // Load the chapter
    let chapter = slog_scope::scope(&slog_scope::logger().new(o!("fn" => "load_file()")), || {
        load_file(chapter_path)
    })?;

    // Load the bibliography
    let bibliography =
        slog_scope::scope(&slog_scope::logger().new(o!("fn" => "load_file()")), || {
            load_file(bibliography_path)
        })?;

    // Run the engine
    eprintln!("{} Cross-referencing...", Color::Green.paint("INFO"));
    let bib_filename = config.bib_filename();
    let options = XrefOptions {
        bib_filename: &bib_filename,
        link_class: config.link_config.link_class,
    };
    let result = slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "cross_reference()")),
        || xref::cross_reference(&chapter, &bibliography, &options),
    )?;

    eprintln!(
        "{} {} links created",
        Color::Green.paint("INFO"),
        result.report.links_created
    );

    // Serialize the report before writing anything
    let report = match config.report {
        Some(r) => Some((Path::new(r), result.report.to_json()?)),
        None => None,
    };

    match config.output {
        Output::StandardOut => print!("{}", result.document),
        Output::File(f) => fs::save_file(Path::new(f), &result.document)?,
    }

    if let Some((path, json)) = report {
        debug!(slog_scope::logger(), "Writing run report");
        fs::save_file(path, &json)?;
    }

    eprintln!("{} Done", Color::Green.paint("INFO"));
    Ok(())
}
