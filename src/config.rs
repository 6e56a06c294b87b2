//! The structures for configuration. Must be accessible to main.

use crate::xref::DEFAULT_LINK_CLASS;
use std::path::Path;

/// The overall options.
pub struct CitelinkConfig<'a> {
    pub chapter: &'a str,
    pub bibliography: &'a str,
    pub output: Output<'a>,
    pub link_config: LinkConfig<'a>,
    pub report: Option<&'a str>,
}

impl CitelinkConfig<'_> {
    pub fn new<'a>(
        chapter: &'a str,
        bibliography: &'a str,
        output: Output<'a>,
        link_config: LinkConfig<'a>,
        report: Option<&'a str>,
    ) -> CitelinkConfig<'a> {
        CitelinkConfig {
            chapter,
            bibliography,
            output,
            link_config,
            report,
        }
    }

    /// The file name links will point at.
    ///
    /// Uses the override if there is one, otherwise the bibliography's file
    /// name without its directory.
    pub fn bib_filename(&self) -> String {
        match self.link_config.bib_name {
            Some(name) => name.to_string(),
            None => Path::new(self.bibliography)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.bibliography.to_string()),
        }
    }
}

/// Output options
#[derive(PartialEq, Eq, Debug)]
pub enum Output<'a> {
    StandardOut,
    File(&'a str),
}

/// Link configuration.
pub struct LinkConfig<'a> {
    pub bib_name: Option<&'a str>,
    pub link_class: &'a str,
}

impl LinkConfig<'_> {
    pub fn new<'a>(bib_name: Option<&'a str>, link_class: Option<&'a str>) -> LinkConfig<'a> {
        LinkConfig {
            bib_name,
            link_class: link_class.unwrap_or(DEFAULT_LINK_CLASS),
        }
    }
}
