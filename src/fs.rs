//! Functions for interacting with the file system.

use crate::error::XrefError;
use ansi_term::Color;
use slog::debug;
use std::{fs, path::Path};

/// Load a file into bytes.
///
/// This function is used to load both the chapter and the bibliography, which
/// are then handed to the engine as they are.
pub fn load_file(path: &Path) -> Result<Vec<u8>, XrefError> {
    debug!(
        slog_scope::logger(),
        "Loading file {}...",
        path.to_string_lossy()
    );

    match fs::read(path) {
        Ok(r) => {
            debug!(
                slog_scope::logger(),
                "File {} loaded.",
                path.to_string_lossy()
            );
            Ok(r)
        }
        Err(e) => Err(XrefError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Save a string in a file.
///
/// Used for the linked chapter and for the run report.
pub fn save_file(path: &Path, output: &str) -> Result<(), XrefError> {
    debug!(slog_scope::logger(), "Saving {}...", path.to_string_lossy());
    eprintln!(
        "{} Saving {}...",
        Color::Green.paint("INFO"),
        Color::Blue.paint(path.to_string_lossy())
    );

    match fs::write(path, output) {
        Ok(_) => {
            debug!(
                slog_scope::logger(),
                "File {} saved.",
                path.to_string_lossy()
            );
            Ok(())
        }
        Err(e) => Err(XrefError::Write {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
