//! Protects character entities across the XML round trip.
//!
//! The chapter is parsed and re-serialized before it is written back out.
//! Entities such as `&nbsp;` are not known to an XML parser and others such as
//! `&amp;` may come back in a different form. Each entity is swapped for an
//! opaque placeholder before parsing and swapped back afterwards, so every
//! entity the rewrite does not touch survives byte for byte.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use slog::{debug, trace, warn};
use std::collections::HashMap;
use uuid::Uuid;

lazy_static! {
    /// Named, decimal, and hex character references.
    static ref ENTITY: Regex = Regex::new(r"&#?\w+;").unwrap();
    /// The placeholders produced by [`protect`].
    static ref PLACEHOLDER: Regex = Regex::new(r"__ENTITY_[0-9a-f]{32}__").unwrap();
}

/// Placeholders and the entity text each one stands for.
#[derive(Debug, Default)]
pub struct EntityMap {
    entities: HashMap<String, String>,
}

impl EntityMap {
    /// The number of protected entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The original entity text for a placeholder.
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entities.get(placeholder).map(String::as_str)
    }
}

/// Replace every entity in `raw` with a fresh placeholder.
pub fn protect(raw: &str) -> (String, EntityMap) {
    debug!(slog_scope::logger(), "Protecting entities...");
    let mut map = EntityMap::default();

    let protected = ENTITY
        .replace_all(raw, |caps: &Captures| {
            let placeholder = format!("__ENTITY_{}__", Uuid::new_v4().simple());
            trace!(
                slog_scope::logger(),
                "Protecting {} as {}",
                &caps[0],
                placeholder
            );
            map.entities.insert(placeholder.clone(), caps[0].to_string());
            placeholder
        })
        .into_owned();

    debug!(slog_scope::logger(), "{} entities protected.", map.len());
    (protected, map)
}

/// Put the original entities back in place of their placeholders.
///
/// Text that looks like a placeholder but is not in `map` is left alone.
pub fn restore(text: &str, map: &EntityMap) -> String {
    debug!(slog_scope::logger(), "Restoring entities...");
    if map.is_empty() {
        return text.to_string();
    }

    let mut restored = 0;
    let output = PLACEHOLDER
        .replace_all(text, |caps: &Captures| match map.get(&caps[0]) {
            Some(entity) => {
                restored += 1;
                entity.to_string()
            }
            None => caps[0].to_string(),
        })
        .into_owned();

    if restored != map.len() {
        warn!(
            slog_scope::logger(),
            "Restored {} entities but {} were protected",
            restored,
            map.len()
        );
    }
    debug!(slog_scope::logger(), "{} entities restored.", restored);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    mod protect {
        use super::*;

        #[test]
        fn replaces_every_entity() {
            let (protected, map) = protect("Smith &amp; Jones&#160;1999 &#x2014; &nbsp;");
            assert_eq!(map.len(), 4);
            assert!(!protected.contains('&'));
            assert_eq!(PLACEHOLDER.find_iter(&protected).count(), 4);
        }

        #[test]
        fn repeated_entities_get_distinct_placeholders() {
            let (protected, map) = protect("&amp;&amp;");
            assert_eq!(map.len(), 2);
            let placeholders: Vec<&str> =
                PLACEHOLDER.find_iter(&protected).map(|m| m.as_str()).collect();
            assert_ne!(placeholders[0], placeholders[1]);
        }

        #[test]
        fn bare_ampersand_is_untouched() {
            let (protected, map) = protect("Tom & Jerry; R&D");
            assert!(map.is_empty());
            assert_eq!(protected, "Tom & Jerry; R&D");
        }
    }

    mod restore {
        use super::*;

        #[test]
        fn round_trip() {
            let input = r#"<p title="a &quot;b&quot;">Smith&nbsp;1999 &amp; &#8212; &#xA0;</p>"#;
            let (protected, map) = protect(input);
            assert_ne!(protected, input);
            assert_eq!(restore(&protected, &map), input);
        }

        #[test]
        fn empty_map() {
            let (protected, map) = protect("<p>No entities here.</p>");
            assert!(map.is_empty());
            assert_eq!(restore(&protected, &map), "<p>No entities here.</p>");
        }

        #[test]
        fn unknown_placeholder_is_left_alone() {
            let (_, map) = protect("&amp;");
            let stray = "__ENTITY_0123456789abcdef0123456789abcdef__";
            assert_eq!(restore(stray, &map), stray);
        }
    }
}
