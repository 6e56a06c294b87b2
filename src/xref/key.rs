//! The normalized key that joins in-text citations to bibliography entries.

/// Build the lookup key for a surname and a year.
///
/// The surname is lowercased and every whitespace character is dropped from
/// the year, so `("Smith", "1999 a")` becomes `smith1999a`. Both the
/// bibliography side and the citation side must go through this function or
/// their keys will not line up.
pub fn normalized_key(surname: &str, year: &str) -> String {
    let mut key = surname.to_lowercase();
    key.extend(year.chars().filter(|c| !c.is_whitespace()));
    key
}
