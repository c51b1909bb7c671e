//! Named character reference lookup table.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)
//!
//! The full table of 2,231 names comes from `markup5ever`, which generates it
//! from the WHATWG `entities.json`. Besides every name (with and without the
//! trailing semicolon for the legacy ones), the generated map contains every
//! proper prefix of every name mapped to `(0, 0)`, which is what makes the
//! incremental longest-match walk in the resolver possible.

use markup5ever::data::NAMED_ENTITIES;

/// Outcome of looking up a candidate name (without the leading `&`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLookup {
    /// No name starts with the candidate.
    NotFound,
    /// The candidate is a proper prefix of some name but not a name itself.
    Prefix,
    /// The candidate is a complete name. Some names expand to two code points.
    Entity(char, Option<char>),
}

/// Look up `name` in the named character reference table.
///
/// # Example
/// ```
/// use h5_tokenizer::tokenizer::named_character_references::{lookup, NameLookup};
///
/// assert_eq!(lookup("amp;"), NameLookup::Entity('&', None));
/// assert_eq!(lookup("am"), NameLookup::Prefix);
/// assert_eq!(lookup("ampx"), NameLookup::NotFound);
/// ```
#[must_use]
pub fn lookup(name: &str) -> NameLookup {
    match NAMED_ENTITIES.get(name) {
        None => NameLookup::NotFound,
        Some(&(0, _)) => NameLookup::Prefix,
        Some(&(first, second)) => match char::from_u32(first) {
            Some(first) => NameLookup::Entity(first, char::from_u32(second).filter(|&c| c != '\0')),
            None => NameLookup::NotFound,
        },
    }
}

/// Look up a complete name and return its replacement text.
///
/// Returns `None` for unknown names and for bare prefixes.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<String> {
    match lookup(name) {
        NameLookup::Entity(first, second) => {
            let mut value = String::from(first);
            value.extend(second);
            Some(value)
        }
        NameLookup::NotFound | NameLookup::Prefix => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_names_without_semicolon() {
        assert_eq!(lookup_entity("amp"), Some("&".to_string()));
        assert_eq!(lookup_entity("not"), Some("\u{00AC}".to_string()));
        // Only the legacy set works without a semicolon
        assert_eq!(lookup_entity("hellip"), None);
        assert_eq!(lookup_entity("hellip;"), Some("\u{2026}".to_string()));
    }

    #[test]
    fn test_two_code_point_entities() {
        assert_eq!(lookup_entity("fjlig;"), Some("fj".to_string()));
        assert_eq!(lookup_entity("NotEqualTilde;"), Some("\u{2242}\u{0338}".to_string()));
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(lookup("notin"), NameLookup::Prefix);
        assert_eq!(lookup("not"), NameLookup::Entity('\u{00AC}', None));
        assert_eq!(lookup("zzz"), NameLookup::NotFound);
    }
}
