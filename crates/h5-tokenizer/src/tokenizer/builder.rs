//! Scratch state for the token currently being built.
//!
//! The state machine never edits an emitted [`Token`]; it mutates a
//! [`TokenBuilder`] and asks it to [`emit`](TokenBuilder::emit) once the
//! token is complete. Emitting or discarding resets every field.

use core::mem;

use super::error::ParseErrorKind;
use super::token::{Attribute, Token};

/// Which kind of token is under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    StartTag,
    EndTag,
    Comment,
    Doctype,
}

/// Accumulates the in-progress tag, comment or DOCTYPE token.
#[derive(Debug, Default)]
pub struct TokenBuilder {
    kind: Option<PendingKind>,

    tag_name: String,
    self_closing: bool,
    attributes: Vec<Attribute>,
    current_attribute: Option<Attribute>,

    comment: String,

    doctype_name: Option<String>,
    public_identifier: Option<String>,
    system_identifier: Option<String>,
    force_quirks: bool,
}

impl TokenBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a token is under construction.
    #[must_use]
    pub const fn is_building(&self) -> bool {
        self.kind.is_some()
    }

    /// "Create a new start tag token, set its tag name to the empty string."
    pub fn begin_start_tag(&mut self) {
        self.discard();
        self.kind = Some(PendingKind::StartTag);
    }

    /// "Create a new end tag token, set its tag name to the empty string."
    pub fn begin_end_tag(&mut self) {
        self.discard();
        self.kind = Some(PendingKind::EndTag);
    }

    /// "Append the current input character to the current tag token's tag name."
    pub fn append_to_tag_name(&mut self, c: char) {
        self.tag_name.push(c);
    }

    /// The tag name accumulated so far.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// True if the token under construction is an end tag.
    #[must_use]
    pub fn is_end_tag(&self) -> bool {
        self.kind == Some(PendingKind::EndTag)
    }

    /// "Set the self-closing flag of the current tag token."
    pub fn set_self_closing(&mut self) {
        self.self_closing = true;
    }

    /// "Start a new attribute in the current tag token. Set that attribute's
    /// name and value to the empty string."
    ///
    /// Any attribute still open is finalized first; its duplicate error, if
    /// any, is returned.
    pub fn begin_attribute(&mut self) -> Option<ParseErrorKind> {
        let error = self.finalize_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
        error
    }

    /// "Append the current input character to the current attribute's name."
    pub fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.name.push(c);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.value.push(c);
        }
    }

    /// Append a decoded character reference to the current attribute's value.
    pub fn append_str_to_attribute_value(&mut self, s: &str) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.value.push_str(s);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    pub fn finalize_attribute(&mut self) -> Option<ParseErrorKind> {
        let attr = self.current_attribute.take()?;
        if self.attributes.iter().any(|existing| existing.name == attr.name) {
            return Some(ParseErrorKind::DuplicateAttribute);
        }
        self.attributes.push(attr);
        None
    }

    /// "Create a comment token whose data is the empty string."
    pub fn begin_comment(&mut self) {
        self.discard();
        self.kind = Some(PendingKind::Comment);
    }

    /// "Append the current input character to the comment token's data."
    pub fn append_to_comment(&mut self, c: char) {
        self.comment.push(c);
    }

    /// Append several characters to the comment token's data.
    pub fn append_str_to_comment(&mut self, s: &str) {
        self.comment.push_str(s);
    }

    /// "Create a new DOCTYPE token." Name and identifiers start out missing.
    pub fn begin_doctype(&mut self) {
        self.discard();
        self.kind = Some(PendingKind::Doctype);
    }

    /// "Append the current input character to the current DOCTYPE token's name."
    ///
    /// The first call turns a missing name into a present one.
    pub fn append_to_doctype_name(&mut self, c: char) {
        self.doctype_name.get_or_insert_with(String::new).push(c);
    }

    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing)"
    pub fn begin_public_identifier(&mut self) {
        self.public_identifier = Some(String::new());
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// public identifier."
    pub fn append_to_public_identifier(&mut self, c: char) {
        self.public_identifier.get_or_insert_with(String::new).push(c);
    }

    /// "Set the current DOCTYPE token's system identifier to the empty string
    /// (not missing)"
    pub fn begin_system_identifier(&mut self) {
        self.system_identifier = Some(String::new());
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// system identifier."
    pub fn append_to_system_identifier(&mut self, c: char) {
        self.system_identifier.get_or_insert_with(String::new).push(c);
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    pub fn set_force_quirks(&mut self) {
        self.force_quirks = true;
    }

    /// Drop whatever is under construction.
    pub fn discard(&mut self) {
        *self = Self::default();
    }

    /// Finish the token under construction and reset the builder.
    ///
    /// Returns `None` when nothing was being built. The accompanying list holds
    /// parse errors detected while finalizing: a duplicate attribute left open,
    /// and attributes or a trailing solidus on an end tag.
    pub fn emit(&mut self) -> Option<(Token, Vec<ParseErrorKind>)> {
        let mut errors = Vec::new();
        if let Some(error) = self.finalize_attribute() {
            errors.push(error);
        }

        let built = mem::take(self);
        let token = match built.kind? {
            PendingKind::StartTag => Token::StartTag {
                name: built.tag_name,
                attributes: built.attributes,
                self_closing: built.self_closing,
            },
            PendingKind::EndTag => {
                // "When an end tag token is emitted with attributes, that is
                // an end-tag-with-attributes parse error."
                if !built.attributes.is_empty() {
                    errors.push(ParseErrorKind::EndTagWithAttributes);
                }
                if built.self_closing {
                    errors.push(ParseErrorKind::EndTagWithTrailingSolidus);
                }
                Token::EndTag {
                    name: built.tag_name,
                }
            }
            PendingKind::Comment => Token::Comment {
                data: built.comment,
            },
            PendingKind::Doctype => Token::Doctype {
                name: built.doctype_name,
                public_identifier: built.public_identifier,
                system_identifier: built.system_identifier,
                force_quirks: built.force_quirks,
            },
        };
        Some((token, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_attribute(builder: &mut TokenBuilder, name: &str, value: &str) -> Option<ParseErrorKind> {
        let error = builder.begin_attribute();
        name.chars().for_each(|c| builder.append_to_attribute_name(c));
        value.chars().for_each(|c| builder.append_to_attribute_value(c));
        error
    }

    #[test]
    fn test_emit_resets_state() {
        let mut builder = TokenBuilder::new();
        builder.begin_start_tag();
        "div".chars().for_each(|c| builder.append_to_tag_name(c));
        let _ = push_attribute(&mut builder, "id", "main");

        let (token, errors) = builder.emit().unwrap();
        assert!(errors.is_empty());
        assert_eq!(token.attribute("id"), Some("main"));
        assert!(!builder.is_building());
        assert!(builder.emit().is_none());
    }

    #[test]
    fn test_first_duplicate_attribute_wins() {
        let mut builder = TokenBuilder::new();
        builder.begin_start_tag();
        builder.append_to_tag_name('a');
        assert_eq!(push_attribute(&mut builder, "x", "1"), None);
        assert_eq!(push_attribute(&mut builder, "x", "2"), None);
        assert_eq!(
            builder.finalize_attribute(),
            Some(ParseErrorKind::DuplicateAttribute)
        );

        let (token, errors) = builder.emit().unwrap();
        assert!(errors.is_empty());
        match token {
            Token::StartTag { attributes, .. } => {
                assert_eq!(attributes, vec![Attribute::new("x", "1")]);
            }
            _ => panic!("Expected StartTag token"),
        }
    }

    #[test]
    fn test_duplicate_reported_at_emit() {
        let mut builder = TokenBuilder::new();
        builder.begin_start_tag();
        let _ = push_attribute(&mut builder, "x", "1");
        let _ = push_attribute(&mut builder, "x", "2");
        let (_, errors) = builder.emit().unwrap();
        assert_eq!(errors, vec![ParseErrorKind::DuplicateAttribute]);
    }

    #[test]
    fn test_end_tag_drops_attributes_and_solidus() {
        let mut builder = TokenBuilder::new();
        builder.begin_end_tag();
        builder.append_to_tag_name('p');
        let _ = push_attribute(&mut builder, "class", "x");
        builder.set_self_closing();

        let (token, errors) = builder.emit().unwrap();
        assert_eq!(token, Token::end_tag("p"));
        assert_eq!(
            errors,
            vec![
                ParseErrorKind::EndTagWithAttributes,
                ParseErrorKind::EndTagWithTrailingSolidus
            ]
        );
    }

    #[test]
    fn test_doctype_missing_versus_empty() {
        let mut builder = TokenBuilder::new();
        builder.begin_doctype();
        builder.begin_public_identifier();
        let (token, _) = builder.emit().unwrap();
        assert_eq!(
            token,
            Token::Doctype {
                name: None,
                public_identifier: Some(String::new()),
                system_identifier: None,
                force_quirks: false,
            }
        );
    }

    #[test]
    fn test_discard() {
        let mut builder = TokenBuilder::new();
        builder.begin_comment();
        builder.append_str_to_comment("partial");
        builder.discard();
        assert!(builder.emit().is_none());
    }
}
