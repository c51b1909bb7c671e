//! Errors reported by the tokenizer.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! Two disjoint kinds exist:
//! - [`ParseError`]: malformed markup. Never fatal; the tokenizer records it
//!   and continues with the recovery the standard defines.
//! - [`TokenizerError`]: the character source failed. Fatal for the run.

use core::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// A failure of the character source. These terminate tokenization.
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// The underlying reader failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying byte stream was not valid UTF-8.
    #[error("invalid UTF-8 in input at byte offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the first byte of the malformed sequence.
        offset: usize,
    },
}

/// Convenience alias used throughout the tokenizer.
pub type Result<T> = core::result::Result<T, TokenizerError>;

/// Position of a character in the (newline-normalized) input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Line number, starting with 1.
    pub line: usize,
    /// Column number, starting with 1.
    pub column: usize,
    /// Character offset, starting with 0.
    pub offset: usize,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// The tokenizer-level parse error codes. `Display` yields the standard code,
/// e.g. `ParseErrorKind::DuplicateAttribute` displays as `duplicate-attribute`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ParseErrorKind {
    /// `<!-->` or `<!--->`
    AbruptClosingOfEmptyComment,
    /// `>` inside a quoted DOCTYPE public identifier.
    AbruptDoctypePublicIdentifier,
    /// `>` inside a quoted DOCTYPE system identifier.
    AbruptDoctypeSystemIdentifier,
    /// `&#` or `&#x` not followed by a digit.
    AbsenceOfDigitsInNumericCharacterReference,
    /// `<![CDATA[` outside foreign content.
    CdataInHtmlContent,
    /// Numeric reference above U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// Numeric reference to a control character.
    ControlCharacterReference,
    /// An attribute name repeated on the same tag.
    DuplicateAttribute,
    /// An end tag carrying attributes.
    EndTagWithAttributes,
    /// An end tag with the self-closing flag.
    EndTagWithTrailingSolidus,
    /// End of input right after `<` or `</`.
    EofBeforeTagName,
    /// End of input inside a CDATA section.
    EofInCdata,
    /// End of input inside a comment.
    EofInComment,
    /// End of input inside a DOCTYPE.
    EofInDoctype,
    /// End of input inside an escaped `<!--` block of script data.
    EofInScriptHtmlCommentLikeText,
    /// End of input inside a tag.
    EofInTag,
    /// A comment closed by `--!>`.
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, `DOCTYPE` or `[CDATA[`.
    IncorrectlyOpenedComment,
    /// Garbage after the DOCTYPE name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by something that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `=` followed directly by `>`.
    MissingAttributeValue,
    /// `<!DOCTYPE>`
    MissingDoctypeName,
    /// `PUBLIC` without an identifier.
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` without an identifier.
    MissingDoctypeSystemIdentifier,
    /// `</>`
    MissingEndTagName,
    /// Unquoted DOCTYPE public identifier.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// Unquoted DOCTYPE system identifier.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// A character reference not terminated by `;`.
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"...`
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"...`
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`
    MissingWhitespaceBeforeDoctypeName,
    /// `a="1"b="2"`
    MissingWhitespaceBetweenAttributes,
    /// Public and system identifiers not separated by whitespace.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment.
    NestedComment,
    /// Numeric reference to a noncharacter.
    NoncharacterCharacterReference,
    /// `&#0;`
    NullCharacterReference,
    /// Numeric reference to a surrogate.
    SurrogateCharacterReference,
    /// Garbage after the DOCTYPE system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `=` where an attribute name should start.
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 in input.
    UnexpectedNullCharacter,
    /// `<?`
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` inside a tag not followed by `>`.
    UnexpectedSolidusInTag,
    /// `&name;` where `name` is not in the table.
    UnknownNamedCharacterReference,
}

/// A parse error together with where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// Which error.
    pub kind: ParseErrorKind,
    /// Location of the input character being processed when it was detected.
    pub location: Location,
}

impl ParseError {
    /// Create a parse error at the given location.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, location: Location) -> Self {
        Self { kind, location }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}
