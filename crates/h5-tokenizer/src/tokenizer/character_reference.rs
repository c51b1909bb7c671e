//! Character reference resolution.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The resolver looks at the characters following an `&` through
//! [`Lookahead`] only and reports how many of them form the reference. The
//! caller consumes exactly that many, so a reference split across input
//! chunks resolves the same way as one that arrived at once.

use markup5ever::data::C1_REPLACEMENTS;

use super::error::{ParseErrorKind, Result};
use super::input::Lookahead;
use super::named_character_references::{NameLookup, lookup};

/// Where the reference appears, which changes the historical handling of
/// names without a trailing semicolon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharRefContext {
    /// Text content.
    Text,
    /// An attribute value.
    Attribute,
}

/// What the characters after an `&` turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A valid reference. `consumed` counts characters after the `&`,
    /// including the `;` when present.
    Decoded {
        /// Replacement text, one or two code points.
        value: String,
        /// Number of characters that make up the reference.
        consumed: usize,
        /// Parse errors found while decoding.
        errors: Vec<ParseErrorKind>,
    },
    /// A legacy name inside an attribute value, followed by `=` or an
    /// alphanumeric. The `&` and the `consumed` characters stay as written.
    Verbatim {
        /// Number of characters kept verbatim after the `&`.
        consumed: usize,
    },
    /// An alphanumeric run that matches no name. The caller continues in the
    /// ambiguous ampersand state.
    NotNamed,
    /// Not a reference at all. The `&` is literal and nothing after it is
    /// consumed.
    NotAReference {
        /// `absence-of-digits-in-numeric-character-reference` for `&#` and
        /// `&#x` without digits.
        error: Option<ParseErrorKind>,
    },
}

/// Resolve the reference that follows an `&`.
///
/// `input` must be positioned just after the `&`. Nothing is consumed.
///
/// # Errors
///
/// Propagates host errors from the lookahead source.
pub fn resolve(input: &mut impl Lookahead, context: CharRefContext) -> Result<Resolution> {
    // [§ 13.2.5.72 Character reference state]
    match input.peek_nth(0)? {
        // "ASCII alphanumeric: Reconsume in the named character reference state."
        Some(c) if c.is_ascii_alphanumeric() => resolve_named(input, context),
        // "U+0023 NUMBER SIGN (#): Append the current input character to the
        // temporary buffer. Switch to the numeric character reference state."
        Some('#') => resolve_numeric(input),
        // "Anything else: Flush code points consumed as a character reference.
        // Reconsume in the return state."
        _ => Ok(Resolution::NotAReference { error: None }),
    }
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the named character references
/// table."
fn resolve_named(input: &mut impl Lookahead, context: CharRefContext) -> Result<Resolution> {
    let mut candidate = String::new();
    let mut longest: Option<(usize, char, Option<char>)> = None;

    while let Some(c) = input.peek_nth(candidate.len())? {
        candidate.push(c);
        match lookup(&candidate) {
            NameLookup::NotFound => break,
            NameLookup::Prefix => {}
            NameLookup::Entity(first, second) => longest = Some((candidate.len(), first, second)),
        }
    }

    let Some((consumed, first, second)) = longest else {
        // "Otherwise: Flush code points consumed as a character reference.
        // Switch to the ambiguous ampersand state."
        return Ok(Resolution::NotNamed);
    };

    // Names are ASCII, so byte length equals character count.
    let ends_with_semicolon = candidate.as_bytes()[consumed - 1] == b';';

    if !ends_with_semicolon && context == CharRefContext::Attribute {
        // "If the character reference was consumed as part of an attribute,
        // and the last character matched is not a U+003B SEMICOLON character
        // (;), and the next input character is either a U+003D EQUALS SIGN
        // character (=) or an ASCII alphanumeric, then, for historical
        // reasons, flush code points consumed as a character reference and
        // switch to the return state."
        let next = input.peek_nth(consumed)?;
        if next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
            return Ok(Resolution::Verbatim { consumed });
        }
    }

    let mut errors = Vec::new();
    if !ends_with_semicolon {
        // "If the last character matched is not a U+003B SEMICOLON character
        // (;), then this is a missing-semicolon-after-character-reference
        // parse error."
        errors.push(ParseErrorKind::MissingSemicolonAfterCharacterReference);
    }

    let mut value = String::from(first);
    value.extend(second);
    Ok(Resolution::Decoded {
        value,
        consumed,
        errors,
    })
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
/// through [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
fn resolve_numeric(input: &mut impl Lookahead) -> Result<Resolution> {
    // "U+0078 LATIN SMALL LETTER X / U+0058 LATIN CAPITAL LETTER X: Append the
    // current input character to the temporary buffer. Switch to the
    // hexadecimal character reference start state."
    let (radix, digits_start) = match input.peek_nth(1)? {
        Some('x' | 'X') => (16, 2),
        _ => (10, 1),
    };

    let mut position = digits_start;
    // Saturates above the Unicode range; only "too large" matters past that.
    let mut code: u32 = 0;
    while let Some(digit) = input.peek_nth(position)?.and_then(|c| c.to_digit(radix)) {
        code = code.saturating_mul(radix).saturating_add(digit);
        position += 1;
    }

    if position == digits_start {
        // "Anything else: This is an absence-of-digits-in-numeric-character-reference
        // parse error. Flush code points consumed as a character reference.
        // Reconsume in the return state."
        return Ok(Resolution::NotAReference {
            error: Some(ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference),
        });
    }

    let mut errors = Vec::new();
    if input.peek_nth(position)? == Some(';') {
        position += 1;
    } else {
        // "Anything else: This is a missing-semicolon-after-character-reference
        // parse error. Reconsume in the numeric character reference end state."
        errors.push(ParseErrorKind::MissingSemicolonAfterCharacterReference);
    }

    let (c, error) = numeric_reference_value(code);
    errors.extend(error);
    Ok(Resolution::Decoded {
        value: String::from(c),
        consumed: position,
        errors,
    })
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Map a character reference code to the character it produces, plus the
/// parse error it raises, if any.
#[must_use]
pub fn numeric_reference_value(code: u32) -> (char, Option<ParseErrorKind>) {
    const REPLACEMENT: char = '\u{FFFD}';

    // "If the number is 0x00, then this is a null-character-reference parse
    // error. Set the character reference code to 0xFFFD."
    if code == 0 {
        return (REPLACEMENT, Some(ParseErrorKind::NullCharacterReference));
    }

    // "If the number is greater than 0x10FFFF, then this is a
    // character-reference-outside-unicode-range parse error."
    if code > 0x0010_FFFF {
        return (
            REPLACEMENT,
            Some(ParseErrorKind::CharacterReferenceOutsideUnicodeRange),
        );
    }

    // "If the number is a surrogate, then this is a
    // surrogate-character-reference parse error."
    let Some(c) = char::from_u32(code) else {
        return (REPLACEMENT, Some(ParseErrorKind::SurrogateCharacterReference));
    };

    // "If the number is a noncharacter, then this is a
    // noncharacter-character-reference parse error."
    if is_noncharacter(code) {
        return (c, Some(ParseErrorKind::NoncharacterCharacterReference));
    }

    // "If the number is 0x0D, or a control that's not ASCII whitespace, then
    // this is a control-character-reference parse error. If the number is one
    // of the numbers in the first column of the following table, then find
    // the row with that number in the first column, and set the character
    // reference code to the number in the second column of that row."
    if code == 0x0D || (is_control(code) && !c.is_ascii_whitespace()) {
        let replaced = match code {
            0x80..=0x9F => C1_REPLACEMENTS[(code - 0x80) as usize].unwrap_or(c),
            _ => c,
        };
        return (replaced, Some(ParseErrorKind::ControlCharacterReference));
    }

    (c, None)
}

/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code & 0xFFFE) == 0xFFFE
}

/// "A control is a C0 control or a code point in the range U+007F DELETE to
/// U+009F APPLICATION PROGRAM COMMAND, inclusive."
const fn is_control(code: u32) -> bool {
    matches!(code, 0x00..=0x1F | 0x7F..=0x9F)
}

/// Decode every character reference in `text` the way the tokenizer would
/// inside text content or an attribute value.
///
/// Unlike the tokenizer this does not report parse errors; malformed
/// references are kept as written.
///
/// # Example
/// ```
/// use h5_tokenizer::tokenizer::character_reference::{CharRefContext, decode_character_references};
///
/// assert_eq!(decode_character_references("a &amp; b", CharRefContext::Text), "a & b");
/// assert_eq!(decode_character_references("?a=1&not=2", CharRefContext::Attribute), "?a=1&not=2");
/// ```
#[must_use]
pub fn decode_character_references(text: &str, context: CharRefContext) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..=amp]);
        rest = &rest[amp + 1..];

        let mut lookahead = rest;
        let consumed = match resolve(&mut lookahead, context) {
            Ok(Resolution::Decoded {
                value, consumed, ..
            }) => {
                let _ = out.pop();
                out.push_str(&value);
                consumed
            }
            Ok(Resolution::Verbatim { consumed }) => {
                out.push_str(&rest[..byte_len(rest, consumed)]);
                consumed
            }
            Ok(Resolution::NotNamed | Resolution::NotAReference { .. }) | Err(_) => 0,
        };
        rest = &rest[byte_len(rest, consumed)..];
    }

    out.push_str(rest);
    out
}

/// Byte length of the first `chars` characters of `s`.
fn byte_len(s: &str, chars: usize) -> usize {
    s.chars().take(chars).map(char::len_utf8).sum()
}
