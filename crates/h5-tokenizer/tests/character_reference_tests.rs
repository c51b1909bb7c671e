//! Tests for character reference handling in text and attribute values.

use h5_tokenizer::{
    CharRefContext, ParseErrorKind, Resolution, Token, decode_character_references, resolve,
    tokenize,
};

/// Tokenize and return the text of the first token plus the error kinds
fn first_text(input: &str) -> (String, Vec<ParseErrorKind>) {
    let (tokens, errors) = tokenize(input);
    let kinds = errors.into_iter().map(|e| e.kind).collect();
    match &tokens[0] {
        Token::Text { data } => (data.clone(), kinds),
        _ => panic!("Expected Text token"),
    }
}

/// Tokenize `<a href="...">` with the given value and return the decoded value
fn href_value(raw: &str) -> (String, Vec<ParseErrorKind>) {
    let (tokens, errors) = tokenize(&format!(r#"<a href="{raw}">"#));
    let kinds = errors.into_iter().map(|e| e.kind).collect();
    let value = tokens[0]
        .attribute("href")
        .unwrap_or_else(|| panic!("Expected href attribute"))
        .to_string();
    (value, kinds)
}

// =============================================================================
// Named references
// =============================================================================

#[test]
fn test_named_reference_only_first_resolves() {
    let (text, errors) = first_text("&amp;amp;");
    assert_eq!(text, "&amp;");
    assert!(errors.is_empty());
}

#[test]
fn test_common_named_references() {
    let (text, _) = first_text("&lt;p&gt; &quot;hi&quot; &copy; &hellip;");
    assert_eq!(text, "<p> \"hi\" \u{A9} \u{2026}");
}

#[test]
fn test_longest_match_wins() {
    let (text, errors) = first_text("&notin;");
    assert_eq!(text, "\u{2209}");
    assert!(errors.is_empty());
}

#[test]
fn test_legacy_name_without_semicolon() {
    let (text, errors) = first_text("I'm &notit; I tell you");
    assert_eq!(text, "I'm \u{AC}it; I tell you");
    assert_eq!(
        errors,
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_two_code_point_reference() {
    let (text, _) = first_text("&NotEqualTilde;");
    assert_eq!(text, "\u{2242}\u{0338}");
}

#[test]
fn test_unknown_named_reference_with_semicolon() {
    let (text, errors) = first_text("&foo;");
    assert_eq!(text, "&foo;");
    assert_eq!(errors, vec![ParseErrorKind::UnknownNamedCharacterReference]);
}

#[test]
fn test_unknown_named_reference_without_semicolon_is_silent() {
    let (text, errors) = first_text("&foo bar");
    assert_eq!(text, "&foo bar");
    assert!(errors.is_empty());
}

#[test]
fn test_bare_ampersand() {
    let (text, errors) = first_text("a & b &");
    assert_eq!(text, "a & b &");
    assert!(errors.is_empty());
}

// =============================================================================
// Numeric references
// =============================================================================

#[test]
fn test_decimal_and_hex_references() {
    let (text, errors) = first_text("&#65;&#x41;&#X41;");
    assert_eq!(text, "AAA");
    assert!(errors.is_empty());
}

#[test]
fn test_numeric_reference_without_semicolon() {
    let (text, errors) = first_text("&#x41b");
    // "b" is a hex digit, so it belongs to the number
    assert_eq!(text, "\u{41B}");
    assert_eq!(
        errors,
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );

    let (text, _) = first_text("&#65x");
    assert_eq!(text, "Ax");
}

#[test]
fn test_absence_of_digits() {
    let (text, errors) = first_text("&#;&#x;");
    assert_eq!(text, "&#;&#x;");
    assert_eq!(
        errors,
        vec![
            ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference,
            ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference,
        ]
    );
}

#[test]
fn test_numeric_fixups() {
    let cases = [
        ("&#0;", "\u{FFFD}", ParseErrorKind::NullCharacterReference),
        (
            "&#x110000;",
            "\u{FFFD}",
            ParseErrorKind::CharacterReferenceOutsideUnicodeRange,
        ),
        (
            "&#99999999999999999999;",
            "\u{FFFD}",
            ParseErrorKind::CharacterReferenceOutsideUnicodeRange,
        ),
        ("&#xD800;", "\u{FFFD}", ParseErrorKind::SurrogateCharacterReference),
        ("&#xFFFF;", "\u{FFFF}", ParseErrorKind::NoncharacterCharacterReference),
        ("&#128;", "\u{20AC}", ParseErrorKind::ControlCharacterReference),
        ("&#x9F;", "\u{178}", ParseErrorKind::ControlCharacterReference),
        ("&#x81;", "\u{81}", ParseErrorKind::ControlCharacterReference),
        ("&#13;", "\r", ParseErrorKind::ControlCharacterReference),
    ];
    for (input, expected, error) in cases {
        let (text, errors) = first_text(input);
        assert_eq!(text, expected, "input: {input}");
        assert_eq!(errors, vec![error], "input: {input}");
    }
}

#[test]
fn test_whitespace_control_reference_is_not_an_error() {
    let (text, errors) = first_text("&#9;&#10;");
    assert_eq!(text, "\t\n");
    assert!(errors.is_empty());
}

// =============================================================================
// Attribute values
// =============================================================================

#[test]
fn test_reference_in_attribute_value() {
    let (value, errors) = href_value("/search?a=1&amp;b=2");
    assert_eq!(value, "/search?a=1&b=2");
    assert!(errors.is_empty());
}

#[test]
fn test_historical_attribute_rule() {
    // A legacy name followed by "=" or an alphanumeric stays as written
    let (value, errors) = href_value("?x=1&not=2&copyright");
    assert_eq!(value, "?x=1&not=2&copyright");
    assert!(errors.is_empty());

    // Anywhere else it is decoded
    let (value, errors) = href_value("&copy!");
    assert_eq!(value, "\u{A9}!");
    assert_eq!(
        errors,
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_historical_rule_does_not_apply_in_text() {
    let (text, errors) = first_text("?x=1&not=2");
    assert_eq!(text, "?x=1\u{AC}=2");
    assert_eq!(
        errors,
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_unknown_reference_in_unquoted_attribute() {
    let (tokens, errors) = tokenize("<a title=&foo;x>");
    assert_eq!(tokens[0].attribute("title"), Some("&foo;x"));
    assert_eq!(errors[0].kind, ParseErrorKind::UnknownNamedCharacterReference);
}

// =============================================================================
// Resolver API
// =============================================================================

#[test]
fn test_resolve_reports_consumed_length() {
    let mut rest = "notin; and more";
    assert_eq!(
        resolve(&mut rest, CharRefContext::Text).unwrap(),
        Resolution::Decoded {
            value: "\u{2209}".to_string(),
            consumed: 6,
            errors: Vec::new(),
        }
    );

    let mut rest = "zzz;";
    assert_eq!(
        resolve(&mut rest, CharRefContext::Text).unwrap(),
        Resolution::NotNamed
    );

    let mut rest = " x";
    assert_eq!(
        resolve(&mut rest, CharRefContext::Text).unwrap(),
        Resolution::NotAReference { error: None }
    );
}

#[test]
fn test_decode_character_references_helper() {
    assert_eq!(
        decode_character_references("a &lt; b &amp;&amp; c", CharRefContext::Text),
        "a < b && c"
    );
    assert_eq!(
        decode_character_references("&#x1F600; &bogus; &", CharRefContext::Text),
        "\u{1F600} &bogus; &"
    );
}
