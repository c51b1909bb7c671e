//! Integration tests for the HTML tokenizer.

use h5_tokenizer::{
    Attribute, ParseError, ParseErrorKind, SinkControl, Token, TokenSink, Tokenizer,
    TokenizerOptions, TokenizerState, tokenize,
};

/// Helper to tokenize a string and return only the tokens
fn tokens(input: &str) -> Vec<Token> {
    tokenize(input).0
}

#[test]
fn test_plain_text() {
    let tokens = tokens("Hello");
    assert_eq!(tokens, vec![Token::text("Hello"), Token::EndOfInput]);
}

#[test]
fn test_empty_input() {
    let (tokens, errors) = tokenize("");
    assert_eq!(tokens, vec![Token::EndOfInput]);
    assert!(errors.is_empty());
}

#[test]
fn test_doctype() {
    let tokens = tokens("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(public_identifier.is_none());
            assert!(system_identifier.is_none());
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_start_tag() {
    let tokens = tokens("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_end_tag() {
    let tokens = tokens("</div>");
    assert_eq!(tokens, vec![Token::end_tag("div"), Token::EndOfInput]);
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokens("<DiV></SPAN>");
    assert_eq!(tokens[0].tag_name(), Some("div"));
    assert_eq!(tokens[1].tag_name(), Some("span"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokens("<br/>");
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokens(r#"<input type="text" name='q' value=hello disabled>"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(
                attributes,
                &vec![
                    Attribute::new("type", "text"),
                    Attribute::new("name", "q"),
                    Attribute::new("value", "hello"),
                    Attribute::new("disabled", ""),
                ]
            );
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_attribute_names_are_lowercased_values_are_not() {
    let tokens = tokens(r#"<p CLASS="Intro">"#);
    assert_eq!(tokens[0].attribute("class"), Some("Intro"));
}

#[test]
fn test_well_formed_fragments() {
    for (tag, attr, value, text) in [
        ("p", "id", "first", "Hello"),
        ("a", "href", "/index.html", "home"),
        ("span", "data-x", "", "  spaced  "),
        ("h1", "title", "a > b", "Heading"),
    ] {
        let input = format!(r#"<{tag} {attr}="{value}">{text}</{tag}>"#);
        let (tokens, errors) = tokenize(&input);
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: tag.to_string(),
                    attributes: vec![Attribute::new(attr, value)],
                    self_closing: false,
                },
                Token::text(text),
                Token::end_tag(tag),
                Token::EndOfInput,
            ],
            "input: {input}"
        );
        assert!(errors.is_empty(), "input: {input}");
    }
}

#[test]
fn test_text_runs_are_coalesced_between_tags() {
    let tokens = tokens("a b<i>c</i> d");
    assert_eq!(
        tokens,
        vec![
            Token::text("a b"),
            Token::start_tag("i"),
            Token::text("c"),
            Token::end_tag("i"),
            Token::text(" d"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_comment() {
    let tokens = tokens("<!-- hello -->");
    assert_eq!(tokens, vec![Token::comment(" hello "), Token::EndOfInput]);
}

#[test]
fn test_comment_with_dashes_inside() {
    let tokens = tokens("<!--a-b--c-->");
    assert_eq!(tokens[0], Token::comment("a-b--c"));
}

#[test]
fn test_empty_comment() {
    let (tokens, errors) = tokenize("<!---->");
    assert_eq!(tokens[0], Token::comment(""));
    assert!(errors.is_empty());
}

#[test]
fn test_newlines_are_normalized_in_text() {
    let tokens = tokens("a\r\nb\rc");
    assert_eq!(tokens[0], Token::text("a\nb\nc"));
}

#[test]
fn test_byte_order_mark_is_dropped() {
    let tokens = tokens("\u{FEFF}<p>");
    assert_eq!(tokens[0], Token::start_tag("p"));

    let options = TokenizerOptions::default().with_discard_bom(false);
    let mut tokenizer = Tokenizer::with_options(h5_tokenizer::StrSource::new("\u{FEFF}x"), options);
    assert_eq!(tokenizer.next_token().unwrap(), Token::text("\u{FEFF}x"));
}

#[test]
fn test_idempotent_runs() {
    let input = r#"<!DOCTYPE html><title>T &amp; U</title><p class=a>x<!--c--><script>if (a<b) {}</script>"#;
    assert_eq!(tokenize(input), tokenize(input));
}

#[test]
fn test_display_format() {
    let rendered: Vec<String> = tokens(r#"<!DOCTYPE html><a href="x">hi</a><!--c-->"#)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        rendered,
        vec![
            "<!DOCTYPE html>",
            r#"<a href="x">"#,
            r#"Text("hi")"#,
            "</a>",
            "<!--c-->",
            "EOF",
        ]
    );
}

#[test]
fn test_tokens_serialize_with_type_tag() {
    let value = serde_json::to_value(Token::start_tag("p")).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "type": "start-tag",
            "name": "p",
            "attributes": [],
            "self_closing": false,
        })
    );
    let value = serde_json::to_value(Token::EndOfInput).unwrap();
    assert_eq!(value, serde_json::json!({ "type": "end-of-input" }));
}

#[test]
fn test_parse_error_location() {
    let (_, errors) = tokenize("ab\n\0");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedNullCharacter);
    assert_eq!(errors[0].location.line, 2);
    assert_eq!(errors[0].location.column, 1);
    assert_eq!(errors[0].to_string(), "unexpected-null-character at 2:1");
}

#[test]
fn test_closure_sink() {
    let mut tokenizer = Tokenizer::from_string("<b>x</b>");
    let mut seen = Vec::new();
    tokenizer
        .run(&mut |token: Token| seen.push(token))
        .unwrap();
    assert_eq!(
        seen,
        vec![
            Token::start_tag("b"),
            Token::text("x"),
            Token::end_tag("b"),
            Token::EndOfInput,
        ]
    );
}

/// Sink that plays the part of tree construction: it switches the tokenizer
/// into RCDATA after a `<title>` start tag itself.
#[derive(Default)]
struct TitleSink {
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
    stop_after: Option<usize>,
}

impl TokenSink for TitleSink {
    fn process_token(&mut self, token: Token) -> SinkControl {
        let is_title = matches!(&token, Token::StartTag { name, .. } if name == "title");
        self.tokens.push(token);
        if self.stop_after == Some(self.tokens.len()) {
            SinkControl::Stop
        } else if is_title {
            SinkControl::SwitchTo(TokenizerState::RCDATA)
        } else {
            SinkControl::Continue
        }
    }

    fn parse_error(&mut self, error: &ParseError) {
        self.errors.push(*error);
    }
}

#[test]
fn test_sink_switches_state() {
    let options = TokenizerOptions::default().with_switch_on_raw_text_elements(false);
    let mut tokenizer = Tokenizer::with_options(
        h5_tokenizer::StrSource::new("<title><b>x</b></title>"),
        options,
    );
    let mut sink = TitleSink::default();
    tokenizer.run(&mut sink).unwrap();
    assert_eq!(
        sink.tokens,
        vec![
            Token::start_tag("title"),
            Token::text("<b>x</b>"),
            Token::end_tag("title"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_without_raw_text_switching_title_content_is_markup() {
    let options = TokenizerOptions::default().with_switch_on_raw_text_elements(false);
    let mut tokenizer =
        Tokenizer::with_options(h5_tokenizer::StrSource::new("<title><b>"), options);
    assert_eq!(tokenizer.next_token().unwrap(), Token::start_tag("title"));
    assert_eq!(tokenizer.next_token().unwrap(), Token::start_tag("b"));
}

#[test]
fn test_sink_stop_and_resume() {
    let mut tokenizer = Tokenizer::from_string("<a><b><c>");
    let mut sink = TitleSink {
        stop_after: Some(1),
        ..TitleSink::default()
    };
    tokenizer.run(&mut sink).unwrap();
    assert_eq!(sink.tokens, vec![Token::start_tag("a")]);

    // Picks up where the sink left off
    assert_eq!(tokenizer.next_token().unwrap(), Token::start_tag("b"));
}

#[test]
fn test_sink_receives_errors_before_token() {
    let mut tokenizer = Tokenizer::from_string("<a x=1 x=2>");
    let mut sink = TitleSink::default();
    tokenizer.run(&mut sink).unwrap();
    assert_eq!(sink.errors.len(), 1);
    assert_eq!(sink.errors[0].kind, ParseErrorKind::DuplicateAttribute);
    assert_eq!(sink.tokens.len(), 2);
}

/// Sink recording tokens and parse errors in the order they arrive.
#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl TokenSink for EventLog {
    fn process_token(&mut self, token: Token) -> SinkControl {
        self.events.push(token.to_string());
        SinkControl::Continue
    }

    fn parse_error(&mut self, error: &ParseError) {
        self.events.push(format!("error: {}", error.kind));
    }
}

#[test]
fn test_text_is_delivered_before_errors_of_following_tag() {
    let mut tokenizer = Tokenizer::from_string("abc<a x=1 x=2>\0");
    let mut sink = EventLog::default();
    tokenizer.run(&mut sink).unwrap();
    assert_eq!(
        sink.events,
        vec![
            r#"Text("abc")"#,
            "error: duplicate-attribute",
            r#"<a x="1">"#,
            "error: unexpected-null-character",
            r#"Text("\0")"#,
            "EOF",
        ]
    );
}

#[test]
fn test_take_errors_clears() {
    let mut tokenizer = Tokenizer::from_string("<a x=1 x=2>");
    while !tokenizer.next_token().unwrap().is_end_of_input() {}
    assert_eq!(tokenizer.errors().len(), 1);
    assert_eq!(tokenizer.take_errors().len(), 1);
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_state_names_parse_case_insensitively() {
    assert_eq!("rcdata".parse::<TokenizerState>(), Ok(TokenizerState::RCDATA));
    assert_eq!(
        "ScriptData".parse::<TokenizerState>(),
        Ok(TokenizerState::ScriptData)
    );
    assert!("nonsense".parse::<TokenizerState>().is_err());
}
