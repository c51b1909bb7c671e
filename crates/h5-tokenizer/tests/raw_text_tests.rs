//! Tests for the RCDATA, RAWTEXT, script data, PLAINTEXT and CDATA states.

use h5_tokenizer::{
    ParseErrorKind, StrSource, Token, Tokenizer, TokenizerOptions, TokenizerState, tokenize,
    tokenize_with_options,
};

fn tokens(input: &str) -> Vec<Token> {
    tokenize(input).0
}

// =============================================================================
// Script data
// =============================================================================

#[test]
fn test_script_content_is_text() {
    let tokens = tokens("<script>if (a<b && c>d) {}</script>");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("script"),
            Token::text("if (a<b && c>d) {}"),
            Token::end_tag("script"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_script_ends_only_on_appropriate_end_tag() {
    let tokens = tokens(r#"<script>x = "</p></scriptx>";</script>"#);
    assert_eq!(tokens[1], Token::text(r#"x = "</p></scriptx>";"#));
    assert_eq!(tokens[2], Token::end_tag("script"));
}

#[test]
fn test_script_end_tag_with_whitespace_and_case() {
    let tokens = tokens("<script>a</SCRIPT >b");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("script"),
            Token::text("a"),
            Token::end_tag("script"),
            Token::text("b"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_script_escaped_comment_ends_at_end_tag() {
    let tokens = tokens("<script><!--</script>x");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("script"),
            Token::text("<!--"),
            Token::end_tag("script"),
            Token::text("x"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_script_double_escaped() {
    let tokens = tokens("<script><!--<script>x</script>--></script>");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("script"),
            Token::text("<!--<script>x</script>-->"),
            Token::end_tag("script"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_eof_in_script_comment_like_text() {
    let (tokens, errors) = tokenize("<script><!-- x");
    assert_eq!(tokens[1], Token::text("<!-- x"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::EofInScriptHtmlCommentLikeText);
}

#[test]
fn test_null_in_script_is_replaced() {
    let (tokens, errors) = tokenize("<script>\0</script>");
    assert_eq!(tokens[1], Token::text("\u{FFFD}"));
    assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedNullCharacter);
}

// =============================================================================
// RCDATA and RAWTEXT
// =============================================================================

#[test]
fn test_rcdata_decodes_references_but_not_tags() {
    let tokens = tokens("<title>a <b> &amp; c</title>");
    assert_eq!(tokens[1], Token::text("a <b> & c"));
    assert_eq!(tokens[2], Token::end_tag("title"));
}

#[test]
fn test_rcdata_inappropriate_end_tag_is_text() {
    let tokens = tokens("<textarea></textareax></title></textarea>");
    assert_eq!(tokens[1], Token::text("</textareax></title>"));
    assert_eq!(tokens[2], Token::end_tag("textarea"));
}

#[test]
fn test_rawtext_keeps_references() {
    let tokens = tokens("<style>p > a { } &amp;</style>");
    assert_eq!(tokens[1], Token::text("p > a { } &amp;"));
    assert_eq!(tokens[2], Token::end_tag("style"));
}

#[test]
fn test_rawtext_elements() {
    for name in ["xmp", "iframe", "noembed", "noframes"] {
        let input = format!("<{name}><b>&lt;</{name}>");
        let tokens = tokens(&input);
        assert_eq!(tokens[1], Token::text("<b>&lt;"), "element: {name}");
        assert_eq!(tokens[2], Token::end_tag(name), "element: {name}");
    }
}

#[test]
fn test_plaintext_never_ends() {
    let tokens = tokens("<plaintext></plaintext><b>x");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("plaintext"),
            Token::text("</plaintext><b>x"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_initial_state_with_last_start_tag() {
    let options = TokenizerOptions::default()
        .with_initial_state(TokenizerState::RCDATA)
        .with_last_start_tag_name("TEXTAREA");
    let (tokens, _) = tokenize_with_options("a&lt;</textarea>b", options);
    assert_eq!(
        tokens,
        vec![
            Token::text("a<"),
            Token::end_tag("textarea"),
            Token::text("b"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_no_end_tag_is_appropriate_without_start_tag() {
    let options = TokenizerOptions::default().with_initial_state(TokenizerState::RAWTEXT);
    let (tokens, _) = tokenize_with_options("x</style>", options);
    assert_eq!(tokens, vec![Token::text("x</style>"), Token::EndOfInput]);
}

#[test]
fn test_set_state_from_outside() {
    let mut tokenizer = Tokenizer::from_string("<b><i></b>");
    assert_eq!(tokenizer.next_token().unwrap(), Token::start_tag("b"));
    tokenizer.set_state(TokenizerState::RAWTEXT);
    assert_eq!(tokenizer.state(), TokenizerState::RAWTEXT);
    assert_eq!(tokenizer.last_start_tag_name(), Some("b"));
    assert_eq!(tokenizer.next_token().unwrap(), Token::text("<i>"));
    assert_eq!(tokenizer.next_token().unwrap(), Token::end_tag("b"));
}

// =============================================================================
// CDATA
// =============================================================================

#[test]
fn test_cdata_in_html_content_is_bogus_comment() {
    let (tokens, errors) = tokenize("<![CDATA[x<y]]>");
    assert_eq!(tokens[0], Token::comment("[CDATA[x<y]]"));
    assert_eq!(errors[0].kind, ParseErrorKind::CdataInHtmlContent);
}

#[test]
fn test_cdata_section_when_allowed() {
    let options = TokenizerOptions::default().with_allow_cdata(true);
    let mut tokenizer = Tokenizer::with_options(StrSource::new("<![CDATA[x<y]b]]]>z"), options);
    assert_eq!(tokenizer.next_token().unwrap(), Token::text("x<y]b]z"));
    assert_eq!(tokenizer.next_token().unwrap(), Token::EndOfInput);
    assert!(tokenizer.errors().is_empty());
}

#[test]
fn test_eof_in_cdata() {
    let options = TokenizerOptions::default().with_allow_cdata(true);
    let (tokens, errors) = tokenize_with_options("<![CDATA[abc", options);
    assert_eq!(tokens, vec![Token::text("abc"), Token::EndOfInput]);
    assert_eq!(errors[0].kind, ParseErrorKind::EofInCdata);
}
