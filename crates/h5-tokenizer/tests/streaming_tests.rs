//! Streaming behaviour: incremental sources, host errors and end of input.

use std::io::{self, Read};

use h5_tokenizer::{CharIterSource, Token, Tokenizer, TokenizerError, tokenize};

const DOCUMENT: &str = "<!DOCTYPE html>\r\n<html lang=en><head><title>A &amp; B</title>\
<script>if (a < b && c) { x = \"</p>\"; }</script></head>\
<body class=\"main\">caf\u{E9} &notin; &#x1F600;\r<!-- note -->\
<textarea>&lt;raw&gt;</textarea><p data-a='1' data-b=2>end</p></body></html>";

/// Reader handing out one byte per call, so multi-byte characters and
/// CR LF pairs arrive split.
struct ByteAtATime<'a> {
    bytes: &'a [u8],
}

impl Read for ByteAtATime<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.bytes.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.bytes = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// Reader that produces some input and then fails.
struct FailingReader {
    data: Option<&'static [u8]>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            None => Err(io::Error::other("connection reset")),
        }
    }
}

fn collect<I: Iterator<Item = Result<Token, TokenizerError>>>(tokens: I) -> Vec<Token> {
    tokens.map(|token| token.unwrap()).collect()
}

#[test]
fn test_char_by_char_matches_whole_input() {
    let (whole, whole_errors) = tokenize(DOCUMENT);

    let mut tokenizer = Tokenizer::new(CharIterSource::new(DOCUMENT.chars()));
    let streamed = collect(tokenizer.by_ref());

    assert_eq!(streamed, whole);
    assert_eq!(tokenizer.errors(), whole_errors.as_slice());
}

#[test]
fn test_byte_at_a_time_reader_matches_whole_input() {
    let (whole, _) = tokenize(DOCUMENT);
    let reader = ByteAtATime {
        bytes: DOCUMENT.as_bytes(),
    };
    let streamed = collect(Tokenizer::from_reader(reader));
    assert_eq!(streamed, whole);
}

#[test]
fn test_reader_matches_whole_input() {
    let (whole, _) = tokenize(DOCUMENT);
    let streamed = collect(Tokenizer::from_reader(DOCUMENT.as_bytes()));
    assert_eq!(streamed, whole);
}

#[test]
fn test_next_token_does_not_read_ahead_of_the_token() {
    // The tokenizer must hand out the start tag before the rest of the input
    // exists, since a live source would block there.
    let chars = "<p>".chars().chain(std::iter::from_fn(|| -> Option<char> {
        panic!("read past the end of the start tag")
    }));
    let mut tokenizer = Tokenizer::new(CharIterSource::new(chars));
    assert_eq!(tokenizer.next_token().unwrap(), Token::start_tag("p"));
}

/// A tokenizer over `prefix` whose source panics once `prefix` is used up.
fn stalled_after(prefix: &'static str) -> Tokenizer<CharIterSource<impl Iterator<Item = char>>> {
    let chars = prefix.chars().chain(std::iter::from_fn(move || -> Option<char> {
        panic!("read past {prefix:?}")
    }));
    Tokenizer::new(CharIterSource::new(chars))
}

#[test]
fn test_text_is_returned_once_markup_starts() {
    for (prefix, text) in [
        ("abc<p", "abc"),
        ("abc</p", "abc"),
        ("abc<!--", "abc"),
        ("abc<!DOCTYPE", "abc"),
        ("a &amp; b<?", "a & b"),
    ] {
        let mut tokenizer = stalled_after(prefix);
        assert_eq!(tokenizer.next_token().unwrap(), Token::text(text), "input: {prefix}");
    }
}

#[test]
fn test_early_text_flush_keeps_runs_intact() {
    // Markup that turns out to be text must not split the run
    let (tokens, _) = tokenize("a<1b</>c&d<e");
    assert_eq!(tokens, vec![Token::text("a<1bc&d"), Token::EndOfInput]);
}

#[test]
fn test_end_of_input_repeats() {
    let mut tokenizer = Tokenizer::from_string("x");
    assert_eq!(tokenizer.next_token().unwrap(), Token::text("x"));
    assert_eq!(tokenizer.next_token().unwrap(), Token::EndOfInput);
    assert_eq!(tokenizer.next_token().unwrap(), Token::EndOfInput);
    assert_eq!(tokenizer.next_token().unwrap(), Token::EndOfInput);
}

#[test]
fn test_iterator_fuses_after_end_of_input() {
    let mut tokenizer = Tokenizer::from_string("<br>");
    assert_eq!(tokenizer.next().unwrap().unwrap(), Token::start_tag("br"));
    assert_eq!(tokenizer.next().unwrap().unwrap(), Token::EndOfInput);
    assert!(tokenizer.next().is_none());
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_reader_failure_is_a_host_error() {
    let reader = FailingReader {
        data: Some(b"<p>ok".as_slice()),
    };
    let mut tokenizer = Tokenizer::from_reader(reader);

    // Tokens produced before the failure stay valid
    assert_eq!(tokenizer.next().unwrap().unwrap(), Token::start_tag("p"));

    match tokenizer.next() {
        Some(Err(TokenizerError::Io(e))) => assert_eq!(e.to_string(), "connection reset"),
        other => panic!("Expected Io error, got {other:?}"),
    }
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_invalid_utf8_is_a_host_error() {
    let mut tokenizer = Tokenizer::from_reader(&b"<b>\xFFx"[..]);
    assert_eq!(tokenizer.next_token().unwrap(), Token::start_tag("b"));
    match tokenizer.next_token() {
        Err(TokenizerError::InvalidUtf8 { offset }) => assert_eq!(offset, 3),
        other => panic!("Expected InvalidUtf8 error, got {other:?}"),
    }
}

#[test]
fn test_truncated_utf8_at_end_is_a_host_error() {
    // First two bytes of a three byte sequence
    let mut tokenizer = Tokenizer::from_reader(&b"ab\xE2\x82"[..]);
    assert!(matches!(
        tokenizer.next_token(),
        Err(TokenizerError::InvalidUtf8 { offset: 2 })
    ));
}

#[test]
fn test_character_reference_split_across_reads() {
    let input = "&notin; &amp";
    let reader = ByteAtATime {
        bytes: input.as_bytes(),
    };
    let tokens = collect(Tokenizer::from_reader(reader));
    assert_eq!(tokens[0], Token::text("\u{2209} &"));
}
