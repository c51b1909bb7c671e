//! Character sources and the input cursor the state machine reads from.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! "The input stream consists of the characters pushed into it as the input
//! byte stream is decoded or from the various APIs that directly manipulate
//! the input stream."
//!
//! Decoding bytes into characters is not the tokenizer's business; a
//! [`CharSource`] hands over already decoded characters one at a time. The
//! [`InputCursor`] on top of it provides peeking, keyword lookahead, pushback
//! for "reconsume", newline normalization and location tracking.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use super::error::{Location, Result, TokenizerError};

/// A pull-based supplier of decoded characters.
///
/// Returning `Ok(None)` signals end of input. The cursor never calls
/// `next_char` again after that. An `Err` is a host error and ends
/// tokenization.
pub trait CharSource {
    /// Produce the next character, `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizerError`] when the underlying source fails.
    fn next_char(&mut self) -> Result<Option<char>>;
}

/// A source over an owned, fully buffered string.
#[derive(Debug, Clone)]
pub struct StrSource {
    input: String,
    position: usize,
}

impl StrSource {
    /// Wrap a complete input string.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            position: 0,
        }
    }
}

impl CharSource for StrSource {
    fn next_char(&mut self) -> Result<Option<char>> {
        let next = self.input[self.position..].chars().next();
        if let Some(c) = next {
            self.position += c.len_utf8();
        }
        Ok(next)
    }
}

/// A source over any character iterator, e.g. characters arriving from a
/// live connection one at a time.
#[derive(Debug, Clone)]
pub struct CharIterSource<I> {
    chars: I,
}

impl<I: Iterator<Item = char>> CharIterSource<I> {
    /// Wrap a character iterator.
    #[must_use]
    pub const fn new(chars: I) -> Self {
        Self { chars }
    }
}

impl<I: Iterator<Item = char>> CharSource for CharIterSource<I> {
    fn next_char(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Size of a single read from the underlying reader.
const READ_CHUNK: usize = 8 * 1024;

/// A source that incrementally decodes UTF-8 from a [`Read`] implementation.
///
/// Only as many bytes are read as are needed to produce the next character,
/// rounded up to one read call, so the tokenizer can run on a stream that is
/// still arriving.
#[derive(Debug)]
pub struct Utf8ReadSource<R> {
    reader: R,
    buffer: Vec<u8>,
    start: usize,
    /// Bytes already dropped from the front of `buffer`.
    discarded: usize,
    reader_done: bool,
}

impl<R: Read> Utf8ReadSource<R> {
    /// Wrap a reader producing UTF-8 bytes.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            start: 0,
            discarded: 0,
            reader_done: false,
        }
    }

    /// Read another chunk into the buffer. Returns `false` at end of stream.
    fn fill(&mut self) -> Result<bool> {
        if self.start > 0 {
            let _ = self.buffer.drain(..self.start);
            self.discarded += self.start;
            self.start = 0;
        }
        let mut chunk = [0_u8; READ_CHUNK];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.reader_done = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(TokenizerError::Io(e)),
            }
        }
    }

    /// Width of the UTF-8 sequence introduced by `lead`, `None` if `lead`
    /// cannot start a sequence.
    const fn sequence_width(lead: u8) -> Option<usize> {
        match lead {
            0x00..=0x7F => Some(1),
            0xC2..=0xDF => Some(2),
            0xE0..=0xEF => Some(3),
            0xF0..=0xF4 => Some(4),
            _ => None,
        }
    }
}

impl<R: Read> CharSource for Utf8ReadSource<R> {
    fn next_char(&mut self) -> Result<Option<char>> {
        loop {
            let available = self.buffer.len() - self.start;
            if available == 0 {
                if self.reader_done || !self.fill()? {
                    return Ok(None);
                }
                continue;
            }

            let offset = self.discarded + self.start;
            let width = Self::sequence_width(self.buffer[self.start])
                .ok_or(TokenizerError::InvalidUtf8 { offset })?;

            if available < width {
                if self.reader_done || !self.fill()? {
                    return Err(TokenizerError::InvalidUtf8 { offset });
                }
                continue;
            }

            let bytes = &self.buffer[self.start..self.start + width];
            let c = std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.chars().next())
                .ok_or(TokenizerError::InvalidUtf8 { offset })?;
            self.start += width;
            return Ok(Some(c));
        }
    }
}

/// Non-consuming lookahead, shared by the input cursor and plain strings so
/// the character reference resolver works on either.
pub trait Lookahead {
    /// The character `n` positions ahead (0 = next), `None` past the end.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizerError`] when more input is needed and the source fails.
    fn peek_nth(&mut self, n: usize) -> Result<Option<char>>;
}

impl Lookahead for &str {
    fn peek_nth(&mut self, n: usize) -> Result<Option<char>> {
        Ok(self.chars().nth(n))
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// Cursor over a [`CharSource`] with the operations the state machine needs:
/// "consume the next input character", "the next few characters are",
/// and "reconsume in the X state".
#[derive(Debug)]
pub struct InputCursor<S> {
    source: S,
    /// Normalized characters pulled from the source but not consumed yet.
    lookahead: VecDeque<char>,
    source_done: bool,
    /// The previous raw character was CR, so a following LF is dropped.
    after_cr: bool,
    /// Whether a leading U+FEFF should still be dropped.
    strip_bom: bool,
    /// Location of the next character to be consumed.
    next: Location,
    /// Location of the character most recently consumed.
    current: Location,
}

impl<S: CharSource> InputCursor<S> {
    /// Create a cursor over `source`. With `discard_bom`, a leading U+FEFF
    /// BYTE ORDER MARK is dropped before tokenization sees it.
    #[must_use]
    pub fn new(source: S, discard_bom: bool) -> Self {
        Self {
            source,
            lookahead: VecDeque::new(),
            source_done: false,
            after_cr: false,
            strip_bom: discard_bom,
            next: Location::default(),
            current: Location::default(),
        }
    }

    /// Pull from the source until at least `count` characters are buffered
    /// or the source is exhausted.
    ///
    /// [§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream):
    /// "To normalize newlines in a string, replace every U+000D CR U+000A LF
    /// code point pair with a single U+000A LF code point, and then replace
    /// every remaining U+000D CR code point with a U+000A LF code point."
    fn fill(&mut self, count: usize) -> Result<()> {
        while self.lookahead.len() < count && !self.source_done {
            let Some(raw) = self.source.next_char()? else {
                self.source_done = true;
                break;
            };
            if self.strip_bom {
                self.strip_bom = false;
                if raw == '\u{FEFF}' {
                    continue;
                }
            }
            if self.after_cr && raw == '\n' {
                self.after_cr = false;
                continue;
            }
            self.after_cr = raw == '\r';
            self.lookahead.push_back(if raw == '\r' { '\n' } else { raw });
        }
        Ok(())
    }

    /// Look at the next input character without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates host errors from the source.
    pub fn peek(&mut self) -> Result<Option<char>> {
        self.peek_nth(0)
    }

    /// "Consume the next input character"
    ///
    /// Returns `None` at end of input; every later call also returns `None`.
    ///
    /// # Errors
    ///
    /// Propagates host errors from the source.
    pub fn consume(&mut self) -> Result<Option<char>> {
        self.fill(1)?;
        self.current = self.next;
        let next = self.lookahead.pop_front();
        if let Some(c) = next {
            self.next.offset += 1;
            if c == '\n' {
                self.next.line += 1;
                self.next.column = 1;
            } else {
                self.next.column += 1;
            }
        }
        Ok(next)
    }

    /// "Reconsume in the X state"
    ///
    /// Push the character just returned by [`consume`](Self::consume) back so
    /// the next `consume` yields it again. Only a single step of pushback is
    /// supported. End of input needs no pushback since it is sticky.
    pub fn reconsume(&mut self, c: Option<char>) {
        if let Some(c) = c {
            self.lookahead.push_front(c);
            self.next = self.current;
        }
    }

    /// "If the next few characters are..."
    ///
    /// Consume `literal` as a unit if the upcoming characters match it
    /// (ASCII case-insensitively when asked), otherwise consume nothing.
    ///
    /// # Errors
    ///
    /// Propagates host errors from the source.
    pub fn consume_if_matches(&mut self, literal: &str, case_insensitive: bool) -> Result<bool> {
        for (i, expected) in literal.chars().enumerate() {
            let matched = match self.peek_nth(i)? {
                Some(c) if case_insensitive => c.eq_ignore_ascii_case(&expected),
                Some(c) => c == expected,
                None => false,
            };
            if !matched {
                return Ok(false);
            }
        }
        for _ in literal.chars() {
            let _ = self.consume()?;
        }
        Ok(true)
    }

    /// Consume `count` characters that are known to be buffered, e.g. after a
    /// successful lookahead match.
    ///
    /// # Errors
    ///
    /// Propagates host errors from the source.
    pub fn advance(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            let _ = self.consume()?;
        }
        Ok(())
    }

    /// Location of the character most recently consumed (or of the end of
    /// input once it has been reached).
    #[must_use]
    pub const fn location(&self) -> Location {
        self.current
    }
}

impl<S: CharSource> Lookahead for InputCursor<S> {
    fn peek_nth(&mut self, n: usize) -> Result<Option<char>> {
        self.fill(n + 1)?;
        Ok(self.lookahead.get(n).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(input: &str) -> InputCursor<StrSource> {
        InputCursor::new(StrSource::new(input), true)
    }

    fn drain<S: CharSource>(cursor: &mut InputCursor<S>) -> String {
        let mut out = String::new();
        while let Some(c) = cursor.consume().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut input = cursor("ab");
        assert_eq!(input.peek().unwrap(), Some('a'));
        assert_eq!(input.peek_nth(1).unwrap(), Some('b'));
        assert_eq!(input.consume().unwrap(), Some('a'));
        assert_eq!(input.consume().unwrap(), Some('b'));
        assert_eq!(input.consume().unwrap(), None);
        assert_eq!(input.consume().unwrap(), None);
    }

    #[test]
    fn test_reconsume_rolls_back_location() {
        let mut input = cursor("x\ny");
        let _ = input.consume().unwrap();
        let c = input.consume().unwrap();
        assert_eq!(c, Some('\n'));
        let at_newline = input.location();
        input.reconsume(c);
        assert_eq!(input.consume().unwrap(), Some('\n'));
        assert_eq!(input.location(), at_newline);
        assert_eq!(input.consume().unwrap(), Some('y'));
        assert_eq!(input.location().line, 2);
        assert_eq!(input.location().column, 1);
    }

    #[test]
    fn test_consume_if_matches_is_all_or_nothing() {
        let mut input = cursor("DocTypX");
        assert!(!input.consume_if_matches("DOCTYPE", true).unwrap());
        assert_eq!(input.peek().unwrap(), Some('D'));

        let mut input = cursor("DocType html");
        assert!(!input.consume_if_matches("DOCTYPE", false).unwrap());
        assert!(input.consume_if_matches("DOCTYPE", true).unwrap());
        assert_eq!(input.peek().unwrap(), Some(' '));
    }

    #[test]
    fn test_newlines_are_normalized() {
        assert_eq!(drain(&mut cursor("a\r\nb\rc\n")), "a\nb\nc\n");
    }

    #[test]
    fn test_cr_lf_split_across_chunks() {
        let chunks = ["a\r", "\nb"];
        let source = CharIterSource::new(chunks.iter().flat_map(|s| s.chars()));
        let mut input = InputCursor::new(source, false);
        assert_eq!(drain(&mut input), "a\nb");
    }

    #[test]
    fn test_leading_bom_is_discarded() {
        assert_eq!(drain(&mut cursor("\u{FEFF}hi")), "hi");
        let mut kept = InputCursor::new(StrSource::new("\u{FEFF}hi"), false);
        assert_eq!(drain(&mut kept), "\u{FEFF}hi");
    }

    #[test]
    fn test_utf8_reader_decodes_multibyte() {
        let bytes = "h\u{e9}\u{20ac}\u{1F600}".as_bytes();
        let mut source = Utf8ReadSource::new(bytes);
        let mut out = String::new();
        while let Some(c) = source.next_char().unwrap() {
            out.push(c);
        }
        assert_eq!(out, "h\u{e9}\u{20ac}\u{1F600}");
    }

    #[test]
    fn test_utf8_reader_reports_invalid_bytes() {
        let bytes: &[u8] = &[b'a', 0xFF, b'b'];
        let mut source = Utf8ReadSource::new(bytes);
        assert_eq!(source.next_char().unwrap(), Some('a'));
        assert!(matches!(
            source.next_char(),
            Err(TokenizerError::InvalidUtf8 { offset: 1 })
        ));
    }

    #[test]
    fn test_utf8_reader_reports_truncated_sequence() {
        let bytes: &[u8] = &[b'a', 0xE2, 0x82];
        let mut source = Utf8ReadSource::new(bytes);
        assert_eq!(source.next_char().unwrap(), Some('a'));
        assert!(matches!(
            source.next_char(),
            Err(TokenizerError::InvalidUtf8 { offset: 1 })
        ));
    }
}
