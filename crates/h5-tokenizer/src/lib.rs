//! Streaming HTML tokenizer following the WHATWG HTML Living Standard.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data and PLAINTEXT states
//!   - Tag, attribute, comment, DOCTYPE and CDATA states
//!   - Character references against the full named character reference table
//!   - Every tokenizer parse error, with line and column
//!
//! - **Input handling** ([WHATWG § 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream))
//!   - Newline normalization and byte order mark removal
//!   - Incremental sources: strings, character iterators and UTF-8 readers
//!
//! Tokens come out one at a time through [`Tokenizer::next_token`], the
//! [`Iterator`] impl or a [`TokenSink`].
//!
//! # Not Implemented
//!
//! - Tree construction and insertion modes
//! - Encoding sniffing (input is UTF-8)
//! - `document.write()` style input insertion

/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use tokenizer::character_reference::{
    CharRefContext, Resolution, decode_character_references, resolve,
};
pub use tokenizer::{
    Attribute, CharIterSource, CharSource, InputCursor, Location, ParseError, ParseErrorKind,
    Result, SinkControl, StrSource, Token, TokenSink, Tokenizer, TokenizerError, TokenizerOptions,
    TokenizerState, Utf8ReadSource, tokenize, tokenize_with_options,
};
