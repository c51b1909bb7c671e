//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Incremental construction of tag, comment and DOCTYPE tokens.
pub mod builder;
/// Character reference resolution per § 13.2.5.72 to § 13.2.5.80.
pub mod character_reference;
/// HTML tokenizer state machine implementation.
pub mod core;
/// Parse errors, source locations and host errors.
pub mod error;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// Character sources and the input cursor.
pub mod input;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Tokenizer configuration.
pub mod options;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{
    SinkControl, TokenSink, Tokenizer, TokenizerState, tokenize, tokenize_with_options,
};
pub use error::{Location, ParseError, ParseErrorKind, Result, TokenizerError};
pub use input::{CharIterSource, CharSource, InputCursor, StrSource, Utf8ReadSource};
pub use options::TokenizerOptions;
pub use token::{Attribute, Token};
