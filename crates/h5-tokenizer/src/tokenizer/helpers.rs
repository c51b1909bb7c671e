//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token")
//! - End tag helpers for raw text elements
//! - Character reference flushing
//! - Parse error reporting

use std::mem;

use h5_common::warning::warn_once;
use log::debug;

use super::core::{Tokenizer, TokenizerState};
use super::error::{ParseError, ParseErrorKind};
use super::input::CharSource;
use super::token::Token;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<S: CharSource> Tokenizer<S> {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Reconsume in the X state"
    ///
    /// Pushes the current input character back so the new state sees it again.
    pub(super) fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.input.reconsume(self.current_input_character);
        self.state = new_state;
    }

    /// "Reconsume in the return state"
    pub(super) fn reconsume_in_return_state(&mut self) {
        self.reconsume_in(self.return_state);
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// CR never reaches the state machine since the input cursor normalizes it
    /// to LF.
    pub(super) const fn is_whitespace_char(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | ' ')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl<S: CharSource> Tokenizer<S> {
    /// "Emit the current input character as a character token."
    ///
    /// Characters collect into the pending text run until some other token is
    /// emitted.
    pub(super) fn emit_character(&mut self, c: char) {
        self.pending_text.push(c);
    }

    /// Emit a character token for each character of `s`.
    pub(super) fn emit_characters(&mut self, s: &str) {
        self.pending_text.push_str(s);
    }

    /// Close the pending text run.
    ///
    /// Called as soon as a tag, comment or DOCTYPE token is certain to follow,
    /// so the run is handed out before the markup after it is read.
    pub(super) fn flush_pending_text(&mut self) {
        if !self.pending_text.is_empty() {
            let data = mem::take(&mut self.pending_text);
            self.ready.push_back(Token::Text { data });
        }
    }

    /// Queue a finished non-text token, closing the pending text run first.
    fn push_token(&mut self, token: Token) {
        self.flush_pending_text();
        self.ready.push_back(token);
    }

    /// "Emit the current tag token" / "Emit the current comment token" /
    /// "Emit the current DOCTYPE token"
    pub(super) fn emit_current_token(&mut self) {
        let Some((token, errors)) = self.builder.emit() else {
            return;
        };
        for error in errors {
            self.parse_error(error);
        }

        if let Token::StartTag { name, .. } = &token {
            // "The last start tag token emitted is used as part of the tree
            // construction stage and in the RCDATA, RAWTEXT, and script data
            // states."
            self.last_start_tag_name = Some(name.clone());
            if self.options.switch_on_raw_text_elements {
                if let Some(state) = raw_text_state_for(name) {
                    self.switch_to(state);
                }
            }
        }
        self.push_token(token);
    }

    /// "Emit an end-of-file token."
    ///
    /// Anything still under construction (an unterminated tag) is dropped.
    pub(super) fn emit_end_of_input(&mut self) {
        self.builder.discard();
        self.push_token(Token::EndOfInput);
        self.at_eof = true;
    }
}

/// The tokenizer state the content of element `name` is tokenized in, if it
/// is not the data state.
///
/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
/// and the "in head" / "in body" insertion modes decide these.
fn raw_text_state_for(name: &str) -> Option<TokenizerState> {
    match name {
        // "Follow the generic RCDATA element parsing algorithm."
        "title" | "textarea" => Some(TokenizerState::RCDATA),
        // "Follow the generic raw text element parsing algorithm."
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(TokenizerState::RAWTEXT),
        // "Switch the tokenizer to the script data state."
        "script" => Some(TokenizerState::ScriptData),
        // "Switch the tokenizer to the PLAINTEXT state."
        "plaintext" => Some(TokenizerState::PLAINTEXT),
        _ => None,
    }
}

// =============================================================================
// End Tag Helpers
// =============================================================================

impl<S: CharSource> Tokenizer<S> {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        self.builder.is_end_tag()
            && self
                .last_start_tag_name
                .as_deref()
                .is_some_and(|last| last == self.builder.tag_name())
    }

    /// "Anything else" branch shared by the RCDATA, RAWTEXT, script data and
    /// script data escaped end tag name states:
    ///
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the
    /// X state."
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_characters("</");
        let buffer = mem::take(&mut self.temporary_buffer);
        self.emit_characters(&buffer);
        self.builder.discard();
        self.reconsume_in(text_state);
    }

    /// Append to both the end tag name (lowercased) and the temporary buffer.
    pub(super) fn append_to_end_tag_name(&mut self, c: char) {
        self.builder.append_to_tag_name(c.to_ascii_lowercase());
        self.temporary_buffer.push(c);
    }
}

// =============================================================================
// Character Reference Helpers
// =============================================================================

impl<S: CharSource> Tokenizer<S> {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            TokenizerState::AttributeValueDoubleQuoted
                | TokenizerState::AttributeValueSingleQuoted
                | TokenizerState::AttributeValueUnquoted
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise, emit
    /// each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self, code_points: &str) {
        if self.is_consumed_as_part_of_attribute() {
            self.builder.append_str_to_attribute_value(code_points);
        } else {
            self.emit_characters(code_points);
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl<S: CharSource> Tokenizer<S> {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Records a parse error at the current input location. Parse errors are
    /// never fatal; the caller continues with the recovery the state defines.
    pub(super) fn parse_error(&mut self, kind: ParseErrorKind) {
        let error = ParseError::new(kind, self.input.location());
        debug!("parse error in {} state: {error}", self.state);
        if self.options.warn_on_parse_error {
            let _ = warn_once("Tokenizer", &error.to_string());
        }
        self.errors.push(error);
    }

    /// "Start a new attribute in the current tag token", reporting a
    /// duplicate left behind by the previous attribute.
    pub(super) fn start_new_attribute(&mut self) {
        if let Some(error) = self.builder.begin_attribute() {
            self.parse_error(error);
        }
    }
}
