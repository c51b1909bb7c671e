//! Tokenizer configuration.

use super::core::TokenizerState;

/// Knobs a consumer can set before tokenization starts.
///
/// # Example
/// ```
/// use h5_tokenizer::{TokenizerOptions, TokenizerState};
///
/// // Tokenize the contents of a <textarea> on their own.
/// let options = TokenizerOptions::default()
///     .with_initial_state(TokenizerState::RCDATA)
///     .with_last_start_tag_name("textarea");
/// assert_eq!(options.initial_state, TokenizerState::RCDATA);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// State the machine starts in. The standard start state is
    /// [`TokenizerState::Data`].
    pub initial_state: TokenizerState,

    /// Pretend a start tag with this name was already emitted, so that the
    /// matching end tag is appropriate when starting in a raw text state.
    pub last_start_tag_name: Option<String>,

    /// Switch to RCDATA, RAWTEXT, script data or PLAINTEXT after emitting the
    /// start tag of an element whose content is tokenized that way. Turn off
    /// when a tree builder drives the state changes itself.
    pub switch_on_raw_text_elements: bool,

    /// Treat `<![CDATA[` as a CDATA section (as in foreign content) instead
    /// of a bogus comment.
    pub allow_cdata: bool,

    /// Drop a leading U+FEFF BYTE ORDER MARK.
    pub discard_bom: bool,

    /// Also print every parse error once through
    /// [`h5_common::warning::warn_once`].
    pub warn_on_parse_error: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            initial_state: TokenizerState::Data,
            last_start_tag_name: None,
            switch_on_raw_text_elements: true,
            allow_cdata: false,
            discard_bom: true,
            warn_on_parse_error: false,
        }
    }
}

impl TokenizerOptions {
    /// Set [`initial_state`](Self::initial_state).
    #[must_use]
    pub const fn with_initial_state(mut self, state: TokenizerState) -> Self {
        self.initial_state = state;
        self
    }

    /// Set [`last_start_tag_name`](Self::last_start_tag_name). The name is
    /// lowercased the way the tokenizer lowercases tag names.
    #[must_use]
    pub fn with_last_start_tag_name(mut self, name: &str) -> Self {
        self.last_start_tag_name = Some(name.to_ascii_lowercase());
        self
    }

    /// Set [`switch_on_raw_text_elements`](Self::switch_on_raw_text_elements).
    #[must_use]
    pub const fn with_switch_on_raw_text_elements(mut self, enabled: bool) -> Self {
        self.switch_on_raw_text_elements = enabled;
        self
    }

    /// Set [`allow_cdata`](Self::allow_cdata).
    #[must_use]
    pub const fn with_allow_cdata(mut self, enabled: bool) -> Self {
        self.allow_cdata = enabled;
        self
    }

    /// Set [`discard_bom`](Self::discard_bom).
    #[must_use]
    pub const fn with_discard_bom(mut self, enabled: bool) -> Self {
        self.discard_bom = enabled;
        self
    }

    /// Set [`warn_on_parse_error`](Self::warn_on_parse_error).
    #[must_use]
    pub const fn with_warn_on_parse_error(mut self, enabled: bool) -> Self {
        self.warn_on_parse_error = enabled;
        self
    }
}
