use core::fmt;

use serde::Serialize;

/// An attribute on a start tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Adjacent character tokens are coalesced into a single [`Token::Text`] run.
/// A run ends only where some other token is emitted, so the split never
/// depends on how the input was chunked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag. When a DOCTYPE token is created, its name,
    /// public identifier, and system identifier must be marked as missing
    /// (which is a distinct state from the empty string), and the force-quirks
    /// flag must be set to off (its other state is on)."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name"
        name: String,
        /// Attributes in source order, first occurrence of each name only.
        attributes: Vec<Attribute>,
        /// "a self-closing flag"
        self_closing: bool,
    },

    /// End tag token. Attributes and the self-closing flag are parse errors
    /// on end tags and are not carried.
    EndTag {
        /// "a tag name"
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// A run of consecutive character tokens.
    Text {
        /// The characters, in order.
        data: String,
    },

    /// End of input. Emitted once, after everything else.
    EndOfInput,
}

impl Token {
    /// Create a text token.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text { data: data.into() }
    }

    /// Create a comment token.
    #[must_use]
    pub fn comment(data: impl Into<String>) -> Self {
        Self::Comment { data: data.into() }
    }

    /// Create a start tag token without attributes.
    #[must_use]
    pub fn start_tag(name: impl Into<String>) -> Self {
        Self::StartTag {
            name: name.into(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    /// Create an end tag token.
    #[must_use]
    pub fn end_tag(name: impl Into<String>) -> Self {
        Self::EndTag { name: name.into() }
    }

    /// Returns true if this is the end-of-input token.
    #[must_use]
    pub const fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }

    /// The tag name of a start or end tag token.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// Look up an attribute value on a start tag token.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.value)
    }
}

/// Markup-like rendering, one token per line in the `h5` CLI.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                f.write_str("<!DOCTYPE")?;
                for part in [
                    name.as_deref().map(|name| (None, name)),
                    public_identifier.as_deref().map(|id| (Some("PUBLIC"), id)),
                    system_identifier.as_deref().map(|id| (Some("SYSTEM"), id)),
                ]
                .into_iter()
                .flatten()
                {
                    match part {
                        (Some(keyword), id) => write!(f, " {keyword} {id:?}")?,
                        (None, name) => write!(f, " {name}")?,
                    }
                }
                f.write_str(if *force_quirks { "> [quirks]" } else { ">" })
            }
            Self::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                write!(f, "<{name}")?;
                attributes
                    .iter()
                    .try_for_each(|attribute| write!(f, " {attribute}"))?;
                f.write_str(if *self_closing { " />" } else { ">" })
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            // Debug escapes make whitespace visible
            Self::Text { data } => write!(f, "Text({data:?})"),
            Self::EndOfInput => f.write_str("EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let tag = Token::StartTag {
            name: "a".to_string(),
            attributes: vec![Attribute::new("href", "x")],
            self_closing: true,
        };
        assert_eq!(tag.to_string(), "<a href=\"x\" />");
        assert_eq!(Token::end_tag("p").to_string(), "</p>");
        assert_eq!(Token::text("a\nb").to_string(), "Text(\"a\\nb\")");
        assert_eq!(Token::EndOfInput.to_string(), "EOF");
    }

    #[test]
    fn test_display_doctype() {
        let doctype = Token::Doctype {
            name: Some("html".to_string()),
            public_identifier: None,
            system_identifier: Some("about:legacy-compat".to_string()),
            force_quirks: false,
        };
        assert_eq!(
            doctype.to_string(),
            "<!DOCTYPE html SYSTEM \"about:legacy-compat\">"
        );

        let missing = Token::Doctype {
            name: None,
            public_identifier: None,
            system_identifier: None,
            force_quirks: true,
        };
        assert_eq!(missing.to_string(), "<!DOCTYPE> [quirks]");
    }

    #[test]
    fn test_serialize_is_tagged() {
        let json = serde_json::to_value(Token::comment("hi")).unwrap();
        assert_eq!(json["type"], "comment");
        assert_eq!(json["data"], "hi");

        let json = serde_json::to_value(Token::EndOfInput).unwrap();
        assert_eq!(json["type"], "end-of-input");
    }

    #[test]
    fn test_attribute_lookup() {
        let tag = Token::StartTag {
            name: "img".to_string(),
            attributes: vec![Attribute::new("src", "a.png"), Attribute::new("alt", "")],
            self_closing: false,
        };
        assert_eq!(tag.attribute("alt"), Some(""));
        assert_eq!(tag.attribute("title"), None);
        assert_eq!(tag.tag_name(), Some("img"));
    }
}
