use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::LexerError;

/// Elements that never take a separate closing tag. Membership forces a tag
/// to [`Tag::SelfClosing`] however it was written.
pub const SELF_CLOSING_ELEMENTS: &[&str] = &[
    "!doctype", "area", "base", "basefont", "br", "col", "command", "embed", "hr", "img",
    "input", "keygen", "link", "meta", "param", "wbr", "track", "?xml",
];

/// Check if an element name belongs to the self-closing vocabulary.
pub fn is_self_closing_element(element: &str) -> bool {
    SELF_CLOSING_ELEMENTS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(element))
}

/// `key="value"`, where the value may contain `\"` escapes.
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([^\s=]+)\s*=\s*"\s*((?:[^"\\]|\\.)*)""#).expect("valid attribute pattern")
});

/// Tag classification, without any data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Opening,
    Closing,
    SelfClosing,
    Comment,
    Content,
}

/// One attribute of an opening or self-closing tag. A bare key has no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            key: key.into(),
            value: value.map(str::to_owned),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}=\"{value}\"", self.key),
            None => f.write_str(&self.key),
        }
    }
}

/// A single lexical unit of an HTML document.
///
/// Element names keep the case they were written in but compare
/// case-insensitively. Tags are never mutated; every transformation
/// builds new values.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tag {
    /// `<div class="x">`
    Opening {
        element: String,
        attributes: Vec<Attribute>,
    },
    /// `</div>`, optionally followed by literal text that renders after it.
    Closing {
        element: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trailing: Option<String>,
    },
    /// `<br/>`
    SelfClosing {
        element: String,
        attributes: Vec<Attribute>,
    },
    /// `<!--text-->`
    Comment { text: String },
    /// Text between tags.
    Content { text: String },
}

impl Tag {
    /// Build a tag from its raw interior, everything between `<` (or `</`)
    /// and `>`.
    ///
    /// For [`TagKind::Comment`] and [`TagKind::Content`] the interior is the
    /// payload, taken verbatim. Otherwise the first whitespace-delimited word
    /// is the element name and the rest is parsed into attributes. Elements
    /// in [`SELF_CLOSING_ELEMENTS`] override `kind`.
    pub fn new(interior: &str, kind: TagKind) -> Result<Self, LexerError> {
        match kind {
            TagKind::Comment => return Ok(Self::comment(interior)),
            TagKind::Content => return Ok(Self::content(interior)),
            TagKind::Opening | TagKind::Closing | TagKind::SelfClosing => {}
        }

        let cleaned = interior.replace('\r', "");
        let trimmed = cleaned.trim();
        let name_end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let element = trimmed[..name_end].to_string();
        if element.is_empty() {
            return Err(LexerError::InvalidTag);
        }
        let attributes = parse_attributes(&trimmed[name_end..]);

        let kind = if is_self_closing_element(&element) {
            TagKind::SelfClosing
        } else {
            kind
        };

        Ok(match kind {
            TagKind::Closing => Self::Closing {
                element,
                trailing: None,
            },
            TagKind::SelfClosing => Self::SelfClosing {
                element,
                attributes,
            },
            // Comment and Content returned above.
            TagKind::Opening | TagKind::Comment | TagKind::Content => Self::Opening {
                element,
                attributes,
            },
        })
    }

    /// An opening tag with no attributes.
    pub fn opening(element: &str) -> Self {
        Self::element_tag(element, TagKind::Opening)
    }

    /// A closing tag.
    pub fn closing(element: &str) -> Self {
        Self::element_tag(element, TagKind::Closing)
    }

    /// A self-closing tag with no attributes.
    pub fn self_closing(element: &str) -> Self {
        Self::element_tag(element, TagKind::SelfClosing)
    }

    fn element_tag(element: &str, kind: TagKind) -> Self {
        let element = element.to_string();
        match (kind, is_self_closing_element(&element)) {
            (TagKind::Closing, false) => Self::Closing {
                element,
                trailing: None,
            },
            (TagKind::Opening, false) => Self::Opening {
                element,
                attributes: Vec::new(),
            },
            _ => Self::SelfClosing {
                element,
                attributes: Vec::new(),
            },
        }
    }

    /// A closing tag that renders `trailing` right after itself.
    pub fn closing_with_trailing(element: &str, trailing: &str) -> Self {
        match Self::closing(element) {
            Self::Closing { element, .. } => Self::Closing {
                element,
                trailing: Some(trailing.to_string()),
            },
            other => other,
        }
    }

    pub fn comment(text: &str) -> Self {
        Self::Comment {
            text: text.to_string(),
        }
    }

    pub fn content(text: &str) -> Self {
        Self::Content {
            text: text.to_string(),
        }
    }

    pub fn kind(&self) -> TagKind {
        match self {
            Self::Opening { .. } => TagKind::Opening,
            Self::Closing { .. } => TagKind::Closing,
            Self::SelfClosing { .. } => TagKind::SelfClosing,
            Self::Comment { .. } => TagKind::Comment,
            Self::Content { .. } => TagKind::Content,
        }
    }

    /// Element name as written, `None` for comments and content.
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::Opening { element, .. }
            | Self::Closing { element, .. }
            | Self::SelfClosing { element, .. } => Some(element.as_str()),
            Self::Comment { .. } | Self::Content { .. } => None,
        }
    }

    /// Comment body or content text, `None` for element tags.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Comment { text } | Self::Content { text } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Attributes in source order. Always empty for closing tags.
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::Opening { attributes, .. } | Self::SelfClosing { attributes, .. } => {
                attributes.as_slice()
            }
            _ => &[],
        }
    }

    pub fn trailing(&self) -> Option<&str> {
        match self {
            Self::Closing { trailing, .. } => trailing.as_deref(),
            _ => None,
        }
    }

    pub fn is_opening(&self) -> bool {
        matches!(self, Self::Opening { .. })
    }

    pub fn is_closing(&self) -> bool {
        matches!(self, Self::Closing { .. })
    }

    /// True for tags that need no closing counterpart, such as `<br/>`.
    pub fn is_self_closing(&self) -> bool {
        matches!(self, Self::SelfClosing { .. })
    }

    /// True for comments and content.
    pub fn is_not_tag(&self) -> bool {
        matches!(self, Self::Comment { .. } | Self::Content { .. })
    }

    /// True if one tag opens and the other closes the same element,
    /// in either order (`<body>` and `</BODY>`).
    pub fn matches(&self, other: &Tag) -> bool {
        let opposite = matches!(
            (self, other),
            (Self::Opening { .. }, Self::Closing { .. }) | (Self::Closing { .. }, Self::Opening { .. })
        );
        opposite && self.match_equals(other)
    }

    /// True if both tags name the same element (ignoring case), or neither
    /// names one.
    pub fn match_equals(&self, other: &Tag) -> bool {
        match (self.element(), other.element()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        }
    }

    /// The complementary tag: `<b>` gives `</b>` and back. Self-closing tags
    /// complement themselves. Comments and content have none.
    pub fn matching(&self) -> Option<Tag> {
        match self {
            Self::Opening { element, .. } => Some(Self::Closing {
                element: element.clone(),
                trailing: None,
            }),
            Self::Closing { element, .. } => Some(Self::Opening {
                element: element.clone(),
                attributes: Vec::new(),
            }),
            Self::SelfClosing { element, .. } => Some(Self::SelfClosing {
                element: element.clone(),
                attributes: Vec::new(),
            }),
            Self::Comment { .. } | Self::Content { .. } => None,
        }
    }
}

fn parse_attributes(mut rest: &str) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    rest = rest.trim();

    while !rest.is_empty() {
        let consumed = match ATTRIBUTE.captures(rest) {
            Some(caps) => {
                attributes.push(Attribute::new(&caps[1], Some(&caps[2])));
                caps[0].len()
            }
            None => {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                attributes.push(Attribute::new(&rest[..end], None));
                end
            }
        };
        rest = rest[consumed..].trim_start();
    }

    attributes
}

fn eq_ignore_case(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && eq_ignore_case(self.element(), other.element())
            && eq_ignore_case(self.payload(), other.payload())
            && self.attributes() == other.attributes()
            && self.trailing() == other.trailing()
    }
}

impl Eq for Tag {}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment { text } => write!(f, "<!--{text}-->"),
            Self::Content { text } => f.write_str(text),
            Self::Opening {
                element,
                attributes,
            } => {
                write!(f, "<{element}")?;
                write_attributes(f, attributes)?;
                f.write_str(">")
            }
            Self::Closing { element, trailing } => {
                write!(f, "</{element}>{}", trailing.as_deref().unwrap_or(""))
            }
            Self::SelfClosing {
                element,
                attributes,
            } => {
                write!(f, "<{element}")?;
                write_attributes(f, attributes)?;
                f.write_str("/>")
            }
        }
    }
}

fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &[Attribute]) -> fmt::Result {
    for attribute in attributes {
        write!(f, " {attribute}")?;
    }
    Ok(())
}
