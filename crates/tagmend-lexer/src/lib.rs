//! tagmend Lexer
//!
//! Splits loosely structured HTML into a flat stream of tags: opening,
//! closing, self-closing, comments, and the raw content between them.
//! `<script>` bodies are taken verbatim up to their closing tag.
//!
//! # Example
//!
//! ```
//! use tagmend_lexer::{Tag, Tokenizer};
//!
//! let tags = Tokenizer::tokenize("<p>hi</p>");
//! assert_eq!(tags.len(), 3);
//! assert_eq!(tags[1], Tag::content("hi"));
//! ```

pub mod tag;
pub mod tokenizer;

use std::fmt;

pub use tag::{is_self_closing_element, Attribute, Tag, TagKind, SELF_CLOSING_ELEMENTS};
pub use tokenizer::{Stall, Tokenizer};

/// The kind of block the tokenizer was inside when it stopped matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// `<!--` without a closing `-->`.
    Comment,
    /// `<` that does not start a well-formed tag.
    Tag,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Comment => f.write_str("comment"),
            Block::Tag => f.write_str("tag"),
        }
    }
}

/// Lexer error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// A tag interior with no element name.
    #[error("Invalid tag: empty tag interior")]
    InvalidTag,

    /// A caller-supplied literal that is not exactly one tag.
    #[error("Invalid tag literal: '{0}'")]
    InvalidTagLiteral(String),

    /// The tokenizer stopped before the end of the source.
    #[error("Lexer error at line {line}, column {column}: unterminated {block}")]
    UnterminatedBlock {
        block: Block,
        line: usize,
        column: usize,
    },
}
