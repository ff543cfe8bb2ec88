use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tag::{Tag, TagKind};
use crate::{Block, LexerError};

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<\s*(/)?\s*([^>]*[^/>\s])\s*(/)?\s*>").expect("valid tag pattern")
});
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<!--(.*?)-->").expect("valid comment pattern"));
static SCRIPT_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*/\s*script\s*>").expect("valid script pattern"));
static ANY_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*/\s*[^>]+>").expect("valid closing tag pattern"));

/// Where and why the tokenizer stopped matching before the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stall {
    pub block: Block,
    /// Byte offset into the source.
    pub offset: usize,
}

/// Tag tokenizer.
///
/// Produces one [`Tag`] per call to `next`. The only state beyond the
/// position is the name of the element opened by the previous tag, which
/// switches content scanning into `<script>` mode.
///
/// A `<` that does not start a tag, or a comment that is never closed,
/// stalls the tokenizer: it yields nothing more even though text remains.
/// [`Tokenizer::stall`] reports where.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    end: usize,
    prev_opened: Option<String>,
    stall: Option<Stall>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            end: source.trim_end().len(),
            prev_opened: None,
            stall: None,
        }
    }

    /// Tokenize the whole source, stopping silently at a stall.
    pub fn tokenize(source: &str) -> Vec<Tag> {
        Tokenizer::new(source).collect()
    }

    /// Tokenize the whole source, reporting a stall as
    /// [`LexerError::UnterminatedBlock`].
    pub fn tokenize_strict(source: &str) -> Result<Vec<Tag>, LexerError> {
        let mut tokenizer = Tokenizer::new(source);
        let tags: Vec<Tag> = tokenizer.by_ref().collect();
        match tokenizer.stall {
            Some(stall) => Err(tokenizer.stall_error(stall)),
            None => Ok(tags),
        }
    }

    /// True while unconsumed, non-whitespace text remains and the tokenizer
    /// has not stalled.
    pub fn has_next(&self) -> bool {
        self.stall.is_none() && !self.remaining().is_empty()
    }

    /// The unconsumed text, without surrounding whitespace.
    pub fn remaining(&self) -> &'a str {
        self.source[self.pos..self.end].trim_start()
    }

    pub fn stall(&self) -> Option<Stall> {
        self.stall
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..self.end]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn in_script(&self) -> bool {
        self.prev_opened
            .as_deref()
            .is_some_and(|element| element.eq_ignore_ascii_case("script"))
    }

    fn halt(&mut self, block: Block) -> Option<Tag> {
        log::warn!(
            "tokenizer stopped at byte {}: unterminated {block}, {} bytes left unread",
            self.pos,
            self.end - self.pos
        );
        self.stall = Some(Stall {
            block,
            offset: self.pos,
        });
        None
    }

    fn stall_error(&self, stall: Stall) -> LexerError {
        let before = &self.source[..stall.offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        LexerError::UnterminatedBlock {
            block: stall.block,
            line,
            column,
        }
    }

    // --- Scanners ---

    /// `<!--text-->`. The body may be empty and may span lines.
    fn scan_comment(&mut self) -> Option<Tag> {
        let Some(caps) = COMMENT.captures(self.rest()) else {
            return self.halt(Block::Comment);
        };
        let text = caps.get(1).map_or("", |m| m.as_str());
        let tag = Tag::comment(text);
        self.pos += caps[0].len();
        self.prev_opened = None;
        Some(tag)
    }

    /// An opening, closing, or self-closing tag.
    fn scan_element(&mut self) -> Option<Tag> {
        let Some(caps) = TAG.captures(self.rest()) else {
            return self.halt(Block::Tag);
        };
        // A leading slash wins over a trailing one.
        let kind = if caps.get(1).is_some() {
            TagKind::Closing
        } else if caps.get(3).is_some() {
            TagKind::SelfClosing
        } else {
            TagKind::Opening
        };
        let Ok(tag) = Tag::new(&caps[2], kind) else {
            return self.halt(Block::Tag);
        };
        self.pos += caps[0].len();
        self.prev_opened = if tag.is_opening() {
            tag.element().map(str::to_owned)
        } else {
            None
        };
        Some(tag)
    }

    /// Text up to the next closing tag, which is left for the next call.
    /// Inside `<script>` only `</script>` ends the text. Without any
    /// terminator the text runs to the end of input.
    fn scan_content(&mut self) -> Option<Tag> {
        let rest = self.rest();
        let terminator = if self.in_script() {
            &*SCRIPT_CLOSE
        } else {
            &*ANY_CLOSE
        };
        let len = terminator.find(rest).map_or(rest.len(), |m| m.start());
        self.prev_opened = None;

        // `<script></script>` has no body to emit.
        if len == 0 {
            return self.scan_element();
        }

        self.pos += len;
        Some(Tag::content(&rest[..len]))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        if self.stall.is_some() {
            return None;
        }
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }

        let tag = if rest.starts_with("<!--") {
            self.scan_comment()
        } else if rest.starts_with('<') && !self.in_script() {
            self.scan_element()
        } else {
            self.scan_content()
        };

        if let Some(tag) = &tag {
            log::trace!("{:?} at byte {}: {tag}", tag.kind(), self.pos);
        }
        tag
    }
}

impl FromStr for Tag {
    type Err = LexerError;

    /// Parse a literal holding exactly one tag, such as `<table>`, `</p>`,
    /// `<br/>` or `<!-- x -->`.
    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let trimmed = literal.trim();
        let invalid = || LexerError::InvalidTagLiteral(literal.to_string());
        if !trimmed.starts_with('<') {
            return Err(invalid());
        }

        let mut tokenizer = Tokenizer::new(trimmed);
        let tag = if trimmed.starts_with("<!--") {
            tokenizer.scan_comment()
        } else {
            tokenizer.scan_element()
        };
        match tag {
            Some(tag) if !tokenizer.has_next() => Ok(tag),
            _ => Err(invalid()),
        }
    }
}
