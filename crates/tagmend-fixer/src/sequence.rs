//! Ordered tag storage.
//!
//! A `TagSequence` is first-in first-out: tags are appended at the tail and
//! drained from the head. Reads from an empty sequence return `None`.

use std::collections::vec_deque::{self, VecDeque};

use serde::Serialize;
use tagmend_lexer::Tag;

/// An ordered FIFO collection of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSequence {
    tags: VecDeque<Tag>,
}

impl TagSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag at the tail.
    pub fn push_back(&mut self, tag: Tag) {
        self.tags.push_back(tag);
    }

    pub fn peek_front(&self) -> Option<&Tag> {
        self.tags.front()
    }

    /// Remove the tag at the head.
    pub fn pop_front(&mut self) -> Option<Tag> {
        self.tags.pop_front()
    }

    /// All tags, in order, as an owned list. The sequence is unchanged.
    pub fn snapshot(&self) -> Vec<Tag> {
        self.tags.iter().cloned().collect()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl From<Vec<Tag>> for TagSequence {
    fn from(tags: Vec<Tag>) -> Self {
        Self { tags: tags.into() }
    }
}

impl FromIterator<Tag> for TagSequence {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl Extend<Tag> for TagSequence {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.tags.extend(iter);
    }
}

impl IntoIterator for TagSequence {
    type Item = Tag;
    type IntoIter = vec_deque::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagSequence {
    type Item = &'a Tag;
    type IntoIter = vec_deque::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
