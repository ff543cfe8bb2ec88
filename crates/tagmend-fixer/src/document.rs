use tagmend_lexer::{LexerError, Tag, Tokenizer};

use crate::balancer::{balance_with_report, BalanceReport};
use crate::sequence::TagSequence;

/// A possibly malformed HTML document held as a sequence of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    tags: TagSequence,
}

impl Document {
    /// Create a document holding a copy of `tags`.
    pub fn new(tags: &TagSequence) -> Self {
        Self { tags: tags.clone() }
    }

    /// Tokenize `source`, keeping whatever precedes a stall.
    pub fn parse(source: &str) -> Self {
        Self {
            tags: Tokenizer::tokenize(source).into(),
        }
    }

    /// Tokenize `source`, failing if the tokenizer stalls.
    pub fn parse_strict(source: &str) -> Result<Self, LexerError> {
        Ok(Self {
            tags: Tokenizer::tokenize_strict(source)?.into(),
        })
    }

    /// Append a tag at the end of the document.
    pub fn add(&mut self, tag: Tag) {
        self.tags.push_back(tag);
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.tags.snapshot()
    }

    pub fn sequence(&self) -> &TagSequence {
        &self.tags
    }

    pub fn into_sequence(self) -> TagSequence {
        self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Replace the tags with a properly nested version of them.
    pub fn fix(&mut self) -> BalanceReport {
        let (fixed, report) = balance_with_report(std::mem::take(&mut self.tags));
        self.tags = fixed;
        report
    }
}

impl From<TagSequence> for Document {
    fn from(tags: TagSequence) -> Self {
        Self { tags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_copies_sequence() {
        let mut source = TagSequence::from(vec![
            Tag::opening("b"),
            Tag::closing("b"),
            Tag::self_closing("br"),
        ]);
        let doc = Document::new(&source);
        source.push_back(Tag::content("later"));

        assert_eq!(doc.len(), 3);
        assert_eq!(source.len(), 4);
        assert_eq!(
            doc.tags(),
            vec![Tag::opening("b"), Tag::closing("b"), Tag::self_closing("br")]
        );
    }

    #[test]
    fn test_empty_source() {
        let doc = Document::parse("");
        assert!(doc.is_empty());
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_add_then_fix() {
        let mut doc = Document::parse("<ul><li>one");
        doc.add("<li>".parse().unwrap());
        doc.add(Tag::content("two"));
        doc.add("</ul>".parse().unwrap());

        let report = doc.fix();
        let texts: Vec<String> = doc.tags().iter().map(ToString::to_string).collect();
        assert_eq!(
            texts,
            vec!["<ul>", "<li>", "one", "<li>", "two", "</li>", "</li>", "</ul>"]
        );
        assert_eq!(report.synthesized, 2);
        assert_eq!(report.discarded, 0);
    }

    #[test]
    fn test_tags_is_repeatable() {
        let doc = Document::parse("<p>x</p>");
        assert_eq!(doc.tags(), doc.tags());
        assert_eq!(doc.sequence().len(), 3);
    }

    #[test]
    fn test_fix_twice_is_stable() {
        let mut doc = Document::parse("<b><i>hi</b></p>");
        doc.fix();
        let once = doc.clone();
        let report = doc.fix();
        assert_eq!(doc, once);
        assert!(report.is_clean());
    }

    #[test]
    fn test_parse_strict() {
        assert!(Document::parse_strict("<p>x</p>").is_ok());
        assert!(matches!(
            Document::parse_strict("<p><!-- x"),
            Err(LexerError::UnterminatedBlock { .. })
        ));
        assert_eq!(Document::parse("<p><!-- x").len(), 1);
    }
}
