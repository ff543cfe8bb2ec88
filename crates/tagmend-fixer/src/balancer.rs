//! Nesting repair.
//!
//! Walks a flat tag sequence with a stack of open elements and produces a
//! properly nested sequence:
//!
//! ```text
//! <b><i>hi</b>   →   <b> <i> hi </i> </b>
//! <p>text        →   <p> text </p>
//! </div>         →   (nothing)
//! ```
//!
//! A closing tag that does not match the innermost open element is taken to
//! mean the author forgot to close everything opened after its real
//! partner, so those elements are closed first. A closing tag with no open
//! partner at all is dropped.

use tagmend_lexer::Tag;

use crate::sequence::TagSequence;

/// What the balancer changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceReport {
    /// Closing tags inserted for elements left open.
    pub synthesized: usize,
    /// Closing tags dropped because nothing they could close was open.
    pub discarded: usize,
}

impl BalanceReport {
    pub fn is_clean(&self) -> bool {
        self.synthesized == 0 && self.discarded == 0
    }
}

/// Balance `tags`, consuming them.
pub fn balance(tags: TagSequence) -> TagSequence {
    balance_with_report(tags).0
}

/// Balance `tags` and report how many tags were inserted or dropped.
pub fn balance_with_report(mut tags: TagSequence) -> (TagSequence, BalanceReport) {
    let mut open: Vec<Tag> = Vec::new();
    let mut output = TagSequence::new();
    let mut report = BalanceReport::default();

    while let Some(tag) = tags.pop_front() {
        match tag {
            Tag::Opening { .. } => {
                open.push(tag.clone());
                output.push_back(tag);
            }
            Tag::Closing { .. } => close_until_match(tag, &mut open, &mut output, &mut report),
            Tag::SelfClosing { .. } | Tag::Comment { .. } | Tag::Content { .. } => {
                output.push_back(tag);
            }
        }
    }

    // Close whatever is still open, innermost first.
    while let Some(top) = open.pop() {
        synthesize_close(&top, &mut output, &mut report);
    }

    if !report.is_clean() {
        log::debug!(
            "balanced: {} closing tags inserted, {} dropped",
            report.synthesized,
            report.discarded
        );
    }
    (output, report)
}

fn close_until_match(
    closing: Tag,
    open: &mut Vec<Tag>,
    output: &mut TagSequence,
    report: &mut BalanceReport,
) {
    while let Some(top) = open.pop() {
        if top.matches(&closing) {
            output.push_back(closing);
            return;
        }
        synthesize_close(&top, output, report);
    }

    log::debug!("dropping unmatched {closing}");
    report.discarded += 1;
}

fn synthesize_close(top: &Tag, output: &mut TagSequence, report: &mut BalanceReport) {
    if let Some(close) = top.matching() {
        log::debug!("closing unclosed {top} with {close}");
        output.push_back(close);
        report.synthesized += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagmend_lexer::Tokenizer;

    /// Helper: tokenize, balance, and show each tag as text.
    fn fixed(source: &str) -> Vec<String> {
        balance(Tokenizer::tokenize(source).into())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn report(source: &str) -> BalanceReport {
        balance_with_report(Tokenizer::tokenize(source).into()).1
    }

    #[test]
    fn test_empty() {
        assert!(balance(TagSequence::new()).is_empty());
    }

    #[test]
    fn test_missing_inner_close() {
        assert_eq!(fixed("<b><i>hi</b>"), vec!["<b>", "<i>", "hi", "</i>", "</b>"]);
        assert_eq!(
            report("<b><i>hi</b>"),
            BalanceReport {
                synthesized: 1,
                discarded: 0,
            }
        );
    }

    #[test]
    fn test_missing_close_at_end() {
        assert_eq!(fixed("<p>text"), vec!["<p>", "text", "</p>"]);
    }

    #[test]
    fn test_orphan_close_dropped() {
        assert_eq!(fixed("</div>"), Vec::<String>::new());
        assert_eq!(
            report("</div>"),
            BalanceReport {
                synthesized: 0,
                discarded: 1,
            }
        );
    }

    #[test]
    fn test_orphan_close_unwinds_everything_open() {
        // `</table>` matches nothing: every open element gets closed on the
        // way down, then `</table>` itself is dropped.
        assert_eq!(
            fixed("<div><span>x</table>y</div>"),
            vec!["<div>", "<span>", "x", "</span>", "</div>", "y"]
        );
        assert_eq!(
            report("<div><span>x</table>y</div>"),
            BalanceReport {
                synthesized: 2,
                discarded: 2,
            }
        );
    }

    #[test]
    fn test_unclosed_elements_closed_innermost_first() {
        assert_eq!(
            fixed("<html><body><ul><li>one"),
            vec![
                "<html>", "<body>", "<ul>", "<li>", "one", "</li>", "</ul>", "</body>", "</html>",
            ]
        );
    }

    #[test]
    fn test_case_insensitive_match_keeps_original_close() {
        assert_eq!(fixed("<DIV>x</div>"), vec!["<DIV>", "x", "</div>"]);
    }

    #[test]
    fn test_synthesized_close_uses_open_spelling() {
        assert_eq!(fixed("<Section><P>x</section>"), vec![
            "<Section>",
            "<P>",
            "x",
            "</P>",
            "</section>",
        ]);
    }

    #[test]
    fn test_self_closing_comments_and_content_pass_through() {
        let tags = vec![
            Tag::self_closing("br"),
            Tag::comment(" c "),
            Tag::content("text"),
        ];
        assert_eq!(balance(tags.clone().into()).snapshot(), tags);
    }

    #[test]
    fn test_synthesized_close_drops_attributes() {
        assert_eq!(
            fixed("<a href=\"/\">home"),
            vec!["<a href=\"/\">", "home", "</a>"]
        );
    }

    #[test]
    fn test_properly_nested_is_fixed_point() {
        let source = "<html><head><title>t</title></head><body><!-- c --><p>a<br/>b</p>\
                      <ul><li>x</li><li>y</li></ul></body></html>";
        let tags: TagSequence = Tokenizer::tokenize(source).into();
        assert_eq!(balance(tags.clone()), tags);
        assert!(report(source).is_clean());
    }

    #[test]
    fn test_idempotent() {
        for source in [
            "<b><i>hi</b>",
            "<p>text",
            "</div>",
            "<div><span>x</table>y</div>",
            "<a><b><c></a></b></c><d>",
        ] {
            let once = balance(Tokenizer::tokenize(source).into());
            let twice = balance(once.clone());
            assert_eq!(twice, once, "{source}");
        }
    }

    #[test]
    fn test_interleaved_closes() {
        assert_eq!(
            fixed("<a><b></a></b>"),
            vec!["<a>", "<b>", "</b>", "</a>"]
        );
    }
}
