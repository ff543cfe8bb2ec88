//! tagmend Fixer
//!
//! Holds tokenized documents as ordered tag sequences and repairs their
//! nesting by inserting the closing tags an author left out.
//!
//! ```
//! use tagmend_fixer::Document;
//!
//! let mut doc = Document::parse("<b><i>hi</b>");
//! doc.fix();
//! assert_eq!(doc.len(), 5);
//! ```

pub mod balancer;
pub mod document;
pub mod sequence;

pub use balancer::{balance, balance_with_report, BalanceReport};
pub use document::Document;
pub use sequence::TagSequence;
