//! Generic document processing interfaces.
//!
//! Highlighters (see `range-engine-highlight-simple`) produce [`ProcessingEdit`] values from a
//! document snapshot; the [`SyntaxEngine`](crate::syntax::SyntaxEngine) applies them to an
//! [`AttributeStore`](crate::attributes::AttributeStore).

use crate::attributes::{AttributeCategory, AttributeLayer};
use crate::document::Document;
use crate::scanner::MatchSpan;

/// A match span tagged with the category it should be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorizedSpan {
    /// Span in projection character offsets.
    pub span: MatchSpan,
    /// Category to paint.
    pub category: AttributeCategory,
}

impl CategorizedSpan {
    /// Create a new categorized span.
    pub fn new(span: MatchSpan, category: AttributeCategory) -> Self {
        Self { span, category }
    }
}

/// A change to derived attribute state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEdit {
    /// Clear `layer` over the whole document, then paint `spans` in order.
    ///
    /// Later spans overwrite earlier ones where they overlap.
    ReplaceLayer {
        /// The layer being replaced.
        layer: AttributeLayer,
        /// Spans in paint order.
        spans: Vec<CategorizedSpan>,
    },
    /// Clear a layer.
    ClearLayer {
        /// The layer being cleared.
        layer: AttributeLayer,
    },
}

/// A generic processor that produces [`ProcessingEdit`]s for a document.
pub trait DocumentProcessor {
    /// The error type returned by [`DocumentProcessor::process`].
    type Error;

    /// Compute attribute updates for `document`.
    ///
    /// Implementations must not retain anything derived from `document` across calls; the
    /// next call may see a different version.
    fn process(&mut self, document: &Document) -> Result<Vec<ProcessingEdit>, Self::Error>;
}
