//! One editing session per open document.
//!
//! [`EditorSession`] owns the document together with everything derived from it (attribute
//! store, find state, syntax timer) and talks to the display surface through an
//! [`EditorHost`]. All methods run to completion on the caller's thread.
//!
//! # Example
//!
//! ```rust
//! use range_engine::{
//!     DocumentProcessor, EditorHost, EditorSession, EngineConfig, FindOutcome, ProcessingEdit,
//!     TextRange, Document,
//! };
//! use std::convert::Infallible;
//!
//! struct Surface;
//!
//! impl EditorHost for Surface {
//!     fn select_range(&mut self, range: TextRange<'_>) {
//!         println!("select {:?}", range.offsets());
//!     }
//!     fn notify_user(&mut self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! struct NoColors;
//!
//! impl DocumentProcessor for NoColors {
//!     type Error = Infallible;
//!     fn process(&mut self, _: &Document) -> Result<Vec<ProcessingEdit>, Infallible> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let mut session = EditorSession::new(Surface, NoColors, EngineConfig::default());
//! session.load_text("one two one").unwrap();
//! assert_eq!(session.on_search_text_changed("one"), FindOutcome::Matches(2));
//! assert_eq!(session.find_next(), Some(0));
//! assert_eq!(session.find_next(), Some(1));
//! assert_eq!(session.find_next(), Some(0));
//! ```

use crate::attributes::AttributeStore;
use crate::config::EngineConfig;
use crate::document::{Document, Segment};
use crate::error::EngineError;
use crate::find::{FindEngine, FindOutcome, Navigation};
use crate::host::EditorHost;
use crate::processing::DocumentProcessor;
use crate::scanner::ComparisonMode;
use crate::syntax::SyntaxEngine;
use std::fmt::Display;
use std::time::Instant;

/// Document + derived state + host callbacks for one open document.
pub struct EditorSession<H, P> {
    document: Document,
    attributes: AttributeStore,
    find: FindEngine,
    syntax: SyntaxEngine<P>,
    host: H,
    config: EngineConfig,
    /// The find bar holds a query, whether or not it currently matches.
    search_active: bool,
}

impl<H, P> EditorSession<H, P>
where
    H: EditorHost,
    P: DocumentProcessor,
    P::Error: Display,
{
    /// Create a session over an empty document.
    pub fn new(host: H, processor: P, config: EngineConfig) -> Self {
        Self::with_document(host, processor, config, Document::empty())
    }

    /// Create a session over an existing document. Nothing is colored until the first
    /// [`Self::force_resync`] or debounce fire.
    pub fn with_document(host: H, processor: P, config: EngineConfig, document: Document) -> Self {
        Self {
            document,
            attributes: AttributeStore::new(),
            find: FindEngine::new(),
            syntax: SyntaxEngine::new(processor, config.debounce()),
            host,
            config,
            search_active: false,
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Painted attributes.
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Find state.
    pub fn find_engine(&self) -> &FindEngine {
        &self.find
    }

    /// Syntax timer and processor.
    pub fn syntax_engine(&self) -> &SyntaxEngine<P> {
        &self.syntax
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Session configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns `true` while a search query is active (set by a search, cleared on close).
    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    /// Plain-text projection (what a save writes out).
    pub fn plain_text(&self) -> String {
        self.document.text()
    }

    /// Replace the document with `text` (file open) and recolor immediately.
    pub fn load_text(&mut self, text: &str) -> Result<(), EngineError> {
        self.document.set_text(text);
        self.attributes.clear_all();
        self.find.clear(&mut self.attributes);
        self.search_active = false;
        tracing::debug!(
            "session: loaded {} chars at version {}",
            self.document.char_count(),
            self.document.version()
        );
        self.force_resync()
    }

    /// Empty the document (new file).
    pub fn new_document(&mut self) {
        self.document.clear();
        self.attributes.clear_all();
        self.find.clear(&mut self.attributes);
        self.search_active = false;
    }

    /// Insert `text` at `offset` (clamped to the end).
    pub fn insert_text(&mut self, offset: usize, text: &str, now: Instant) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.document.char_count());
        self.document.insert(offset, text);
        self.attributes
            .update_for_insertion(offset, text.chars().count());
        self.on_document_edited(now);
    }

    /// Delete `length` characters at `start` (clamped to the document).
    pub fn delete_text(&mut self, start: usize, length: usize, now: Instant) {
        let char_count = self.document.char_count();
        let start = start.min(char_count);
        let length = length.min(char_count - start);
        if length == 0 {
            return;
        }
        self.document.delete(start, length);
        self.attributes.update_for_deletion(start, start + length);
        self.on_document_edited(now);
    }

    /// Append a segment (text run or embedded object).
    pub fn push_segment(&mut self, segment: Segment, now: Instant) {
        self.document.push_segment(segment);
        self.on_document_edited(now);
    }

    /// Notify the session that the document changed at `now`.
    ///
    /// Restarts the syntax debounce and rebuilds an active match set against the new text.
    pub fn on_document_edited(&mut self, now: Instant) {
        self.syntax.on_document_edited(now);

        if self.search_active {
            let outcome = self.find.rescan(&self.document, &mut self.attributes);
            tracing::trace!("session: match set rebuilt after edit: {outcome:?}");
        }
    }

    /// Search-field change: full rescan and repaint of search highlights.
    pub fn on_search_text_changed(&mut self, text: &str) -> FindOutcome {
        let mode = self.comparison_mode();
        let outcome =
            self.find
                .on_search_text_changed(&self.document, &mut self.attributes, text, mode);
        if outcome != FindOutcome::EmptyQuery {
            self.search_active = true;
        }
        if outcome == FindOutcome::NoMatches {
            self.notify_not_found();
        }
        outcome
    }

    /// Select the next match. Returns the selected index.
    pub fn find_next(&mut self) -> Option<usize> {
        let navigation = self.find.find_next(&self.document, &mut self.attributes);
        if navigation != Navigation::Inactive {
            self.search_active = true;
        }
        deliver_navigation(&mut self.host, &self.config, self.find.query(), navigation)
    }

    /// Select the previous match. Returns the selected index.
    pub fn find_previous(&mut self) -> Option<usize> {
        let navigation = self
            .find
            .find_previous(&self.document, &mut self.attributes);
        if navigation != Navigation::Inactive {
            self.search_active = true;
        }
        deliver_navigation(&mut self.host, &self.config, self.find.query(), navigation)
    }

    /// Remove all search highlights (find bar closed).
    pub fn clear_highlights(&mut self) {
        self.find.clear(&mut self.attributes);
        self.search_active = false;
    }

    /// Recolor now, e.g. after a bulk load.
    pub fn force_resync(&mut self) -> Result<(), EngineError> {
        self.syntax
            .force_resync(&self.document, &mut self.attributes)
    }

    /// Drive the syntax debounce from the host's event loop. Returns `true` if it recolored.
    pub fn tick(&mut self, now: Instant) -> Result<bool, EngineError> {
        self.syntax.tick(now, &self.document, &mut self.attributes)
    }

    /// Deliver a host-timed debounce fire for `generation`; stale generations are dropped.
    pub fn fire_syntax(&mut self, generation: u64) -> Result<bool, EngineError> {
        self.syntax
            .fire(generation, &self.document, &mut self.attributes)
    }

    fn comparison_mode(&self) -> ComparisonMode {
        let case_sensitive = self
            .host
            .comparison_mode_requested()
            .unwrap_or(self.config.case_sensitive);
        ComparisonMode::from_case_sensitive(case_sensitive)
    }

    fn notify_not_found(&mut self) {
        notify_not_found(&mut self.host, &self.config, self.find.query());
    }
}

/// Forward a navigation result to the host. Returns the selected index.
fn deliver_navigation<H: EditorHost>(
    host: &mut H,
    config: &EngineConfig,
    query: &str,
    navigation: Navigation<'_>,
) -> Option<usize> {
    match navigation {
        Navigation::Selected { index, range } => {
            host.select_range(range);
            Some(index)
        }
        Navigation::NoMatches => {
            notify_not_found(host, config, query);
            None
        }
        Navigation::Inactive => None,
    }
}

fn notify_not_found<H: EditorHost>(host: &mut H, config: &EngineConfig, query: &str) {
    tracing::debug!("session: no matches for '{query}'");
    host.notify_user(&config.not_found_message);
}
