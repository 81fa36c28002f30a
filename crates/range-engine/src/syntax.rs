//! Debounced syntax coloring.
//!
//! ```text
//! Quiescent --edit--> Pending --(interval with no edit)--> Quiescent (recolored)
//!                      ^   |
//!                      +---+ edit restarts the deadline
//! ```
//!
//! Each recomputation is a full re-tokenization: the syntax layer is wiped and every span the
//! processor reports is painted again, in order, so later passes win on overlap.

use crate::attributes::AttributeStore;
use crate::debounce::Debouncer;
use crate::document::Document;
use crate::error::EngineError;
use crate::offset_index::OffsetIndex;
use crate::processing::{DocumentProcessor, ProcessingEdit};
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Syntax engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxState {
    /// Colors reflect the document (or nothing is scheduled).
    Quiescent,
    /// An edit arrived and the debounce deadline is armed.
    Pending,
}

/// Drives a [`DocumentProcessor`] behind an edit-quiescence timer.
#[derive(Debug)]
pub struct SyntaxEngine<P> {
    processor: P,
    debouncer: Debouncer,
    recompute_count: u64,
}

impl<P> SyntaxEngine<P> {
    /// Create an engine with the given quiescence interval.
    pub fn new(processor: P, interval: Duration) -> Self {
        Self {
            processor,
            debouncer: Debouncer::new(interval),
            recompute_count: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> SyntaxState {
        if self.debouncer.is_pending() {
            SyntaxState::Pending
        } else {
            SyntaxState::Quiescent
        }
    }

    /// The wrapped processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Mutable access to the wrapped processor.
    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    /// The debounce timer.
    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// How many full recomputations have run.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Record an edit at `now`; restarts the deadline. Returns the edit generation.
    pub fn on_document_edited(&mut self, now: Instant) -> u64 {
        let generation = self.debouncer.schedule(now);
        tracing::trace!(
            "syntax: edit generation {} scheduled for {:?}",
            generation,
            self.debouncer.deadline()
        );
        generation
    }
}

impl<P> SyntaxEngine<P>
where
    P: DocumentProcessor,
    P::Error: Display,
{
    /// Recompute if the debounce deadline has passed. Returns `true` if colors were reapplied.
    pub fn tick(
        &mut self,
        now: Instant,
        document: &Document,
        store: &mut AttributeStore,
    ) -> Result<bool, EngineError> {
        let Some(generation) = self.debouncer.poll(now) else {
            return Ok(false);
        };
        tracing::debug!("syntax: generation {generation} quiescent, recoloring");
        self.recompute(document, store)?;
        Ok(true)
    }

    /// Recompute for an externally timed `generation`.
    ///
    /// Skipped if a newer edit superseded it or its deadline was already consumed.
    pub fn fire(
        &mut self,
        generation: u64,
        document: &Document,
        store: &mut AttributeStore,
    ) -> Result<bool, EngineError> {
        if !self.debouncer.take(generation) {
            tracing::debug!(
                "syntax: skipping generation {} (current {}, pending: {})",
                generation,
                self.debouncer.generation(),
                self.debouncer.is_pending()
            );
            return Ok(false);
        }
        self.recompute(document, store)?;
        Ok(true)
    }

    /// Recompute now, dropping any pending deadline.
    pub fn force_resync(
        &mut self,
        document: &Document,
        store: &mut AttributeStore,
    ) -> Result<(), EngineError> {
        self.debouncer.cancel();
        self.recompute(document, store)
    }

    fn recompute(
        &mut self,
        document: &Document,
        store: &mut AttributeStore,
    ) -> Result<(), EngineError> {
        let edits = self
            .processor
            .process(document)
            .map_err(|err| EngineError::Processor(err.to_string()))?;
        apply_processing_edits(document, store, edits);
        self.recompute_count += 1;
        Ok(())
    }
}

/// Apply processor output to `store`, resolving every span against `document`.
pub fn apply_processing_edits(
    document: &Document,
    store: &mut AttributeStore,
    edits: Vec<ProcessingEdit>,
) {
    for edit in edits {
        match edit {
            ProcessingEdit::ReplaceLayer { layer, spans } => {
                store.reset_layer(layer);
                let index = OffsetIndex::new(document);
                let mut painted = 0usize;
                for categorized in spans {
                    if categorized.span.is_empty() {
                        continue;
                    }
                    if categorized.category.layer() != Some(layer) {
                        tracing::warn!(
                            "syntax: {:?} does not belong to layer {:?}, skipped",
                            categorized.category,
                            layer
                        );
                        continue;
                    }
                    store.apply_attribute(&index.range(categorized.span), categorized.category);
                    painted += 1;
                }
                tracing::debug!(
                    "syntax: painted {painted} spans on {:?} at version {}",
                    layer,
                    document.version()
                );
            }
            ProcessingEdit::ClearLayer { layer } => store.reset_layer(layer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeCategory, AttributeLayer};
    use crate::processing::CategorizedSpan;
    use crate::scanner::MatchSpan;
    use std::convert::Infallible;

    /// Paints every occurrence of `x` as a keyword.
    #[derive(Debug, Default)]
    struct MarkX {
        calls: usize,
    }

    impl DocumentProcessor for MarkX {
        type Error = Infallible;

        fn process(&mut self, document: &Document) -> Result<Vec<ProcessingEdit>, Infallible> {
            self.calls += 1;
            let spans = document
                .text()
                .chars()
                .enumerate()
                .filter(|(_, ch)| *ch == 'x')
                .map(|(i, _)| CategorizedSpan::new(MatchSpan::new(i, 1), AttributeCategory::Keyword))
                .collect();
            Ok(vec![ProcessingEdit::ReplaceLayer {
                layer: AttributeLayer::SYNTAX,
                spans,
            }])
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_of_edits_recolors_once() {
        let t0 = Instant::now();
        let mut doc = Document::new("");
        let mut store = AttributeStore::new();
        let mut engine = SyntaxEngine::new(MarkX::default(), ms(200));

        for (i, ch) in ["a", "x", "b", "x"].into_iter().enumerate() {
            let now = t0 + ms(i as u64 * 50);
            doc.insert(doc.char_count(), ch);
            engine.on_document_edited(now);
            assert_eq!(engine.state(), SyntaxState::Pending);
            assert!(!engine.tick(now, &doc, &mut store).unwrap());
        }

        assert!(!engine.tick(t0 + ms(349), &doc, &mut store).unwrap());
        assert!(engine.tick(t0 + ms(350), &doc, &mut store).unwrap());
        assert!(!engine.tick(t0 + ms(900), &doc, &mut store).unwrap());

        assert_eq!(engine.processor().calls, 1);
        assert_eq!(engine.recompute_count(), 1);
        assert_eq!(engine.state(), SyntaxState::Quiescent);
        assert_eq!(store.spans(AttributeLayer::SYNTAX).len(), 2);
    }

    #[test]
    fn test_stale_external_fire_is_skipped() {
        let t0 = Instant::now();
        let doc = Document::new("x");
        let mut store = AttributeStore::new();
        let mut engine = SyntaxEngine::new(MarkX::default(), ms(200));

        let first = engine.on_document_edited(t0);
        let second = engine.on_document_edited(t0 + ms(10));
        assert!(!engine.fire(first, &doc, &mut store).unwrap());
        assert!(engine.fire(second, &doc, &mut store).unwrap());
        assert_eq!(engine.processor().calls, 1);
    }

    #[test]
    fn test_redelivered_fire_recolors_once() {
        let t0 = Instant::now();
        let doc = Document::new("x");
        let mut store = AttributeStore::new();
        let mut engine = SyntaxEngine::new(MarkX::default(), ms(200));

        let generation = engine.on_document_edited(t0);
        assert!(engine.fire(generation, &doc, &mut store).unwrap());
        assert!(!engine.fire(generation, &doc, &mut store).unwrap());
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn test_tick_then_fire_recolors_once() {
        let t0 = Instant::now();
        let doc = Document::new("x");
        let mut store = AttributeStore::new();
        let mut engine = SyntaxEngine::new(MarkX::default(), ms(200));

        let generation = engine.on_document_edited(t0);
        assert!(engine.tick(t0 + ms(200), &doc, &mut store).unwrap());
        assert!(!engine.fire(generation, &doc, &mut store).unwrap());
        assert!(!engine.tick(t0 + ms(400), &doc, &mut store).unwrap());
        assert_eq!(engine.recompute_count(), 1);
        assert_eq!(engine.processor().calls, 1);
    }

    #[test]
    fn test_fire_after_force_resync_is_skipped() {
        let t0 = Instant::now();
        let doc = Document::new("x");
        let mut store = AttributeStore::new();
        let mut engine = SyntaxEngine::new(MarkX::default(), ms(200));

        let generation = engine.on_document_edited(t0);
        engine.force_resync(&doc, &mut store).unwrap();
        assert!(!engine.fire(generation, &doc, &mut store).unwrap());
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn test_force_resync_replaces_layer() {
        let mut doc = Document::new("x x");
        let mut store = AttributeStore::new();
        let mut engine = SyntaxEngine::new(MarkX::default(), ms(200));

        engine.force_resync(&doc, &mut store).unwrap();
        assert_eq!(store.spans(AttributeLayer::SYNTAX).len(), 2);

        doc.set_text("x");
        engine.force_resync(&doc, &mut store).unwrap();
        assert_eq!(store.spans(AttributeLayer::SYNTAX).len(), 1);
    }

    #[test]
    fn test_wrong_layer_spans_are_skipped() {
        let doc = Document::new("abc");
        let mut store = AttributeStore::new();
        apply_processing_edits(
            &doc,
            &mut store,
            vec![ProcessingEdit::ReplaceLayer {
                layer: AttributeLayer::SYNTAX,
                spans: vec![CategorizedSpan::new(
                    MatchSpan::new(0, 1),
                    AttributeCategory::SearchHighlight,
                )],
            }],
        );
        assert_eq!(store.painted_count(), 0);
    }
}
