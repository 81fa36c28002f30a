//! Find engine: highlight every match of a search term and cycle through them.
//!
//! ```text
//! Idle --search text--> Scanned --next/prev--> Navigated
//!  ^                       |                       |
//!  +------- clear ---------+-----------------------+
//! ```
//!
//! Every search-text change triggers a full rescan of the document; nothing is incremental.

use crate::attributes::{AttributeCategory, AttributeLayer, AttributeStore};
use crate::document::Document;
use crate::offset_index::{OffsetIndex, TextRange};
use crate::scanner::{self, ComparisonMode, MatchSpan};

/// Find engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindState {
    /// No active match set.
    Idle,
    /// A match set exists, nothing selected yet.
    Scanned,
    /// A match is selected.
    Navigated,
}

/// Result of a search-text change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOutcome {
    /// The search text was empty; nothing happened.
    EmptyQuery,
    /// The scan completed without results.
    NoMatches,
    /// The scan found this many matches.
    Matches(usize),
}

/// Result of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation<'doc> {
    /// A match was selected.
    Selected {
        /// Index of the selected match.
        index: usize,
        /// The match, resolved against the current document.
        range: TextRange<'doc>,
    },
    /// A rescan was needed and found nothing.
    NoMatches,
    /// There is no search text to navigate with.
    Inactive,
}

/// Matches of one completed scan.
#[derive(Debug, Clone)]
struct MatchSet {
    spans: Vec<MatchSpan>,
    version: u64,
    cursor: Option<usize>,
}

/// Find state for one document.
#[derive(Debug, Clone, Default)]
pub struct FindEngine {
    query: String,
    mode: ComparisonMode,
    matches: Option<MatchSet>,
}

impl FindEngine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> FindState {
        match &self.matches {
            None => FindState::Idle,
            Some(set) if set.cursor.is_some() => FindState::Navigated,
            Some(_) => FindState::Scanned,
        }
    }

    /// Last search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Comparison mode of the last scan.
    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    /// Spans of the current match set (empty when idle).
    pub fn matches(&self) -> &[MatchSpan] {
        self.matches
            .as_ref()
            .map(|set| set.spans.as_slice())
            .unwrap_or(&[])
    }

    /// Number of matches in the current set.
    pub fn match_count(&self) -> usize {
        self.matches().len()
    }

    /// Selected match index; `None` before the first navigation.
    pub fn cursor(&self) -> Option<usize> {
        self.matches.as_ref().and_then(|set| set.cursor)
    }

    /// The selected match.
    pub fn current(&self) -> Option<MatchSpan> {
        let set = self.matches.as_ref()?;
        set.spans.get(set.cursor?).copied()
    }

    /// Returns `true` if the match set was computed against an older document version.
    pub fn is_stale(&self, document: &Document) -> bool {
        self.matches
            .as_ref()
            .is_some_and(|set| set.version != document.version())
    }

    /// Handle a search-text change: clear old highlights, rescan, paint new ones.
    ///
    /// Empty text is a no-op. A scan without results leaves the engine idle and the store clear.
    pub fn on_search_text_changed(
        &mut self,
        document: &Document,
        store: &mut AttributeStore,
        text: &str,
        mode: ComparisonMode,
    ) -> FindOutcome {
        if text.is_empty() {
            return FindOutcome::EmptyQuery;
        }

        self.query = text.to_string();
        self.mode = mode;
        self.rescan(document, store)
    }

    /// Rescan with the last search text.
    pub fn rescan(&mut self, document: &Document, store: &mut AttributeStore) -> FindOutcome {
        if self.query.is_empty() {
            return FindOutcome::EmptyQuery;
        }

        self.clear(store);

        let text = document.text();
        let spans: Vec<MatchSpan> = scanner::scan(&text, &self.query, self.mode).collect();
        tracing::debug!(
            "find: '{}' ({:?}) -> {} matches at version {}",
            self.query,
            self.mode,
            spans.len(),
            document.version()
        );

        if spans.is_empty() {
            return FindOutcome::NoMatches;
        }

        let index = OffsetIndex::new(document);
        for span in &spans {
            store.apply_attribute(&index.range(*span), AttributeCategory::SearchHighlight);
        }

        let count = spans.len();
        self.matches = Some(MatchSet {
            spans,
            version: document.version(),
            cursor: None,
        });
        FindOutcome::Matches(count)
    }

    /// Select the next match, wrapping at the end.
    pub fn find_next<'doc>(
        &mut self,
        document: &'doc Document,
        store: &mut AttributeStore,
    ) -> Navigation<'doc> {
        self.navigate(document, store, |cursor, count| (cursor + 1) % count)
    }

    /// Select the previous match, wrapping at the start.
    pub fn find_previous<'doc>(
        &mut self,
        document: &'doc Document,
        store: &mut AttributeStore,
    ) -> Navigation<'doc> {
        self.navigate(document, store, |cursor, count| (cursor + count - 1) % count)
    }

    fn navigate<'doc>(
        &mut self,
        document: &'doc Document,
        store: &mut AttributeStore,
        step: impl Fn(usize, usize) -> usize,
    ) -> Navigation<'doc> {
        if self.matches.is_none() || self.is_stale(document) {
            match self.rescan(document, store) {
                FindOutcome::EmptyQuery => return Navigation::Inactive,
                FindOutcome::NoMatches => return Navigation::NoMatches,
                FindOutcome::Matches(_) => {}
            }
        }

        let Some(set) = self.matches.as_mut() else {
            return Navigation::NoMatches;
        };

        let count = set.spans.len();
        let index = match set.cursor {
            None => 0,
            Some(cursor) => step(cursor, count),
        };
        set.cursor = Some(index);

        let span = set.spans[index];
        Navigation::Selected {
            index,
            range: document.range(span.offset, span.len),
        }
    }

    /// Remove every search highlight and return to idle.
    ///
    /// The search text is kept so a later `find_next` can rescan with it.
    pub fn clear(&mut self, store: &mut AttributeStore) {
        store.reset_layer(AttributeLayer::SEARCH);
        self.matches = None;
    }
}
