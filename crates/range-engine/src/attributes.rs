//! Range attribute store.
//!
//! Cosmetic attributes (syntax colors, search highlights) are kept as painted spans over the
//! plain-text projection, one sorted and non-overlapping list per [`AttributeLayer`]. They
//! never touch the document's segments: painting a range only trims or splits spans *inside*
//! that range, everything else is left as it was.

use crate::offset_index::TextRange;
use std::collections::BTreeMap;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The visual treatment a category maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Treatment {
    /// Text color.
    Foreground(Rgb),
    /// Background fill.
    Background(Rgb),
    /// No visual change.
    Transparent,
}

/// Attribute layer id.
///
/// Layers are painted and cleared independently, so a syntax rescan never wipes search
/// highlights and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeLayer(pub u32);

impl AttributeLayer {
    /// Foreground syntax coloring (keywords, strings, comments).
    pub const SYNTAX: Self = Self(1);
    /// Background search highlights.
    pub const SEARCH: Self = Self(2);

    /// Create a layer id from a raw numeric identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Attribute category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum AttributeCategory {
    /// Default / transparent treatment.
    #[default]
    None,
    /// Language keyword.
    Keyword,
    /// String literal.
    StringLiteral,
    /// Comment.
    Comment,
    /// Find match.
    SearchHighlight,
}

impl AttributeCategory {
    /// The layer this category paints into. `None` has no layer.
    pub fn layer(self) -> Option<AttributeLayer> {
        match self {
            Self::None => None,
            Self::Keyword | Self::StringLiteral | Self::Comment => Some(AttributeLayer::SYNTAX),
            Self::SearchHighlight => Some(AttributeLayer::SEARCH),
        }
    }

    /// The fixed visual treatment of this category.
    pub fn treatment(self) -> Treatment {
        match self {
            Self::None => Treatment::Transparent,
            // MediumPurple
            Self::Keyword => Treatment::Foreground(Rgb(147, 112, 219)),
            Self::StringLiteral => Treatment::Foreground(Rgb(0, 0, 255)),
            Self::Comment => Treatment::Foreground(Rgb(0, 128, 0)),
            Self::SearchHighlight => Treatment::Background(Rgb(255, 255, 0)),
        }
    }
}

/// A painted span: `[start, end)` in projection character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpan {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
    /// Painted category (never [`AttributeCategory::None`]).
    pub category: AttributeCategory,
}

impl AttributeSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize, category: AttributeCategory) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    /// Check if span contains a specific offset.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if two spans overlap.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Sorted, non-overlapping spans of one layer.
#[derive(Debug, Clone, Default)]
struct SpanLayer {
    spans: Vec<AttributeSpan>,
}

impl SpanLayer {
    /// Overwrite `[start, end)` with `category` (or clear it when `None`).
    fn paint(&mut self, start: usize, end: usize, category: Option<AttributeCategory>) {
        if start >= end {
            return;
        }

        // Spans are disjoint and sorted, so both `start` and `end` are monotone.
        let first = self.spans.partition_point(|s| s.end <= start);
        let last = self.spans.partition_point(|s| s.start < end);

        let mut replacement = Vec::with_capacity(3);
        if first < last {
            let head = self.spans[first];
            if head.start < start {
                replacement.push(AttributeSpan::new(head.start, start, head.category));
            }
        }
        if let Some(category) = category {
            replacement.push(AttributeSpan::new(start, end, category));
        }
        if first < last {
            let tail = self.spans[last - 1];
            if tail.end > end {
                replacement.push(AttributeSpan::new(end, tail.end, tail.category));
            }
        }

        self.spans.splice(first..last, replacement);
    }

    fn query_point(&self, pos: usize) -> Option<&AttributeSpan> {
        let idx = self.spans.partition_point(|s| s.end <= pos);
        self.spans.get(idx).filter(|s| s.contains(pos))
    }

    fn query_range(&self, start: usize, end: usize) -> &[AttributeSpan] {
        if start >= end {
            return &[];
        }
        let first = self.spans.partition_point(|s| s.end <= start);
        let last = self.spans.partition_point(|s| s.start < end);
        &self.spans[first..last.max(first)]
    }

    fn update_for_insertion(&mut self, pos: usize, delta: usize) {
        for span in &mut self.spans {
            if span.start >= pos {
                span.start += delta;
                span.end += delta;
            } else if span.end > pos {
                // Span straddles the insertion point, extend it.
                span.end += delta;
            }
        }
    }

    fn update_for_deletion(&mut self, start: usize, end: usize) {
        let delta = end - start;
        for span in &mut self.spans {
            if span.end <= start {
                continue;
            } else if span.start >= end {
                span.start -= delta;
                span.end -= delta;
            } else {
                span.start = span.start.min(start);
                span.end = if span.end > end { span.end - delta } else { start };
            }
        }
        self.spans.retain(|s| s.start < s.end);
    }
}

/// Per-layer attribute storage for one document.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    layers: BTreeMap<AttributeLayer, SpanLayer>,
}

impl AttributeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint exactly `range` with `category`.
    ///
    /// Overwrites whatever the category's layer held inside `range`; spans outside it are not
    /// touched. Applying the same category twice is the same as applying it once.
    /// [`AttributeCategory::None`] clears every layer over `range`.
    pub fn apply_attribute(&mut self, range: &TextRange<'_>, category: AttributeCategory) {
        let offsets = range.offsets();
        match category.layer() {
            Some(layer) => self.layers.entry(layer).or_default().paint(
                offsets.start,
                offsets.end,
                Some(category),
            ),
            None => self.clear_attributes(range),
        }
    }

    /// Reset `range` to [`AttributeCategory::None`] on every layer.
    pub fn clear_attributes(&mut self, range: &TextRange<'_>) {
        let offsets = range.offsets();
        for layer in self.layers.values_mut() {
            layer.paint(offsets.start, offsets.end, None);
        }
        self.drop_empty_layers();
    }

    /// Reset `range` to [`AttributeCategory::None`] on a single layer.
    pub fn clear_layer(&mut self, range: &TextRange<'_>, layer: AttributeLayer) {
        let offsets = range.offsets();
        if let Some(spans) = self.layers.get_mut(&layer) {
            spans.paint(offsets.start, offsets.end, None);
        }
        self.drop_empty_layers();
    }

    /// Drop every span of `layer`, wherever it lies.
    pub fn reset_layer(&mut self, layer: AttributeLayer) {
        self.layers.remove(&layer);
    }

    /// Drop every span of every layer.
    pub fn clear_all(&mut self) {
        self.layers.clear();
    }

    /// Category painted at `offset` on `layer`.
    pub fn category_at(&self, offset: usize, layer: AttributeLayer) -> AttributeCategory {
        self.layers
            .get(&layer)
            .and_then(|spans| spans.query_point(offset))
            .map(|span| span.category)
            .unwrap_or_default()
    }

    /// All spans of `layer`, sorted by offset.
    pub fn spans(&self, layer: AttributeLayer) -> &[AttributeSpan] {
        self.layers
            .get(&layer)
            .map(|spans| spans.spans.as_slice())
            .unwrap_or(&[])
    }

    /// Spans of `layer` overlapping `range`.
    pub fn spans_in(&self, range: &TextRange<'_>, layer: AttributeLayer) -> &[AttributeSpan] {
        let offsets = range.offsets();
        self.layers
            .get(&layer)
            .map(|spans| spans.query_range(offsets.start, offsets.end))
            .unwrap_or(&[])
    }

    /// Total number of painted spans across layers.
    pub fn painted_count(&self) -> usize {
        self.layers.values().map(|spans| spans.spans.len()).sum()
    }

    /// Shift spans after `delta` characters were inserted at `pos`.
    pub fn update_for_insertion(&mut self, pos: usize, delta: usize) {
        if delta == 0 {
            return;
        }
        for layer in self.layers.values_mut() {
            layer.update_for_insertion(pos, delta);
        }
    }

    /// Shift/trim spans after `[start, end)` was deleted.
    pub fn update_for_deletion(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        for layer in self.layers.values_mut() {
            layer.update_for_deletion(start, end);
        }
        self.drop_empty_layers();
    }

    fn drop_empty_layers(&mut self) {
        self.layers.retain(|_, spans| !spans.spans.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;

    fn spans_of(store: &AttributeStore, layer: AttributeLayer) -> Vec<(usize, usize, AttributeCategory)> {
        store
            .spans(layer)
            .iter()
            .map(|s| (s.start, s.end, s.category))
            .collect()
    }

    #[test]
    fn test_apply_is_idempotent() {
        let doc = Document::new("string s = \"hi\";");
        let mut store = AttributeStore::new();
        let range = doc.range(0, 6);
        store.apply_attribute(&range, AttributeCategory::Keyword);
        store.apply_attribute(&range, AttributeCategory::Keyword);
        assert_eq!(
            spans_of(&store, AttributeLayer::SYNTAX),
            vec![(0, 6, AttributeCategory::Keyword)]
        );
    }

    #[test]
    fn test_overlapping_apply_splits_only_inside_range() {
        let doc = Document::new("0123456789");
        let mut store = AttributeStore::new();
        store.apply_attribute(&doc.range(0, 10), AttributeCategory::StringLiteral);
        store.apply_attribute(&doc.range(3, 2), AttributeCategory::Keyword);
        assert_eq!(
            spans_of(&store, AttributeLayer::SYNTAX),
            vec![
                (0, 3, AttributeCategory::StringLiteral),
                (3, 5, AttributeCategory::Keyword),
                (5, 10, AttributeCategory::StringLiteral),
            ]
        );
    }

    #[test]
    fn test_adjacent_spans_are_not_merged() {
        let doc = Document::new("abcdef");
        let mut store = AttributeStore::new();
        store.apply_attribute(&doc.range(0, 3), AttributeCategory::Keyword);
        store.apply_attribute(&doc.range(3, 3), AttributeCategory::Keyword);
        assert_eq!(store.spans(AttributeLayer::SYNTAX).len(), 2);
        assert_eq!(store.category_at(2, AttributeLayer::SYNTAX), AttributeCategory::Keyword);
        assert_eq!(store.category_at(6, AttributeLayer::SYNTAX), AttributeCategory::None);
    }

    #[test]
    fn test_layers_are_independent() {
        let doc = Document::new("if x");
        let mut store = AttributeStore::new();
        store.apply_attribute(&doc.range(0, 2), AttributeCategory::Keyword);
        store.apply_attribute(&doc.range(0, 1), AttributeCategory::SearchHighlight);

        store.clear_layer(&doc.full_range(), AttributeLayer::SYNTAX);
        assert!(store.spans(AttributeLayer::SYNTAX).is_empty());
        assert_eq!(
            store.category_at(0, AttributeLayer::SEARCH),
            AttributeCategory::SearchHighlight
        );
    }

    #[test]
    fn test_clear_attributes_resets_every_layer() {
        let doc = Document::new("return x;");
        let mut store = AttributeStore::new();
        store.apply_attribute(&doc.range(0, 6), AttributeCategory::Keyword);
        store.apply_attribute(&doc.range(7, 1), AttributeCategory::SearchHighlight);
        store.clear_attributes(&doc.range(2, 6));
        assert_eq!(
            spans_of(&store, AttributeLayer::SYNTAX),
            vec![(0, 2, AttributeCategory::Keyword)]
        );
        assert!(store.spans(AttributeLayer::SEARCH).is_empty());

        store.apply_attribute(&doc.full_range(), AttributeCategory::None);
        assert_eq!(store.painted_count(), 0);
    }

    #[test]
    fn test_empty_range_is_noop() {
        let doc = Document::new("abc");
        let mut store = AttributeStore::new();
        store.apply_attribute(&doc.range(1, 0), AttributeCategory::Comment);
        assert_eq!(store.painted_count(), 0);
    }

    #[test]
    fn test_spans_in_range() {
        let doc = Document::new("a bb ccc dddd");
        let mut store = AttributeStore::new();
        for (offset, len) in [(0, 1), (2, 2), (5, 3), (9, 4)] {
            store.apply_attribute(&doc.range(offset, len), AttributeCategory::SearchHighlight);
        }
        let found = store.spans_in(&doc.range(3, 4), AttributeLayer::SEARCH);
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].start, found[1].start), (2, 5));
    }

    #[test]
    fn test_update_for_insertion_and_deletion() {
        let doc = Document::new("0123456789");
        let mut store = AttributeStore::new();
        store.apply_attribute(&doc.range(2, 3), AttributeCategory::Comment);
        store.apply_attribute(&doc.range(7, 2), AttributeCategory::Keyword);

        store.update_for_insertion(0, 2);
        assert_eq!(
            spans_of(&store, AttributeLayer::SYNTAX),
            vec![
                (4, 7, AttributeCategory::Comment),
                (9, 11, AttributeCategory::Keyword),
            ]
        );

        // Delete [5, 10): trims the comment, eats most of the keyword.
        store.update_for_deletion(5, 10);
        assert_eq!(
            spans_of(&store, AttributeLayer::SYNTAX),
            vec![
                (4, 5, AttributeCategory::Comment),
                (5, 6, AttributeCategory::Keyword),
            ]
        );

        store.update_for_deletion(0, 6);
        assert_eq!(store.painted_count(), 0);
    }

    #[test]
    fn test_category_treatments_are_fixed() {
        assert_eq!(AttributeCategory::None.treatment(), Treatment::Transparent);
        assert_eq!(
            AttributeCategory::SearchHighlight.treatment(),
            Treatment::Background(Rgb(255, 255, 0))
        );
        assert!(matches!(
            AttributeCategory::Comment.treatment(),
            Treatment::Foreground(_)
        ));
    }
}
