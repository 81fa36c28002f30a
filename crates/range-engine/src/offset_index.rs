//! Offset index: plain-text offsets <-> structured positions.
//!
//! The plain-text projection of a [`Document`] is the concatenation of its text runs. This
//! module maps a character offset in that projection back to a [`TextPosition`] (segment +
//! offset inside the segment), walking the segments in the same order the projection uses.
//!
//! Positions borrow the document they were resolved against, so they cannot be kept across a
//! mutation: re-resolve after every edit.

use crate::document::Document;
use crate::scanner::MatchSpan;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// A location between two characters of a [`Document`].
///
/// Positions are ordered and compared by their projection offset, so two positions resolved
/// from the same offset compare equal.
#[derive(Clone, Copy)]
pub struct TextPosition<'doc> {
    document: &'doc Document,
    segment: usize,
    offset_in_segment: usize,
    offset: usize,
}

impl<'doc> TextPosition<'doc> {
    /// The document this position points into.
    pub fn document(&self) -> &'doc Document {
        self.document
    }

    /// Index of the segment holding this position.
    pub fn segment_index(&self) -> usize {
        self.segment
    }

    /// Character offset inside [`Self::segment_index`].
    pub fn offset_in_segment(&self) -> usize {
        self.offset_in_segment
    }

    /// Character offset in the plain-text projection.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move forward by `count` characters. See [`resolve`].
    pub fn advance(self, count: usize) -> Self {
        resolve(self, count)
    }
}

impl fmt::Debug for TextPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextPosition")
            .field("segment", &self.segment)
            .field("offset_in_segment", &self.offset_in_segment)
            .field("offset", &self.offset)
            .finish()
    }
}

impl PartialEq for TextPosition<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl Eq for TextPosition<'_> {}

impl PartialOrd for TextPosition<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TextPosition<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl Hash for TextPosition<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
    }
}

/// A `(start, end)` pair of positions with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange<'doc> {
    start: TextPosition<'doc>,
    end: TextPosition<'doc>,
}

impl<'doc> TextRange<'doc> {
    /// Create a range; the endpoints are swapped if given out of order.
    pub fn new(start: TextPosition<'doc>, end: TextPosition<'doc>) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Start position (inclusive).
    pub fn start(&self) -> TextPosition<'doc> {
        self.start
    }

    /// End position (exclusive).
    pub fn end(&self) -> TextPosition<'doc> {
        self.end
    }

    /// Projection offsets covered by this range (half-open).
    pub fn offsets(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// The projection text covered by this range.
    pub fn text(&self) -> String {
        self.start.document.get_range(self.start.offset, self.len())
    }
}

impl Document {
    /// Position before the first character.
    pub fn start(&self) -> TextPosition<'_> {
        TextPosition {
            document: self,
            segment: 0,
            offset_in_segment: 0,
            offset: 0,
        }
    }

    /// Position after the last character (end of the last text run).
    pub fn end(&self) -> TextPosition<'_> {
        let total = self.char_count();
        match self
            .segments()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, segment)| segment.is_text())
        {
            Some((idx, segment)) => TextPosition {
                document: self,
                segment: idx,
                offset_in_segment: segment.char_count(),
                offset: total,
            },
            None => self.start(),
        }
    }

    /// Resolve a projection offset from the start of the document.
    pub fn position_at(&self, offset: usize) -> TextPosition<'_> {
        resolve(self.start(), offset)
    }

    /// Resolve `length` characters starting at `offset` into a range.
    pub fn range(&self, offset: usize, length: usize) -> TextRange<'_> {
        let start = self.position_at(offset);
        let end = resolve(start, length);
        TextRange::new(start, end)
    }

    /// The range covering the whole document.
    pub fn full_range(&self) -> TextRange<'_> {
        TextRange::new(self.start(), self.end())
    }
}

/// Walk forward from `start`, consuming `offset` characters of text.
///
/// - Embedded objects are skipped without consuming budget.
/// - `offset == 0` returns `start` unchanged.
/// - Running past the end yields the end-of-document position.
/// - When the target sits on a run boundary, the position is reported at the end of the
///   earlier run.
pub fn resolve(start: TextPosition<'_>, offset: usize) -> TextPosition<'_> {
    if offset == 0 {
        return start;
    }

    let document = start.document;
    let mut remaining = offset;
    let mut base = start.offset;
    let mut skip_in_segment = start.offset_in_segment;

    for (idx, segment) in document.segments().iter().enumerate().skip(start.segment) {
        let available = segment.char_count().saturating_sub(skip_in_segment);
        if segment.is_text() && available >= remaining {
            return TextPosition {
                document,
                segment: idx,
                offset_in_segment: skip_in_segment + remaining,
                offset: base + remaining,
            };
        }
        remaining -= available;
        base += available;
        skip_in_segment = 0;
    }

    document.end()
}

/// Concatenate every text run of `document`, in [`resolve`] walk order.
pub fn project_to_text(document: &Document) -> String {
    document.text()
}

#[derive(Debug, Clone, Copy)]
struct TextRunEntry {
    segment: usize,
    start: usize,
    end: usize,
}

/// Prefix-sum table over the text runs of one document version.
///
/// Resolves offsets in `O(log n)` instead of walking. Produces the same positions as
/// [`resolve`] from [`Document::start`].
#[derive(Debug)]
pub struct OffsetIndex<'doc> {
    document: &'doc Document,
    runs: Vec<TextRunEntry>,
}

impl<'doc> OffsetIndex<'doc> {
    /// Build the index for `document`.
    pub fn new(document: &'doc Document) -> Self {
        let mut runs = Vec::new();
        let mut current_offset = 0;
        for (segment, entry) in document.segments().iter().enumerate() {
            if !entry.is_text() {
                continue;
            }
            let end = current_offset + entry.char_count();
            runs.push(TextRunEntry {
                segment,
                start: current_offset,
                end,
            });
            current_offset = end;
        }
        Self { document, runs }
    }

    /// Length of the projection.
    pub fn char_count(&self) -> usize {
        self.runs.last().map(|run| run.end).unwrap_or(0)
    }

    /// Resolve a projection offset.
    pub fn position_at(&self, offset: usize) -> TextPosition<'doc> {
        if offset == 0 {
            return self.document.start();
        }

        let idx = self.runs.partition_point(|run| run.end < offset);
        match self.runs.get(idx) {
            Some(run) => TextPosition {
                document: self.document,
                segment: run.segment,
                offset_in_segment: offset - run.start,
                offset,
            },
            None => self.document.end(),
        }
    }

    /// Resolve a match span into a range.
    pub fn range(&self, span: MatchSpan) -> TextRange<'doc> {
        TextRange::new(self.position_at(span.offset), self.position_at(span.end()))
    }
}
