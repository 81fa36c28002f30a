//! Segmented document storage.
//!
//! A [`Document`] is an ordered sequence of [`Segment`]s. Text runs carry characters, while
//! embedded objects (inline images, controls, ...) occupy a slot in the sequence but contribute
//! nothing to the plain-text projection.
//!
//! All public offsets are **character offsets** (Unicode scalar values) into the plain-text
//! projection, never byte offsets.

/// The payload of a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// A run of inline text.
    Text(String),
    /// A non-text inline object. It is skipped by the text projection.
    Embedded {
        /// Host-defined label (used for debugging and snapshots only).
        label: String,
    },
}

/// One entry in the document's segment sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    kind: SegmentKind,
    /// Cached character count of the text payload (0 for embedded objects).
    char_count: usize,
}

impl Segment {
    /// Create a text run.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self {
            kind: SegmentKind::Text(text),
            char_count,
        }
    }

    /// Create an embedded (non-text) object.
    pub fn embedded(label: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Embedded {
                label: label.into(),
            },
            char_count: 0,
        }
    }

    /// Segment payload.
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Returns the text of a text run, or `None` for embedded objects.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Text(text) => Some(text),
            SegmentKind::Embedded { .. } => None,
        }
    }

    /// Returns `true` if this segment is a text run.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, SegmentKind::Text(_))
    }

    /// Number of characters this segment contributes to the projection.
    pub fn char_count(&self) -> usize {
        self.char_count
    }
}

/// A structured document: an ordered list of segments plus a version counter.
///
/// The version is bumped on every mutation. Anything derived from the document (match sets,
/// scan results) records the version it was computed against.
#[derive(Debug, Clone, Default)]
pub struct Document {
    segments: Vec<Segment>,
    version: u64,
}

impl Document {
    /// Create a document holding `text` as a single run.
    pub fn new(text: &str) -> Self {
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::text(text)]
        };
        Self {
            segments,
            version: 0,
        }
    }

    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a document from an explicit segment sequence.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            version: 0,
        }
    }

    /// All segments, in document order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments (text runs and embedded objects).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Current document version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Length of the plain-text projection, in characters.
    pub fn char_count(&self) -> usize {
        self.segments.iter().map(Segment::char_count).sum()
    }

    /// Returns `true` if the projection is empty.
    pub fn is_empty(&self) -> bool {
        self.char_count() == 0
    }

    /// The plain-text projection: all text runs concatenated in order.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for segment in &self.segments {
            if let Some(text) = segment.as_text() {
                result.push_str(text);
            }
        }
        result
    }

    /// Get `length` characters of the projection starting at `start_offset`.
    pub fn get_range(&self, start_offset: usize, length: usize) -> String {
        let mut result = String::new();
        let mut current_offset = 0;
        let end_offset = start_offset + length;

        for segment in &self.segments {
            let Some(text) = segment.as_text() else {
                continue;
            };
            let segment_end = current_offset + segment.char_count;

            if current_offset >= end_offset {
                break;
            }

            if segment_end > start_offset {
                let skip_chars = start_offset.saturating_sub(current_offset);
                let take_chars = end_offset.min(segment_end) - current_offset.max(start_offset);
                result.extend(text.chars().skip(skip_chars).take(take_chars));
            }

            current_offset = segment_end;
        }

        result
    }

    /// Append a segment at the end of the document.
    pub fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
        self.bump_version();
    }

    /// Replace the whole document with `text` as a single run (file load).
    pub fn set_text(&mut self, text: &str) {
        self.segments.clear();
        if !text.is_empty() {
            self.segments.push(Segment::text(text));
        }
        self.bump_version();
    }

    /// Remove every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.bump_version();
    }

    /// Insert text at the specified character offset.
    ///
    /// Text is spliced into the run that owns the offset. On a boundary between two runs the
    /// earlier run grows. Offsets past the end append to the last run.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }

        match self.find_segment_at_offset(offset) {
            Some((segment_idx, offset_in_segment)) => {
                let segment = &mut self.segments[segment_idx];
                if let SegmentKind::Text(run) = &mut segment.kind {
                    let byte_offset = byte_offset(run, offset_in_segment);
                    run.insert_str(byte_offset, text);
                    segment.char_count += text.chars().count();
                }
            }
            None => self.segments.push(Segment::text(text)),
        }

        self.bump_version();
    }

    /// Delete `length` characters starting at `start_offset`.
    ///
    /// Deletion may span several runs. Embedded objects between them are kept, and runs that
    /// become empty are dropped.
    pub fn delete(&mut self, start_offset: usize, length: usize) {
        if length == 0 {
            return;
        }

        let end_offset = start_offset + length;
        let mut current_offset = 0;

        for segment in &mut self.segments {
            let segment_start = current_offset;
            let segment_end = segment_start + segment.char_count;
            current_offset = segment_end;

            if segment_end <= start_offset || segment_start >= end_offset {
                continue;
            }

            if let SegmentKind::Text(run) = &mut segment.kind {
                let local_start = start_offset.saturating_sub(segment_start);
                let local_end = end_offset.min(segment_end) - segment_start;
                let byte_start = byte_offset(run, local_start);
                let byte_end = byte_offset(run, local_end);
                run.replace_range(byte_start..byte_end, "");
                segment.char_count -= local_end - local_start;
            }
        }

        self.segments
            .retain(|segment| !segment.is_text() || segment.char_count > 0);
        self.bump_version();
    }

    /// Find the text run owning `offset`.
    ///
    /// Returns `(segment_index, char_offset_in_segment)`; on a boundary the earlier run wins.
    fn find_segment_at_offset(&self, offset: usize) -> Option<(usize, usize)> {
        let mut current_offset = 0;
        let mut last_text = None;

        for (idx, segment) in self.segments.iter().enumerate() {
            if !segment.is_text() {
                continue;
            }
            let next_offset = current_offset + segment.char_count;
            if offset <= next_offset {
                return Some((idx, offset - current_offset));
            }
            last_text = Some((idx, segment.char_count));
            current_offset = next_offset;
        }

        last_text
    }

    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Convert a character offset within `text` into a byte offset (clamped to the end).
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
