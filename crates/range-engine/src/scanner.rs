//! Match scanning over plain text.
//!
//! Scanning is a pure function of `(text, pattern, options)`: it never touches a document. All
//! results are **character offsets** (not byte offsets), which is what the
//! [`offset_index`](crate::offset_index) consumes.
//!
//! Matches are greedy, leftmost-first and non-overlapping. Once a match ending at `E` is
//! found, scanning resumes at `E`.

use crate::error::EngineError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Character comparison mode for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Exact comparison.
    #[default]
    CaseSensitive,
    /// Unicode case-folded comparison.
    CaseInsensitive,
}

impl ComparisonMode {
    /// Map a host "case sensitive" toggle to a mode.
    pub fn from_case_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::CaseSensitive
        } else {
            Self::CaseInsensitive
        }
    }

    /// Returns `true` for [`ComparisonMode::CaseSensitive`].
    pub fn is_case_sensitive(self) -> bool {
        self == Self::CaseSensitive
    }
}

/// A match in plain-text coordinates: `len` characters starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchSpan {
    /// Start character offset.
    pub offset: usize,
    /// Length in characters (positive for scanner output).
    pub len: usize,
}

impl MatchSpan {
    /// Create a span.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Half-open offset range.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Returns `true` if the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Options that control how a pattern is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Case handling.
    pub mode: ComparisonMode,
    /// If `true`, keep only matches bounded by non-identifier characters on both sides.
    pub whole_word: bool,
    /// If `true`, the pattern is a regex; otherwise it is matched literally.
    pub regex: bool,
}

/// A compiled scan pattern.
#[derive(Debug, Clone)]
pub struct ScanPattern {
    regex: Regex,
    whole_word: bool,
}

impl ScanPattern {
    /// Compile `pattern` with `options`.
    ///
    /// `^`/`$` match at line boundaries (`\n` or `\r\n`), and `.` never crosses a line break.
    pub fn new(pattern: &str, options: ScanOptions) -> Result<Self, EngineError> {
        let source = if options.regex {
            pattern.to_string()
        } else {
            regex::escape(pattern)
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.mode.is_case_sensitive())
            .multi_line(true)
            .crlf(true)
            .build()
            .map_err(|err| EngineError::InvalidPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })?;

        Ok(Self {
            regex,
            whole_word: options.whole_word,
        })
    }

    /// Compile a literal pattern.
    pub fn literal(pattern: &str, mode: ComparisonMode) -> Result<Self, EngineError> {
        Self::new(
            pattern,
            ScanOptions {
                mode,
                ..ScanOptions::default()
            },
        )
    }

    /// Compile a regex pattern.
    pub fn regex(pattern: &str, mode: ComparisonMode) -> Result<Self, EngineError> {
        Self::new(
            pattern,
            ScanOptions {
                mode,
                regex: true,
                ..ScanOptions::default()
            },
        )
    }

    /// Keep only whole-word matches.
    pub fn whole_word(mut self) -> Self {
        self.whole_word = true;
        self
    }

    /// The compiled regex source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Lazily scan `text`.
    pub fn scan<'t>(&self, text: &'t str) -> Matches<'t> {
        Matches {
            regex: Some(self.regex.clone()),
            whole_word: self.whole_word,
            text,
            byte_pos: 0,
            char_cursor: CharCursor::default(),
        }
    }
}

/// Scan `text` for literal occurrences of `pattern`.
///
/// Empty `pattern` or empty `text` yields nothing.
pub fn scan<'t>(text: &'t str, pattern: &str, mode: ComparisonMode) -> Matches<'t> {
    if pattern.is_empty() || text.is_empty() {
        return Matches::exhausted(text);
    }

    match ScanPattern::literal(pattern, mode) {
        Ok(compiled) => compiled.scan(text),
        Err(err) => {
            // An escaped literal only fails on size limits.
            tracing::warn!("scan: {err}");
            Matches::exhausted(text)
        }
    }
}

/// Incremental byte -> char offset conversion for monotonically increasing byte offsets.
#[derive(Debug, Clone, Copy, Default)]
struct CharCursor {
    byte: usize,
    chars: usize,
}

impl CharCursor {
    fn advance_to(&mut self, text: &str, byte: usize) -> usize {
        if byte > self.byte {
            self.chars += text[self.byte..byte].chars().count();
            self.byte = byte;
        }
        self.chars
    }
}

/// Lazy iterator of [`MatchSpan`]s in document order.
#[derive(Debug)]
pub struct Matches<'t> {
    regex: Option<Regex>,
    whole_word: bool,
    text: &'t str,
    byte_pos: usize,
    char_cursor: CharCursor,
}

impl<'t> Matches<'t> {
    fn exhausted(text: &'t str) -> Self {
        Self {
            regex: None,
            whole_word: false,
            text,
            byte_pos: 0,
            char_cursor: CharCursor::default(),
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<MatchSpan> {
        let regex = self.regex.as_ref()?;
        while self.byte_pos <= self.text.len() {
            let m = regex.find_at(self.text, self.byte_pos)?;

            if m.start() == m.end() {
                // Skip empty matches one character at a time.
                self.byte_pos = next_char_boundary(self.text, m.end());
                continue;
            }
            self.byte_pos = m.end();

            if self.whole_word && !is_whole_word(self.text, m.start(), m.end()) {
                continue;
            }

            let start = self.char_cursor.advance_to(self.text, m.start());
            let end = self.char_cursor.advance_to(self.text, m.end());
            return Some(MatchSpan::new(start, end - start));
        }
        None
    }
}

fn next_char_boundary(text: &str, byte: usize) -> usize {
    text[byte..]
        .chars()
        .next()
        .map(|ch| byte + ch.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// Identifier characters for whole-word checks.
pub fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}
