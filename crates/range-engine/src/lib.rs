#![warn(missing_docs)]
//! Range Engine - Offset-Mapped Document Range Kernel
//!
//! # Overview
//!
//! `range-engine` maps flat character offsets of a document's plain-text projection onto
//! positions inside a segmented document (text runs interleaved with embedded objects), and
//! keeps per-layer visual attributes on those ranges. Find-in-document and debounced syntax
//! coloring are built on top. No rendering happens here; a host applies the attributes and
//! selections to whatever surface it owns.
//!
//! # Core Features
//!
//! - **Offset Index**: flat offset <-> segment position resolution, embedded objects skipped
//! - **Attribute Store**: non-overlapping spans per layer, later writes win
//! - **Match Scanner**: lazy literal/regex matching with case folding and whole-word filtering
//! - **Find Engine**: highlight-all, next/previous navigation with wrap-around
//! - **Syntax Engine**: edit-quiescence debounce around a pluggable [`DocumentProcessor`]
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorSession (+ EditorHost callbacks)     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  FindEngine          SyntaxEngine/Debouncer │  ← Features
//! ├─────────────────────────────────────────────┤
//! │  Match Scanner       DocumentProcessor      │  ← Span producers
//! ├─────────────────────────────────────────────┤
//! │  AttributeStore (layers)                    │  ← Visual state
//! ├─────────────────────────────────────────────┤
//! │  Offset Index (TextPosition / TextRange)    │  ← Coordinates
//! ├─────────────────────────────────────────────┤
//! │  Document (segments)                        │  ← Content
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use range_engine::{AttributeCategory, AttributeLayer, AttributeStore, Document, Segment};
//!
//! let document = Document::from_segments(vec![
//!     Segment::text("ab"),
//!     Segment::embedded("image"),
//!     Segment::text("cd"),
//! ]);
//! assert_eq!(document.text(), "abcd");
//!
//! let range = document.range(1, 2);
//! assert_eq!(range.text(), "bc");
//!
//! let mut store = AttributeStore::new();
//! store.apply_attribute(&range, AttributeCategory::Keyword);
//! assert_eq!(
//!     store.category_at(2, AttributeLayer::SYNTAX),
//!     AttributeCategory::Keyword
//! );
//! ```
//!
//! # Module Description
//!
//! - [`document`] - Segmented document model
//! - [`offset_index`] - Offset <-> position resolution
//! - [`attributes`] - Layered attribute store
//! - [`scanner`] - Match scanner
//! - [`find`] - Find engine
//! - [`debounce`] / [`syntax`] - Debounced syntax coloring
//! - [`processing`] - Processor interface for derived attributes
//! - [`session`] - Per-document session tying it all together

pub mod attributes;
pub mod config;
pub mod debounce;
pub mod document;
pub mod error;
pub mod find;
pub mod host;
pub mod offset_index;
pub mod processing;
pub mod scanner;
pub mod session;
pub mod syntax;

pub use attributes::{
    AttributeCategory, AttributeLayer, AttributeSpan, AttributeStore, Rgb, Treatment,
};
pub use config::EngineConfig;
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use document::{Document, Segment, SegmentKind};
pub use error::EngineError;
pub use find::{FindEngine, FindOutcome, FindState, Navigation};
pub use host::EditorHost;
pub use offset_index::{OffsetIndex, TextPosition, TextRange, project_to_text, resolve};
pub use processing::{CategorizedSpan, DocumentProcessor, ProcessingEdit};
pub use scanner::{ComparisonMode, MatchSpan, Matches, ScanOptions, ScanPattern, scan};
pub use session::EditorSession;
pub use syntax::{SyntaxEngine, SyntaxState, apply_processing_edits};
