//! `range-engine-highlight-simple` - Simple (regex-based) syntax coloring for `range-engine`.
//!
//! A [`RegexHighlighter`] runs a fixed sequence of passes over the plain-text projection:
//! line comments, then string literals, then each keyword in lexicographic order. Every
//! match becomes a [`CategorizedSpan`]; the core paints them in order so later passes win
//! where they overlap (a keyword inside a string literal is shown as a keyword).
//!
//! This is *not* a lexer. It is intended for small vocabularies described in YAML:
//!
//! ```yaml
//! name: C#
//! line_comment: "//"
//! string_delimiter: "\""
//! keywords: [public, static, void, "null"]
//! ```

mod error;

pub use error::SyntaxDefinitionError;

use range_engine::{
    AttributeCategory, AttributeLayer, CategorizedSpan, ComparisonMode, Document,
    DocumentProcessor, ProcessingEdit, ScanPattern,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::Path;

/// YAML source of the built-in C#-style definition.
pub const CSHARP_SYNTAX_YAML: &str = include_str!("../syntaxes/csharp.yaml");

/// A loadable syntax vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxDefinition {
    /// Display name.
    pub name: String,
    /// Line-comment marker (comment runs to the end of the line).
    #[serde(default)]
    pub line_comment: Option<String>,
    /// String delimiter (strings never span lines).
    #[serde(default)]
    pub string_delimiter: Option<String>,
    /// Whole-word, case-sensitive keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl SyntaxDefinition {
    /// Parse a definition from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SyntaxDefinitionError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a definition file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SyntaxDefinitionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// The built-in C#-style definition.
    pub fn csharp() -> Result<Self, SyntaxDefinitionError> {
        Self::from_yaml_str(CSHARP_SYNTAX_YAML)
    }
}

/// One highlighting pass: every match of `pattern` gets `category`.
#[derive(Debug, Clone)]
pub struct HighlightPass {
    pattern: ScanPattern,
    category: AttributeCategory,
}

impl HighlightPass {
    pub fn new(pattern: ScanPattern, category: AttributeCategory) -> Self {
        Self { pattern, category }
    }

    pub fn pattern(&self) -> &ScanPattern {
        &self.pattern
    }

    pub fn category(&self) -> AttributeCategory {
        self.category
    }
}

/// Ordered regex passes over the projected text.
#[derive(Debug, Clone)]
pub struct RegexHighlighter {
    name: String,
    passes: Vec<HighlightPass>,
}

impl RegexHighlighter {
    pub fn new(name: impl Into<String>, passes: Vec<HighlightPass>) -> Self {
        Self {
            name: name.into(),
            passes,
        }
    }

    /// Compile a definition into passes: comment, string, then sorted keywords.
    pub fn from_definition(definition: &SyntaxDefinition) -> Result<Self, SyntaxDefinitionError> {
        let mut passes = Vec::new();

        if let Some(marker) = &definition.line_comment {
            if marker.is_empty() {
                return Err(SyntaxDefinitionError::EmptyField("line_comment"));
            }
            let pattern = format!("{}.*?$", regex::escape(marker));
            passes.push(HighlightPass::new(
                ScanPattern::regex(&pattern, ComparisonMode::CaseSensitive)?,
                AttributeCategory::Comment,
            ));
        }

        if let Some(delimiter) = &definition.string_delimiter {
            if delimiter.is_empty() {
                return Err(SyntaxDefinitionError::EmptyField("string_delimiter"));
            }
            let delimiter = regex::escape(delimiter);
            let pattern = format!("{delimiter}.*?{delimiter}");
            passes.push(HighlightPass::new(
                ScanPattern::regex(&pattern, ComparisonMode::CaseSensitive)?,
                AttributeCategory::StringLiteral,
            ));
        }

        let mut keywords: Vec<&str> = definition.keywords.iter().map(String::as_str).collect();
        keywords.sort_unstable();
        keywords.dedup();
        for keyword in keywords {
            if keyword.is_empty() {
                return Err(SyntaxDefinitionError::EmptyKeyword(definition.name.clone()));
            }
            passes.push(HighlightPass::new(
                ScanPattern::literal(keyword, ComparisonMode::CaseSensitive)?.whole_word(),
                AttributeCategory::Keyword,
            ));
        }

        tracing::debug!(
            "highlight: compiled '{}' into {} passes",
            definition.name,
            passes.len()
        );
        Ok(Self::new(definition.name.clone(), passes))
    }

    /// The built-in C#-style highlighter.
    pub fn csharp() -> Result<Self, SyntaxDefinitionError> {
        Self::from_definition(&SyntaxDefinition::csharp()?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn passes(&self) -> &[HighlightPass] {
        &self.passes
    }

    /// Run every pass over `text`, in pass order. Offsets are characters.
    pub fn highlight(&self, text: &str) -> Vec<CategorizedSpan> {
        let mut spans = Vec::new();
        for pass in &self.passes {
            spans.extend(
                pass.pattern
                    .scan(text)
                    .map(|span| CategorizedSpan::new(span, pass.category)),
            );
        }
        spans
    }
}

/// A processor that feeds a [`RegexHighlighter`] into an [`AttributeLayer`] via
/// `range-engine`'s generic processing interface.
#[derive(Debug, Clone)]
pub struct RegexHighlightProcessor {
    layer: AttributeLayer,
    highlighter: RegexHighlighter,
}

impl RegexHighlightProcessor {
    pub fn new(layer: AttributeLayer, highlighter: RegexHighlighter) -> Self {
        Self { layer, highlighter }
    }

    pub fn layer(&self) -> AttributeLayer {
        self.layer
    }

    pub fn highlighter(&self) -> &RegexHighlighter {
        &self.highlighter
    }

    pub fn highlighter_mut(&mut self) -> &mut RegexHighlighter {
        &mut self.highlighter
    }

    /// Built-in C#-style highlighting on [`AttributeLayer::SYNTAX`].
    pub fn csharp() -> Result<Self, SyntaxDefinitionError> {
        Ok(Self::new(AttributeLayer::SYNTAX, RegexHighlighter::csharp()?))
    }

    /// Highlighting for a YAML definition on [`AttributeLayer::SYNTAX`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SyntaxDefinitionError> {
        let definition = SyntaxDefinition::from_yaml_str(yaml)?;
        Ok(Self::new(
            AttributeLayer::SYNTAX,
            RegexHighlighter::from_definition(&definition)?,
        ))
    }
}

impl DocumentProcessor for RegexHighlightProcessor {
    type Error = Infallible;

    fn process(&mut self, document: &Document) -> Result<Vec<ProcessingEdit>, Self::Error> {
        let spans = self.highlighter.highlight(&document.text());
        tracing::trace!(
            "highlight: '{}' produced {} spans at version {}",
            self.highlighter.name,
            spans.len(),
            document.version()
        );
        Ok(vec![ProcessingEdit::ReplaceLayer {
            layer: self.layer,
            spans,
        }])
    }
}
