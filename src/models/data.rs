use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final engine output: category -> (spec name -> display value).
pub type SpecificationMapping = BTreeMap<String, BTreeMap<String, String>>;

/// Layout of the raw document, decides how line breaks are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// Free-running text; line breaks carry no structure.
    Prose,
    /// Tables, markdown headings or one-field-per-line layouts.
    Structured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Heading,
    TableRow,
    Line,
}

/// One line, sentence or table row of the preprocessed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub text: String,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(index: usize, text: impl Into<String>, kind: SegmentKind) -> Self {
        Segment {
            index,
            text: text.into(),
            kind,
        }
    }

    pub fn has_digit(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }
}

/// A segment that survived classification, tagged with the category in force.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSegment {
    pub segment: Segment,
    pub category: String,
}

/// Pattern family that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Table,
    Colon,
    Equals,
    Dash,
    Semicolon,
    Bulleted,
    Orphan,
    Dimension,
    Nested,
}

impl MatcherKind {
    pub fn name(&self) -> &'static str {
        match self {
            MatcherKind::Table => "table",
            MatcherKind::Colon => "colon",
            MatcherKind::Equals => "equals",
            MatcherKind::Dash => "dash",
            MatcherKind::Semicolon => "semicolon",
            MatcherKind::Bulleted => "bulleted",
            MatcherKind::Orphan => "orphan",
            MatcherKind::Dimension => "dimension",
            MatcherKind::Nested => "nested",
        }
    }
}

/// Raw (key, value) pair pulled out of a segment, before any cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEntry {
    pub category: String,
    pub key: String,
    pub value: String,
    pub source: String,
    pub matcher: MatcherKind,
}

/// Normalized specification, the unit of work between normalizer and deduplicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSpec {
    pub category: String,
    pub key: String,
    pub value: String,
    pub unit: Option<String>,
}

impl ParsedSpec {
    pub fn new(
        category: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        unit: Option<String>,
    ) -> Self {
        ParsedSpec {
            category: category.into(),
            key: key.into(),
            value: value.into(),
            unit,
        }
    }

    pub fn has_unit(&self) -> bool {
        self.unit.as_deref().map_or(false, |u| !u.is_empty())
    }

    /// Human-facing value: `"{value} {unit}"` or just the value.
    pub fn display_value(&self) -> String {
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} {}", self.value, unit),
            _ => self.value.clone(),
        }
    }
}
