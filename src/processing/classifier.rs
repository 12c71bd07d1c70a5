use crate::models::{
    CorrectionDictionary, ExtractionConfig, ParsedSpec, Segment, SegmentKind, TaggedSegment,
};
use log::debug;

const MAX_HEADING_WORDS: usize = 6;

/// Category in force while folding over the segments of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierState {
    current: String,
}

impl ClassifierState {
    pub fn new(dictionary: &CorrectionDictionary) -> Self {
        ClassifierState {
            current: dictionary.default_category.clone(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Consume a heading (returning `None`) or tag the segment with the
    /// current category.
    pub fn step(
        self,
        segment: Segment,
        dictionary: &CorrectionDictionary,
        config: &ExtractionConfig,
    ) -> (Self, Option<TaggedSegment>) {
        match segment.kind {
            SegmentKind::Heading => match dictionary.classify(&segment.text) {
                Some(category) => {
                    debug!("Heading '{}' -> category '{}'", segment.text, category);
                    (
                        ClassifierState {
                            current: category.to_string(),
                        },
                        None,
                    )
                }
                None => {
                    debug!("Heading '{}' not recognized, staying in '{}'", segment.text, self.current);
                    (self, None)
                }
            },
            SegmentKind::Line if is_heading_like(&segment.text, config) => {
                match dictionary.classify(&segment.text) {
                    Some(category) => {
                        debug!("Heading-like line '{}' -> category '{}'", segment.text, category);
                        (
                            ClassifierState {
                                current: category.to_string(),
                            },
                            None,
                        )
                    }
                    None => self.forward(segment),
                }
            }
            _ => self.forward(segment),
        }
    }

    fn forward(self, segment: Segment) -> (Self, Option<TaggedSegment>) {
        let tagged = TaggedSegment {
            segment,
            category: self.current.clone(),
        };
        (self, Some(tagged))
    }
}

/// Move a spec that never saw a heading into the category its key hints at.
///
/// Specs under an explicit heading keep their category.
pub fn rebucket_by_key(mut spec: ParsedSpec, dictionary: &CorrectionDictionary) -> ParsedSpec {
    if spec.category != dictionary.default_category {
        return spec;
    }
    if let Some(category) = dictionary.classify_key(&spec.key) {
        debug!("Key '{}' re-bucketed into '{}'", spec.key, category);
        spec.category = category.to_string();
    }
    spec
}

/// No digits, no delimiter except a trailing colon, short.
pub fn is_heading_like(text: &str, config: &ExtractionConfig) -> bool {
    let text = text.trim();
    let body = text.strip_suffix(':').unwrap_or(text);
    if body.is_empty() || text.chars().count() > config.max_heading_chars {
        return false;
    }
    if body.chars().any(|c| c.is_ascii_digit() || matches!(c, ':' | '=' | '|' | ';' | '–' | '—')) {
        return false;
    }
    if body.contains(" - ") {
        return false;
    }
    body.split_whitespace().count() <= MAX_HEADING_WORDS
}
