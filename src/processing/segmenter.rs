use super::units::UnitTable;
use crate::models::{ExtractionConfig, InputShape, Segment, SegmentKind};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    pub static ref MARKDOWN_HEADING: Regex = Regex::new(r"^#{1,6}\s+(\S.*?)[\s#]*$").unwrap();
    static ref TABLE_SEPARATOR: Regex = Regex::new(r"^\|?[\s:\-|]+\|?$").unwrap();
}

/// Pipe-table row: at least two cell separators.
pub fn is_table_row(line: &str) -> bool {
    line.matches('|').count() >= 2
}

/// Split preprocessed text into headings, table rows and sentence-level lines.
pub fn segment(
    text: &str,
    shape: InputShape,
    units: &UnitTable,
    config: &ExtractionConfig,
) -> Vec<Segment> {
    let mut pieces: Vec<(String, SegmentKind)> = Vec::new();

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(captures) = MARKDOWN_HEADING.captures(line) {
            pieces.push((captures[1].to_string(), SegmentKind::Heading));
        } else if is_table_row(line) {
            if !TABLE_SEPARATOR.is_match(line) {
                pieces.push((line.to_string(), SegmentKind::TableRow));
            }
        } else if is_caps_heading(line, config) {
            pieces.push((line.to_string(), SegmentKind::Heading));
        } else {
            for sentence in split_sentences(line, units) {
                pieces.push((sentence, SegmentKind::Line));
            }
        }
    }

    let segments: Vec<Segment> = pieces
        .into_iter()
        .filter(|(text, _)| text.chars().count() >= config.min_segment_chars)
        .enumerate()
        .map(|(index, (text, kind))| Segment::new(index, text, kind))
        .collect();

    debug!("Segmented {:?} input into {} segments", shape, segments.len());
    segments
}

/// Short shouting line without digits or delimiters, e.g. `ДВИГАТЕЛЬ`.
fn is_caps_heading(line: &str, config: &ExtractionConfig) -> bool {
    if line.chars().count() > config.max_heading_chars {
        return false;
    }
    if line.chars().any(|c| c.is_ascii_digit() || c == ':' || c == '=') {
        return false;
    }
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase())
}

/// Split a line where a number or period is followed by a capitalized word.
///
/// `15000 Кг` stays together: the capitalized word there is a unit.
pub fn split_sentences(line: &str, units: &UnitTable) -> Vec<String> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for (pos, &(byte, c)) in chars.iter().enumerate() {
        if !c.is_whitespace() || pos == 0 {
            continue;
        }
        let prev = chars[..pos].iter().rev().find(|(_, p)| !p.is_whitespace());
        let next = chars.get(pos + 1);
        let (prev, (next_byte, next)) = match (prev, next) {
            (Some(&(_, p)), Some(&n)) => (p, n),
            _ => continue,
        };
        if !(prev.is_ascii_digit() || prev == '.') || !next.is_uppercase() {
            continue;
        }
        let word = line[next_byte..]
            .split_whitespace()
            .next()
            .unwrap_or("")
            .trim_end_matches(|c: char| c == ',' || c == ';');
        if units.is_unit(word) {
            continue;
        }

        let sentence = line[start..byte].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = next_byte;
    }

    let rest = line[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}
