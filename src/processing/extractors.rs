// Pattern families that pull raw (key, value) pairs out of a segment.

use super::units::UnitTable;
use crate::models::{CandidateEntry, MatcherKind, Segment, SegmentKind, TaggedSegment};
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

/// Key used for synthesized `N × N × N` entries.
pub const DIMENSIONS_KEY: &str = "Размеры";

/// Tried in this order until one yields a pair. Dimension runs separately.
pub const MATCHER_CASCADE: [MatcherKind; 8] = [
    MatcherKind::Table,
    MatcherKind::Colon,
    MatcherKind::Equals,
    MatcherKind::Dash,
    MatcherKind::Semicolon,
    MatcherKind::Bulleted,
    MatcherKind::Orphan,
    MatcherKind::Nested,
];

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\S+").unwrap();
    static ref SEMICOLON_PAIR: Regex =
        Regex::new(r"^(?P<key>[^;\d]*\p{L}[^;\d]*?)\s*;\s*(?P<value>[^;]*\S)\s*;?$").unwrap();
    static ref BULLETED_PAIR: Regex = Regex::new(
        r"^[*•·\-–—]\s*(?P<key>[^=:\-–—]*\p{L}[^=:\-–—]*?)\s*[=:\-–—]\s*(?P<value>\S.*)$"
    )
    .unwrap();
    static ref NESTED_PAIR: Regex = Regex::new(
        r"^(?P<outer>[^:=]+):\s*(?P<inner>[^:=]*\p{L}[^:=]*?)\s*=\s*(?P<value>\S.*)$"
    )
    .unwrap();
    static ref NESTED_VALUE: Regex = Regex::new(r"^[^=]*\p{L}[^=]*=\s*\S").unwrap();
}

/// All candidates of one tagged segment.
///
/// `previous` is the last forwarded segment since the most recent heading;
/// it only feeds the orphan matcher.
pub fn extract_candidates(
    tagged: &TaggedSegment,
    previous: Option<&Segment>,
    units: &UnitTable,
) -> Vec<CandidateEntry> {
    let text = tagged.segment.text.as_str();
    let mut candidates = Vec::new();

    for kind in MATCHER_CASCADE.iter() {
        let pairs = run_matcher(*kind, &tagged.segment, previous, units);
        if pairs.is_empty() {
            continue;
        }
        trace!("Segment {} matched by {}", tagged.segment.index, kind.name());
        candidates.extend(
            pairs
                .into_iter()
                .map(|(matcher, key, value)| candidate(tagged, matcher, key, value)),
        );
        break;
    }

    if let Some((triple, unit)) = units.find_dimension(text) {
        let value = match unit {
            Some(unit) => format!("{} {}", triple, unit),
            None => triple,
        };
        candidates.push(candidate(
            tagged,
            MatcherKind::Dimension,
            DIMENSIONS_KEY.to_string(),
            value,
        ));
    }

    candidates
}

fn candidate(tagged: &TaggedSegment, matcher: MatcherKind, key: String, value: String) -> CandidateEntry {
    CandidateEntry {
        category: tagged.category.clone(),
        key,
        value,
        source: tagged.segment.text.clone(),
        matcher,
    }
}

type Pair = (MatcherKind, String, String);

fn run_matcher(
    kind: MatcherKind,
    segment: &Segment,
    previous: Option<&Segment>,
    units: &UnitTable,
) -> Vec<Pair> {
    let text = segment.text.as_str();
    let tag = |pairs: Vec<(String, String)>| -> Vec<Pair> {
        pairs.into_iter().map(|(k, v)| (kind, k, v)).collect()
    };
    match kind {
        MatcherKind::Table if segment.kind == SegmentKind::TableRow => tag(match_table(text)),
        MatcherKind::Table => Vec::new(),
        MatcherKind::Colon => match_colon(text, units),
        MatcherKind::Equals => tag(match_equals(text, units)),
        MatcherKind::Dash => tag(match_dash(text, units)),
        MatcherKind::Semicolon => tag(match_semicolon(text).into_iter().collect()),
        MatcherKind::Bulleted => tag(match_bulleted(text).into_iter().collect()),
        MatcherKind::Orphan => tag(match_orphan(segment, previous, units).into_iter().collect()),
        MatcherKind::Nested => tag(match_nested(text).into_iter().collect()),
        MatcherKind::Dimension => Vec::new(),
    }
}

/// `| key | value |`, `| key | v1 | v2 |` or `| k1 | v1 | k2 | v2 |`.
pub fn match_table(row: &str) -> Vec<(String, String)> {
    let cells: Vec<&str> = row
        .trim()
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect();

    match cells.len() {
        0 | 1 => Vec::new(),
        2 => vec![(cells[0].to_string(), cells[1].to_string())],
        n if n % 2 == 0 && cells.iter().step_by(2).all(|c| !has_digit(c)) => cells
            .chunks(2)
            .map(|pair| (pair[0].to_string(), pair[1].to_string()))
            .collect(),
        _ => vec![(cells[0].to_string(), cells[1..].join(" "))],
    }
}

/// Every `key: value` pair of the segment.
///
/// A value shaped like `Inner = value` is emitted as a nested pair.
pub fn match_colon(text: &str, units: &UnitTable) -> Vec<Pair> {
    let colons: Vec<(usize, usize)> = delimiter_colons(text)
        .into_iter()
        .map(|at| (at, at + 1))
        .collect();

    let mut pairs = Vec::new();
    for (key, value) in split_on_delimiters(text, &colons, units) {
        if key.is_empty() || value.is_empty() {
            continue;
        }
        if NESTED_VALUE.is_match(value) {
            let pair_text = format!("{}: {}", key, value);
            if let Some((inner, nested)) = match_nested(&pair_text) {
                pairs.push((MatcherKind::Nested, inner, nested));
            }
            continue;
        }
        pairs.push((MatcherKind::Colon, key.to_string(), value.to_string()));
    }
    pairs
}

/// Every `key = value` pair of the segment.
pub fn match_equals(text: &str, units: &UnitTable) -> Vec<(String, String)> {
    let delimiters: Vec<(usize, usize)> = text
        .match_indices('=')
        .map(|(at, eq)| (at, at + eq.len()))
        .collect();
    keyed_pairs(text, &delimiters, units)
}

/// Every `key - value` pair, split on a spaced hyphen or any en/em dash.
///
/// A dash right after a number (`10 - 20`, `100–120`) is not a delimiter.
pub fn match_dash(text: &str, units: &UnitTable) -> Vec<(String, String)> {
    let delimiters: Vec<(usize, usize)> = text
        .char_indices()
        .filter_map(|(at, c)| {
            let width = match c {
                '–' | '—' => c.len_utf8(),
                '-' if text[..at].ends_with(' ') && text[at + 1..].starts_with(' ') => 1,
                _ => return None,
            };
            let tail: Vec<char> = text[..at]
                .chars()
                .rev()
                .filter(|c| !c.is_whitespace())
                .take(2)
                .collect();
            if tail.len() < 2 || tail.iter().any(|c| c.is_ascii_digit()) {
                return None;
            }
            Some((at, at + width))
        })
        .collect();
    keyed_pairs(text, &delimiters, units)
}

/// Pairs whose key has a letter. Values stop at the first `;`.
fn keyed_pairs(text: &str, delimiters: &[(usize, usize)], units: &UnitTable) -> Vec<(String, String)> {
    split_on_delimiters(text, delimiters, units)
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.split(';').next().unwrap_or_default().trim();
            if !key.chars().any(char::is_alphabetic) || value.is_empty() {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Trimmed (key, value) around each `(start, end)` delimiter span.
///
/// Keys after the first are recovered by walking back from their delimiter
/// over label words; a value runs up to the next key.
fn split_on_delimiters<'t>(
    text: &'t str,
    delimiters: &[(usize, usize)],
    units: &UnitTable,
) -> Vec<(&'t str, &'t str)> {
    // (key start, delimiter start, delimiter end)
    let mut anchors: Vec<(usize, usize, usize)> = Vec::new();
    for &(at, after) in delimiters {
        match anchors.last() {
            None => anchors.push((first_key_start(text, at, units), at, after)),
            Some(&(_, _, floor)) => {
                if let Some(start) = walk_back_key(text, floor, at, units) {
                    anchors.push((start, at, after));
                }
            }
        }
    }

    anchors
        .iter()
        .enumerate()
        .map(|(i, &(start, at, after))| {
            let end = anchors.get(i + 1).map_or(text.len(), |&(next, _, _)| next);
            (text[start..at].trim(), text[after..end].trim())
        })
        .collect()
}

/// Colons that are not part of a number like `10:30`.
fn delimiter_colons(text: &str) -> Vec<usize> {
    let mut colons = Vec::new();
    for (i, c) in text.char_indices() {
        if c != ':' {
            continue;
        }
        let before = text[..i].chars().next_back();
        let after = text[i + 1..].chars().next();
        let between_digits = matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit());
        if !between_digits {
            colons.push(i);
        }
    }
    colons
}

/// Key of the first pair is everything before its delimiter, unless that
/// carries numbers; then only the trailing label run is used.
fn first_key_start(text: &str, delimiter: usize, units: &UnitTable) -> usize {
    let prefix = &text[..delimiter];
    if prefix.chars().any(|c| c.is_ascii_digit()) {
        walk_back_key(text, 0, delimiter, units).unwrap_or(0)
    } else {
        0
    }
}

fn is_label_word(word: &str, units: &UnitTable) -> bool {
    word.chars().any(char::is_alphabetic)
        && !word.chars().any(|c| c.is_ascii_digit())
        && !word.ends_with(|c: char| c == '.' || c == ',' || c == ';')
        && !units.is_unit(word)
}

/// Byte offset where the key ending at `delimiter` starts, scanning no
/// further back than `floor`.
fn walk_back_key(text: &str, floor: usize, delimiter: usize, units: &UnitTable) -> Option<usize> {
    let words: Vec<(usize, &str)> = WORD
        .find_iter(&text[floor..delimiter])
        .map(|word| (floor + word.start(), word.as_str()))
        .collect();

    let run: Vec<(usize, &str)> = words
        .iter()
        .rev()
        .take_while(|(_, word)| is_label_word(word, units))
        .copied()
        .collect();
    // `run` is reversed: the word next to the delimiter comes first.
    let capitalized = run
        .iter()
        .find(|(_, word)| word.chars().next().map_or(false, char::is_uppercase));
    match capitalized {
        Some(&(start, _)) => Some(start),
        None => run.last().map(|&(start, _)| start),
    }
}

/// `key; value`.
pub fn match_semicolon(text: &str) -> Option<(String, String)> {
    let captures = SEMICOLON_PAIR.captures(text)?;
    Some((captures["key"].trim().to_string(), captures["value"].trim().to_string()))
}

/// `* key = value`, `- key: value`, `• key - value`.
pub fn match_bulleted(text: &str) -> Option<(String, String)> {
    let captures = BULLETED_PAIR.captures(text)?;
    Some((captures["key"].trim().to_string(), captures["value"].trim().to_string()))
}

/// A bare value whose label sits alone on the previous line.
pub fn match_orphan(
    segment: &Segment,
    previous: Option<&Segment>,
    units: &UnitTable,
) -> Option<(String, String)> {
    let previous = previous?;
    if previous.kind != SegmentKind::Line || previous.has_digit() || has_delimiter(&previous.text) {
        return None;
    }
    if !units.is_bare_value(&segment.text) {
        return None;
    }
    Some((previous.text.trim().to_string(), segment.text.trim().to_string()))
}

/// `Outer: Inner = value` -> `(Inner, value)`.
pub fn match_nested(text: &str) -> Option<(String, String)> {
    let captures = NESTED_PAIR.captures(text)?;
    Some((captures["inner"].trim().to_string(), captures["value"].trim().to_string()))
}

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn has_delimiter(text: &str) -> bool {
    text.contains(|c: char| matches!(c, ':' | '=' | '|' | ';' | '–' | '—')) || text.contains(" - ")
}
