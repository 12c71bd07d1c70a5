// Text cleanup ahead of segmentation: whitespace, decoration, OCR slips
// and stray unit tokens.

use super::segmenter::{is_table_row, MARKDOWN_HEADING};
use super::units::UnitTable;
use crate::models::{CorrectionDictionary, InputShape};
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

/// Lines up to this length count as field-like even without a delimiter.
const SHORT_LINE_CHARS: usize = 40;

lazy_static! {
    static ref MULTI_SPACE: Regex = Regex::new(r" {2,}").unwrap();
    static ref FIELD_DELIMITER: Regex = Regex::new(r"[:=|;\t]|\s[-–—]\s").unwrap();
}

const DECORATIVE_QUOTES: &[char] = &['"', '«', '»', '“', '”', '„', '‟'];
const TOKEN_WRAPPERS: &[char] = &[',', ';', ':', '(', ')', '[', ']', '|'];

/// Decide whether line breaks in `raw` carry structure.
pub fn detect_shape(raw: &str) -> InputShape {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines
        .iter()
        .any(|line| is_table_row(line) || MARKDOWN_HEADING.is_match(line))
    {
        return InputShape::Structured;
    }

    let field_like = lines
        .iter()
        .filter(|line| {
            FIELD_DELIMITER.is_match(line) || line.chars().count() <= SHORT_LINE_CHARS
        })
        .count();

    if lines.len() >= 2 && field_like * 2 >= lines.len() {
        InputShape::Structured
    } else {
        InputShape::Prose
    }
}

/// Full cleanup pass; total over any input.
pub fn preprocess(
    raw: &str,
    shape: InputShape,
    dictionary: &CorrectionDictionary,
    units: &UnitTable,
) -> String {
    let text = normalize_whitespace(raw, shape);
    let text = strip_decoration(&text);
    let text = correct_ocr_tokens(&text, dictionary);
    units.reorder_stray_units(&text)
}

/// Unify line breaks and exotic spaces; keep lines only for structured input.
pub fn normalize_whitespace(raw: &str, shape: InputShape) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut cleaned = String::with_capacity(unified.len());
    for c in unified.chars() {
        match c {
            '\n' => cleaned.push('\n'),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => {}
            c if c.is_whitespace() => cleaned.push(' '),
            c if c.is_control() => {}
            c => cleaned.push(c),
        }
    }

    let lines = cleaned
        .split('\n')
        .map(|line| MULTI_SPACE.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty());

    match shape {
        InputShape::Prose => lines.collect::<Vec<_>>().join(" "),
        InputShape::Structured => lines.collect::<Vec<_>>().join("\n"),
    }
}

/// Drop decorative quotes and un-escape markdown-escaped brackets.
pub fn strip_decoration(text: &str) -> String {
    text.replace("\\(", "(")
        .replace("\\)", ")")
        .chars()
        .filter(|c| !DECORATIVE_QUOTES.contains(c))
        .collect()
}

/// Replace OCR-mangled tokens using the dictionary.
pub fn correct_ocr_tokens(text: &str, dictionary: &CorrectionDictionary) -> String {
    text.split('\n')
        .map(|line| {
            line.split(' ')
                .map(|token| correct_token(token, dictionary))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn correct_token(token: &str, dictionary: &CorrectionDictionary) -> String {
    let core = token.trim_matches(|c: char| TOKEN_WRAPPERS.contains(&c));
    if core.is_empty() {
        return token.to_string();
    }
    match dictionary.lookup_ocr(core) {
        Some(correct) if correct != core => {
            trace!("OCR correction: '{}' -> '{}'", core, correct);
            let start = token.len()
                - token
                    .trim_start_matches(|c: char| TOKEN_WRAPPERS.contains(&c))
                    .len();
            let end = start + core.len();
            format!("{}{}{}", &token[..start], correct, &token[end..])
        }
        _ => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> CorrectionDictionary {
        CorrectionDictionary::builtin()
    }

    #[test]
    fn test_detect_shape() {
        assert_eq!(detect_shape("| Мощность | 110 кВт |"), InputShape::Structured);
        assert_eq!(detect_shape("## Двигатель\nМощность 110"), InputShape::Structured);
        assert_eq!(
            detect_shape("Мощность: 110 кВт\nМасса: 20000 кг"),
            InputShape::Structured
        );
        assert_eq!(
            detect_shape("Экскаватор в отличном состоянии, мощность двигателя 110 кВт, масса 20 тонн"),
            InputShape::Prose
        );
        assert_eq!(detect_shape(""), InputShape::Prose);
    }

    #[test]
    fn test_normalize_whitespace_by_shape() {
        let raw = "Мощность:\t110\u{00A0}кВт\r\n\r\n  Масса:   20000\u{200B} кг  ";
        assert_eq!(
            normalize_whitespace(raw, InputShape::Structured),
            "Мощность: 110 кВт\nМасса: 20000 кг"
        );
        assert_eq!(
            normalize_whitespace(raw, InputShape::Prose),
            "Мощность: 110 кВт Масса: 20000 кг"
        );
    }

    #[test]
    fn test_strip_decoration() {
        assert_eq!(
            strip_decoration("Двигатель «Cummins» \\(Китай\\)"),
            "Двигатель Cummins (Китай)"
        );
    }

    #[test]
    fn test_correct_ocr_tokens() {
        let dict = dictionary();
        assert_eq!(
            correct_ocr_tokens("Мощность: 110 KBт, давление (Mпa)", &dict),
            "Мощность: 110 кВт, давление (МПа)"
        );
        assert_eq!(
            correct_ocr_tokens("Скорость 5 o6/мин\nОбъем 1,2 м3", &dict),
            "Скорость 5 об/мин\nОбъем 1,2 м³"
        );
    }

    #[test]
    fn test_preprocess_reorders_stray_unit() {
        let dict = dictionary();
        let units = UnitTable::new(&dict.units).unwrap();
        let text = preprocess("кВт\nМощность: 110", InputShape::Structured, &dict, &units);
        assert_eq!(text, "Мощность: 110 кВт");
    }

    #[test]
    fn test_preprocess_is_total() {
        let dict = dictionary();
        let units = UnitTable::new(&dict.units).unwrap();
        for raw in ["", "   ", "\u{0}\u{1}\u{FEFF}", "|||", "::::"] {
            let _ = preprocess(raw, detect_shape(raw), &dict, &units);
        }
    }
}
