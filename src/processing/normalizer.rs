use super::units::UnitTable;
use crate::models::{CandidateEntry, CorrectionDictionary, ParsedSpec};
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref THOUSANDS: Regex = Regex::new(r"\b\d{1,3}(?: \d{3})+\b").unwrap();
    static ref BARE_NUMBER: Regex = Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap();
}

const KEY_PREFIX_MARKERS: &[char] = &['*', '•', '·', '-', '–', '—', '#', '>'];
const KEY_SUFFIX_DELIMITERS: &[char] = &[':', ';', '=', '-', '–', '—', '|', ','];
const VALUE_EDGE_DELIMITERS: &[char] = &[':', ';', '=', '|', ','];

/// Turns raw candidates into clean, unit-aware specs.
pub struct Normalizer;

impl Normalizer {
    pub fn normalize(
        candidate: CandidateEntry,
        dictionary: &CorrectionDictionary,
        units: &UnitTable,
    ) -> ParsedSpec {
        let key = Self::normalize_key(&candidate.key, dictionary, units);
        let (value, unit) = Self::normalize_value(&candidate.value, units);
        let unit = unit.or_else(|| Self::infer_missing_unit(&key, &value, dictionary));
        trace!(
            "Normalized '{}' = '{}' -> '{}' = '{}' {:?}",
            candidate.key,
            candidate.value,
            key,
            value,
            unit
        );
        ParsedSpec::new(candidate.category, key, value, unit)
    }

    /// `"* мошность двигателя:"` -> `"Мощность Двигателя"`. Unit words keep
    /// their canonical spelling (`"Мощность, л.с."`).
    pub fn normalize_key(key: &str, dictionary: &CorrectionDictionary, units: &UnitTable) -> String {
        let stripped = key
            .trim()
            .trim_start_matches(|c: char| KEY_PREFIX_MARKERS.contains(&c) || c.is_whitespace())
            .trim_end_matches(|c: char| KEY_SUFFIX_DELIMITERS.contains(&c) || c.is_whitespace());
        let collapsed = WHITESPACE.replace_all(stripped, " ").to_lowercase();
        let corrected = dictionary.correct_key(&collapsed).unwrap_or(collapsed);
        title_case(&corrected, units)
    }

    /// Split a raw value into a display number (or text) and a canonical unit.
    pub fn normalize_value(value: &str, units: &UnitTable) -> (String, Option<String>) {
        let trimmed = value
            .trim()
            .trim_matches(|c: char| VALUE_EDGE_DELIMITERS.contains(&c) || c.is_whitespace());
        let decimal = decimal_points_outside_parens(trimmed);
        let collapsed = WHITESPACE.replace_all(&decimal, " ").into_owned();
        let joined = join_thousands(&collapsed);
        let ordered = Self::fix_value_unit_order(&joined, units);

        if let Some(split) = split_with_units(&ordered, units) {
            return split;
        }
        // `"15 кг."`: a sentence period glued to the unit.
        if let Some(without_period) = ordered.strip_suffix('.') {
            if let Some(split) = split_with_units(without_period, units) {
                return split;
            }
            if BARE_NUMBER.is_match(without_period) {
                return (without_period.to_string(), None);
            }
        }
        (ordered, None)
    }

    /// `"МПа 314"` -> `"314 МПа"`; anything else unchanged.
    pub fn fix_value_unit_order(value: &str, units: &UnitTable) -> String {
        match units.split_unit_number(value) {
            Some((number, unit)) => format!("{} {}", number, unit),
            None => value.to_string(),
        }
    }

    /// Unit suggested by the key, for bare numbers only.
    pub fn infer_missing_unit(
        key: &str,
        value: &str,
        dictionary: &CorrectionDictionary,
    ) -> Option<String> {
        if !BARE_NUMBER.is_match(value) {
            return None;
        }
        dictionary.infer_unit(key).map(str::to_string)
    }
}

fn split_with_units(value: &str, units: &UnitTable) -> Option<(String, Option<String>)> {
    if let Some((number, unit)) = units.split_number_unit(value) {
        return Some((number, Some(unit)));
    }
    if let Some((range, unit)) = units.split_range(value) {
        return Some((range, Some(unit)));
    }
    units.split_dimension(value)
}

fn title_case(text: &str, units: &UnitTable) -> String {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            if let Some(unit) = units.canonical(word) {
                return unit.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `5,8` -> `5.8`, but `(48,8 т)` keeps its comma.
fn decimal_points_outside_parens(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut depth = 0usize;
    let mut result = String::with_capacity(value.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).map_or(false, |n| n.is_ascii_digit()) =>
            {
                result.push('.');
                continue;
            }
            _ => {}
        }
        result.push(c);
    }
    result
}

/// `15 000` -> `15000`, unless the group is the tail of a decimal.
fn join_thousands(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut last = 0;
    for m in THOUSANDS.find_iter(value) {
        let preceded_by_decimal = value[..m.start()].ends_with(|c: char| c == '.' || c == ',');
        if preceded_by_decimal {
            continue;
        }
        result.push_str(&value[last..m.start()]);
        result.push_str(&m.as_str().replace(' ', ""));
        last = m.end();
    }
    result.push_str(&value[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatcherKind;

    fn setup() -> (CorrectionDictionary, UnitTable) {
        let dict = CorrectionDictionary::builtin();
        let units = UnitTable::new(&dict.units).unwrap();
        (dict, units)
    }

    #[test]
    fn test_normalize_key() {
        let (dict, units) = setup();
        let key = |raw: &str| Normalizer::normalize_key(raw, &dict, &units);
        assert_eq!(key("* мошность двигателя:"), "Мощность Двигателя");
        assert_eq!(key("  Скорость   поворота "), "Скорость Поворота");
        assert_eq!(key("Обьем бака -"), "Объем Бака");
        assert_eq!(key("Макс. скорость"), "Максимальная Скорость");
    }

    #[test]
    fn test_normalize_key_keeps_unit_spelling() {
        let (dict, units) = setup();
        let key = |raw: &str| Normalizer::normalize_key(raw, &dict, &units);
        assert_eq!(key("Мощность, л.с."), "Мощность, л.с.");
        assert_eq!(key("ПОДАЧА НАСОСА, Л/МИН"), "Подача Насоса, л/мин");
        assert_eq!(key("Мощность, КВТ"), "Мощность, кВт");
    }

    #[test]
    fn test_normalize_value_units() {
        let (_, units) = setup();
        let value = |raw: &str| Normalizer::normalize_value(raw, &units);
        assert_eq!(value("110кВт"), ("110".to_string(), Some("кВт".to_string())));
        assert_eq!(value("5,8 об/мин"), ("5.8".to_string(), Some("об/мин".to_string())));
        assert_eq!(value("15 000 кг"), ("15000".to_string(), Some("кг".to_string())));
        assert_eq!(value("МПа 314"), ("314".to_string(), Some("МПа".to_string())));
        assert_eq!(value("15 кг."), ("15".to_string(), Some("кг".to_string())));
        assert_eq!(value(": 42;"), ("42".to_string(), None));
    }

    #[test]
    fn test_normalize_value_ranges_and_triples() {
        let (_, units) = setup();
        assert_eq!(
            Normalizer::normalize_value("1800-2200 об/мин", &units),
            ("1800 - 2200".to_string(), Some("об/мин".to_string()))
        );
        assert_eq!(
            Normalizer::normalize_value("1200x800x2400 мм", &units),
            ("1200 × 800 × 2400".to_string(), Some("мм".to_string()))
        );
    }

    #[test]
    fn test_commas_inside_parentheses_survive() {
        let (_, units) = setup();
        assert_eq!(
            Normalizer::normalize_value("479 кН (48,8 т)", &units),
            ("479 кН (48,8 т)".to_string(), None)
        );
    }

    #[test]
    fn test_join_thousands_skips_decimals() {
        assert_eq!(join_thousands("1 500 мм"), "1500 мм");
        assert_eq!(join_thousands("1.2 345"), "1.2 345");
    }

    #[test]
    fn test_infer_missing_unit() {
        let (dict, _) = setup();
        assert_eq!(
            Normalizer::infer_missing_unit("Рабочий Вес", "15000", &dict),
            Some("кг".to_string())
        );
        assert_eq!(Normalizer::infer_missing_unit("Рабочий Вес", "около 15 тонн", &dict), None);
        assert_eq!(Normalizer::infer_missing_unit("Колесная Формула", "6", &dict), None);
    }

    #[test]
    fn test_normalize_candidate() {
        let (dict, units) = setup();
        let candidate = CandidateEntry {
            category: "Основные параметры".to_string(),
            key: "Рабочий вес".to_string(),
            value: "15000".to_string(),
            source: "Рабочий вес: 15000".to_string(),
            matcher: MatcherKind::Colon,
        };
        let spec = Normalizer::normalize(candidate, &dict, &units);
        assert_eq!(spec.key, "Рабочий Вес");
        assert_eq!(spec.display_value(), "15000 кг");
    }
}
