use crate::utils::SpecError;
use log::trace;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Number as written in listings: optional sign, decimal point or comma.
pub const NUMBER: &str = r"-?\d+(?:[.,]\d+)?";

/// Same, but also accepts space-separated thousands (`15 000`).
const GROUPED_NUMBER: &str = r"(?:\d{1,3}(?: \d{3})+(?:[.,]\d+)?|-?\d+(?:[.,]\d+)?)";

/// Unit vocabulary compiled into the patterns that need it.
///
/// Unit tokens are matched case-insensitively and reported in their
/// canonical spelling.
#[derive(Debug)]
pub struct UnitTable {
    canonical: HashMap<String, String>,
    number_unit: Regex,
    unit_number: Regex,
    range: Regex,
    dimension: Regex,
    dimension_exact: Regex,
    bare_value: Regex,
    reorder: Regex,
    leading_unit: Regex,
}

impl UnitTable {
    pub fn new(units: &[String]) -> Result<Self, SpecError> {
        let mut canonical = HashMap::new();
        let mut tokens: Vec<&str> = Vec::new();
        for unit in units {
            let unit = unit.trim();
            if unit.is_empty() {
                continue;
            }
            canonical
                .entry(unit.to_lowercase())
                .or_insert_with(|| unit.to_string());
            tokens.push(unit);
        }
        if tokens.is_empty() {
            return Err(SpecError::InvalidDictionary("no units defined".to_string()));
        }

        // Longest first so "мм" wins over "м" in the alternation.
        tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        tokens.dedup();
        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let unit = format!("(?i:{})", alternation);
        let times = r"[×xXхХ*]";
        let triple = format!(
            r"(?P<a>\d+(?:[.,]\d+)?)\s*{times}\s*(?P<b>\d+(?:[.,]\d+)?)\s*{times}\s*(?P<c>\d+(?:[.,]\d+)?)"
        );

        Ok(UnitTable {
            canonical,
            number_unit: Regex::new(&format!(r"^(?P<num>{NUMBER})\s*(?P<unit>{unit})$"))?,
            unit_number: Regex::new(&format!(r"^(?P<unit>{unit})\s+(?P<num>{NUMBER})$"))?,
            range: Regex::new(&format!(
                r"^(?P<from>{NUMBER})\s*(?P<sep>[-–—])\s*(?P<to>{NUMBER})\s*(?P<unit>{unit})$"
            ))?,
            dimension: Regex::new(&format!(
                r"{triple}(?:\s*(?P<unit>{unit})(?:$|[^\p{{L}}\p{{N}}]))?"
            ))?,
            dimension_exact: Regex::new(&format!(r"^{triple}(?:\s*(?P<unit>{unit}))?$"))?,
            bare_value: Regex::new(&format!(
                r"^{GROUPED_NUMBER}(?:\s*[-–—]\s*{GROUPED_NUMBER})?(?:\s*(?P<unit>{unit}))?\.?$"
            ))?,
            reorder: Regex::new(&format!(
                r"(?m)(?P<lead>^|[^\s\d.,)\]][ \t]+)(?P<unit>{unit})(?:[ \t]*\n[ \t]*|[ \t]+)(?P<label>\p{{L}}[\p{{L}}\- ]{{0,60}}?)[ \t]*:[ \t]*(?P<value>{NUMBER})"
            ))?,
            leading_unit: Regex::new(&format!(r"^[ \t]*(?:{unit})(?:$|[^\p{{L}}\p{{N}}])"))?,
        })
    }

    /// Canonical spelling of a unit token, tolerating a trailing period.
    pub fn canonical(&self, token: &str) -> Option<&str> {
        let lower = token.trim().to_lowercase();
        self.canonical
            .get(&lower)
            .or_else(|| self.canonical.get(lower.trim_end_matches('.')))
            .map(String::as_str)
    }

    pub fn is_unit(&self, token: &str) -> bool {
        self.canonical(token).is_some()
    }

    /// `"110кВт"` / `"110 кВт"` -> `("110", "кВт")`.
    pub fn split_number_unit(&self, value: &str) -> Option<(String, String)> {
        let caps = self.number_unit.captures(value)?;
        let unit = self.canonical(&caps["unit"])?;
        Some((caps["num"].to_string(), unit.to_string()))
    }

    /// `"МПа 314"` -> `("314", "МПа")`.
    pub fn split_unit_number(&self, value: &str) -> Option<(String, String)> {
        let caps = self.unit_number.captures(value)?;
        let unit = self.canonical(&caps["unit"])?;
        Some((caps["num"].to_string(), unit.to_string()))
    }

    /// `"10 - 20 мм"` -> `("10 - 20", "мм")`.
    pub fn split_range(&self, value: &str) -> Option<(String, String)> {
        let caps = self.range.captures(value)?;
        let unit = self.canonical(&caps["unit"])?;
        Some((
            format!("{} {} {}", &caps["from"], &caps["sep"], &caps["to"]),
            unit.to_string(),
        ))
    }

    /// First `N × N × N (unit)?` triple in `text`, as (normalized triple, unit).
    pub fn find_dimension(&self, text: &str) -> Option<(String, Option<String>)> {
        self.dimension.captures(text).map(|caps| self.triple(&caps))
    }

    /// Like [`find_dimension`](Self::find_dimension), but `value` must be
    /// nothing except the triple and its unit.
    pub fn split_dimension(&self, value: &str) -> Option<(String, Option<String>)> {
        self.dimension_exact.captures(value).map(|caps| self.triple(&caps))
    }

    fn triple(&self, caps: &Captures) -> (String, Option<String>) {
        let triple = format!("{} × {} × {}", &caps["a"], &caps["b"], &caps["c"]);
        let unit = caps
            .name("unit")
            .and_then(|u| self.canonical(u.as_str()))
            .map(str::to_string);
        (triple, unit)
    }

    /// Whether `text` is nothing but a number (or range) with an optional unit.
    pub fn is_bare_value(&self, text: &str) -> bool {
        self.bare_value.is_match(text.trim())
    }

    /// Whether `text` starts with a unit token.
    pub fn starts_with_unit(&self, text: &str) -> bool {
        self.leading_unit.is_match(text)
    }

    /// Move a stray unit token that precedes a `Label: number` pair to the end
    /// of that pair's value.
    pub fn reorder_stray_units(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.reorder.captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            if self.starts_with_unit(&text[whole.end()..]) {
                continue;
            }
            result.push_str(&text[last..whole.start()]);
            result.push_str(&self.reordered(&caps));
            last = whole.end();
        }
        result.push_str(&text[last..]);
        result
    }

    fn reordered(&self, caps: &Captures) -> String {
        let unit = self.canonical(&caps["unit"]).unwrap_or(&caps["unit"]);
        trace!(
            "Reordering stray unit '{}' into '{}: {}'",
            unit,
            caps["label"].trim(),
            &caps["value"]
        );
        format!(
            "{}{}: {} {}",
            &caps["lead"],
            caps["label"].trim(),
            &caps["value"],
            unit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorrectionDictionary;

    fn table() -> UnitTable {
        UnitTable::new(&CorrectionDictionary::builtin().units).unwrap()
    }

    #[test]
    fn test_canonical_lookup() {
        let units = table();
        assert_eq!(units.canonical("КВТ"), Some("кВт"));
        assert_eq!(units.canonical("мм."), Some("мм"));
        assert_eq!(units.canonical("л.с."), Some("л.с."));
        assert_eq!(units.canonical("вес"), None);
    }

    #[test]
    fn test_split_number_unit() {
        let units = table();
        assert_eq!(
            units.split_number_unit("110кВт"),
            Some(("110".to_string(), "кВт".to_string()))
        );
        assert_eq!(
            units.split_number_unit("5.8 об/мин"),
            Some(("5.8".to_string(), "об/мин".to_string()))
        );
        assert_eq!(
            units.split_number_unit("2500 мм"),
            Some(("2500".to_string(), "мм".to_string()))
        );
        assert_eq!(units.split_number_unit("479 кН (48,8 т)"), None);
    }

    #[test]
    fn test_split_unit_number() {
        let units = table();
        assert_eq!(
            units.split_unit_number("МПа 314"),
            Some(("314".to_string(), "МПа".to_string()))
        );
        assert_eq!(units.split_unit_number("314 МПа"), None);
    }

    #[test]
    fn test_split_range() {
        let units = table();
        assert_eq!(
            units.split_range("10 - 20 мм"),
            Some(("10 - 20".to_string(), "мм".to_string()))
        );
        assert_eq!(
            units.split_range("1800–2200 об/мин"),
            Some(("1800 – 2200".to_string(), "об/мин".to_string()))
        );
    }

    #[test]
    fn test_find_dimension() {
        let units = table();
        assert_eq!(
            units.find_dimension("Габариты 1200 × 800 × 2400 мм, без ковша"),
            Some(("1200 × 800 × 2400".to_string(), Some("мм".to_string())))
        );
        assert_eq!(
            units.find_dimension("5000х2500х3100"),
            Some(("5000 × 2500 × 3100".to_string(), None))
        );
        assert_eq!(units.find_dimension("1200 × 800"), None);
        assert_eq!(
            units.split_dimension("1200x800x2400 мм"),
            Some(("1200 × 800 × 2400".to_string(), Some("мм".to_string())))
        );
        assert_eq!(units.split_dimension("Габариты 1200x800x2400"), None);
    }

    #[test]
    fn test_bare_value() {
        let units = table();
        assert!(units.is_bare_value("15000 кг"));
        assert!(units.is_bare_value("110"));
        assert!(units.is_bare_value("10-20 мм"));
        assert!(units.is_bare_value("15 000 кг"));
        assert!(!units.is_bare_value("Рабочий вес 15000"));
    }

    #[test]
    fn test_reorder_stray_units() {
        let units = table();
        assert_eq!(
            units.reorder_stray_units("кВт Мощность: 110"),
            "Мощность: 110 кВт"
        );
        assert_eq!(
            units.reorder_stray_units("Двигатель\nкВт\nМощность: 110"),
            "Двигатель\nМощность: 110 кВт"
        );
    }

    #[test]
    fn test_reorder_leaves_attached_units_alone() {
        let units = table();
        let text = "Мощность: 110 кВт Масса: 20000";
        assert_eq!(units.reorder_stray_units(text), text);
        let already = "кг Масса: 20000 кг";
        assert_eq!(units.reorder_stray_units(already), already);
        let inverted = "Давление: МПа 314";
        assert_eq!(units.reorder_stray_units(inverted), inverted);
        let bracketed = "Мощность: 110 (150) л.с. Масса: 20000";
        assert_eq!(units.reorder_stray_units(bracketed), bracketed);
        let listed = "Ширина [по гусеницам] мм Масса: 20000";
        assert_eq!(units.reorder_stray_units(listed), listed);
    }
}
