use crate::utils::SpecError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Keywords that identify one specification category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    /// Matched against heading lines.
    pub keywords: Vec<String>,
    /// Matched against keys of entries that were never put under a heading.
    #[serde(default)]
    pub key_hints: Vec<String>,
}

/// A key-keyword family and the unit a bare number under it gets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRule {
    pub unit: String,
    pub keywords: Vec<String>,
}

/// Read-only lookup tables driving an extraction.
///
/// All keyword, fragment and token keys are stored lowercase. The tables are
/// never touched during extraction; a different language or tenant gets its
/// own instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionDictionary {
    pub default_category: String,
    pub ocr_corrections: BTreeMap<String, String>,
    /// Priority order: the first category with a matching keyword wins.
    pub categories: Vec<CategoryKeywords>,
    pub key_corrections: BTreeMap<String, String>,
    pub excluded_key_fragments: BTreeSet<String>,
    pub units: Vec<String>,
    /// Priority order: the first rule with a matching keyword wins.
    pub unit_rules: Vec<UnitRule>,
}

impl Default for CorrectionDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CorrectionDictionary {
    /// Parse a dictionary from JSON and check it.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let dictionary: CorrectionDictionary = serde_json::from_str(json)?;
        dictionary.validate()?;
        Ok(dictionary.lowercased())
    }

    /// Load a dictionary from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpecError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpecError::DictionaryLoad(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Reject tables that cannot drive an extraction.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.default_category.trim().is_empty() {
            return Err(SpecError::InvalidDictionary(
                "default category is empty".to_string(),
            ));
        }
        if self.units.iter().all(|u| u.trim().is_empty()) {
            return Err(SpecError::InvalidDictionary("no units defined".to_string()));
        }
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(SpecError::InvalidDictionary(
                    "category with empty name".to_string(),
                ));
            }
            if category.keywords.iter().any(|k| k.trim().is_empty())
                || category.key_hints.iter().any(|k| k.trim().is_empty())
            {
                return Err(SpecError::InvalidDictionary(format!(
                    "category '{}' has an empty keyword",
                    category.name
                )));
            }
        }
        for rule in &self.unit_rules {
            if rule.unit.trim().is_empty() || rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(SpecError::InvalidDictionary(format!(
                    "unit rule '{}' is incomplete",
                    rule.unit
                )));
            }
        }
        if self.ocr_corrections.keys().any(|k| k.trim().is_empty())
            || self.key_corrections.keys().any(|k| k.trim().is_empty())
            || self.excluded_key_fragments.iter().any(|k| k.trim().is_empty())
        {
            return Err(SpecError::InvalidDictionary(
                "empty correction or exclusion entry".to_string(),
            ));
        }
        Ok(())
    }

    // Hand-edited JSON may carry mixed case keys; lookups assume lowercase.
    fn lowercased(mut self) -> Self {
        self.ocr_corrections = self
            .ocr_corrections
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        self.key_corrections = self
            .key_corrections
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
            .collect();
        self.excluded_key_fragments = self
            .excluded_key_fragments
            .into_iter()
            .map(|k| k.to_lowercase())
            .collect();
        for category in &mut self.categories {
            category.keywords = category.keywords.iter().map(|k| k.to_lowercase()).collect();
            category.key_hints = category.key_hints.iter().map(|k| k.to_lowercase()).collect();
        }
        for rule in &mut self.unit_rules {
            rule.keywords = rule.keywords.iter().map(|k| k.to_lowercase()).collect();
        }
        self
    }

    pub fn lookup_ocr(&self, token: &str) -> Option<&str> {
        self.ocr_corrections
            .get(&token.to_lowercase())
            .map(String::as_str)
    }

    /// Category whose heading keyword occurs in `line`.
    pub fn classify(&self, line: &str) -> Option<&str> {
        let cleaned = line
            .trim()
            .trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
            .trim_end_matches(|c: char| c == ':' || c == '*' || c.is_whitespace())
            .to_lowercase();
        if cleaned.is_empty() {
            return None;
        }
        self.categories
            .iter()
            .find(|category| category.keywords.iter().any(|k| cleaned.contains(k.as_str())))
            .map(|category| category.name.as_str())
    }

    /// Category suggested by the key itself.
    pub fn classify_key(&self, key: &str) -> Option<&str> {
        let lower = key.to_lowercase();
        self.categories
            .iter()
            .find(|category| category.key_hints.iter().any(|k| lower.contains(k.as_str())))
            .map(|category| category.name.as_str())
    }

    /// Apply every key correction whose fragment occurs in `key`.
    ///
    /// Returns `None` when nothing applied.
    pub fn correct_key(&self, key: &str) -> Option<String> {
        let mut corrected = key.to_lowercase();
        let mut changed = false;
        for (wrong, right) in &self.key_corrections {
            if corrected.contains(wrong.as_str()) {
                corrected = corrected.replace(wrong.as_str(), right);
                changed = true;
            }
        }
        if changed {
            Some(corrected)
        } else {
            None
        }
    }

    pub fn is_excluded_key(&self, key: &str) -> bool {
        let lower = key.to_lowercase();
        self.excluded_key_fragments
            .iter()
            .any(|fragment| lower.contains(fragment.as_str()))
    }

    /// Unit implied by the key's wording, for bare numeric values.
    pub fn infer_unit(&self, key: &str) -> Option<&str> {
        let lower = key.to_lowercase();
        self.unit_rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|rule| rule.unit.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ocr_is_case_insensitive() {
        let dict = CorrectionDictionary::builtin();
        assert_eq!(dict.lookup_ocr("KBт"), Some("кВт"));
        assert_eq!(dict.lookup_ocr("мм"), None);
    }

    #[test]
    fn test_classify_headings() {
        let dict = CorrectionDictionary::builtin();
        assert_eq!(dict.classify("## Двигатель"), Some("Двигатель"));
        assert_eq!(dict.classify("ГИДРАВЛИЧЕСКАЯ СИСТЕМА:"), Some("Гидравлика"));
        assert_eq!(dict.classify("Рабочие характеристики"), Some("Рабочие характеристики"));
        assert_eq!(dict.classify("Комплектация"), None);
        assert_eq!(dict.classify("###"), None);
    }

    #[test]
    fn test_classify_key_hints() {
        let dict = CorrectionDictionary::builtin();
        assert_eq!(dict.classify_key("Скорость поворота"), Some("Рабочие характеристики"));
        assert_eq!(dict.classify_key("Мощность"), Some("Двигатель"));
        assert_eq!(dict.classify_key("Рабочий вес"), None);
    }

    #[test]
    fn test_correct_key_substring() {
        let dict = CorrectionDictionary::builtin();
        assert_eq!(
            dict.correct_key("Обьем топливного бака"),
            Some("объем топливного бака".to_string())
        );
        assert_eq!(dict.correct_key("мощность"), None);
    }

    #[test]
    fn test_excluded_keys() {
        let dict = CorrectionDictionary::builtin();
        assert!(dict.is_excluded_key("Цена"));
        assert!(dict.is_excluded_key("Год выпуска"));
        assert!(!dict.is_excluded_key("Грузоподъемность"));
    }

    #[test]
    fn test_infer_unit_priority() {
        let dict = CorrectionDictionary::builtin();
        assert_eq!(dict.infer_unit("Рабочий вес"), Some("кг"));
        assert_eq!(dict.infer_unit("Мощность"), Some("кВт"));
        assert_eq!(dict.infer_unit("Мощность, л.с."), Some("л.с."));
        assert_eq!(dict.infer_unit("Скорость поворота"), Some("об/мин"));
        assert_eq!(dict.infer_unit("Максимальная скорость"), Some("км/ч"));
        assert_eq!(dict.infer_unit("Колесная формула"), None);
    }

    #[test]
    fn test_from_json_lowercases_and_validates() {
        let json = r#"{
            "default_category": "General",
            "ocr_corrections": {"KW": "kW"},
            "categories": [{"name": "Engine", "keywords": ["ENGINE"]}],
            "key_corrections": {},
            "excluded_key_fragments": ["Price"],
            "units": ["kW", "kg"],
            "unit_rules": [{"unit": "kg", "keywords": ["Weight"]}]
        }"#;
        let dict = CorrectionDictionary::from_json(json).unwrap();
        assert_eq!(dict.lookup_ocr("kw"), Some("kW"));
        assert_eq!(dict.classify("ENGINE DATA"), Some("Engine"));
        assert!(dict.is_excluded_key("price"));
        assert_eq!(dict.infer_unit("Operating weight"), Some("kg"));
        assert!(dict.categories[0].key_hints.is_empty());
    }

    #[test]
    fn test_from_json_rejects_missing_units() {
        let json = r#"{
            "default_category": "General",
            "ocr_corrections": {},
            "categories": [],
            "key_corrections": {},
            "excluded_key_fragments": [],
            "units": [],
            "unit_rules": []
        }"#;
        assert!(matches!(
            CorrectionDictionary::from_json(json),
            Err(SpecError::InvalidDictionary(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed_json() {
        assert!(matches!(
            CorrectionDictionary::from_json("{ not json"),
            Err(SpecError::Json(_))
        ));
    }

    #[test]
    fn test_builtin_round_trips_through_json() {
        let dict = CorrectionDictionary::builtin();
        let json = serde_json::to_string(&dict).unwrap();
        assert_eq!(CorrectionDictionary::from_json(&json).unwrap(), dict);
    }
}
