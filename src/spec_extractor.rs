use crate::models::*;
use crate::processing::classifier::rebucket_by_key;
use crate::processing::*;
use crate::utils::SpecError;
use crate::validation::*;
use log::{debug, info};

/// Runs the whole pipeline over raw listing text.
///
/// Holds an immutable dictionary, the thresholds and the unit patterns
/// compiled from that dictionary, so one instance can serve any number of
/// documents, from any number of threads.
#[derive(Debug)]
pub struct SpecExtractor {
    dictionary: CorrectionDictionary,
    config: ExtractionConfig,
    units: UnitTable,
}

impl SpecExtractor {
    pub fn new(dictionary: CorrectionDictionary) -> Result<Self, SpecError> {
        Self::with_config(dictionary, ExtractionConfig::default())
    }

    pub fn with_config(
        dictionary: CorrectionDictionary,
        config: ExtractionConfig,
    ) -> Result<Self, SpecError> {
        dictionary.validate()?;
        config.validate()?;
        let units = UnitTable::new(&dictionary.units)?;
        info!(
            "Extractor ready: {} categories, {} units, {} OCR corrections",
            dictionary.categories.len(),
            dictionary.units.len(),
            dictionary.ocr_corrections.len()
        );
        Ok(SpecExtractor {
            dictionary,
            config,
            units,
        })
    }

    pub fn dictionary(&self) -> &CorrectionDictionary {
        &self.dictionary
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Category -> key -> display value. Never fails; unusable input
    /// gives an empty mapping.
    pub fn extract(&self, raw: &str) -> SpecificationMapping {
        assemble(&self.extract_specs(raw))
    }

    /// Validated, deduplicated specs in document order.
    pub fn extract_specs(&self, raw: &str) -> Vec<ParsedSpec> {
        // Step 1: Clean up the text for its shape
        let shape = detect_shape(raw);
        let text = preprocess(raw, shape, &self.dictionary, &self.units);

        // Step 2: Cut it into segments and track categories
        let segments = segment(&text, shape, &self.units, &self.config);
        let candidates = self.collect_candidates(segments);
        debug!("{} candidate pairs found", candidates.len());

        // Step 3: Normalize and filter
        let specs: Vec<ParsedSpec> = candidates
            .into_iter()
            .map(|candidate| Normalizer::normalize(candidate, &self.dictionary, &self.units))
            .map(|spec| rebucket_by_key(spec, &self.dictionary))
            .filter(|spec| match SpecValidator::check(spec, &self.dictionary, &self.config) {
                Ok(()) => true,
                Err(reason) => {
                    debug!("Rejected '{}' = '{}': {}", spec.key, spec.value, reason);
                    false
                }
            })
            .collect();

        // Step 4: One spec per key
        merge_duplicates(specs)
    }

    fn collect_candidates(&self, segments: Vec<Segment>) -> Vec<CandidateEntry> {
        let mut state = ClassifierState::new(&self.dictionary);
        let mut previous: Option<Segment> = None;
        let mut candidates = Vec::new();

        for segment in segments {
            let (next, tagged) = state.step(segment, &self.dictionary, &self.config);
            state = next;
            match tagged {
                Some(tagged) => {
                    candidates.extend(extract_candidates(&tagged, previous.as_ref(), &self.units));
                    previous = Some(tagged.segment);
                }
                // Headings break orphan label/value chains.
                None => previous = None,
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SpecExtractor {
        SpecExtractor::new(CorrectionDictionary::builtin()).unwrap()
    }

    #[test]
    fn test_rejects_broken_dictionary() {
        let mut dict = CorrectionDictionary::builtin();
        dict.units.clear();
        assert!(matches!(
            SpecExtractor::new(dict),
            Err(SpecError::InvalidDictionary(_))
        ));
    }

    #[test]
    fn test_rejects_broken_config() {
        let config = ExtractionConfig {
            min_key_chars: 0,
            ..ExtractionConfig::default()
        };
        assert!(matches!(
            SpecExtractor::with_config(CorrectionDictionary::builtin(), config),
            Err(SpecError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_orphan_label_across_lines() {
        let specs = extractor().extract_specs("Рабочий вес\n15 000 кг\nМощность: 110 кВт");
        let found: Vec<(String, String)> = specs
            .iter()
            .map(|s| (s.key.clone(), s.display_value()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Рабочий Вес".to_string(), "15000 кг".to_string()),
                ("Мощность".to_string(), "110 кВт".to_string()),
            ]
        );
    }

    #[test]
    fn test_heading_breaks_orphan_chain() {
        let mapping = extractor().extract("Рабочий вес\n## Двигатель\n110 кВт");
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_prose_with_several_pairs() {
        let mapping = extractor().extract(
            "Продается экскаватор. Мощность: 110 кВт Рабочий вес: 20 000 кг Давление: 31,4 МПа",
        );
        assert_eq!(mapping[DEFAULT_CATEGORY]["Рабочий Вес"], "20000 кг");
        // No headings, so the keys pick their own categories.
        assert_eq!(mapping["Двигатель"]["Мощность"], "110 кВт");
        assert_eq!(mapping["Гидравлика"]["Давление"], "31.4 МПа");
    }
}
