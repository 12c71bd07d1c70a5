pub mod models;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod spec_extractor;

pub use models::{CorrectionDictionary, ExtractionConfig, ParsedSpec, SpecificationMapping};
pub use spec_extractor::SpecExtractor;
pub use utils::SpecError;

use lazy_static::lazy_static;

lazy_static! {
    static ref DEFAULT_EXTRACTOR: SpecExtractor = SpecExtractor::new(CorrectionDictionary::builtin())
        .expect("built-in dictionary is valid");
}

/// Extract specifications with the built-in Russian dictionary.
pub fn extract(raw: &str) -> SpecificationMapping {
    DEFAULT_EXTRACTOR.extract(raw)
}

/// Extract specifications with a caller-supplied dictionary.
pub fn extract_with(
    raw: &str,
    dictionary: &CorrectionDictionary,
) -> Result<SpecificationMapping, SpecError> {
    let extractor = SpecExtractor::new(dictionary.clone())?;
    Ok(extractor.extract(raw))
}
