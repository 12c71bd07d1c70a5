use crate::models::{CorrectionDictionary, ExtractionConfig, ParsedSpec};
use std::fmt;

/// Why a normalized spec was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    KeyLength(usize),
    KeyWithoutLetter,
    ExcludedKey,
    ValueLength(usize),
    VagueValue,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::KeyLength(len) => write!(f, "key length {} out of bounds", len),
            RejectReason::KeyWithoutLetter => write!(f, "key has no letters"),
            RejectReason::ExcludedKey => write!(f, "key is excluded"),
            RejectReason::ValueLength(len) => write!(f, "value length {} out of bounds", len),
            RejectReason::VagueValue => write!(f, "value is short and has no digits"),
        }
    }
}

pub struct SpecValidator;

impl SpecValidator {
    /// First rule `spec` breaks, if any.
    pub fn check(
        spec: &ParsedSpec,
        dictionary: &CorrectionDictionary,
        config: &ExtractionConfig,
    ) -> Result<(), RejectReason> {
        let key_len = spec.key.chars().count();
        if key_len < config.min_key_chars || key_len > config.max_key_chars {
            return Err(RejectReason::KeyLength(key_len));
        }
        if !spec.key.chars().any(char::is_alphabetic) {
            return Err(RejectReason::KeyWithoutLetter);
        }
        if dictionary.is_excluded_key(&spec.key) {
            return Err(RejectReason::ExcludedKey);
        }

        let value_len = spec.value.chars().count();
        if value_len < config.min_value_chars || value_len > config.max_value_chars {
            return Err(RejectReason::ValueLength(value_len));
        }
        let has_digit = spec.value.chars().any(|c| c.is_ascii_digit());
        if !has_digit && value_len < config.min_vague_value_chars {
            return Err(RejectReason::VagueValue);
        }
        Ok(())
    }

    pub fn is_valid_spec(
        spec: &ParsedSpec,
        dictionary: &CorrectionDictionary,
        config: &ExtractionConfig,
    ) -> bool {
        Self::check(spec, dictionary, config).is_ok()
    }
}
