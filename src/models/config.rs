use crate::utils::SpecError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds used across the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Segments shorter than this (in chars, after trimming) are noise.
    pub min_segment_chars: usize,
    /// Longest line still treated as a possible heading.
    pub max_heading_chars: usize,
    pub min_key_chars: usize,
    pub max_key_chars: usize,
    pub min_value_chars: usize,
    pub max_value_chars: usize,
    /// Values without digits must be at least this long to be kept.
    pub min_vague_value_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_segment_chars: 3,
            max_heading_chars: 60,
            min_key_chars: 2,
            max_key_chars: 100,
            min_value_chars: 1,
            max_value_chars: 100,
            min_vague_value_chars: 10,
        }
    }
}

impl ExtractionConfig {
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let config: ExtractionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.min_key_chars == 0 || self.min_key_chars > self.max_key_chars {
            return Err(SpecError::InvalidConfig(format!(
                "key length bounds [{}, {}] are invalid",
                self.min_key_chars, self.max_key_chars
            )));
        }
        if self.min_value_chars == 0 || self.min_value_chars > self.max_value_chars {
            return Err(SpecError::InvalidConfig(format!(
                "value length bounds [{}, {}] are invalid",
                self.min_value_chars, self.max_value_chars
            )));
        }
        Ok(())
    }
}
