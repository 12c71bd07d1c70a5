pub mod config;
pub mod data;
pub mod dictionary;
pub mod rules;

pub use config::ExtractionConfig;
pub use data::*;
pub use dictionary::{CategoryKeywords, CorrectionDictionary, UnitRule};
pub use rules::DEFAULT_CATEGORY;
