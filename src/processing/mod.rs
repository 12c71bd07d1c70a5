pub mod assembler;
pub mod classifier;
pub mod extractors;
pub mod normalizer;
pub mod preprocessor;
pub mod segmenter;
pub mod units;

pub use assembler::assemble;
pub use classifier::ClassifierState;
pub use extractors::extract_candidates;
pub use normalizer::Normalizer;
pub use preprocessor::{detect_shape, preprocess};
pub use segmenter::segment;
pub use units::UnitTable;
