pub mod dedup;
pub mod spec_validator;

pub use dedup::merge_duplicates;
pub use spec_validator::{RejectReason, SpecValidator};
