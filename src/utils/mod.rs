pub mod error;

pub use error::SpecError;
