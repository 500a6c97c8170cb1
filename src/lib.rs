pub mod error;
pub mod generator;
pub mod strength;

pub use error::{Error, Result};
pub use generator::{Alphabet, GenerationConfig, generate, generate_with_key};
pub use strength::{Criteria, Evaluation, Severity, StrengthLevel, evaluate, evaluate_optional};
