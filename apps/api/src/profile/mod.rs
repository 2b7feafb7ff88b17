// Profile Normalizer: turns raw questionnaire answers into canonical profile values.
// Never fails; malformed input degrades to a zero value.

pub mod aliases;
pub mod normalizer;
pub mod questions;

pub use normalizer::normalize;
pub use questions::{Question, QUESTIONS};
