// Session controller: owns one profile per questionnaire session and walks it
// through the fixed question sequence.

pub mod handlers;
pub mod store;

pub use store::{SessionStore, SessionView};
