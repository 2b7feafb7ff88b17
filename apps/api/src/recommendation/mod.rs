// Recommendation Engine: loads the static card catalog, filters it against a
// normalized profile, ranks the survivors and returns the top five.

pub mod catalog;
pub mod engine;
pub mod handlers;
pub mod rewards;

pub use catalog::Catalog;
pub use engine::recommend;
