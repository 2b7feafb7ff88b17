pub mod card;
pub mod profile;
