//! Job recommendations: a static posting catalog scored against resume skills.

pub mod catalog;
pub mod handlers;
pub mod prompts;
pub mod recommender;
pub mod skill_extractor;
