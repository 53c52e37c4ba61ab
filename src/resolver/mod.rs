

mod models;
mod service;

pub use models::{LearnedPair, MatchResult, MatchSource, Profile};
pub use service::Resolver;
