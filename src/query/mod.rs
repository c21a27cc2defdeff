pub mod cache;
pub mod clean;
pub mod engine;
pub mod scorer;
pub mod types;

pub use engine::QueryEngine;
pub use types::{QueryMode, ScoredDocument};
