pub mod config;
pub mod feedback;
pub mod games;
pub mod high_scores;
pub mod id_generator;
pub mod identifiers;
pub mod logger;
pub mod storage;

pub use identifiers::*;
