mod entry;
mod store;

pub use entry::HighScoreEntry;
pub use store::{DEFAULT_MAX_PER_BUCKET, HighScoreStore, NoPersistence, ScorePersistence};
