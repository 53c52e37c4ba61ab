

mod base;
mod file;
mod learned;
mod memory;
mod profiles;

pub use base::{get_typed, set_typed, KeyValueStore, LEARNED_KEY, PROFILES_KEY, SETTINGS_KEY};
pub use file::JsonFileStore;
pub use learned::{merge, parse_import, LearnedPairs, LearnedPool, LearningSink};
pub use memory::MemoryStore;
pub use profiles::ProfileBook;
