

pub mod core;
pub mod fill;
pub mod matcher;
pub mod resolver;
pub mod store;
pub mod utils;

pub use utils::{safe_truncate, safe_truncate_ellipsis};


pub use core::config::SmartfillConfig;
pub use core::error::{Result, SmartfillError};
pub use core::settings::Settings;
pub use fill::{FillEngine, FillReport};
pub use matcher::{HybridScorer, Lexicon, Scorer};
pub use resolver::{LearnedPair, MatchResult, MatchSource, Profile, Resolver};


pub const DEFAULT_THRESHOLD: f64 = 0.55;


pub const DEFAULT_READY_TIMEOUT_SECS: u64 = 30;


pub const DEFAULT_QUESTION_WAIT_MS: u64 = 12_000;


pub const DEFAULT_QUESTION_POLL_MS: u64 = 200;


pub const DEFAULT_STORE_PATH: &str = "smartfill-store.json";


pub const LOG_SNIPPET_CHARS: usize = 60;
