

pub mod config;
pub mod error;
pub mod settings;

pub use config::SmartfillConfig;
pub use error::{Result, SmartfillError};
pub use settings::Settings;
