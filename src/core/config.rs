

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::settings::Settings;
use crate::{
    DEFAULT_QUESTION_POLL_MS, DEFAULT_QUESTION_WAIT_MS, DEFAULT_READY_TIMEOUT_SECS,
    DEFAULT_STORE_PATH,
};


pub const ENV_PREFIX: &str = "SMARTFILL";


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartfillConfig {
    pub ready_timeout_secs: u64,
    pub question_wait_ms: u64,
    pub question_poll_ms: u64,
    pub store_path: PathBuf,
    pub lexicon_path: Option<PathBuf>,

    #[serde(default)]
    pub settings: Settings,
}

impl SmartfillConfig {
    /// Layers built-in defaults, an optional config file, then `SMARTFILL_*` variables.
    ///
    /// Nested keys use a double underscore, e.g. `SMARTFILL_SETTINGS__THRESHOLD=0.7`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("ready_timeout_secs", defaults.ready_timeout_secs)?
            .set_default("question_wait_ms", defaults.question_wait_ms)?
            .set_default("question_poll_ms", defaults.question_poll_ms)?
            .set_default("store_path", defaults.store_path.to_string_lossy().to_string())?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.settings.validate()?;
        Ok(config)
    }


    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }


    pub fn question_wait(&self) -> Duration {
        Duration::from_millis(self.question_wait_ms)
    }


    pub fn question_poll(&self) -> Duration {
        Duration::from_millis(self.question_poll_ms.max(1))
    }
}

impl Default for SmartfillConfig {
    fn default() -> Self {
        Self {
            ready_timeout_secs: DEFAULT_READY_TIMEOUT_SECS,
            question_wait_ms: DEFAULT_QUESTION_WAIT_MS,
            question_poll_ms: DEFAULT_QUESTION_POLL_MS,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            lexicon_path: None,
            settings: Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SmartfillConfig::default();
        assert_eq!(config.ready_timeout(), Duration::from_secs(30));
        assert_eq!(config.question_wait(), Duration::from_millis(12_000));
        assert!((config.settings.threshold - 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartfill.json");
        std::fs::write(
            &path,
            r#"{"question_wait_ms": 10000, "settings": {"threshold": 0.7, "reviewMode": true}}"#,
        )
        .unwrap();

        let config = SmartfillConfig::load(Some(&path)).unwrap();
        assert_eq!(config.question_wait_ms, 10_000);
        assert_eq!(config.ready_timeout_secs, 30);
        assert!(config.settings.review_mode);
        assert!((config.settings.threshold - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_bad_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartfill.json");
        std::fs::write(&path, r#"{"settings": {"threshold": 3.0}}"#).unwrap();

        assert!(SmartfillConfig::load(Some(&path)).is_err());
    }
}
