

use serde::{Deserialize, Serialize};

use super::error::{Result, SmartfillError};
use crate::DEFAULT_THRESHOLD;


/// Per-fill options supplied by the caller. The engine reads them, never writes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, alias = "review_mode", alias = "reviewmode")]
    pub review_mode: bool,
    #[serde(default, alias = "learning_enabled", alias = "learningenabled")]
    pub learning_enabled: bool,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Settings {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }


    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(SmartfillError::Validation(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }


    pub fn should_learn(&self) -> bool {
        self.learning_enabled && !self.review_mode
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            review_mode: false,
            learning_enabled: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"reviewMode": true}"#).unwrap();
        assert!(settings.review_mode);
        assert!(!settings.learning_enabled);
        assert!((settings.threshold - 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_camel_case_round_trip() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json.get("learningEnabled").is_some());
        assert!(json.get("learning_enabled").is_none());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Settings::with_threshold(0.0).validate().is_ok());
        assert!(Settings::with_threshold(1.0).validate().is_ok());
        assert!(Settings::with_threshold(1.2).validate().is_err());
        assert!(Settings::with_threshold(-0.1).validate().is_err());
        assert!(Settings::with_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_review_mode_never_learns() {
        let settings = Settings {
            review_mode: true,
            learning_enabled: true,
            threshold: 0.5,
        };
        assert!(!settings.should_learn());
    }
}
