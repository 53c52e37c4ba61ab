

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::normalize::normalize;


#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TypeHint {
    Email,
    Phone,
    Date,
    Github,
    Linkedin,
    Url,
    Postal,
}


#[derive(Debug, Clone)]
pub struct TypeHintRule {
    pub hint: TypeHint,
    pub pattern: Regex,
}


#[derive(Debug, Clone, Default)]
pub struct TypeHintDetector {
    rules: Vec<TypeHintRule>,
}

impl TypeHintDetector {
    pub fn new(rules: Vec<TypeHintRule>) -> Self {
        Self { rules }
    }


    /// Every rule is tried against the normalized text; matches are independent.
    pub fn detect(&self, text: &str) -> BTreeSet<TypeHint> {
        let normalized = normalize(text);
        self.detect_normalized(&normalized)
    }


    pub fn detect_normalized(&self, normalized: &str) -> BTreeSet<TypeHint> {
        self.rules
            .iter()
            .filter(|rule| rule.pattern.is_match(normalized))
            .map(|rule| rule.hint)
            .collect()
    }


    pub fn rules(&self) -> &[TypeHintRule] {
        &self.rules
    }
}
