

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::normalize::Tokenizer;
use super::patterns::{STOP_WORDS, SYNONYM_TABLE, TYPE_HINT_PATTERNS};
use super::synonyms::SynonymExpander;
use super::type_hints::{TypeHint, TypeHintDetector, TypeHintRule};
use crate::core::error::{Result, SmartfillError};


/// Serializable vocabulary, the on-disk form of a [`Lexicon`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconSpec {
    pub stop_words: Vec<String>,
    pub synonyms: HashMap<String, Vec<String>>,
    pub type_hints: Vec<TypeHintPattern>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeHintPattern {
    pub hint: TypeHint,
    pub pattern: String,
}

impl Default for LexiconSpec {
    fn default() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            synonyms: SYNONYM_TABLE
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
            type_hints: TYPE_HINT_PATTERNS
                .iter()
                .filter_map(|(hint, pattern)| match hint.parse::<TypeHint>() {
                    Ok(hint) => Some(TypeHintPattern {
                        hint,
                        pattern: pattern.to_string(),
                    }),
                    Err(_) => {
                        warn!("Unknown type hint in default table: {}", hint);
                        None
                    }
                })
                .collect(),
        }
    }
}


/// Immutable vocabulary shared by the tokenizer, synonym expander and type-hint detector.
#[derive(Debug, Clone)]
pub struct Lexicon {
    tokenizer: Tokenizer,
    synonyms: SynonymExpander,
    type_hints: TypeHintDetector,
}

impl Lexicon {
    pub fn new(tokenizer: Tokenizer, synonyms: SynonymExpander, type_hints: TypeHintDetector) -> Self {
        Self {
            tokenizer,
            synonyms,
            type_hints,
        }
    }


    pub fn from_spec(spec: LexiconSpec) -> Result<Self> {
        let mut rules = Vec::with_capacity(spec.type_hints.len());
        for entry in &spec.type_hints {
            let pattern = Regex::new(&entry.pattern).map_err(|e| {
                SmartfillError::Config(format!("invalid pattern for {}: {}", entry.hint, e))
            })?;
            rules.push(TypeHintRule {
                hint: entry.hint,
                pattern,
            });
        }
        Ok(Self::assemble(spec, rules))
    }


    fn assemble(spec: LexiconSpec, rules: Vec<TypeHintRule>) -> Self {
        let lexicon = Self::new(
            Tokenizer::new(spec.stop_words),
            SynonymExpander::new(spec.synonyms),
            TypeHintDetector::new(rules),
        );

        debug!(
            "Lexicon built: {} stop words, {} synonym keys, {} type rules",
            lexicon.tokenizer.stop_word_count(),
            lexicon.synonyms.len(),
            lexicon.type_hints.rules().len()
        );

        lexicon
    }


    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let spec: LexiconSpec = serde_json::from_str(&raw)?;
        Self::from_spec(spec)
    }


    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }


    pub fn synonyms(&self) -> &SynonymExpander {
        &self.synonyms
    }


    pub fn type_hints(&self) -> &TypeHintDetector {
        &self.type_hints
    }
}

impl Default for Lexicon {
    /// Built from [`LexiconSpec::default`]; a bad built-in rule is skipped rather than fatal.
    fn default() -> Self {
        let spec = LexiconSpec::default();
        let rules = spec
            .type_hints
            .iter()
            .filter_map(|entry| match Regex::new(&entry.pattern) {
                Ok(pattern) => Some(TypeHintRule {
                    hint: entry.hint,
                    pattern,
                }),
                Err(e) => {
                    warn!("Skipping default type rule {}: {}", entry.hint, e);
                    None
                }
            })
            .collect();

        Self::assemble(spec, rules)
    }
}
