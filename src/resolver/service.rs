

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::models::{LearnedPair, MatchResult, MatchSource, Profile};
use crate::core::error::SmartfillError;
use crate::matcher::{best_match, HybridScorer, Scorer, ScoringError};
use crate::utils::{contains_ignore_case, safe_truncate_ellipsis};
use crate::LOG_SNIPPET_CHARS;


/// Two-stage resolution: learned memory, then the profile, then substring containment
/// when the profile-stage scorer fails. Never mutates its inputs.
#[derive(Clone)]
pub struct Resolver {
    scorer: Arc<dyn Scorer>,
}

impl Resolver {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        debug!("Resolver initialized with scorer: {}", scorer.name());
        Self { scorer }
    }


    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }


    pub fn resolve(
        &self,
        question: &str,
        learned: &[LearnedPair],
        profile: &Profile,
        threshold: f64,
    ) -> Option<MatchResult> {
        let snippet = safe_truncate_ellipsis(question, LOG_SNIPPET_CHARS);

        match self.match_learned(question, learned, threshold) {
            Ok(Some(result)) => {
                info!("Learned memory hit for '{}' (score {:.3})", snippet, result.score);
                return Some(result);
            }
            Ok(None) => {}
            Err(e) => warn!(
                "Learned-memory stage skipped for '{}': {}",
                snippet,
                SmartfillError::from(e)
            ),
        }

        match self.match_profile(question, profile, threshold) {
            Ok(Some(result)) => {
                info!(
                    "Profile key '{}' matched '{}' (score {:.3})",
                    result.key_or_question, snippet, result.score
                );
                Some(result)
            }
            Ok(None) => {
                debug!("No match above {:.2} for '{}'", threshold, snippet);
                None
            }
            Err(e) => {
                warn!(
                    "Falling back to substring match for '{}': {}",
                    snippet,
                    SmartfillError::from(e)
                );
                Self::substring_fallback(question, profile)
            }
        }
    }


    pub fn match_learned(
        &self,
        question: &str,
        learned: &[LearnedPair],
        threshold: f64,
    ) -> Result<Option<MatchResult>, ScoringError> {
        let best = best_match(
            self.scorer.as_ref(),
            question,
            learned.iter().map(|pair| pair.question.as_str()),
        )?;

        Ok(best
            .filter(|(_, score)| *score >= threshold)
            .map(|(index, score)| {
                let pair = &learned[index];
                MatchResult {
                    key_or_question: pair.question.clone(),
                    value: pair.answer.clone(),
                    score,
                    source: MatchSource::LearnedMemory,
                }
            })
            .filter(has_answer))
    }


    pub fn match_profile(
        &self,
        question: &str,
        profile: &Profile,
        threshold: f64,
    ) -> Result<Option<MatchResult>, ScoringError> {
        let best = best_match(self.scorer.as_ref(), question, profile.keys())?;

        Ok(best
            .filter(|(_, score)| *score >= threshold)
            .and_then(|(index, score)| {
                profile.iter().nth(index).map(|(key, value)| MatchResult {
                    key_or_question: key.to_string(),
                    value: value.to_string(),
                    score,
                    source: MatchSource::Profile,
                })
            })
            .filter(has_answer))
    }


    /// First profile key (insertion order) contained in the question, case-insensitively.
    pub fn substring_fallback(question: &str, profile: &Profile) -> Option<MatchResult> {
        profile
            .iter()
            .find(|(key, value)| {
                !key.is_empty() && !value.is_empty() && contains_ignore_case(question, key)
            })
            .map(|(key, value)| MatchResult {
                key_or_question: key.to_string(),
                value: value.to_string(),
                score: 1.0,
                source: MatchSource::SubstringFallback,
            })
    }
}

/// An empty answer counts as no match; the best candidate is not replaced by a runner-up.
fn has_answer(result: &MatchResult) -> bool {
    if result.value.is_empty() {
        debug!("Ignoring empty answer from '{}'", result.key_or_question);
        return false;
    }
    true
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Arc::new(HybridScorer::default()))
    }
}
