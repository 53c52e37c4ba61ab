

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lexicon::Lexicon;
use super::normalize::normalize;
use super::similarity::{either_contains, jaccard, levenshtein_similarity};


#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Scorer is not ready")]
    NotReady,

    #[error("Scoring failed: {0}")]
    Failed(String),
}


/// Similarity capability injected into the resolver.
pub trait Scorer: Send + Sync {
    /// Returns a similarity in `[0, 1]`; must be symmetric in its arguments.
    fn score(&self, question: &str, candidate: &str) -> Result<f64, ScoringError>;


    fn name(&self) -> &str {
        "custom"
    }
}

impl Scorer for Arc<dyn Scorer> {
    fn score(&self, question: &str, candidate: &str) -> Result<f64, ScoringError> {
        (**self).score(question, candidate)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub token_overlap: f64,
    pub edit_similarity: f64,
    pub containment: f64,
    pub type_hint_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            token_overlap: 0.52,
            edit_similarity: 0.33,
            containment: 0.10,
            type_hint_bonus: 0.10,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub token_overlap: f64,
    pub edit_similarity: f64,
    pub containment: bool,
    pub type_bonus: f64,
    pub identical: bool,
    pub total: f64,
}


/// Token overlap + edit distance + containment + type agreement, no model required.
#[derive(Debug, Clone)]
pub struct HybridScorer {
    lexicon: Arc<Lexicon>,
    weights: ScoringWeights,
}

impl HybridScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_weights(lexicon, ScoringWeights::default())
    }


    pub fn with_weights(lexicon: Arc<Lexicon>, weights: ScoringWeights) -> Self {
        Self { lexicon, weights }
    }


    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }


    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }


    pub fn breakdown(&self, question: &str, candidate: &str) -> ScoreBreakdown {
        let question_norm = normalize(question);
        let candidate_norm = normalize(candidate);

        let tokenizer = self.lexicon.tokenizer();
        let synonyms = self.lexicon.synonyms();
        let question_tokens = synonyms.expand(tokenizer.tokenize(&question_norm));
        let candidate_tokens = synonyms.expand(tokenizer.tokenize(&candidate_norm));

        let token_overlap = jaccard(&question_tokens, &candidate_tokens);
        let edit_similarity = levenshtein_similarity(&question_norm, &candidate_norm);
        let containment = either_contains(&question_norm, &candidate_norm);

        let detector = self.lexicon.type_hints();
        let question_hints = detector.detect_normalized(&question_norm);
        let candidate_hints = detector.detect_normalized(&candidate_norm);
        let type_bonus = if question_hints.is_disjoint(&candidate_hints) {
            0.0
        } else {
            self.weights.type_hint_bonus
        };

        let identical = question_norm == candidate_norm && !question_tokens.is_empty();
        let total = if identical {
            1.0
        } else {
            let weighted = self.weights.token_overlap * token_overlap
                + self.weights.edit_similarity * edit_similarity
                + if containment { self.weights.containment } else { 0.0 }
                + type_bonus;
            weighted.clamp(0.0, 1.0)
        };

        ScoreBreakdown {
            token_overlap,
            edit_similarity,
            containment,
            type_bonus,
            identical,
            total,
        }
    }
}

impl Default for HybridScorer {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()))
    }
}

impl Scorer for HybridScorer {
    fn score(&self, question: &str, candidate: &str) -> Result<f64, ScoringError> {
        Ok(self.breakdown(question, candidate).total)
    }

    fn name(&self) -> &str {
        "hybrid-lexical"
    }
}


/// Index and score of the best candidate; the first candidate seeds the search and only a
/// strictly greater score replaces it.
pub fn best_match<S, I, C>(
    scorer: &S,
    question: &str,
    candidates: I,
) -> Result<Option<(usize, f64)>, ScoringError>
where
    S: Scorer + ?Sized,
    I: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = scorer.score(question, candidate.as_ref())?;
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> HybridScorer {
        HybridScorer::default()
    }

    fn score(a: &str, b: &str) -> f64 {
        scorer().score(a, b).unwrap()
    }

    #[test]
    fn test_self_score_is_one() {
        for text in ["Email", "Your full legal name", "GitHub profile", "Date of birth", "xyz"] {
            assert_eq!(score(text, text), 1.0, "self score for {text:?}");
        }
    }

    #[test]
    fn test_stop_word_only_self_score_not_forced() {
        let b = scorer().breakdown("the", "the");
        assert!(!b.identical);
        assert_eq!(b.token_overlap, 0.0);
        assert!((b.total - 0.43).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("Your full legal name", "name"),
            ("What's your email?", "Email address"),
            ("Phone number", "mobile"),
            ("GitHub or portfolio link", "website"),
            ("", "email"),
            ("Favorite color", "gender"),
        ];
        for (a, b) in pairs {
            assert_eq!(score(a, b), score(b, a), "asymmetric for {a:?} / {b:?}");
        }
    }

    #[test]
    fn test_full_legal_name_matches_name() {
        let b = scorer().breakdown("Your full legal name", "name");
        assert!((b.token_overlap - 8.0 / 9.0).abs() < 1e-9);
        assert!((b.edit_similarity - 0.2).abs() < 1e-9);
        assert!(b.containment);
        assert_eq!(b.type_bonus, 0.0);
        assert!(b.total > 0.55);
    }

    #[test]
    fn test_unrelated_scores_low() {
        assert!(score("Favorite color", "name") < 0.55);
        assert!(score("Favorite color", "email") < 0.55);
    }

    #[test]
    fn test_type_bonus_is_capped() {
        let b = scorer().breakdown("github portfolio link", "git website");
        assert_eq!(b.type_bonus, 0.10);
    }

    #[test]
    fn test_scores_within_bounds() {
        let texts = ["", "a", "Email", "E-mail", "Phone / WhatsApp", "LinkedIn URL", "名前"];
        for a in texts {
            for b in texts {
                let s = score(a, b);
                assert!((0.0..=1.0).contains(&s), "{s} out of range for {a:?}/{b:?}");
            }
        }
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            token_overlap: 1.0,
            edit_similarity: 0.0,
            containment: 0.0,
            type_hint_bonus: 0.0,
        };
        let s = HybridScorer::with_weights(Arc::new(Lexicon::default()), weights);
        assert_eq!(s.score("Favorite color", "name").unwrap(), 0.0);
    }

    #[test]
    fn test_best_match_prefers_first_on_tie() {
        let best = best_match(&scorer(), "Email", ["email", "EMAIL", "phone"]).unwrap();
        assert_eq!(best, Some((0, 1.0)));
    }

    #[test]
    fn test_best_match_empty() {
        assert_eq!(best_match(&scorer(), "Email", Vec::<String>::new()).unwrap(), None);
    }
}
