

pub mod lexicon;
pub mod normalize;
pub mod patterns;
pub mod scorer;
pub mod similarity;
pub mod synonyms;
pub mod type_hints;

pub use lexicon::{Lexicon, LexiconSpec, TypeHintPattern};
pub use normalize::{normalize, stem, Tokenizer};
pub use patterns::{STOP_WORDS, SYNONYM_TABLE, TYPE_HINT_PATTERNS};
pub use scorer::{best_match, HybridScorer, ScoreBreakdown, Scorer, ScoringError, ScoringWeights};
pub use similarity::{either_contains, jaccard, levenshtein, levenshtein_similarity};
pub use synonyms::{SynonymExpander, TokenSet};
pub use type_hints::{TypeHint, TypeHintDetector, TypeHintRule};
