pub mod checker;
pub mod scorer;
pub mod sentences;

pub use checker::{
    has_warnings, CheckerConfig, SimilarityChecker, SimilarityFailure, SimilarityReport,
    SimilarityResult, WARNING_THRESHOLD,
};
pub use scorer::{HttpScorer, SimilarityCheckError, SimilarityScorer, StubScorer};
pub use sentences::{extract_keyword_sentences, MAX_KEYWORD_SENTENCES};

