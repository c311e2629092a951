use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::scorer::{SimilarityCheckError, SimilarityScorer};
use crate::sentences::extract_keyword_sentences;

/// Sentences scoring at or above this percentage are flagged
pub const WARNING_THRESHOLD: u8 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    pub sentence: String,
    pub similarity: u8,
    pub is_warning: bool,
}

impl SimilarityResult {
    pub fn new(sentence: String, similarity: u8) -> Self {
        Self {
            sentence,
            similarity,
            is_warning: similarity >= WARNING_THRESHOLD,
        }
    }
}

/// A sentence whose lookup failed and was scored 0 instead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityFailure {
    pub index: usize,
    pub sentence: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityReport {
    /// One entry per input sentence, in input order
    pub results: Vec<SimilarityResult>,
    pub failures: Vec<SimilarityFailure>,
    pub has_warnings: bool,
}

impl SimilarityReport {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub fn has_warnings(results: &[SimilarityResult]) -> bool {
    results.iter().any(|r| r.is_warning)
}

#[derive(Debug, Clone, Copy)]
pub struct CheckerConfig {
    pub max_concurrent: usize,
    pub timeout: Duration,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Scores keyword sentences with bounded fan-out.
///
/// Lookups fail open: a sentence whose lookup errors or times out scores 0
/// and is listed in `SimilarityReport::failures`.
#[derive(Clone)]
pub struct SimilarityChecker {
    scorer: Arc<dyn SimilarityScorer>,
    limit: Arc<Semaphore>,
    timeout: Duration,
}

impl SimilarityChecker {
    pub fn new(scorer: Arc<dyn SimilarityScorer>, config: CheckerConfig) -> Self {
        Self {
            scorer,
            limit: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            timeout: config.timeout,
        }
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Score one sentence, 0 on any failure
    pub async fn check_similarity(&self, sentence: &str) -> u8 {
        match score_with_timeout(self.scorer.as_ref(), sentence, self.timeout).await {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, "Similarity check failed, scoring 0");
                0
            }
        }
    }

    /// Extract the keyword sentences of `text` and score them
    pub async fn check_text(&self, text: &str, keyword: &str) -> SimilarityReport {
        self.check_all(extract_keyword_sentences(text, keyword)).await
    }

    pub async fn check_all(&self, sentences: Vec<String>) -> SimilarityReport {
        let mut tasks = JoinSet::new();

        for (index, sentence) in sentences.iter().cloned().enumerate() {
            let scorer = Arc::clone(&self.scorer);
            let limit = Arc::clone(&self.limit);
            let timeout = self.timeout;

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = limit.acquire_owned().await;
                let outcome = score_with_timeout(scorer.as_ref(), &sentence, timeout).await;
                (index, outcome)
            });
        }

        let mut scores: Vec<Option<Result<u8, SimilarityCheckError>>> =
            (0..sentences.len()).map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => scores[index] = Some(outcome),
                Err(e) => warn!(error = %e, "Similarity task panicked"),
            }
        }

        let mut results = Vec::with_capacity(sentences.len());
        let mut failures = Vec::new();

        for (index, (sentence, outcome)) in sentences.into_iter().zip(scores).enumerate() {
            let outcome = outcome.unwrap_or_else(|| {
                Err(SimilarityCheckError::Aborted("task did not complete".to_string()))
            });

            let score = match outcome {
                Ok(score) => score,
                Err(e) => {
                    warn!(sentence_index = index, error = %e, "Similarity check failed, scoring 0");
                    failures.push(SimilarityFailure {
                        index,
                        sentence: sentence.clone(),
                        reason: e.to_string(),
                    });
                    0
                }
            };

            results.push(SimilarityResult::new(sentence, score));
        }

        debug!(
            checked = results.len(),
            failed = failures.len(),
            "Similarity batch finished"
        );

        SimilarityReport {
            has_warnings: has_warnings(&results),
            results,
            failures,
        }
    }
}

async fn score_with_timeout(
    scorer: &dyn SimilarityScorer,
    sentence: &str,
    timeout: Duration,
) -> Result<u8, SimilarityCheckError> {
    match tokio::time::timeout(timeout, scorer.score(sentence)).await {
        Ok(result) => result,
        Err(_) => Err(SimilarityCheckError::Timeout(timeout)),
    }
}
