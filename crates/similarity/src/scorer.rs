use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Sentences shorter than this are too short to look up
pub const MIN_CHECKABLE_CHARS: usize = 20;

#[derive(Debug, Error)]
pub enum SimilarityCheckError {
    #[error("similarity lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("similarity service unreachable: {0}")]
    Transport(String),

    #[error("similarity service returned {status}")]
    Status { status: u16 },

    #[error("invalid similarity response: {0}")]
    InvalidResponse(String),

    #[error("similarity task aborted: {0}")]
    Aborted(String),
}

/// Scores how much a sentence overlaps with text already published elsewhere.
///
/// Returns a percentage in 0..=100.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn score(&self, sentence: &str) -> Result<u8, SimilarityCheckError>;

    /// Short name reported by the health endpoint
    fn name(&self) -> &'static str;
}

/// Placeholder scorer used until a similarity service is configured.
///
/// Every sentence scores 0, so nothing is ever flagged.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubScorer;

#[async_trait]
impl SimilarityScorer for StubScorer {
    async fn score(&self, sentence: &str) -> Result<u8, SimilarityCheckError> {
        if sentence.chars().count() < MIN_CHECKABLE_CHARS {
            return Ok(0);
        }
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    sentence: &'a str,
}

#[derive(Deserialize)]
struct ScoreResponse {
    similarity: f64,
}

/// Scorer backed by an external document-similarity service.
///
/// Posts `{"sentence": ...}` and expects `{"similarity": <0-100>}`.
#[derive(Clone)]
pub struct HttpScorer {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpScorer {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(endpoint: String, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl SimilarityScorer for HttpScorer {
    async fn score(&self, sentence: &str) -> Result<u8, SimilarityCheckError> {
        if sentence.chars().count() < MIN_CHECKABLE_CHARS {
            return Ok(0);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScoreRequest { sentence })
            .send()
            .await
            .map_err(|e| SimilarityCheckError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SimilarityCheckError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| SimilarityCheckError::InvalidResponse(e.to_string()))?;

        clamp_percentage(body.similarity)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn clamp_percentage(value: f64) -> Result<u8, SimilarityCheckError> {
    if !value.is_finite() {
        return Err(SimilarityCheckError::InvalidResponse(format!(
            "similarity is not a number: {}",
            value
        )));
    }
    Ok(value.round().clamp(0.0, 100.0) as u8)
}
