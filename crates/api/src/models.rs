//! Request and response bodies

use segment::Document;
use serde::{Deserialize, Serialize};
use similarity::SimilarityReport;
use validate::{KeywordReport, LengthReport, WordStats};

use crate::cache::CacheStats;
use crate::metrics::MetricsSnapshot;

/// One uploaded photo: a bare data URL string or `{ mimeType, data }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImagePayload {
    Inline(String),
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(default)]
        mime_type: Option<String>,
        data: String,
    },
}

impl ImagePayload {
    pub fn parts(&self) -> (Option<&str>, &str) {
        match self {
            ImagePayload::Inline(data) => (None, data),
            ImagePayload::Object { mime_type, data } => (mime_type.as_deref(), data),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateStoryRequest {
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default, alias = "keywords")]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryResponse {
    pub success: bool,
    pub story: String,
    pub request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<Document>,
    #[serde(default, alias = "keywords")]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub document: Document,
    pub stats: WordStats,
    pub length: LengthReport,
    pub keywords: KeywordReport,
    pub similarity: SimilarityReport,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub document: Document,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub upstream_configured: bool,
    pub similarity_scorer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: MetricsSnapshot,
    pub cache: Option<CacheStats>,
}
