//! HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use relay::{validate_request, GenerationError, ImagePart, InputValidationError, StoryGenerator};

use crate::error::ApiError;
use crate::metrics::TimedOperation;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        upstream_configured: state.generator.is_configured(),
        similarity_scorer: state.checker.scorer_name(),
    })
}

/// Validate the upload, relay it upstream and return the raw story
pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateStoryRequest>, JsonRejection>,
) -> Result<Json<GenerateStoryResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("generate_story", request_id = %request_id);

    let result = async {
        let Json(req) = payload?;
        let story = generate(&state, req).await?;
        Ok::<_, ApiError>(Json(GenerateStoryResponse {
            success: true,
            story,
            request_id: request_id.clone(),
        }))
    }
    .instrument(span)
    .await;

    state.metrics.record_request(result.is_ok());
    result
}

async fn generate(state: &AppState, req: GenerateStoryRequest) -> Result<String, ApiError> {
    let limits = &state.image_limits;

    // Count and keyword are reported before any image is decoded
    if req.images.len() != limits.required_count {
        return Err(InputValidationError::ImageCount {
            expected: limits.required_count,
            actual: req.images.len(),
        }
        .into());
    }
    if req.keyword.trim().is_empty() {
        return Err(InputValidationError::EmptyKeyword.into());
    }

    let images = req
        .images
        .iter()
        .enumerate()
        .map(|(index, payload)| {
            let (mime_type, data) = payload.parts();
            ImagePart::from_payload(mime_type, data)
                .map_err(|reason| InputValidationError::InvalidImage { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_request(&images, &req.keyword, limits)?;

    info!(
        images = images.len(),
        bytes = images.iter().map(|i| i.data.len()).sum::<usize>(),
        "Relaying generation request"
    );

    let timer = TimedOperation::start();
    let generator = state.generator.as_ref();
    let images = images.as_slice();
    let keyword = req.keyword.as_str();

    let story = state
        .retry
        .retry_if(
            "generate_story",
            move || generator.generate(images, keyword),
            GenerationError::is_retryable,
        )
        .await?;

    let elapsed = timer.elapsed();
    let chars = story.chars().count();
    state.metrics.record_generation(elapsed, chars);
    info!(chars, elapsed_ms = elapsed.as_millis() as u64, "Story generated");

    Ok(story)
}

/// Segment (or accept an edited) document and run every analyzer over it
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let result = run_analysis(&state, payload).await;
    state.metrics.record_request(result.is_ok());
    result.map(Json)
}

async fn run_analysis(
    state: &AppState,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<AnalyzeResponse, ApiError> {
    let Json(req) = payload?;
    let timer = TimedOperation::start();

    let document = match (req.document, req.text) {
        (Some(mut document), _) => {
            document.normalize();
            document
        }
        (None, Some(text)) => segment::segment(&text),
        (None, None) => {
            return Err(ApiError::InvalidRequest(
                "either text or document is required".to_string(),
            ));
        }
    };

    let report = state.validator.validate(&document, &req.keyword);
    let similarity = state
        .checker
        .check_text(&document.body_text(), &req.keyword)
        .await;

    state
        .metrics
        .record_similarity(similarity.results.len(), similarity.failures.len());
    state.metrics.record_analysis(timer.elapsed());

    if similarity.is_degraded() {
        tracing::warn!(
            failed = similarity.failures.len(),
            "Similarity check degraded"
        );
    }

    Ok(AnalyzeResponse {
        document,
        stats: report.stats,
        length: report.length,
        keywords: report.keywords,
        similarity,
    })
}

/// Plain-text download of an edited document
pub async fn export(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let body = segment::to_plain_text(&req.document);
    let file_name = segment::export_file_name_today();

    let disposition = format!(
        "attachment; filename=\"export.txt\"; filename*=UTF-8''{}",
        urlencoding::encode(&file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        metrics: state.metrics.snapshot(),
        cache: state.cache.as_ref().map(|cache| cache.stats()),
    })
}
