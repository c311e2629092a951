//! Error responses for the HTTP surface

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay::{GenerationError, InputValidationError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InputValidation(#[from] InputValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid request body: {0}")]
    Rejection(#[from] JsonRejection),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InputValidation(InputValidationError::PayloadTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::InputValidation(_) | ApiError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Rejection(rejection) => rejection.status(),
            ApiError::Generation(GenerationError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Generation(GenerationError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the end user
    fn user_message(&self) -> String {
        match self {
            ApiError::InputValidation(InputValidationError::ImageCount { expected, .. }) => {
                format!("{}장의 사진이 필요합니다.", expected)
            }
            ApiError::InputValidation(InputValidationError::EmptyKeyword) => {
                "키워드가 필요합니다.".to_string()
            }
            ApiError::InputValidation(InputValidationError::PayloadTooLarge { .. }) => {
                "업로드한 사진의 용량이 너무 큽니다.".to_string()
            }
            ApiError::InputValidation(InputValidationError::InvalidImage { .. }) => {
                "올바르지 않은 사진 데이터입니다.".to_string()
            }
            ApiError::Generation(GenerationError::NotConfigured) => {
                "API 키가 설정되지 않았습니다.".to_string()
            }
            ApiError::Generation(_) => "후기 생성 중 오류가 발생했습니다.".to_string(),
            ApiError::Rejection(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "업로드한 사진의 용량이 너무 큽니다.".to_string()
            }
            ApiError::InvalidRequest(_) | ApiError::Rejection(_) => {
                "잘못된 요청입니다.".to_string()
            }
            ApiError::Internal(_) => "서버 오류가 발생했습니다.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let details = match &self {
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal error".to_string()
            }
            ApiError::Generation(e) => {
                tracing::error!(error = %e, "Generation failed");
                e.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.user_message(),
            "details": details,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
