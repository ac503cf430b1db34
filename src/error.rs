/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - FlowError (unknown service / access denied / service required) を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::flow::{FlowError, FlowErrorKind};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    // Unknown and denied services share one outcome; logs tell them apart.
    #[error("unauthorized service")]
    UnauthorizedService,
    #[error("service required")]
    ServiceRequired,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::UnauthorizedService => (
                StatusCode::FORBIDDEN,
                "UNAUTHORIZED_SERVICE",
                "application is not authorized to use SSO".to_string(),
            ),
            AppError::ServiceRequired => (
                StatusCode::FORBIDDEN,
                "SERVICE_REQUIRED",
                "a target application is required".to_string(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<FlowError> for AppError {
    fn from(e: FlowError) -> Self {
        match e.kind() {
            FlowErrorKind::UnknownService | FlowErrorKind::AccessDenied => {
                AppError::UnauthorizedService
            }
            FlowErrorKind::ServiceRequired => AppError::ServiceRequired,
        }
    }
}
