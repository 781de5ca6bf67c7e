use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::persona::generator::GenerationError;

/// The one notice shown to users for any generation failure. The cause is logged.
pub const GENERATION_FAILED_MESSAGE: &str = "生成失败，请重试。（请检查API Key是否正确）";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(e) => {
                // Already logged with context by the generator.
                tracing::debug!("Generation error: {e}");
                let (status, code) = match e {
                    GenerationError::Configuration(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "LLM_NOT_CONFIGURED")
                    }
                    GenerationError::Transport(_) => {
                        (StatusCode::BAD_GATEWAY, "LLM_TRANSPORT_ERROR")
                    }
                    GenerationError::EmptyResponse => {
                        (StatusCode::BAD_GATEWAY, "LLM_EMPTY_RESPONSE")
                    }
                    GenerationError::MalformedResponse(_) => {
                        (StatusCode::BAD_GATEWAY, "LLM_MALFORMED_RESPONSE")
                    }
                };
                (status, code, GENERATION_FAILED_MESSAGE.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::persona::generator::MalformedReason;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn not_json() -> serde_json::Error {
        serde_json::from_str::<Value>("nope").unwrap_err()
    }

    #[tokio::test]
    async fn test_each_generation_failure_has_its_own_code() {
        let cases = [
            (
                GenerationError::Configuration("API key is missing".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM_NOT_CONFIGURED",
            ),
            (
                GenerationError::Transport(LlmError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
                StatusCode::BAD_GATEWAY,
                "LLM_TRANSPORT_ERROR",
            ),
            (
                GenerationError::EmptyResponse,
                StatusCode::BAD_GATEWAY,
                "LLM_EMPTY_RESPONSE",
            ),
            (
                GenerationError::MalformedResponse(MalformedReason::NotJson(not_json())),
                StatusCode::BAD_GATEWAY,
                "LLM_MALFORMED_RESPONSE",
            ),
        ];

        for (err, expected_status, expected_code) in cases {
            let (status, body) = render(AppError::from(err)).await;
            assert_eq!(status, expected_status);
            assert_eq!(body["error"]["code"], expected_code);
            assert_eq!(body["error"]["message"], GENERATION_FAILED_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_generation_detail_is_not_leaked_to_client() {
        let (_, body) = render(AppError::Generation(GenerationError::Transport(
            LlmError::Api {
                status: 401,
                message: "Incorrect API key sk-secret".to_string(),
            },
        )))
        .await;
        assert!(!body.to_string().contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_validation_message_is_passed_through() {
        let (status, body) = render(AppError::Validation("keyword cannot be empty".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "keyword cannot be empty");
    }
}
