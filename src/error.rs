use axum::{Json, http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::db::models::ValidationError;
use crate::types::envelope::ApiEnvelope;

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Bank not found")]
    NotFound { id: i64 },

    #[error("{0}")]
    InvalidPayload(String),

    /// The request body could not be read, e.g. it exceeded the size limit.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("API error with status {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl RegistryError {
    pub fn status(&self) -> StatusCode {
        match self {
            RegistryError::Validation(_) | RegistryError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
            RegistryError::Rejected { status, .. } | RegistryError::Api { status, .. } => *status,
            RegistryError::Database(_)
            | RegistryError::Config(_)
            | RegistryError::Figment(_)
            | RegistryError::Io(_)
            | RegistryError::Reqwest(_)
            | RegistryError::UrlParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(ApiEnvelope::<()>::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: RegistryError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        (status, serde_json::from_slice(&bytes).expect("body was not json"))
    }

    #[tokio::test]
    async fn validation_error_is_400_with_message() {
        let (status, body) = body_json(ValidationError::MissingFields.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Name and location are required");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = body_json(RegistryError::NotFound { id: 7 }).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Bank not found");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn rejected_body_keeps_its_status() {
        let err = RegistryError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "length limit exceeded");
    }

    #[tokio::test]
    async fn database_error_is_500_with_description() {
        let (status, body) = body_json(SqlxError::PoolClosed.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["error"]
                .as_str()
                .expect("error should be a string")
                .starts_with("Database error:")
        );
    }
}
