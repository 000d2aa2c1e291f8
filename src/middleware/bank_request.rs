use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::types::ApiEnvelope;
use crate::views;

pub const NO_DATA: &str = "No data provided";

/// `{id}` path segment of a bank route.
///
/// A segment that is not an integer cannot name a bank, so it is rejected as 404:
/// an envelope under `/api`, a plain page elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct BankId(pub i64);

impl<S> FromRequestParts<S> for BankId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match raw.parse::<i64>() {
            Ok(id) => Ok(Self(id)),
            Err(_) => {
                debug!(segment = %raw, "non-numeric bank id");
                if parts.uri.path().starts_with("/api/") {
                    Err((
                        StatusCode::NOT_FOUND,
                        Json(ApiEnvelope::<()>::failure("Bank not found")),
                    )
                        .into_response())
                } else {
                    Err((StatusCode::NOT_FOUND, Html(views::not_found())).into_response())
                }
            }
        }
    }
}

/// JSON request body for the `/api` routes.
///
/// Empty bodies, `null`, `{}` and `[]` are rejected with "No data provided"; unparsable or
/// mistyped JSON with a description of the problem. Both are 400s in the API envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RegistryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| RegistryError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            warn!("API: request body is empty");
            return Err(RegistryError::InvalidPayload(NO_DATA.to_string()));
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "API: request body is not valid JSON");
            RegistryError::InvalidPayload(format!("Invalid JSON body: {e}"))
        })?;

        let empty = match &value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if empty {
            warn!("API: request body carries no data");
            return Err(RegistryError::InvalidPayload(NO_DATA.to_string()));
        }

        let payload = serde_json::from_value(value).map_err(|e| {
            warn!(error = %e, "API: request body has the wrong shape");
            RegistryError::InvalidPayload(format!("Invalid JSON body: {e}"))
        })?;
        Ok(Self(payload))
    }
}
