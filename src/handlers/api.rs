use axum::{Json, extract::State, http::StatusCode};
use tracing::{error, info, warn};

use crate::db::models::{Bank, BankPayload};
use crate::error::RegistryError;
use crate::middleware::bank_request::{ApiJson, BankId};
use crate::router::RegistryState;
use crate::types::ApiEnvelope;

type ApiResult<T> = Result<T, RegistryError>;

/// GET /api/banks
pub async fn list_banks(
    State(state): State<RegistryState>,
) -> ApiResult<Json<ApiEnvelope<Vec<Bank>>>> {
    let banks = state
        .storage
        .list_all()
        .await
        .inspect_err(|e| error!(error = %e, "API error fetching banks"))?;
    info!(count = banks.len(), "API: retrieved banks");
    Ok(Json(ApiEnvelope::listing(banks)))
}

/// GET /api/banks/{id}
pub async fn get_bank(
    State(state): State<RegistryState>,
    BankId(id): BankId,
) -> ApiResult<Json<ApiEnvelope<Bank>>> {
    let bank = state
        .storage
        .get(id)
        .await
        .inspect_err(|e| error!(bank_id = id, error = %e, "API error fetching bank"))?
        .ok_or_else(|| {
            warn!(bank_id = id, "API: bank not found");
            RegistryError::NotFound { id }
        })?;
    info!(bank_id = id, "API: retrieved bank");
    Ok(Json(ApiEnvelope::ok(bank)))
}

/// POST /api/banks -> 201 with the stored record, including its new id.
pub async fn create_bank(
    State(state): State<RegistryState>,
    ApiJson(payload): ApiJson<BankPayload>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<Bank>>)> {
    let input = payload.validate().inspect_err(|_| {
        warn!("API: validation failed - name and location required");
    })?;
    let bank = state
        .storage
        .create(input)
        .await
        .inspect_err(|e| error!(error = %e, "API error creating bank"))?;
    info!(bank_id = bank.id, "API: bank created");
    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(bank).with_message("Bank created successfully")),
    ))
}

/// PUT /api/banks/{id}
///
/// The body is validated before the id is looked up, so a bad body on an unknown id
/// is a 400, not a 404.
pub async fn update_bank(
    State(state): State<RegistryState>,
    BankId(id): BankId,
    ApiJson(payload): ApiJson<BankPayload>,
) -> ApiResult<Json<ApiEnvelope<Bank>>> {
    let input = payload.validate().inspect_err(|_| {
        warn!(bank_id = id, "API: validation failed");
    })?;
    let bank = state
        .storage
        .update(id, input)
        .await
        .inspect_err(|e| error!(bank_id = id, error = %e, "API error updating bank"))?
        .ok_or_else(|| {
            warn!(bank_id = id, "API: bank not found for update");
            RegistryError::NotFound { id }
        })?;
    info!(bank_id = id, "API: bank updated");
    Ok(Json(
        ApiEnvelope::ok(bank).with_message("Bank updated successfully"),
    ))
}

/// DELETE /api/banks/{id}
pub async fn delete_bank(
    State(state): State<RegistryState>,
    BankId(id): BankId,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let removed = state
        .storage
        .delete(id)
        .await
        .inspect_err(|e| error!(bank_id = id, error = %e, "API error deleting bank"))?;
    if !removed {
        warn!(bank_id = id, "API: bank not found for deletion");
        return Err(RegistryError::NotFound { id });
    }
    info!(bank_id = id, "API: bank deleted");
    Ok(Json(ApiEnvelope::message_only("Bank deleted successfully")))
}
