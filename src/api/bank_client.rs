use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use url::Url;

use crate::db::models::{Bank, BankPayload};
use crate::error::RegistryError;
use crate::types::ApiEnvelope;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api/";

/// Typed client for the `/api/banks` endpoints.
///
/// Not-found answers come back as `None`/`false`; any other non-success envelope is
/// [`RegistryError::Api`].
#[derive(Clone)]
pub struct BankClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BankClient {
    /// `base_url` points at the API root, e.g. `http://localhost:5001/api/`.
    pub fn new(base_url: Url) -> Result<Self, RegistryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .user_agent(concat!("bank-registry-client/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn banks_url(&self) -> Result<Url, RegistryError> {
        Ok(self.base_url.join("banks")?)
    }

    fn bank_url(&self, id: i64) -> Result<Url, RegistryError> {
        Ok(self.base_url.join(&format!("banks/{id}"))?)
    }

    pub async fn list_banks(&self) -> Result<Vec<Bank>, RegistryError> {
        let resp = self.http.get(self.banks_url()?).send().await?;
        let env: ApiEnvelope<Vec<Bank>> = read_envelope(resp)
            .await
            .inspect_err(|e| warn!(error = %e, "error fetching banks"))?;
        let banks = env.data.unwrap_or_default();
        info!(count = env.count.unwrap_or(banks.len()), "retrieved banks");
        Ok(banks)
    }

    pub async fn get_bank(&self, id: i64) -> Result<Option<Bank>, RegistryError> {
        let resp = self.http.get(self.bank_url(id)?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            info!(bank_id = id, "bank not found");
            return Ok(None);
        }
        let bank = read_envelope::<Bank>(resp)
            .await
            .and_then(require_data)
            .inspect_err(|e| warn!(bank_id = id, error = %e, "error fetching bank"))?;
        info!(bank_id = id, name = %bank.name, "retrieved bank");
        Ok(Some(bank))
    }

    pub async fn create_bank(&self, name: &str, location: &str) -> Result<Bank, RegistryError> {
        let resp = self
            .http
            .post(self.banks_url()?)
            .json(&payload(name, location))
            .send()
            .await?;
        let bank = read_envelope::<Bank>(resp)
            .await
            .and_then(require_data)
            .inspect_err(|e| warn!(error = %e, "error creating bank"))?;
        info!(bank_id = bank.id, name = %bank.name, "created bank");
        Ok(bank)
    }

    pub async fn update_bank(
        &self,
        id: i64,
        name: &str,
        location: &str,
    ) -> Result<Option<Bank>, RegistryError> {
        let resp = self
            .http
            .put(self.bank_url(id)?)
            .json(&payload(name, location))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            info!(bank_id = id, "bank not found for update");
            return Ok(None);
        }
        let bank = read_envelope::<Bank>(resp)
            .await
            .and_then(require_data)
            .inspect_err(|e| warn!(bank_id = id, error = %e, "error updating bank"))?;
        info!(bank_id = id, "updated bank");
        Ok(Some(bank))
    }

    /// `false` when the server has no such bank.
    pub async fn delete_bank(&self, id: i64) -> Result<bool, RegistryError> {
        let resp = self.http.delete(self.bank_url(id)?).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            info!(bank_id = id, "bank not found for deletion");
            return Ok(false);
        }
        read_envelope::<()>(resp)
            .await
            .inspect_err(|e| warn!(bank_id = id, error = %e, "error deleting bank"))?;
        info!(bank_id = id, "deleted bank");
        Ok(true)
    }
}

fn payload(name: &str, location: &str) -> BankPayload {
    BankPayload {
        name: Some(name.to_string()),
        location: Some(location.to_string()),
    }
}

/// Decode the envelope, turning HTTP errors and `success: false` into
/// [`RegistryError::Api`]. Bodies that are not an envelope are reported verbatim.
async fn read_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<ApiEnvelope<T>, RegistryError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    match serde_json::from_slice::<ApiEnvelope<T>>(&body) {
        Ok(env) if status.is_success() && env.success => Ok(env),
        Ok(env) => Err(RegistryError::Api {
            status,
            message: env.error.unwrap_or_else(|| status.to_string()),
        }),
        Err(e) if status.is_success() => Err(RegistryError::Api {
            status,
            message: format!("malformed response body: {e}"),
        }),
        Err(_) => Err(RegistryError::Api {
            status,
            message: String::from_utf8_lossy(&body).into_owned(),
        }),
    }
}

fn require_data<T>(env: ApiEnvelope<T>) -> Result<T, RegistryError> {
    env.data.ok_or_else(|| RegistryError::Api {
        status: StatusCode::OK,
        message: "response carried no data".to_string(),
    })
}
