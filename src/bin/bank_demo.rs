//! Walks through every API operation against a running server.
//!
//! `BANK_API_URL` overrides the API root (default `http://localhost:5001/api/`).

use bank_registry::api::bank_client::{BankClient, DEFAULT_BASE_URL};
use bank_registry::{Bank, RegistryError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

fn show(banks: &[Bank]) {
    for bank in banks {
        info!(
            "  ID: {}, Name: {}, Location: {}",
            bank.id, bank.name, bank.location
        );
    }
}

/// A failed create is logged and skipped so the rest of the walkthrough still runs.
async fn try_create(client: &BankClient, name: &str, location: &str) -> Option<Bank> {
    client
        .create_bank(name, location)
        .await
        .inspect_err(|e| warn!(name, error = %e, "create failed"))
        .ok()
}

#[tokio::main]
async fn main() -> Result<(), RegistryError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let base = std::env::var("BANK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let client = BankClient::new(Url::parse(&base)?)?;
    info!(base_url = %client.base_url(), "make sure the server is running");

    info!("1. CREATE - adding banks");
    let wells = try_create(&client, "Wells Fargo", "San Francisco, CA").await;
    let boa = try_create(&client, "Bank of America", "Charlotte, NC").await;
    let chase = try_create(&client, "JPMorgan Chase", "New York, NY").await;

    info!("2. READ - all banks");
    show(&client.list_banks().await?);

    info!("3. READ - one bank");
    if let Some(bank) = &wells
        && let Some(found) = client.get_bank(bank.id).await?
    {
        show(std::slice::from_ref(&found));
    }

    info!("4. UPDATE - modifying a bank");
    if let Some(bank) = &boa {
        client
            .update_bank(bank.id, "Bank of America (Updated)", "Charlotte, North Carolina")
            .await?;
    }

    info!("5. DELETE - removing a bank");
    if let Some(bank) = &chase {
        client.delete_bank(bank.id).await?;
    }

    info!("6. VERIFY - final state");
    show(&client.list_banks().await?);

    info!("demonstration complete");
    Ok(())
}
