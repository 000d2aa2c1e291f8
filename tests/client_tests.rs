mod common;

use bank_registry::{BankClient, RegistryError};
use tokio::net::TcpListener;
use url::Url;

async fn serve() -> (tempfile::TempDir, BankClient) {
    let (dir, _storage, app) = common::app().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    let base = Url::parse(&format!("http://{addr}/api")).expect("url");
    (dir, BankClient::new(base).expect("client"))
}

#[tokio::test]
async fn client_walks_through_every_operation() {
    let (_dir, client) = serve().await;

    assert!(client.list_banks().await.expect("list").is_empty());

    let wells = client
        .create_bank("Wells Fargo", "San Francisco, CA")
        .await
        .expect("create");
    let chase = client
        .create_bank("JPMorgan Chase", "New York, NY")
        .await
        .expect("create");
    assert_ne!(wells.id, chase.id);

    let found = client.get_bank(wells.id).await.expect("get");
    assert_eq!(found.as_ref(), Some(&wells));

    let updated = client
        .update_bank(wells.id, "Wells Fargo & Co", "SF")
        .await
        .expect("update")
        .expect("bank exists");
    assert_eq!(updated.id, wells.id);
    assert_eq!(updated.name, "Wells Fargo & Co");

    assert!(client.delete_bank(chase.id).await.expect("delete"));
    assert!(!client.delete_bank(chase.id).await.expect("second delete"));
    assert!(client.get_bank(chase.id).await.expect("get").is_none());

    let banks = client.list_banks().await.expect("list");
    assert_eq!(banks, vec![updated]);
}

#[tokio::test]
async fn client_reports_missing_banks_as_none() {
    let (_dir, client) = serve().await;
    assert!(client.get_bank(99999).await.expect("get").is_none());
    assert!(
        client
            .update_bank(99999, "A", "B")
            .await
            .expect("update")
            .is_none()
    );
}

#[tokio::test]
async fn client_surfaces_validation_errors() {
    let (_dir, client) = serve().await;
    let err = client
        .create_bank("  ", "Somewhere")
        .await
        .expect_err("blank name must fail");
    match err {
        RegistryError::Api { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "Name and location are required");
        }
        other => panic!("unexpected error: {other}"),
    }
}
