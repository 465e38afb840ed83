//! End-to-end: the client SDK against a running server.

use exchange_rates::StaticRateProvider;
use resolver_client::ResolverClient;
use resolver_hex::{ResolutionService, inbound::HttpServer};
use resolver_repo::SqliteRepo;
use resolver_types::Source;

/// Starts a server on an ephemeral port backed by an on-disk SQLite file.
async fn spawn_server(dir: &tempfile::TempDir) -> String {
    let url = format!("sqlite://{}/data/resolver.db", dir.path().display());
    let repo = SqliteRepo::new(&url).await.unwrap();
    let service = ResolutionService::new(repo, StaticRateProvider::new());
    service.seed().await.unwrap();
    let app = HttpServer::new(service).router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_full_flow() {
    let dir = tempfile::tempdir().unwrap();
    let client = ResolverClient::new(spawn_server(&dir).await);

    assert!(client.health().await.unwrap());

    // Seeded from the static table
    let currencies = client.list_currencies().await.unwrap();
    assert_eq!(currencies.len(), 8);
    assert!(currencies.iter().all(|c| c.source == Source::Exchange));

    // First conversion goes to the provider and caches the pair
    let first = client.convert("USD", "BRL", "10").await.unwrap();
    assert_eq!(first.conversion_source, Source::Exchange);
    assert!((first.converted_amount - 50.0).abs() < 1e-9);

    let second = client.convert("BRL", "USD", "50").await.unwrap();
    assert_eq!(second.conversion_source, Source::Repo);
    assert!((second.converted_amount - 10.0).abs() < 1e-9);

    let same = client.convert("EUR", "eur", "3").await.unwrap();
    assert_eq!(same.conversion_source, Source::NoEdit);
    assert_eq!(same.converted_amount, 3.0);

    // Manual rate management
    client.update_rate("USD", "BRL", 4.0).await.unwrap();
    let updated = client.convert("USD", "BRL", "10").await.unwrap();
    assert!((updated.converted_amount - 40.0).abs() < 1e-9);

    client.remove_rate("USD", "BRL").await.unwrap();
    assert!(client.list_rates().await.unwrap().is_empty());
    assert!(
        client
            .remove_rate("USD", "BRL")
            .await
            .unwrap_err()
            .is_not_found()
    );

    // Currency management
    let added = client.add_currency("abc", "Test coin").await.unwrap();
    assert_eq!(added.symbol, "ABC");
    assert_eq!(added.source, Source::Repo);
    client.update_currency("ABC", "Renamed").await.unwrap();
    assert_eq!(
        client.get_currency("abc").await.unwrap().description,
        "Renamed"
    );
    client.remove_currency("ABC").await.unwrap();
    assert!(client.get_currency("ABC").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let client = ResolverClient::new(spawn_server(&dir).await);

    let err = client.convert("USD", "BRL", "abc").await.unwrap_err();

    assert!(err.to_string().contains("amount is not a number"));
    assert!(!err.is_not_found());
}
