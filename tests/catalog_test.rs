//! Catalog API client tests
//!
//! Tests the three series endpoints and how failures surface.

use fyvio::api::catalog::is_not_found;
use fyvio::api::{CatalogClient, CatalogError};
use mockito::Server;

const DETAILS_1399: &str = r#"{
    "id": 1399,
    "name": "Game of Thrones",
    "overview": "Seven noble families fight for control of the mythical land of Westeros.",
    "poster_url": "https://image.tmdb.org/t/p/w500/1XS1oqL89opfnbLl8WnZY1O1uJx.jpg",
    "vote_average": 8.4,
    "first_air_date": "2011-04-17",
    "original_language": "en",
    "number_of_seasons": 8
}"#;

const SIMILAR_1399: &str = r#"[
    {
        "id": 94997,
        "name": "House of the Dragon",
        "poster_url": null,
        "vote_average": 8.4,
        "first_air_date": "2022-08-21"
    },
    {
        "id": 71912,
        "title": "The Witcher",
        "vote_average": 8.0,
        "first_air_date": "2019-12-20"
    }
]"#;

const SEASON_1399_1: &str = r#"{
    "seasons": [
        {"season_number": 2, "name": "Season 2", "episode_count": 10},
        {"season_number": 0, "name": "Specials", "episode_count": 14},
        {"season_number": 1, "name": "Season 1", "episode_count": 10}
    ],
    "episodes": [
        {"id": 63056, "season_number": 1, "episode_number": 1, "name": "Winter Is Coming",
         "overview": "Lord Stark is troubled.", "air_date": "2011-04-17"},
        {"id": 63057, "season_number": 1, "episode_number": 2, "name": "The Kingsroad",
         "overview": "", "air_date": "2011-04-24"}
    ]
}"#;

// =============================================================================
// Details / Similar Tests
// =============================================================================

#[tokio::test]
async fn test_series_details_parses() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/tv/1399")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DETAILS_1399)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let details = client.series_details(1399).await.unwrap();

    mock.assert_async().await;

    assert_eq!(details.id, 1399);
    assert_eq!(details.name, "Game of Thrones");
    assert_eq!(details.rating_label(), "8.4");
    assert_eq!(details.language_label().as_deref(), Some("EN"));
    assert_eq!(details.seasons_label().as_deref(), Some("8 Seasons"));
    assert_eq!(details.page_title(), "Game of Thrones - TV Series | Fyvio");
}

#[tokio::test]
async fn test_series_details_sparse_record() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/tv/7")
        .with_status(200)
        .with_body(r#"{"id": 7, "name": "Pilot Only", "vote_average": 0, "number_of_seasons": 1}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let details = client.series_details(7).await.unwrap();

    assert_eq!(details.overview, "");
    assert_eq!(details.rating_label(), "N/A");
    assert_eq!(details.language_label(), None);
    assert_eq!(details.seasons_label().as_deref(), Some("1 Season"));
    assert_eq!(details.poster(), "/placeholder-poster.jpg");
}

#[tokio::test]
async fn test_similar_accepts_title_key() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/tv/1399/similar")
        .with_status(200)
        .with_body(SIMILAR_1399)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let similar = client.similar_series(1399).await.unwrap();

    mock.assert_async().await;

    assert_eq!(similar.len(), 2);
    assert_eq!(similar[0].to_string(), "House of the Dragon (2022)");
    assert_eq!(similar[1].name, "The Witcher");
}

#[tokio::test]
async fn test_series_bundle_fetches_both() {
    let mut server = Server::new_async().await;

    let details = server
        .mock("GET", "/api/tv/1399")
        .with_status(200)
        .with_body(DETAILS_1399)
        .create_async()
        .await;
    let similar = server
        .mock("GET", "/api/tv/1399/similar")
        .with_status(200)
        .with_body(SIMILAR_1399)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let bundle = client.series_bundle(1399).await.unwrap();

    details.assert_async().await;
    similar.assert_async().await;
    assert_eq!(bundle.details.name, "Game of Thrones");
    assert_eq!(bundle.similar.len(), 2);
}

#[tokio::test]
async fn test_series_bundle_fails_when_similar_fails() {
    let mut server = Server::new_async().await;

    let _details = server
        .mock("GET", "/api/tv/1399")
        .with_status(200)
        .with_body(DETAILS_1399)
        .create_async()
        .await;
    let _similar = server
        .mock("GET", "/api/tv/1399/similar")
        .with_status(500)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.series_bundle(1399).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::ServerError(500))
    ));
}

// =============================================================================
// Season Tests
// =============================================================================

#[tokio::test]
async fn test_season_sorted_and_filtered() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/tv/1399/season/1")
        .with_status(200)
        .with_body(SEASON_1399_1)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let listing = client.season(1399, 1).await.unwrap();

    mock.assert_async().await;

    let numbers: Vec<u32> = listing.seasons.iter().map(|s| s.season_number).collect();
    assert_eq!(numbers, vec![0, 1, 2]);
    assert_eq!(listing.episodes.len(), 2);
    assert!(listing.episodes.iter().all(|e| e.season_number == 1));
    assert_eq!(listing.episodes[0].code(), "S1E1");
}

#[tokio::test]
async fn test_season_missing_fields_default_empty() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/tv/5/season/1")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let listing = client.season(5, 1).await.unwrap();
    assert!(listing.seasons.is_empty());
    assert!(listing.episodes.is_empty());
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/tv/999999999")
        .with_status(404)
        .with_body(r#"{"detail": "Not Found"}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.series_details(999999999).await.unwrap_err();
    assert!(is_not_found(&err));
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/tv/1399/season/2")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.season(1399, 2).await.unwrap_err();

    mock.assert_async().await;
    assert!(!is_not_found(&err));
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::ServerError(503))
    ));
}

#[tokio::test]
async fn test_invalid_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/tv/1399")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.series_details(1399).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on port 9 locally
    let client = CatalogClient::new("http://127.0.0.1:9");
    let err = client.series_details(1399).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::RequestFailed(_))
    ));
}
