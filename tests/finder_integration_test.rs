use httpmock::prelude::*;
use tempfile::TempDir;
use unifinder::{
    AppConfig, DirectoryClient, FavoritesStore, FileStore, UniFinder, UnifinderError,
};

fn togo_universities() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "Université de Lomé",
            "country": "Togo",
            "alpha_two_code": "TG",
            "domains": ["univ-lome.tg"],
            "web_pages": ["https://univ-lome.tg/"]
        },
        {
            "name": "Université de Kara",
            "country": "Togo",
            "alpha_two_code": "TG",
            "domains": ["univ-kara.tg"],
            "web_pages": ["https://univ-kara.tg/"]
        }
    ])
}

#[tokio::test]
async fn test_search_favorite_and_search_again() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/search").query_param("country", "Togo");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(togo_universities());
    });

    let config = AppConfig::from_toml_str(&format!(
        "[directory]\nbase_url = \"{}\"\n\n[storage]\ndata_dir = \"{}\"\n",
        server.base_url(),
        temp_dir.path().to_string_lossy().replace('\\', "/")
    ))?;
    let finder = UniFinder::new(
        DirectoryClient::with_base_url(config.base_url())?,
        FavoritesStore::with_key(FileStore::new(config.data_dir()), config.favorites_key()),
    );

    let hits = finder.search("Togo").await?;
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|hit| !hit.is_favorite));

    let (university, created) = finder.favorite_by_name("Togo", "Université de Kara").await?;
    assert!(created);
    assert_eq!(university.domains, vec!["univ-kara.tg".to_string()]);

    let hits = finder.search(" Togo ").await?;
    assert!(!hits[0].is_favorite);
    assert!(hits[1].is_favorite);

    api_mock.assert_hits(3);
    assert!(temp_dir.path().join("unifinder_favorites.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_toggle_round_trip_through_disk() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(togo_universities());
    });

    let finder = UniFinder::new(
        DirectoryClient::with_base_url(&server.base_url())?,
        FavoritesStore::new(FileStore::new(temp_dir.path())),
    );

    assert!(finder.toggle_by_name("Togo", "Université de Lomé").await?);
    assert_eq!(finder.favorites().list().await.len(), 1);

    assert!(!finder.toggle_by_name("Togo", "Université de Lomé").await?);
    assert!(finder.favorites().list().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_remote_failure_leaves_favorites_untouched() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(503);
    });

    let finder = UniFinder::new(
        DirectoryClient::with_base_url(&server.base_url())?,
        FavoritesStore::new(FileStore::new(temp_dir.path())),
    );

    let err = finder
        .favorite_by_name("Togo", "Université de Lomé")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UnifinderError::RemoteServiceError { status_code: 503 }
    ));
    assert!(err.is_retryable());
    assert!(finder.favorites().list().await.is_empty());
    Ok(())
}
